use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// The capability set a value domain `T` must provide for [`crate::Expression`]
/// to evaluate a dCGP graph over it (§9 "Variant scalar domain"). Real numbers
/// and truncated power series ("generalized duals") both satisfy this; only
/// `f64` is implemented in this crate, as the scalar domain itself is an
/// external collaborator (§1).
pub trait Scalar:
    Clone
    + PartialEq
    + PartialOrd
    + Debug
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    fn zero() -> Self;
    fn one() -> Self;

    /// Answers the "is the value non-finite?" question protected division
    /// needs, without the kernel itself knowing how the domain represents
    /// infinities or NaNs (§9).
    fn is_finite(&self) -> bool;

    fn exp(&self) -> Self;
    fn ln(&self) -> Self;
    fn sin(&self) -> Self;
    fn cos(&self) -> Self;
    fn tanh(&self) -> Self;
    fn sqrt(&self) -> Self;
}

impl Scalar for f64 {
    fn zero() -> Self {
        <f64 as num_traits::Zero>::zero()
    }

    fn one() -> Self {
        <f64 as num_traits::One>::one()
    }

    fn is_finite(&self) -> bool {
        num_traits::Float::is_finite(*self)
    }

    fn exp(&self) -> Self {
        num_traits::Float::exp(*self)
    }

    fn ln(&self) -> Self {
        num_traits::Float::ln(*self)
    }

    fn sin(&self) -> Self {
        num_traits::Float::sin(*self)
    }

    fn cos(&self) -> Self {
        num_traits::Float::cos(*self)
    }

    fn tanh(&self) -> Self {
        num_traits::Float::tanh(*self)
    }

    fn sqrt(&self) -> Self {
        num_traits::Float::sqrt(*self)
    }
}

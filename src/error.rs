use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

/// Result alias used throughout the crate.
pub type DcgpResult<T> = Result<T, DcgpError>;

/// An owned-or-borrowed error message, cheap to construct from a `&'static str`
/// or a formatted `String`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrString(Cow<'static, str>);

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: Into<Cow<'static, str>>> From<T> for ErrString {
    fn from(v: T) -> Self {
        Self(v.into())
    }
}

/// Every failure the core can raise. One kind per §7 of the spec; no kind is
/// retried internally and no partial state is ever left observable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DcgpError {
    /// Any of `n, m, r, c, L, |F|` is zero; `|arity| != c`; some `arity[j] == 0`.
    InvalidShape { message: ErrString },
    /// `set(x)` was given the wrong length or an out-of-bounds gene.
    InvalidChromosome { message: ErrString },
    /// `mutate(k)` / `mutate([..])` was given an index `>= S`.
    InvalidIndex { message: ErrString },
    /// `set_f_gene` was given a non-function node id, or a kernel id out of range.
    InvalidNode { message: ErrString },
    /// Batch loss was given mismatched/empty inputs, or a non-dividing `parallel`.
    InvalidBatch { message: ErrString },
    /// A loss kind string outside `{"MSE", "CE"}`.
    UnknownLoss { message: ErrString },
    /// `|point| != n` or `|prediction| != m` during evaluation or loss.
    ShapeMismatch { message: ErrString },
}

impl DcgpError {
    pub fn message(&self) -> &ErrString {
        match self {
            Self::InvalidShape { message }
            | Self::InvalidChromosome { message }
            | Self::InvalidIndex { message }
            | Self::InvalidNode { message }
            | Self::InvalidBatch { message }
            | Self::UnknownLoss { message }
            | Self::ShapeMismatch { message } => message,
        }
    }
}

impl Display for DcgpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidShape { message } => write!(f, "invalid shape: {}", message),
            Self::InvalidChromosome { message } => write!(f, "invalid chromosome: {}", message),
            Self::InvalidIndex { message } => write!(f, "invalid index: {}", message),
            Self::InvalidNode { message } => write!(f, "invalid node: {}", message),
            Self::InvalidBatch { message } => write!(f, "invalid batch: {}", message),
            Self::UnknownLoss { message } => write!(f, "unknown loss: {}", message),
            Self::ShapeMismatch { message } => write!(f, "shape mismatch: {}", message),
        }
    }
}

impl std::error::Error for DcgpError {}

/// Builds a [`DcgpError`] of the given kind from a format string, without
/// returning it. Pair with `return Err(..)` or use [`ensure!`] instead.
#[macro_export]
macro_rules! dcgp_err {
    (InvalidShape: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::DcgpError::InvalidShape { message: format!($fmt, $($arg),*).into() }
    };
    (InvalidChromosome: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::DcgpError::InvalidChromosome { message: format!($fmt, $($arg),*).into() }
    };
    (InvalidIndex: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::DcgpError::InvalidIndex { message: format!($fmt, $($arg),*).into() }
    };
    (InvalidNode: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::DcgpError::InvalidNode { message: format!($fmt, $($arg),*).into() }
    };
    (InvalidBatch: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::DcgpError::InvalidBatch { message: format!($fmt, $($arg),*).into() }
    };
    (UnknownLoss: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::DcgpError::UnknownLoss { message: format!($fmt, $($arg),*).into() }
    };
    (ShapeMismatch: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::DcgpError::ShapeMismatch { message: format!($fmt, $($arg),*).into() }
    };
}

/// `ensure!(cond, Kind: "fmt", args...)` returns `Err(dcgp_err!(..))` from the
/// enclosing function when `cond` is false.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($tt:tt)+) => {
        if !$cond {
            return Err($crate::dcgp_err!($($tt)+));
        }
    };
}

//! Bundled kernel library for the `f64` real domain (§4.1 ambient note).
//! Every constructor here returns a [`Kernel<f64>`]; callers are free to
//! build their own kernel slice for any other [`Scalar`] domain instead.

use crate::kernel::Kernel;
use crate::scalar::Scalar;

fn fold_sub<T: Scalar>(args: &[T]) -> T {
    let mut iter = args.iter().cloned();
    let first = iter.next().unwrap_or_else(T::zero);
    iter.fold(first, |acc, v| acc - v)
}

fn sum_symbolic(args: &[String]) -> String {
    format!("({})", args.join(" + "))
}

fn diff_symbolic(args: &[String]) -> String {
    if args.len() == 1 {
        return args[0].clone();
    }
    format!("({})", args.join(" - "))
}

fn prod_symbolic(args: &[String]) -> String {
    format!("({})", args.join(" * "))
}

fn unary_symbolic(name: &str, args: &[String]) -> String {
    format!("{}({})", name, args.first().cloned().unwrap_or_default())
}

/// Saturating n-ary sum: accepts any arity, folds the entire slice.
pub fn sum<T: Scalar>() -> Kernel<T> {
    Kernel::new(
        "sum",
        |args: &[T]| {
            args.iter()
                .cloned()
                .fold(T::zero(), |acc, v| acc + v)
        },
        sum_symbolic,
    )
}

/// Left fold subtraction: `args[0] - args[1] - ... - args[n-1]`.
pub fn diff<T: Scalar>() -> Kernel<T> {
    Kernel::new("diff", fold_sub, diff_symbolic)
}

/// Saturating n-ary product.
pub fn prod<T: Scalar>() -> Kernel<T> {
    Kernel::new(
        "prod",
        |args: &[T]| {
            args.iter()
                .cloned()
                .fold(T::one(), |acc, v| acc * v)
        },
        prod_symbolic,
    )
}

/// Protected division (§4.1): `args[0] / args[1]`, returning `1` whenever the
/// result is not finite in the domain `T`.
pub fn pdiv<T: Scalar>() -> Kernel<T> {
    Kernel::new(
        "div",
        |args: &[T]| {
            let result = args[0].clone() / args[1].clone();
            if result.is_finite() {
                result
            } else {
                T::one()
            }
        },
        |args: &[String]| format!("({} / {})", args[0], args[1]),
    )
}

macro_rules! unary_kernel {
    ($fn_name:ident, $op_name:literal, $method:ident) => {
        pub fn $fn_name<T: Scalar>() -> Kernel<T> {
            Kernel::new(
                $op_name,
                |args: &[T]| args[0].$method(),
                |args: &[String]| unary_symbolic($op_name, args),
            )
        }
    };
}

unary_kernel!(sin, "sin", sin);
unary_kernel!(cos, "cos", cos);
unary_kernel!(tanh, "tanh", tanh);
unary_kernel!(sqrt, "sqrt", sqrt);

/// Natural exponential. Unary: reads `args[0]` only.
pub fn exp<T: Scalar>() -> Kernel<T> {
    Kernel::new(
        "exp",
        |args: &[T]| args[0].exp(),
        |args: &[String]| unary_symbolic("exp", args),
    )
}

/// Protected natural log: `0` for non-positive input rather than NaN/-inf.
pub fn log<T: Scalar>() -> Kernel<T> {
    Kernel::new(
        "log",
        |args: &[T]| {
            if args[0] > T::zero() {
                args[0].ln()
            } else {
                T::zero()
            }
        },
        |args: &[String]| unary_symbolic("log", args),
    )
}

/// The default real-domain library: `{sum, diff, prod, div, sin, cos, exp,
/// log, tanh, sqrt}`, in this order (so `f_id` is stable across tests).
pub fn default_library() -> Vec<Kernel<f64>> {
    vec![
        sum(),
        diff(),
        prod(),
        pdiv(),
        sin(),
        cos(),
        exp(),
        log(),
        tanh(),
        sqrt(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_is_saturating() {
        let k = sum::<f64>();
        assert_eq!(k.apply(&[1.0, 2.0, 3.0]), 6.0);
        assert_eq!(k.apply(&[5.0]), 5.0);
    }

    #[test]
    fn diff_left_folds() {
        let k = diff::<f64>();
        assert_eq!(k.apply(&[10.0, 3.0, 2.0]), 5.0);
    }

    #[test]
    fn pdiv_guards_non_finite() {
        let k = pdiv::<f64>();
        assert_eq!(k.apply(&[1.0, 0.0]), 1.0);
        assert_eq!(k.apply(&[6.0, 3.0]), 2.0);
    }

    #[test]
    fn log_guards_non_positive() {
        let k = log::<f64>();
        assert_eq!(k.apply(&[0.0]), 0.0);
        assert_eq!(k.apply(&[-4.0]), 0.0);
        assert!((k.apply(&[std::f64::consts::E]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unary_kernels_ignore_extra_args() {
        let k = sin::<f64>();
        assert_eq!(k.apply(&[0.0, 99.0, 42.0]), 0.0);
    }

    #[test]
    fn symbolic_forms_are_readable() {
        assert_eq!(
            sum::<f64>().apply_symbolic(&["x0".into(), "x1".into()]),
            "(x0 + x1)"
        );
        assert_eq!(exp::<f64>().apply_symbolic(&["x0".into()]), "exp(x0)");
    }

    #[test]
    fn default_library_has_ten_kernels() {
        assert_eq!(default_library().len(), 10);
    }
}

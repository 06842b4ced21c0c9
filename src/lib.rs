//! Differentiable Cartesian Genetic Programming: a chromosome encoding, an
//! active-subgraph evaluator, and the mutation operators and loss reducer
//! that drive evolutionary search over it.
//!
//! An [`Expression`] is the crate's one load-bearing type: it owns a
//! [`bounds::Layout`]-shaped chromosome, a kernel library, an instance-owned
//! [`rng::Rng`], and the [`active::ActiveSet`] derived from its current
//! genes. Training/weight-learning, continuous-parameter optimization,
//! chromosome persistence, and genetic crossover are all out of scope —
//! this crate only evaluates and mutates.

pub mod active;
pub mod bounds;
pub mod error;
pub mod eval;
pub mod kernel;
pub mod kernels;
pub mod logging;
pub mod loss;
pub mod mutation;
pub mod rng;
pub mod scalar;

mod expression;
mod spinlock;

pub use active::ActiveSet;
pub use bounds::Layout;
pub use error::{DcgpError, DcgpResult, ErrString};
pub use expression::Expression;
pub use kernel::Kernel;
pub use logging::init_tracing;
pub use loss::Loss;
pub use rng::Rng;
pub use scalar::Scalar;
pub use spinlock::SpinLock;

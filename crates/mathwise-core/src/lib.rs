pub mod classify;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod expr;
pub mod normalize;
pub mod numfmt;
pub mod problem;
pub mod trace;

pub use classify::{classify, wants_steps, RemoteOperation};
pub use engine::{RemoteEngine, SymbolicEngine};
pub use envelope::{EnvelopeBuilder, Forms, ResultEnvelope, Solution, Source};
pub use error::{MathError, MathResult};
pub use expr::{Constant, Expr, Func};
pub use normalize::normalize;
pub use problem::ProblemType;
pub use trace::{combine, DetailedStep, StepTrace};

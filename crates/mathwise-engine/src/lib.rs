//! Local symbolic engine: parser, canonical simplifier, polynomial tools,
//! calculus and real root finding behind [`mathwise_core::SymbolicEngine`].

pub mod calculus;
pub mod eval;
pub mod expand;
pub mod local;
pub mod parser;
pub mod poly;
pub mod simplify;
pub mod solve;

pub use local::LocalEngine;
pub use parser::parse;

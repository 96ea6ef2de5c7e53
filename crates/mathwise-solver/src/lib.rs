pub mod analysis;
pub mod hybrid;
pub mod protocol;
pub mod remote;
pub mod router;
pub mod server;
pub mod strategies;

pub use analysis::FunctionAnalysis;
pub use remote::NewtonClient;
pub use router::{Router, SolverMode, Strategy};
pub use server::{run_server, ServerOptions};

pub mod runtime;
pub mod server;
pub mod timer;

pub use timer::TokioTimer;

//! CI run context - trigger details in, named outputs back out

pub mod context;
pub mod output;

pub use context::RunContext;
pub use output::ActionOutputs;

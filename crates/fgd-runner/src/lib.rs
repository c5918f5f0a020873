pub mod aggregate;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod scenario;

pub use aggregate::*;
pub use config::*;
pub use output::*;
pub use pipeline::*;

pub mod details;
pub mod model;
pub mod result;
pub mod signal;
pub mod state;

pub use details::*;
pub use model::*;
pub use result::*;
pub use signal::*;
pub use state::*;

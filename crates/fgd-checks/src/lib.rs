pub mod artifacts;
pub mod cache;
pub mod check;
pub mod junit;
pub mod logs;
pub mod lookup;
pub mod provenance;

pub use artifacts::*;
pub use cache::*;
pub use check::*;
pub use junit::*;
pub use logs::*;
pub use lookup::*;
pub use provenance::*;

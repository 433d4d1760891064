pub mod attempt;
pub mod classification;
pub mod config;
pub mod table;

pub use attempt::*;
pub use classification::*;
pub use config::*;
pub use table::*;

pub mod bit;
pub mod branch;
pub mod error;
pub mod config;
pub mod logic;
pub mod history;
pub mod table;
pub mod predictor;
pub mod stats;
pub mod workload;

pub use bit::*;
pub use branch::*;
pub use error::*;
pub use config::*;
pub use history::*;
pub use table::*;
pub use predictor::*;

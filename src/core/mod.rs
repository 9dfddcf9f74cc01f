pub mod config;
pub mod error;
pub mod types;

pub use config::{SimulationConfig, TurnPolicy};
pub use error::{EaterError, Result};
pub use types::{Direction, Location, PlayerId, Tick};

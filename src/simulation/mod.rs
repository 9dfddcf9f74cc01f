pub mod tick;

pub use tick::{run_tick, TickEvent, TickOutcome, TickReport};

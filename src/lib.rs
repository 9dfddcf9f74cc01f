//! Eaters - turn-based grid-world simulation with human and scripted players

pub mod core;
pub mod input;
pub mod player;
pub mod simulation;
pub mod world;

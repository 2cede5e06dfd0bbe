//! Simulation core for a single-screen arcade shooter: a hero ship, a
//! descending 5×5 enemy grid, lasers, and explosions.
//!
//! The core consumes abstract [`Intent`]s and wall-clock time and produces a
//! [`Frame`] for an external renderer. It never draws and never reads keys.

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod frame;
pub mod intent;
pub mod state;

pub use compute::Game;
pub use config::GameConfig;
pub use error::ConfigError;
pub use frame::Frame;
pub use intent::Intent;
pub use state::{Outcome, Phase};

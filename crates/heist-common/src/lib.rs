//! # Heist Common
//!
//! Shared types, constants, and errors used across the Data Heist components.
//!
//! ## Modules
//! - `types` - Core data structures (DefenseSystem, Detection, Puzzle, etc.)
//! - `error` - Game error types
//! - `constants` - Default economy numbers, file pool, and passwords

pub mod constants;
pub mod error;
pub mod types;

pub use error::HeistError;
pub use types::*;

//! Greenhouse decision engine: fuzzy inference over sensor readings feeding
//! a lock-guarded controller that arbitrates between automatic and manual
//! actuator control.

pub mod config;
pub mod db;
pub mod error;
pub mod fuzzy;
pub mod logic;
pub mod models;
pub mod server;

pub use error::{Result, SmartGrowError};

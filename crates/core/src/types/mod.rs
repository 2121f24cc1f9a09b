//! Core types for Chargeboard.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod charger;
pub mod id;
pub mod name;
pub mod reset_time;
pub mod version;

pub use charger::{ChargerPreference, SpotType};
pub use id::*;
pub use name::{UserName, UserNameError};
pub use reset_time::{ResetTime, ResetTimeError};
pub use version::StateVersion;

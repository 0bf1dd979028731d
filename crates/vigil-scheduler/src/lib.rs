//! Vigil Scheduler - due-time arithmetic for periodic checks.
//!
//! Embedders persist the timestamp returned by [`next_check_timestamp`]
//! alongside their own state and poll [`is_check_due`] on whatever cadence
//! suits them; nothing here spawns tasks or keeps time of its own.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod scheduler;

pub use scheduler::{is_check_due, next_check_timestamp};

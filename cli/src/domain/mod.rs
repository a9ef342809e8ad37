//! Domain layer - pure business logic
//!
//! This module contains business logic with no external I/O.
//! Types and functions here can be unit tested without mocking.

pub mod deb_arg;
pub mod distribution;
pub mod package;

// Re-export commonly used types
pub use deb_arg::DebArg;
pub use distribution::Distribution;
pub use package::{diff, parse_list, PackageRecord};

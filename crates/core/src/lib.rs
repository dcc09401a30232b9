#![forbid(unsafe_code)]
//! Domain types for the quiz client: questions, grading, summaries, roles.
//!
//! This crate does no I/O.

pub mod auth;
pub mod error;
pub mod grading;
pub mod model;
pub mod time;

pub use error::Error;
pub use time::Clock;

#![forbid(unsafe_code)]
//! Local key-value state for the quiz client.
//!
//! Everything the client keeps between runs (the generated quiz, the job it
//! came from, the auth token and profile) lives behind [`KeyValueStore`].

pub mod local_state;
pub mod repository;
pub mod sqlite;

pub use local_state::{LocalState, StoredQuiz, keys};
pub use repository::{InMemoryStore, KeyValueStore, StorageError};

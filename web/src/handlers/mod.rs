//! HTTP request handlers.
//!
//! Handlers transcode REST requests into command requests and command
//! results back into JSON responses; they hold no logic of their own.

pub mod cards;
pub mod decks;
pub mod health;

pub use health::health_check;

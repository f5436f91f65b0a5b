//! Flashcards service binaries.
//!
//! - `flashcards-server`: wires `PostgreSQL`, RedPanda and the command layer
//!   behind the REST router ([`app::run`])
//! - `flashcards-client`: command-line client for the REST API ([`client`])
//!
//! Both read their settings from the environment ([`Config`]).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app;
pub mod client;
pub mod config;

pub use client::{ClientCommand, ClientError, FlashcardsClient};
pub use config::Config;

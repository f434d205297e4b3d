//! Core domain + application logic for the anonymizing relay bot.
//!
//! This crate is framework-agnostic. Telegram lives behind the `MessagingPort`
//! trait implemented in the adapter crate.

pub mod archive;
pub mod config;
pub mod domain;
pub mod errors;
pub mod links;
pub mod logging;
pub mod messaging;
pub mod moderation;
pub mod pending;
pub mod quota;
pub mod relay;
pub mod state;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::{Error, Result};

//! Core types: tokens, player ids, messages, RNG, configuration, errors.
//!
//! Everything else in the crate is built from these. None of them hold
//! shared state; the services in `players`, `feed` and `sync` do.

pub mod config;
pub mod error;
pub mod message;
pub mod player;
pub mod rng;

pub use config::ServerConfig;
pub use error::{ChatError, Result};
pub use message::{redact_rule, Message, MessageView, NewMessage, Verdict, REDACTED_RULE};
pub use player::{PlayerId, Token};
pub use rng::RuleRng;

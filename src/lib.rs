//! # ng-chat
//!
//! A small shared chat game. Every player is secretly assigned a
//! forbidden-message rule ("NG rule"). Each post is judged against its
//! author's own rule and tagged as violating or safe. Other players can see
//! your rule in the feed; you only ever see `"?"`.
//!
//! ## Design Principles
//!
//! 1. **One ordered log**: All messages live in a single append-only log.
//!    Its index order is the only order; cursors point into it.
//!
//! 2. **Long-poll, not busy-poll**: A fetch suspends on a length
//!    notification channel and wakes on the first append past its cursor,
//!    or when the timeout elapses.
//!
//! 3. **Rules are values**: A player's rule is a `Rule` enum chosen once
//!    from a weighted `RuleCatalog`. Judging is pure and bounded.
//!
//! ## Modules
//!
//! - `core`: Tokens, player ids, messages, RNG, configuration, errors
//! - `rules`: Rule kinds, primality, the rule catalog
//! - `players`: Player registry (rule assignment, cursors, post counts)
//! - `feed`: Append-only message log
//! - `sync`: Long-poll coordinator and per-viewer redaction
//! - `room`: Fetch/Post operations composed from the above
//! - `gateway`: axum HTTP routes

pub mod core;
pub mod feed;
pub mod gateway;
pub mod players;
pub mod room;
pub mod rules;
pub mod sync;

// Re-export commonly used types
pub use crate::core::{
    ChatError, Message, MessageView, NewMessage, PlayerId, Result, RuleRng, ServerConfig, Token,
    Verdict, REDACTED_RULE,
};

pub use crate::feed::MessageLog;

pub use crate::players::{Contact, PlayerRegistry, PlayerView};

pub use crate::room::ChatRoom;

pub use crate::rules::{CatalogEntry, Rule, RuleCatalog, Script};

pub use crate::sync::SyncCoordinator;

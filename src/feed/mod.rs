//! The shared message feed.
//!
//! `MessageLog` is the single source of truth for "what's new". Its index
//! order is the total order every read cursor refers to.

pub mod log;

pub use self::log::MessageLog;

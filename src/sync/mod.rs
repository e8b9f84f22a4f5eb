//! Long-poll synchronization.
//!
//! `SyncCoordinator` turns the log's length notifications into a blocking
//! "wait for messages past my cursor, up to T" operation.

pub mod coordinator;

pub use coordinator::SyncCoordinator;

//! Player registry.
//!
//! Maps opaque session tokens to players. Owns rule assignment: the first
//! time a token is seen, a rule is drawn from the catalog and fixed for
//! the rest of the session.

pub mod registry;

pub use registry::{Contact, PlayerRegistry, PlayerView};

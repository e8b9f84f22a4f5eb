//! Forbidden-message rules and the catalog they are assigned from.
//!
//! - `Rule`: one variant per kind of forbidden behaviour, with parameters
//! - `RuleCatalog`: the closed, weighted set a new player's rule is drawn from
//! - `prime`: digit-run primality used by `Rule::ContainsPrime`
//!
//! Rules never see shared state; judging is a pure function of the body.

pub mod catalog;
pub mod prime;
pub mod rule;

pub use catalog::{CatalogEntry, RuleCatalog};
pub use rule::{Rule, Script, ZODIAC_ANIMALS};

//! # Request Validation
//!
//! Declarative rule tables checked before a handler runs. A request that
//! violates any rule is answered with every violation and never reaches a
//! repository.

pub mod rules;
pub mod schemas;

pub use rules::{is_valid_id, Check, FieldRule, Location, Presence, RuleSet, Violation};

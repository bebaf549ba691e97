//! Rule engine — fixed, ordered registry of graph rules.

pub mod endpoints;
pub mod engine;
pub mod env;
pub mod queries;
pub mod rls;
pub mod types;
pub mod ui;
pub mod wiring;

pub use engine::{create_all_rules, Rule, RuleContext, RuleEngine};
pub use types::*;

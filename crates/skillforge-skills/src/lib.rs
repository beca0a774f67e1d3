//! Skill documents for SkillForge
//!
//! Provides the typed skill document model, the pure derivation heuristics
//! that read intent ids, examples, entities and mock data out of tool
//! definitions, and the expansion engine that completes a minimal document.

pub mod derivation;
pub mod errors;
pub mod expansion;
pub mod models;

pub use errors::SkillError;
pub use expansion::{expand, Expansion, ExpansionEngine};
pub use models::*;

#![warn(missing_docs)]

//! SkillForge HTTP API
//!
//! Stateless endpoints over the skill pipeline: health, skill validation with
//! auto-expansion and auto-fix, section checks, solution validation and
//! cascading issue evaluation.

#[allow(missing_docs)]
pub mod config;
#[allow(missing_docs)]
pub mod error;
pub mod handlers;
pub mod middleware;
#[allow(missing_docs)]
pub mod models;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{AppConfig, ConfigManager};
pub use error::{ApiError, ApiJson, ApiResult};
pub use server::ApiServer;
pub use state::AppState;

//! API route handlers

pub mod cascade;
pub mod health;
pub mod validation;

//! Request handlers

pub mod compat;
pub mod health;
pub mod openapi;
pub mod polls;
pub mod sessions;

//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`classify`] - Report content categories and eligibility
//! - [`config`] - Configuration management (init, path, show)
//! - [`mount`] - Mount the overlay
//! - [`render`] - One-shot render of a single file

pub mod classify;
pub mod config;
pub mod mount;
pub mod render;

//! Sweetshop - storefront catalog with an admin API
//!
//! This library crate exposes the core functionality for integration testing.

pub mod catalog;
pub mod config;
pub mod photos;
pub mod server;

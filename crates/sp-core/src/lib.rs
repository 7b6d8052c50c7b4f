//! # sp-core
//!
//! Core types, traits, and utilities for SiteProgress RS.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Core traits (Identifiable, Timestamped)
//! - Configuration types

pub mod config;
pub mod error;
pub mod traits;

pub use error::*;
pub use traits::*;

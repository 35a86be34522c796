//! # GeoMed Common Library
//!
//! Shared code for the GeoMed service:
//! - Error taxonomy
//! - Configuration loading and data folder resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};

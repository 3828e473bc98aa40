//! Data models for receipt records and configuration.

pub mod config;
pub mod record;

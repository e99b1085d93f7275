//! Utility modules: logging setup and configuration

pub mod config;
pub mod logger;

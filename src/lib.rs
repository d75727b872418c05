#![doc = include_str!("../README.md")]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod runtime;
pub mod services;
pub mod types;

pub use config::*;
pub use error::*;
pub use services::*;
pub use types::*;

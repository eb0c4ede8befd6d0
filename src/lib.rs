// src/lib.rs

pub mod config;
pub mod core;
pub mod coverage;
pub mod dataset;
pub mod error;
pub mod persistence;
pub mod scoring;
pub mod store;
pub use crate::core::engine::VocabEngine;
pub use crate::error::{Result, VocabError};

//! # Cadence Core
//!
//! The domain layer of Cadence: post lifecycle, usage metering, moderation and
//! the generate → moderate → schedule pipeline.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::PipelineError;

//! # Application Layer
//!
//! Use-case orchestration on top of the domain: retrying sources,
//! aggregating their quotes and reporting failures.

pub mod error;
pub mod services;

//! Result types shared by providers and the search orchestrator
//!
//! This module defines the plain value types that flow from the providers
//! through the result channel to the caller.

mod types;

pub use types::*;

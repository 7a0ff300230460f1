//! Search provider module
//!
//! Defines the Provider trait and provides a registry for all search providers.

mod loader;
mod registry;
mod traits;

// Provider implementations
pub mod bing;
pub mod blekko;
pub mod google;

pub use loader::ProviderLoader;
pub use registry::{ProviderRegistry, ProviderSet};
pub use traits::*;

//! Runtime configuration
//!
//! - `ZenforgeConfig` - paths, editor command and defaults for one run
//! - `ZenforgeConfigBuilder` - fluent builder with `~` expansion

mod types;

pub use types::{ZenforgeConfig, ZenforgeConfigBuilder};

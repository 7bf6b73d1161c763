//! Strata core library: layout/slot domain types, configuration, errors.
//!
//! Public API surface:
//! - [`types`]: [`LayoutName`], [`SlotName`], [`SlotMap`]
//! - [`config`]: [`ComposeConfig`] and its YAML loader
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::ComposeConfig;
pub use error::ConfigError;
pub use types::{LayoutName, SlotMap, SlotName};

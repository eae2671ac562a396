//! Runner-facing provider module.
//!
//! This module provides the main entry point for driving grid browsers.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Provider`] | Runner-facing browser lifecycle adapter |
//! | [`ProviderBuilder`] | Fluent configuration builder |
//!
//! # Example
//!
//! ```no_run
//! use grid_provider::{Provider, Result};
//! # use grid_provider::provider::builder::ProviderBuilder;
//! # async fn example(builder: ProviderBuilder) -> Result<()> {
//! let provider = builder.build()?;
//! provider.init().await?;
//!
//! provider.open_browser("b1", "https://example.com", "chrome").await?;
//! provider.take_screenshot("b1", "shots/example.png").await?;
//! provider.close_browser("b1").await;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for provider configuration.
pub mod builder;

/// Core provider implementation.
pub mod core;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ProviderBuilder;
pub use core::{DEFAULT_DASHBOARD_URL, DEFAULT_HUB_URL, Provider};

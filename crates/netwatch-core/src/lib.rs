//! # netwatch-core - Core Domain Types
//!
//! Foundation crate for netwatch. Provides the interface connection state,
//! the renderable output value, error handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, serde_json, thiserror, tracing, tracing-subscriber,
//! tracing-appender, dirs).
//!
//! ## Public API
//!
//! ### Domain Types
//! - [`State`] - Ordered connection state (`Unknown < Disconnected < Waiting < Connected`)
//! - [`Output`] - Rendered text handed to a display sink
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Infrastructure error enum (configuration, logging, signals, `nmcli`)
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use netwatch_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod output;
pub mod prelude;
pub mod state;

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result};
pub use output::Output;
pub use state::State;

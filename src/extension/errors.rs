//! Field-extension error types.
//!
//! - [`ExtensionError::Host`]: the CMS host refused or failed an operation
//! - [`ExtensionError::Config`]: the plugin parameters are unusable
//! - [`ExtensionError::Client`]: the catalog client could not be created
//! - [`ExtensionError::InvalidFieldValue`]: the stored field value is not JSON
//!
//! # Example
//!
//! ```rust
//! use shopify_product::extension::ExtensionError;
//!
//! let error = ExtensionError::host("modal was closed by the host");
//! assert_eq!(error.to_string(), "Host operation failed: modal was closed by the host");
//! ```

use thiserror::Error;

use crate::catalog::ApiError;
use crate::error::ConfigError;

/// Error type for field-extension operations.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// A host capability (field write, modal) failed.
    #[error("Host operation failed: {reason}")]
    Host {
        /// Description reported by the host.
        reason: String,
    },

    /// The plugin parameters could not be turned into a configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The catalog client could not be created.
    #[error(transparent)]
    Client(#[from] ApiError),

    /// The field holds a string that is not valid JSON.
    #[error("Field '{path}' does not hold a valid JSON value: {source}")]
    InvalidFieldValue {
        /// Field path the value was read from.
        path: String,
        /// The parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl ExtensionError {
    /// Builds a [`ExtensionError::Host`] error.
    pub fn host(reason: impl Into<String>) -> Self {
        Self::Host {
            reason: reason.into(),
        }
    }
}

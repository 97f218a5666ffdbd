//! Error types for the bridge swap scanner.
//!
//! This module provides a unified error type [`ScannerError`] that covers
//! configuration loading, chain RPC access, decoding, persistence and the
//! range bookkeeping of the scanning engine.
//!
//! # Design
//!
//! The error hierarchy is organized by layer:
//! - [`ScannerError::ConfigError`]: Configuration file and validation issues
//! - [`ScannerError::RpcError`]: RPC provider and network errors
//! - [`ScannerError::DecodingError`]: Chain data and ABI decoding errors
//! - [`ScannerError::DatabaseError`]: Persistence errors
//! - [`ScannerError::InvalidRange`] / [`ScannerError::InvalidJobCount`]: fatal backfill setup errors
//! - [`ScannerError::RetryExhausted`]: a bounded RPC retry gave up
//!
//! Classification mismatches are *not* errors of this type. They are
//! reported through [`VerifyError`](crate::swap::VerifyError) and never
//! escalate past the classifier.
//!
//! # Example
//!
//! ```
//! use bridge_swap_scanner::error::{ScannerError, ScannerResult};
//!
//! fn validate_jobs(jobs: u64) -> ScannerResult<()> {
//!     if jobs == 0 {
//!         return Err(ScannerError::InvalidJobCount);
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

/// Result type alias using [`ScannerError`].
pub type ScannerResult<T> = Result<T, ScannerError>;

type BoxedSource = Option<Box<dyn std::error::Error + Send + Sync>>;

/// Unified error type for the swap scanner.
#[derive(Debug)]
pub enum ScannerError {
    /// Configuration file or validation errors.
    ///
    /// Variants include:
    /// - Missing or unreadable config file
    /// - Duplicate pair IDs
    /// - Malformed addresses
    /// - Missing required fields
    ConfigError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: BoxedSource,
    },

    /// RPC provider or network errors.
    RpcError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: BoxedSource,
    },

    /// Chain data or ABI decoding errors.
    DecodingError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: BoxedSource,
    },

    /// Database operation errors.
    ///
    /// Variants include:
    /// - Connection failures
    /// - Query execution errors
    /// - Migration failures
    DatabaseError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: BoxedSource,
    },

    /// A scan range was empty or reversed.
    InvalidRange {
        /// Range start (inclusive)
        start: u64,
        /// Range end (exclusive)
        end: u64,
    },

    /// A backfill was requested with zero workers.
    InvalidJobCount,

    /// A bounded retry policy ran out of attempts.
    RetryExhausted {
        /// The RPC operation that was retried
        operation: String,
        /// Number of attempts made
        attempts: u32,
        /// Last error encountered
        last_error: String,
    },
}

impl ScannerError {
    /// Create a new configuration error.
    ///
    /// # Example
    ///
    /// ```
    /// use bridge_swap_scanner::error::ScannerError;
    ///
    /// let err = ScannerError::config("empty 'pair_id'", None);
    /// assert!(matches!(err, ScannerError::ConfigError { .. }));
    /// ```
    #[must_use]
    pub fn config(message: impl Into<String>, source: BoxedSource) -> Self {
        Self::ConfigError {
            message: message.into(),
            source,
        }
    }

    /// Create a new RPC error.
    #[must_use]
    pub fn rpc(message: impl Into<String>, source: BoxedSource) -> Self {
        Self::RpcError {
            message: message.into(),
            source,
        }
    }

    /// Create a new decoding error.
    #[must_use]
    pub fn decoding(message: impl Into<String>, source: BoxedSource) -> Self {
        Self::DecodingError {
            message: message.into(),
            source,
        }
    }

    /// Create a new database error.
    ///
    /// # Example
    ///
    /// ```
    /// use bridge_swap_scanner::error::ScannerError;
    ///
    /// let err = ScannerError::database("Connection failed", None);
    /// assert!(matches!(err, ScannerError::DatabaseError { .. }));
    /// ```
    #[must_use]
    pub fn database(message: impl Into<String>, source: BoxedSource) -> Self {
        Self::DatabaseError {
            message: message.into(),
            source,
        }
    }

    /// Create a retry exhaustion error.
    #[must_use]
    pub fn retry_exhausted(
        operation: impl Into<String>,
        attempts: u32,
        last_error: impl Into<String>,
    ) -> Self {
        Self::RetryExhausted {
            operation: operation.into(),
            attempts,
            last_error: last_error.into(),
        }
    }
}

impl fmt::Display for ScannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError { message, .. } => write!(f, "Configuration error: {message}"),
            Self::RpcError { message, .. } => write!(f, "RPC error: {message}"),
            Self::DecodingError { message, .. } => write!(f, "Decoding error: {message}"),
            Self::DatabaseError { message, .. } => write!(f, "Database error: {message}"),
            Self::InvalidRange { start, end } => {
                write!(f, "Invalid scan range [{start}, {end})")
            }
            Self::InvalidJobCount => write!(f, "Job count must be at least 1"),
            Self::RetryExhausted {
                operation,
                attempts,
                last_error,
            } => write!(
                f,
                "{operation} failed after {attempts} attempts. Last error: {last_error}"
            ),
        }
    }
}

impl std::error::Error for ScannerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigError { source, .. }
            | Self::RpcError { source, .. }
            | Self::DecodingError { source, .. }
            | Self::DatabaseError { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &dyn std::error::Error),
            Self::InvalidRange { .. } | Self::InvalidJobCount | Self::RetryExhausted { .. } => None,
        }
    }
}

//! Buffer pool configuration
//!
//! Pools can be tuned from code or from a TOML document:
//!
//! ```toml
//! max_buffer_len = 1048576
//! max_buffers_per_bucket = 32
//! ```

use crate::error::{GridError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest buffer (in elements) kept for reuse by default
pub const DEFAULT_MAX_BUFFER_LEN: usize = 1 << 20;

/// Buffers kept per size bucket by default
pub const DEFAULT_MAX_BUFFERS_PER_BUCKET: usize = 32;

/// Tuning knobs for a [`BufferPool`](crate::BufferPool)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Buffers larger than this (in elements) are allocated exactly and never pooled
    pub max_buffer_len: usize,

    /// Maximum number of idle buffers retained per size bucket
    pub max_buffers_per_bucket: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            max_buffer_len: DEFAULT_MAX_BUFFER_LEN,
            max_buffers_per_bucket: DEFAULT_MAX_BUFFERS_PER_BUCKET,
        }
    }
}

impl PoolConfig {
    /// Parse a configuration from TOML; missing keys take their defaults
    ///
    /// # Examples
    ///
    /// ```
    /// use coordmap::PoolConfig;
    ///
    /// let config = PoolConfig::from_toml_str("max_buffers_per_bucket = 4").unwrap();
    /// assert_eq!(config.max_buffers_per_bucket, 4);
    /// assert_eq!(config.max_buffer_len, coordmap::DEFAULT_MAX_BUFFER_LEN);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: PoolConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns `Config` if `max_buffer_len` is zero or not a power of two.
    pub fn validate(&self) -> Result<()> {
        if !self.max_buffer_len.is_power_of_two() {
            return Err(GridError::Config(format!(
                "max_buffer_len must be a power of two, got {}",
                self.max_buffer_len
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PoolConfig::default();
        assert_eq!(config.max_buffer_len, DEFAULT_MAX_BUFFER_LEN);
        assert_eq!(config.max_buffers_per_bucket, DEFAULT_MAX_BUFFERS_PER_BUCKET);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_document() {
        let config = PoolConfig::from_toml_str(
            "max_buffer_len = 4096\nmax_buffers_per_bucket = 2\n",
        )
        .unwrap();
        assert_eq!(
            config,
            PoolConfig {
                max_buffer_len: 4096,
                max_buffers_per_bucket: 2,
            }
        );
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(PoolConfig::from_toml_str("").unwrap(), PoolConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            PoolConfig::from_toml_str("max_buffer_len = 1000"),
            Err(GridError::Config(_))
        ));
        assert!(matches!(
            PoolConfig::from_toml_str("max_buffer_len = 0"),
            Err(GridError::Config(_))
        ));
        assert!(matches!(
            PoolConfig::from_toml_str("max_buffer_len = \"big\""),
            Err(GridError::ConfigParse(_))
        ));
    }
}

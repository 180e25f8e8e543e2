//! Paginator configuration
//!
//! Deployment-level defaults for a paginator, loadable from YAML or JSON:
//!
//! ```yaml
//! default_limit: 20
//! max_limit: 200
//! primary_order_by:
//!   - field: ID
//!     direction: ASC
//! cursor:
//!   type: aes_gcm
//!   key: "base64-encoded 32-byte key"
//! ```

use crate::cursor::{base64_envelope, AesGcmCipher, CursorEnvelope};
use crate::error::{Error, Result};
use crate::hooks::{ensure_limits, ensure_primary_order_by, CursorHook, PaginatorHook};
use crate::types::{find_duplicate_field, Order};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Paginator Config
// ============================================================================

/// Paginator defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaginatorConfig {
    /// Page size when neither `first` nor `last` is given
    #[serde(default = "default_limit")]
    pub default_limit: i64,

    /// Upper bound for `first`/`last`
    #[serde(default = "default_max_limit")]
    pub max_limit: i64,

    /// Unique ordering appended to every request as a tie-breaker
    #[serde(default)]
    pub primary_order_by: Vec<Order>,

    /// How cursors are protected in transit
    #[serde(default)]
    pub cursor: CursorSecurity,
}

fn default_limit() -> i64 {
    10
}

fn default_max_limit() -> i64 {
    100
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            primary_order_by: Vec::new(),
            cursor: CursorSecurity::default(),
        }
    }
}

/// Cursor envelope selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CursorSecurity {
    /// Plain JSON cursors
    #[default]
    None,
    /// URL-safe Base64 obfuscation
    Base64,
    /// AES-256-GCM authenticated encryption
    AesGcm {
        /// Base64-encoded 32-byte key
        key: String,
    },
}

impl PaginatorConfig {
    /// Parse and validate a YAML config
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; `.json` files are parsed as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read paginator config '{}': {}",
                path.display(),
                e
            ))
        })?;

        debug!(path = %path.display(), "Loading paginator config");

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Check the config for values the hooks would reject
    pub fn validate(&self) -> Result<()> {
        if self.default_limit < 0 {
            return Err(Error::config(format!(
                "default_limit must be non-negative, got {}",
                self.default_limit
            )));
        }
        if self.max_limit < self.default_limit {
            return Err(Error::config(format!(
                "max_limit ({}) must not be less than default_limit ({})",
                self.max_limit, self.default_limit
            )));
        }
        if let Some(field) = find_duplicate_field(&self.primary_order_by) {
            return Err(Error::config(format!(
                "primary_order_by contains duplicate field '{field}'"
            )));
        }
        if let CursorSecurity::AesGcm { key } = &self.cursor {
            AesGcmCipher::from_base64_key(key)?;
        }
        Ok(())
    }

    /// Paginator hooks for this config, outermost first
    pub fn hooks<T>(&self) -> Result<Vec<PaginatorHook<T>>>
    where
        T: Clone + Send + 'static,
    {
        self.validate()?;

        let mut hooks = vec![ensure_limits(self.default_limit, self.max_limit)];
        if !self.primary_order_by.is_empty() {
            hooks.push(ensure_primary_order_by(self.primary_order_by.clone()));
        }
        Ok(hooks)
    }

    /// Cursor envelope to prepend to request contexts, if any
    pub fn cursor_hook(&self) -> Result<Option<Arc<dyn CursorHook>>> {
        Ok(match &self.cursor {
            CursorSecurity::None => None,
            CursorSecurity::Base64 => Some(base64_envelope()),
            CursorSecurity::AesGcm { key } => Some(Arc::new(CursorEnvelope::new(
                AesGcmCipher::from_base64_key(key)?,
            ))),
        })
    }
}

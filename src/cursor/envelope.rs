//! Cursor envelopes
//!
//! An envelope wraps the whole fetch strategy: inbound `after`/`before`
//! cursors are opened before the inner strategy sees them, and every lazy
//! cursor the strategy returns is sealed on its way out.

use crate::context::Context;
use crate::error::{Error, Result};
use crate::hooks::CursorHook;
use crate::pagination::{cursor_fn, strategy_fn, CursorFn, ErasedStrategy, StrategyRequest};
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::sync::Arc;
use tracing::debug;

/// AES-GCM nonce size in bytes
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag size in bytes
const TAG_LEN: usize = 16;

/// Reversible transformation of cursor strings
pub trait CursorCipher: Send + Sync + 'static {
    /// Transform an outbound cursor
    fn seal(&self, cursor: &str) -> Result<String>;

    /// Reverse [`seal`](Self::seal) for an inbound cursor
    fn open(&self, sealed: &str) -> Result<String>;
}

// ============================================================================
// Base64 Obfuscation
// ============================================================================

/// URL-safe Base64 obfuscation; no integrity guarantee
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Cipher;

impl CursorCipher for Base64Cipher {
    fn seal(&self, cursor: &str) -> Result<String> {
        Ok(URL_SAFE_NO_PAD.encode(cursor))
    }

    fn open(&self, sealed: &str) -> Result<String> {
        let bytes = URL_SAFE_NO_PAD
            .decode(sealed)
            .map_err(|e| Error::invalid_cursor(format!("invalid base64: {e}")))?;
        String::from_utf8(bytes).map_err(|e| Error::invalid_cursor(format!("invalid utf-8: {e}")))
    }
}

// ============================================================================
// AES-256-GCM Authenticated Encryption
// ============================================================================

/// AES-256-GCM with a random nonce per cursor
///
/// Wire form: URL-safe Base64 of `nonce || ciphertext`.
#[derive(Clone)]
pub struct AesGcmCipher {
    cipher: Aes256Gcm,
}

impl AesGcmCipher {
    /// Create a cipher from a 32-byte key
    pub fn new(key: &[u8]) -> Result<Self> {
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| {
            Error::config(format!(
                "AES-GCM cursor key must be 32 bytes, got {}",
                key.len()
            ))
        })?;
        Ok(Self { cipher })
    }

    /// Create a cipher from a base64 (standard or URL-safe) encoded key
    pub fn from_base64_key(key: &str) -> Result<Self> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(key)
            .or_else(|_| URL_SAFE_NO_PAD.decode(key))
            .map_err(|e| Error::config(format!("Invalid base64 cursor key: {e}")))?;
        Self::new(&bytes)
    }
}

impl std::fmt::Debug for AesGcmCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmCipher").finish_non_exhaustive()
    }
}

impl CursorCipher for AesGcmCipher {
    fn seal(&self, cursor: &str) -> Result<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, cursor.as_bytes())
            .map_err(|_| Error::Other("failed to encrypt cursor".to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(sealed))
    }

    fn open(&self, sealed: &str) -> Result<String> {
        let bytes = URL_SAFE_NO_PAD
            .decode(sealed)
            .map_err(|e| Error::invalid_cursor(format!("invalid base64: {e}")))?;
        if bytes.len() < NONCE_LEN + TAG_LEN {
            return Err(Error::invalid_cursor("encrypted cursor is too short"));
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| {
                debug!("Rejected cursor that failed authentication");
                Error::CursorTampered
            })?;
        String::from_utf8(plaintext).map_err(|e| Error::invalid_cursor(format!("invalid utf-8: {e}")))
    }
}

// ============================================================================
// Envelope Hook
// ============================================================================

/// Cursor hook applying a [`CursorCipher`] in both directions
#[derive(Debug)]
pub struct CursorEnvelope<C> {
    cipher: Arc<C>,
}

impl<C: CursorCipher> CursorEnvelope<C> {
    /// Create an envelope around a cipher
    pub fn new(cipher: C) -> Self {
        Self {
            cipher: Arc::new(cipher),
        }
    }

    fn open_request(&self, mut request: StrategyRequest) -> Result<StrategyRequest> {
        request.after = request
            .after
            .map(|cursor| self.cipher.open(&cursor))
            .transpose()?;
        request.before = request
            .before
            .map(|cursor| self.cipher.open(&cursor))
            .transpose()?;
        Ok(request)
    }
}

impl<C> Clone for CursorEnvelope<C> {
    fn clone(&self) -> Self {
        Self {
            cipher: self.cipher.clone(),
        }
    }
}

impl<C: CursorCipher> CursorHook for CursorEnvelope<C> {
    fn wrap(&self, next: ErasedStrategy) -> ErasedStrategy {
        let envelope = self.clone();
        strategy_fn(move |ctx: Context, request: StrategyRequest| {
            let next = next.clone();
            let envelope = envelope.clone();
            async move {
                let request = envelope.open_request(request)?;
                let mut response = next(ctx, request).await?;
                for edge in &mut response.lazy_edges {
                    edge.cursor = seal_cursor(envelope.cipher.clone(), edge.cursor.clone());
                }
                Ok(response)
            }
        })
    }
}

fn seal_cursor<C: CursorCipher>(cipher: Arc<C>, inner: CursorFn) -> CursorFn {
    cursor_fn(move |ctx| {
        let cipher = cipher.clone();
        let inner = inner.clone();
        async move {
            let cursor = inner(ctx).await?;
            cipher.seal(&cursor)
        }
    })
}

/// Envelope hook with Base64 obfuscation
pub fn base64_envelope() -> Arc<dyn CursorHook> {
    Arc::new(CursorEnvelope::new(Base64Cipher))
}

/// Envelope hook with AES-256-GCM encryption
pub fn aes_gcm_envelope(key: &[u8]) -> Result<Arc<dyn CursorHook>> {
    Ok(Arc::new(CursorEnvelope::new(AesGcmCipher::new(key)?)))
}

//! Cursor module
//!
//! Encodes sort-key values into opaque cursor strings and protects them in
//! transit.
//!
//! # Overview
//!
//! - [`encode_cursor`] / [`decode_cursor`]: deterministic JSON codec whose
//!   decode insists on the exact active key set
//! - [`CursorEnvelope`]: a cursor hook that opens inbound and seals outbound
//!   cursors with a [`CursorCipher`] ([`Base64Cipher`] obfuscation or
//!   [`AesGcmCipher`] authenticated encryption)

mod codec;
mod envelope;

pub use codec::{decode_cursor, encode_cursor, lazy_edge, CursorValues};
pub use envelope::{
    aes_gcm_envelope, base64_envelope, AesGcmCipher, Base64Cipher, CursorCipher, CursorEnvelope,
    NONCE_LEN,
};

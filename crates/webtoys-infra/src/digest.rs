//! Token digests for identity mapping.
//!
//! Implements the `TokenDigest` trait from `webtoys-core` using the RustCrypto
//! `md-5` and `sha2` crates. MD5 is the default: identifiers already issued
//! downstream were derived from it, so switching changes every caller's
//! synthetic number.

use md5::Md5;
use sha2::{Digest, Sha256};

use webtoys_core::identity::TokenDigest;
use webtoys_types::config::DigestKind;

/// MD5 implementation of `TokenDigest`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Md5TokenDigest;

impl TokenDigest for Md5TokenDigest {
    fn hex_digest(&self, token: &str) -> String {
        format!("{:x}", Md5::digest(token.as_bytes()))
    }
}

/// SHA-256 implementation of `TokenDigest`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256TokenDigest;

impl TokenDigest for Sha256TokenDigest {
    fn hex_digest(&self, token: &str) -> String {
        format!("{:x}", Sha256::digest(token.as_bytes()))
    }
}

/// Digest selected by `identity.digest` at startup.
#[derive(Debug, Clone, Copy)]
pub enum ConfiguredDigest {
    Md5(Md5TokenDigest),
    Sha256(Sha256TokenDigest),
}

impl From<DigestKind> for ConfiguredDigest {
    fn from(kind: DigestKind) -> Self {
        match kind {
            DigestKind::Md5 => ConfiguredDigest::Md5(Md5TokenDigest),
            DigestKind::Sha256 => ConfiguredDigest::Sha256(Sha256TokenDigest),
        }
    }
}

impl TokenDigest for ConfiguredDigest {
    fn hex_digest(&self, token: &str) -> String {
        match self {
            ConfiguredDigest::Md5(d) => d.hex_digest(token),
            ConfiguredDigest::Sha256(d) => d.hex_digest(token),
        }
    }
}

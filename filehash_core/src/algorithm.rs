//! Hash algorithm catalog for the File Hash core library
//!
//! The set of supported algorithms is closed and known at build time, so it
//! is modeled as a plain enum with a fixed metadata table rather than a
//! runtime plugin registry.

use crate::{Error, Result, error::ValidationError};
use digest::DynDigest;
use serde::{Deserialize, Serialize};

/// Computation back-end family an algorithm belongs to.
///
/// `Checksum` algorithms run on fixed-output incremental digests;
/// `KeyedHash` algorithms run on the variable-output BLAKE2b primitive,
/// which is an optional build component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mechanism {
    Checksum,
    KeyedHash,
}

/// Hash algorithms supported as digest columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "blake2b_128")]
    Blake2b128,
    #[serde(rename = "blake2b_160")]
    Blake2b160,
    #[serde(rename = "blake2b_224")]
    Blake2b224,
    #[serde(rename = "blake2b_256")]
    Blake2b256,
    #[serde(rename = "blake2b_384")]
    Blake2b384,
    #[serde(rename = "blake2b_512")]
    Blake2b512,
    #[serde(rename = "md5")]
    Md5,
    #[serde(rename = "sha1")]
    Sha1,
    #[serde(rename = "sha224")]
    Sha224,
    #[serde(rename = "sha256")]
    Sha256,
    #[serde(rename = "sha384")]
    Sha384,
    #[serde(rename = "sha512_224")]
    Sha512224,
    #[serde(rename = "sha512_256")]
    Sha512256,
    #[serde(rename = "sha512")]
    Sha512,
    #[serde(rename = "sha3_224")]
    Sha3224,
    #[serde(rename = "sha3_256")]
    Sha3256,
    #[serde(rename = "sha3_384")]
    Sha3384,
    #[serde(rename = "sha3_512")]
    Sha3512,
}

impl Algorithm {
    /// All supported algorithms, in catalog order.
    ///
    /// This order is stable across releases; storage column layouts and
    /// user-facing listings both follow it.
    pub const ALL: [Algorithm; 18] = [
        Algorithm::Blake2b128,
        Algorithm::Blake2b160,
        Algorithm::Blake2b224,
        Algorithm::Blake2b256,
        Algorithm::Blake2b384,
        Algorithm::Blake2b512,
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha224,
        Algorithm::Sha256,
        Algorithm::Sha384,
        Algorithm::Sha512224,
        Algorithm::Sha512256,
        Algorithm::Sha512,
        Algorithm::Sha3224,
        Algorithm::Sha3256,
        Algorithm::Sha3384,
        Algorithm::Sha3512,
    ];

    /// Stable identifier, also used as the storage column name.
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Blake2b128 => "blake2b_128",
            Algorithm::Blake2b160 => "blake2b_160",
            Algorithm::Blake2b224 => "blake2b_224",
            Algorithm::Blake2b256 => "blake2b_256",
            Algorithm::Blake2b384 => "blake2b_384",
            Algorithm::Blake2b512 => "blake2b_512",
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha224 => "sha224",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha384 => "sha384",
            Algorithm::Sha512224 => "sha512_224",
            Algorithm::Sha512256 => "sha512_256",
            Algorithm::Sha512 => "sha512",
            Algorithm::Sha3224 => "sha3_224",
            Algorithm::Sha3256 => "sha3_256",
            Algorithm::Sha3384 => "sha3_384",
            Algorithm::Sha3512 => "sha3_512",
        }
    }

    /// Look up an algorithm by its stable identifier.
    pub fn from_id(id: &str) -> Option<Algorithm> {
        Algorithm::ALL.into_iter().find(|algo| algo.id() == id)
    }

    /// Human-readable name for user interfaces.
    pub fn display_name(self) -> &'static str {
        match self {
            Algorithm::Blake2b128 => "BLAKE2b-128",
            Algorithm::Blake2b160 => "BLAKE2b-160",
            Algorithm::Blake2b224 => "BLAKE2b-224",
            Algorithm::Blake2b256 => "BLAKE2b-256",
            Algorithm::Blake2b384 => "BLAKE2b-384",
            Algorithm::Blake2b512 => "BLAKE2b-512",
            Algorithm::Md5 => "MD5",
            Algorithm::Sha1 => "SHA-1",
            Algorithm::Sha224 => "SHA-224",
            Algorithm::Sha256 => "SHA-256",
            Algorithm::Sha384 => "SHA-384",
            Algorithm::Sha512224 => "SHA-512/224",
            Algorithm::Sha512256 => "SHA-512/256",
            Algorithm::Sha512 => "SHA-512",
            Algorithm::Sha3224 => "SHA3-224",
            Algorithm::Sha3256 => "SHA3-256",
            Algorithm::Sha3384 => "SHA3-384",
            Algorithm::Sha3512 => "SHA3-512",
        }
    }

    /// Back-end mechanism that computes this algorithm.
    pub fn mechanism(self) -> Mechanism {
        match self {
            Algorithm::Blake2b128
            | Algorithm::Blake2b160
            | Algorithm::Blake2b224
            | Algorithm::Blake2b256
            | Algorithm::Blake2b384
            | Algorithm::Blake2b512 => Mechanism::KeyedHash,
            _ => Mechanism::Checksum,
        }
    }

    /// Hexadecimal digest length.
    pub fn hex_len(self) -> usize {
        match self {
            Algorithm::Blake2b128 | Algorithm::Md5 => 32,
            Algorithm::Blake2b160 | Algorithm::Sha1 => 40,
            Algorithm::Blake2b224
            | Algorithm::Sha224
            | Algorithm::Sha512224
            | Algorithm::Sha3224 => 56,
            Algorithm::Blake2b256
            | Algorithm::Sha256
            | Algorithm::Sha512256
            | Algorithm::Sha3256 => 64,
            Algorithm::Blake2b384 | Algorithm::Sha384 | Algorithm::Sha3384 => 96,
            Algorithm::Blake2b512 | Algorithm::Sha512 | Algorithm::Sha3512 => 128,
        }
    }

    /// Binary digest length.
    pub fn byte_len(self) -> usize {
        self.hex_len() / 2
    }

    /// Start an incremental digest computation.
    ///
    /// Returns `None` when the back-end is unavailable (the `blake2` cargo
    /// feature is disabled), which callers must surface as a missing digest
    /// rather than an error.
    pub fn init(self) -> Option<DigestState> {
        let state = match self {
            Algorithm::Blake2b128
            | Algorithm::Blake2b160
            | Algorithm::Blake2b224
            | Algorithm::Blake2b256
            | Algorithm::Blake2b384
            | Algorithm::Blake2b512 => return keyed_state(self.byte_len()),
            Algorithm::Md5 => DigestState::checksum(md5::Md5::default()),
            Algorithm::Sha1 => DigestState::checksum(sha1::Sha1::default()),
            Algorithm::Sha224 => DigestState::checksum(sha2::Sha224::default()),
            Algorithm::Sha256 => DigestState::checksum(sha2::Sha256::default()),
            Algorithm::Sha384 => DigestState::checksum(sha2::Sha384::default()),
            Algorithm::Sha512224 => DigestState::checksum(sha2::Sha512_224::default()),
            Algorithm::Sha512256 => DigestState::checksum(sha2::Sha512_256::default()),
            Algorithm::Sha512 => DigestState::checksum(sha2::Sha512::default()),
            Algorithm::Sha3224 => DigestState::checksum(sha3::Sha3_224::default()),
            Algorithm::Sha3256 => DigestState::checksum(sha3::Sha3_256::default()),
            Algorithm::Sha3384 => DigestState::checksum(sha3::Sha3_384::default()),
            Algorithm::Sha3512 => DigestState::checksum(sha3::Sha3_512::default()),
        };
        Some(state)
    }

    /// Digest an in-memory buffer in one shot.
    pub fn digest_bytes(self, data: &[u8]) -> Option<String> {
        let mut state = self.init()?;
        state.update(data);
        state.finalize()
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Algorithm::from_id(s)
            .ok_or_else(|| Error::Validation(ValidationError::unknown_algorithm(s)))
    }
}

/// In-progress digest computation for a single algorithm.
///
/// Wraps whichever back-end primitive the algorithm runs on. `finalize`
/// always yields lowercase hex of the algorithm's declared length.
pub enum DigestState {
    Checksum(Box<dyn DynDigest + Send>),
    #[cfg(feature = "blake2")]
    Keyed {
        state: blake2::Blake2bVar,
        len: usize,
    },
}

impl DigestState {
    fn checksum<D: DynDigest + Send + 'static>(digest: D) -> Self {
        DigestState::Checksum(Box::new(digest))
    }

    /// Feed more input bytes into the digest.
    pub fn update(&mut self, data: &[u8]) {
        match self {
            DigestState::Checksum(state) => state.update(data),
            #[cfg(feature = "blake2")]
            DigestState::Keyed { state, .. } => blake2::digest::Update::update(state, data),
        }
    }

    /// Finish the computation and return the lowercase hex digest.
    pub fn finalize(self) -> Option<String> {
        match self {
            DigestState::Checksum(state) => Some(hex::encode(state.finalize())),
            #[cfg(feature = "blake2")]
            DigestState::Keyed { state, len } => {
                use blake2::digest::VariableOutput;
                let mut digest = vec![0u8; len];
                state.finalize_variable(&mut digest).ok()?;
                Some(hex::encode(digest))
            }
        }
    }
}

#[cfg(feature = "blake2")]
fn keyed_state(len: usize) -> Option<DigestState> {
    use blake2::digest::VariableOutput;
    blake2::Blake2bVar::new(len)
        .ok()
        .map(|state| DigestState::Keyed { state, len })
}

#[cfg(not(feature = "blake2"))]
fn keyed_state(_len: usize) -> Option<DigestState> {
    None
}

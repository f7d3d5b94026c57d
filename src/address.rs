//! Cache addressing and XTEA key material.

use crate::error::CacheError;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Three-level identifier of one logical file inside a cache store.
///
/// Archive, group and file are opaque identifiers assigned by the cache's
/// contents; they are not sequential indices and callers must not assume
/// they are contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheAddress {
    pub archive: u16,
    pub group: u16,
    pub file: u16,
}

impl CacheAddress {
    pub const fn new(archive: u16, group: u16, file: u16) -> Self {
        CacheAddress {
            archive,
            group,
            file,
        }
    }
}

impl From<(u16, u16, u16)> for CacheAddress {
    fn from((archive, group, file): (u16, u16, u16)) -> Self {
        CacheAddress::new(archive, group, file)
    }
}

impl fmt::Display for CacheAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "archive {} group {} file {}",
            self.archive, self.group, self.file
        )
    }
}

/// A four-word (128-bit) XTEA key used by the engine to decrypt a file on
/// read.
///
/// The only validated property is arity: exactly four 32-bit words. Key
/// words are marshalled to a stable pointer for the duration of a single
/// engine call and the backing memory is zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct XteaKey([u32; 4]);

impl XteaKey {
    /// Number of 32-bit words in an XTEA key
    pub const WORDS: usize = 4;

    pub const fn new(words: [u32; 4]) -> Self {
        XteaKey(words)
    }

    /// Validate arbitrary-length key material into a key.
    ///
    /// Returns `CacheError::InvalidKey` for any length other than four;
    /// this is a caller error and is rejected before the engine is invoked.
    pub fn from_words(words: &[u32]) -> Result<Self, CacheError> {
        <[u32; 4]>::try_from(words)
            .map(XteaKey)
            .map_err(|_| CacheError::InvalidKey { len: words.len() })
    }

    /// Stable pointer to the packed key words, for one engine call only.
    /// The key value must outlive the call; the engine does not retain it.
    pub(crate) fn as_raw(&self) -> *const [u32; 4] {
        &self.0
    }
}

impl From<[u32; 4]> for XteaKey {
    fn from(words: [u32; 4]) -> Self {
        XteaKey::new(words)
    }
}

// Manual Debug so key material never lands in logs
impl fmt::Debug for XteaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("XteaKey([redacted; 4])")
    }
}

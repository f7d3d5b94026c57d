//! Foreign buffer handling: bounded views, materialization, and streaming.
//!
//! A buffer returned by the engine is foreign-owned memory with an
//! unspecified lifetime. It is represented here as [`RawBuffer`], a bounded
//! borrowed view that can only leave this module as an owned copy. The
//! streaming surface ([`CacheStream`]) deliberately streams from that copy
//! rather than from the foreign pointer: one extra copy buys end-of-data
//! semantics on over-read and removes any window in which the engine could
//! reclaim memory a caller is still consuming.

use crate::error::CacheError;
use std::io::{self, Cursor, Read};
use std::slice;

/// Bounded view over one foreign-owned buffer.
///
/// Holds no ownership: the engine's allocator owns the bytes, and the view
/// is only valid in the window between the engine call returning and the
/// next operation on the same handle. Consumable solely via
/// [`RawBuffer::materialize`].
pub(crate) struct RawBuffer {
    ptr: *const u8,
    len: usize,
}

impl RawBuffer {
    /// Wrap a pointer/length pair reported by the engine.
    ///
    /// # Safety
    ///
    /// Caller must ensure `ptr` is non-null and valid for reads of `len`
    /// bytes for the lifetime of this value. Sentinel pointers and negative
    /// reported lengths must be rejected before construction.
    pub(crate) unsafe fn new(ptr: *const u8, len: usize) -> Self {
        debug_assert!(!ptr.is_null());
        RawBuffer { ptr, len }
    }

    /// Copy the foreign bytes into freshly allocated, locally owned memory.
    ///
    /// After this returns, the bytes stay valid no matter what the engine
    /// does with its own buffer. Allocation is fallible so that an
    /// out-of-memory copy surfaces as `AllocationFailed` rather than an
    /// abort, and stays distinguishable from an engine-side `ReadFailed`.
    /// A zero-length buffer materializes to an empty vec without touching
    /// the pointer.
    pub(crate) fn materialize(&self) -> Result<Vec<u8>, CacheError> {
        if self.len == 0 {
            return Ok(Vec::new());
        }

        let mut owned = Vec::new();
        owned
            .try_reserve_exact(self.len)
            .map_err(|_| CacheError::AllocationFailed { len: self.len })?;

        // SAFETY: ptr is non-null and valid for len bytes per the
        // construction contract of RawBuffer::new
        let foreign = unsafe { slice::from_raw_parts(self.ptr, self.len) };
        owned.extend_from_slice(foreign);

        Ok(owned)
    }
}

/// Sequential, forward-only reader over cache content.
///
/// Always backed by an owned copy of the engine's buffer, so the stream
/// stays valid for as long as the caller keeps it, independent of the
/// handle it was read from. Reading past the end yields end-of-data, never
/// a memory fault.
#[derive(Debug)]
pub struct CacheStream {
    inner: Cursor<Vec<u8>>,
}

impl CacheStream {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        CacheStream {
            inner: Cursor::new(bytes),
        }
    }

    /// Total number of bytes in the stream
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.get_ref().is_empty()
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        let consumed = self.inner.position().min(self.len() as u64) as usize;
        self.len() - consumed
    }

    /// Consume the stream, returning the unread remainder as owned bytes
    pub fn into_bytes(self) -> Vec<u8> {
        let consumed = self.inner.position().min(self.inner.get_ref().len() as u64) as usize;
        let mut bytes = self.inner.into_inner();
        bytes.drain(..consumed);
        bytes
    }
}

impl Read for CacheStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

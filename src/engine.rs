//! The native engine boundary.
//!
//! `CacheEngine` mirrors the raw C ABI of the cache engine: opaque handles,
//! null-pointer sentinels for failure, and an out-parameter for the byte
//! count of a returned buffer. Keeping the seam at this level means the
//! access layer owns every conversion and validation step, and a test
//! double can script sentinel behavior exactly as the real engine would
//! produce it.
//!
//! # Length width
//!
//! Observed engine variants disagree on the out-length width (signed vs
//! unsigned 32-bit). This crate standardizes on `i32` and the access layer
//! rejects negative values before they can be used as a buffer length.
//!
//! # Buffer and handle lifetime
//!
//! A buffer returned by [`CacheEngine::read`] is owned by the engine's
//! allocator and is only assumed valid until the next operation on the same
//! handle. Engines that document a free primitive for returned buffers
//! implement [`CacheEngine::release`]; the default is a no-op because the
//! boundary does not guarantee one exists, and this layer must never free
//! memory it did not allocate. The same applies to [`CacheEngine::close`].

use std::ffi::{CStr, c_void};

/// Raw boundary contract with the native cache engine.
///
/// Implementations must be callable from any thread; the access layer
/// serializes calls per handle, so no implementation is required to support
/// concurrent reads on one handle.
pub trait CacheEngine: Send + Sync {
    /// Open a cache store rooted at `path`.
    ///
    /// Returns the null pointer on failure; any non-null value is an opaque
    /// handle valid until passed to [`CacheEngine::close`].
    fn open(&self, path: &CStr) -> *mut c_void;

    /// Read the (possibly decrypted) bytes for one address.
    ///
    /// `keys` is either null (no decryption) or a pointer to exactly four
    /// packed 32-bit words valid for the duration of the call. On success a
    /// non-null buffer pointer is returned and `*out_len` is written with
    /// the number of valid bytes; the null pointer signals failure and
    /// `*out_len` must not be trusted.
    ///
    /// # Safety
    ///
    /// Caller must ensure:
    /// - `handle` came from a successful [`CacheEngine::open`] on this
    ///   engine and has not been closed
    /// - `keys` is null or points to four `u32`s that stay alive and
    ///   unmoved until the call returns
    /// - `out_len` points to valid writable memory
    /// - no other call is in flight on the same handle
    unsafe fn read(
        &self,
        handle: *mut c_void,
        archive: u16,
        group: u16,
        file: u16,
        keys: *const [u32; 4],
        out_len: *mut i32,
    ) -> *const u8;

    /// Release a buffer previously returned by [`CacheEngine::read`].
    ///
    /// Default is a no-op: the boundary does not guarantee a free primitive,
    /// and an engine that manages its own buffers needs nothing here.
    ///
    /// # Safety
    ///
    /// Caller must ensure `buf` is non-null, came from `read` on this
    /// engine, and is not used again after this call.
    unsafe fn release(&self, buf: *const u8) {
        let _ = buf;
    }

    /// Close a handle previously returned by [`CacheEngine::open`].
    ///
    /// Default is a no-op for engines without a close primitive. Called at
    /// most once per handle; the access layer enforces idempotence locally.
    ///
    /// # Safety
    ///
    /// Caller must ensure `handle` is not used again after this call.
    unsafe fn close(&self, handle: *mut c_void) {
        let _ = handle;
    }
}

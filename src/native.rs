//! Bindings to the native cache engine library.
//!
//! The engine (`osrscache`) owns the on-disk index and container formats,
//! decompression, and XTEA decryption; this module only declares its
//! exported ABI and adapts it to the [`CacheEngine`] trait. Link directives
//! are emitted by `build.rs` when the `native` feature is enabled; set
//! `OSCACHE_ENGINE_DIR` to point the linker at the library.

use crate::engine::CacheEngine;
use std::ffi::{CStr, c_char, c_void};

unsafe extern "C" {
    /// Open a cache rooted at a NUL-terminated path. Null on failure.
    fn cache_open(path: *const c_char) -> *mut c_void;

    /// Read one file. `xtea_keys` is null or four packed words; on success
    /// returns a buffer pointer and writes the byte count to `out_len`.
    /// Null on failure.
    fn cache_read(
        cache: *mut c_void,
        archive: u16,
        group: u16,
        file: u16,
        xtea_keys: *const [u32; 4],
        out_len: *mut i32,
    ) -> *mut u8;

    /// Free a buffer returned by `cache_read`. The engine documents this as
    /// the caller's responsibility.
    fn cache_free(buffer: *mut u8);

    /// Close a cache opened by `cache_open`.
    fn cache_close(cache: *mut c_void);
}

/// The real native engine.
#[derive(Debug, Default)]
pub struct NativeEngine;

impl NativeEngine {
    pub fn new() -> Self {
        NativeEngine
    }
}

impl CacheEngine for NativeEngine {
    fn open(&self, path: &CStr) -> *mut c_void {
        // SAFETY: path is a valid NUL-terminated string for the duration of
        // the call; the engine copies what it needs
        unsafe { cache_open(path.as_ptr()) }
    }

    unsafe fn read(
        &self,
        handle: *mut c_void,
        archive: u16,
        group: u16,
        file: u16,
        keys: *const [u32; 4],
        out_len: *mut i32,
    ) -> *const u8 {
        // SAFETY: forwarded verbatim under the trait's contract: live
        // handle, null-or-four-word key pointer, writable out_len
        unsafe { cache_read(handle, archive, group, file, keys, out_len) }
    }

    unsafe fn release(&self, buf: *const u8) {
        // SAFETY: buf came from cache_read and is not used after this call;
        // cache_free is the engine's documented free primitive
        unsafe { cache_free(buf as *mut u8) }
    }

    unsafe fn close(&self, handle: *mut c_void) {
        // SAFETY: handle came from cache_open and the client guarantees it
        // is never used again
        unsafe { cache_close(handle) }
    }
}

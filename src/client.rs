//! The public cache client facade.
//!
//! `CacheClient` owns one engine handle and composes the whole access path:
//! address + key validation, the single blocking engine call, sentinel
//! conversion, materialization, and buffer release. Its state machine is
//! Open -> Closed, with no way back; a new client must be opened to read
//! again after close.
//!
//! # Concurrency
//!
//! The engine boundary gives no concurrency guarantee, so the client
//! enforces the safe default of one read in flight per handle: the handle
//! lives behind a mutex that is held from before the engine call until the
//! foreign buffer has been materialized and released. Two reads can
//! therefore never observe each other's engine buffers.

use crate::address::{CacheAddress, XteaKey};
use crate::buffer::{CacheStream, RawBuffer};
use crate::engine::CacheEngine;
use crate::error::CacheError;
use crate::metrics::ReadMetrics;
use std::ffi::{CString, c_void};
use std::ptr;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

/// Owned engine handle. Only ever dereferenced by the engine itself.
struct EngineHandle(*mut c_void);

// SAFETY: the raw pointer is an opaque token for the engine; the client
// serializes every use of it behind a mutex, so moving or sharing the
// wrapper across threads cannot produce concurrent engine calls.
unsafe impl Send for EngineHandle {}

/// Client handle for one open cache store.
///
/// Created with [`CacheClient::open`] (native engine) or
/// [`CacheClient::open_with_engine`] (any [`CacheEngine`], including test
/// doubles). All reads are synchronous blocking calls into the engine and
/// run to completion once started.
pub struct CacheClient {
    engine: Box<dyn CacheEngine>,
    /// `Some` while open, `None` once closed. The mutex doubles as the
    /// one-read-in-flight lock.
    handle: Mutex<Option<EngineHandle>>,
    /// Last read metrics (interior mutability for observability)
    last_metrics: Mutex<ReadMetrics>,
}

impl CacheClient {
    /// Open a cache store rooted at `path` using the supplied engine.
    ///
    /// The only local validation is that the path is non-empty and free of
    /// interior NULs; existence and format checks belong to the engine. A
    /// null handle from the engine fails fast with `OpenFailed` and no
    /// handle is retained, so no later read can pass the sentinel back
    /// across the boundary.
    pub fn open_with_engine(
        engine: Box<dyn CacheEngine>,
        path: &str,
    ) -> Result<Self, CacheError> {
        if path.is_empty() {
            return Err(CacheError::OpenFailed {
                path: path.to_string(),
            });
        }

        let c_path = CString::new(path).map_err(|_| CacheError::OpenFailed {
            path: path.to_string(),
        })?;

        let raw = engine.open(&c_path);
        if raw.is_null() {
            return Err(CacheError::OpenFailed {
                path: path.to_string(),
            });
        }

        Ok(CacheClient {
            engine,
            handle: Mutex::new(Some(EngineHandle(raw))),
            last_metrics: Mutex::new(ReadMetrics::new()),
        })
    }

    /// Open a cache store rooted at `path` with the native engine.
    #[cfg(feature = "native")]
    pub fn open(path: &str) -> Result<Self, CacheError> {
        Self::open_with_engine(Box::new(crate::native::NativeEngine::new()), path)
    }

    /// Read one file as owned bytes.
    ///
    /// `key`, when present, must be exactly four 32-bit words; anything
    /// else is rejected with `InvalidKey` before the engine is invoked. A
    /// zero-length result is a valid empty file, not an error. The returned
    /// bytes are owned and safe to retain indefinitely.
    pub fn read(
        &self,
        address: CacheAddress,
        key: Option<&[u32]>,
    ) -> Result<Vec<u8>, CacheError> {
        // Local precondition checks happen before anything crosses the
        // boundary
        let key = key.map(XteaKey::from_words).transpose()?;

        let guard = self.lock_handle();
        let handle = guard.as_ref().ok_or(CacheError::UseAfterClose)?;

        // Absent key marshals to the null pointer the engine recognizes as
        // "no decryption", never a zero-length allocation
        let key_ptr = key.as_ref().map_or(ptr::null(), XteaKey::as_raw);
        let mut out_len: i32 = 0;

        let engine_start = Instant::now();
        // SAFETY: the handle is live (guard held, checked Some above), the
        // key words outlive the call, out_len is a valid out-pointer, and
        // the guard serializes calls on this handle
        let buf = unsafe {
            self.engine.read(
                handle.0,
                address.archive,
                address.group,
                address.file,
                key_ptr,
                &mut out_len,
            )
        };
        let engine_micros = engine_start.elapsed().as_micros() as u64;

        // Sentinel buffer: failure, and out_len must not be trusted
        if buf.is_null() {
            return Err(CacheError::ReadFailed { address });
        }

        // The length is 32-bit signed at the boundary; a negative value
        // would over-read if cast blindly, so it is failure too. The buffer
        // itself is real and still gets released.
        if out_len < 0 {
            // SAFETY: buf is non-null and came from this engine's read
            unsafe { self.engine.release(buf) };
            return Err(CacheError::ReadFailed { address });
        }

        // SAFETY: buf is non-null and the engine reported out_len valid
        // bytes at it; the guard keeps the buffer's validity window open
        // until release below
        let view = unsafe { RawBuffer::new(buf, out_len as usize) };

        let materialize_start = Instant::now();
        let materialized = view.materialize();
        let materialize_micros = materialize_start.elapsed().as_micros() as u64;

        // Release the foreign buffer on success and failure alike
        // SAFETY: buf is non-null, came from this engine's read, and no
        // view over it survives this point
        unsafe { self.engine.release(buf) };

        let bytes = materialized?;

        if let Ok(mut metrics) = self.last_metrics.lock() {
            *metrics = ReadMetrics::new()
                .with_engine_call(engine_micros, bytes.len(), key.is_some())
                .with_materialize(materialize_micros);
        }

        Ok(bytes)
    }

    /// Read one file as a sequential byte stream.
    ///
    /// The stream is backed by an owned copy of the content, so it stays
    /// valid however long the caller holds it and regardless of further
    /// operations on this client. Consumed fully it yields exactly the
    /// bytes [`CacheClient::read`] returns for the same address.
    pub fn read_stream(
        &self,
        address: CacheAddress,
        key: Option<&[u32]>,
    ) -> Result<CacheStream, CacheError> {
        self.read(address, key).map(CacheStream::new)
    }

    /// Close the cache store.
    ///
    /// Idempotent: the first call forwards to the engine and transitions to
    /// Closed, later calls are no-ops. Reads racing with close either
    /// complete first or observe `UseAfterClose`; none can reach the engine
    /// with a stale handle.
    pub fn close(&self) {
        let mut guard = self.lock_handle();
        if let Some(handle) = guard.take() {
            // SAFETY: the handle came from a successful open on this engine
            // and take() guarantees it is never passed to the engine again
            unsafe { self.engine.close(handle.0) };
        }
    }

    /// Whether the client is still open
    pub fn is_open(&self) -> bool {
        self.lock_handle().is_some()
    }

    /// Get metrics from the last read
    ///
    /// Returns a snapshot of metrics from the most recent successful
    /// `read()` or `read_stream()` call.
    pub fn last_metrics(&self) -> ReadMetrics {
        self.last_metrics
            .lock()
            .map(|metrics| metrics.clone())
            .unwrap_or_else(|_| ReadMetrics::new())
    }

    fn lock_handle(&self) -> MutexGuard<'_, Option<EngineHandle>> {
        // A poisoned lock means a prior read panicked mid-call; the handle
        // state itself is still a plain Option and safe to inspect
        match self.handle.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Drop for CacheClient {
    fn drop(&mut self) {
        self.close();
    }
}

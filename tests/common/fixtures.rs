//! Test fixtures and the scripted stub engine for oscache tests.
//!
//! `StubEngine` implements the raw [`CacheEngine`] boundary the way the real
//! engine would: opaque handle, null-pointer sentinels, out-parameter
//! length. It additionally keeps accounting (`EngineSpy`) so tests can
//! assert how the access layer drove the boundary: how many calls were
//! made, which key words crossed, and whether every buffer handed out was
//! released exactly once.

use oscache::CacheEngine;
use std::collections::{HashMap, HashSet};
use std::ffi::{CStr, c_void};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Common Test Data
// ============================================================================

/// Path used when opening the stub cache
pub const CACHE_PATH: &str = "./cache";

/// Address the stub maps to [`KNOWN_PAYLOAD`]
pub const KNOWN_ADDRESS: (u16, u16, u16) = (2, 10, 1042);

/// Payload stored at [`KNOWN_ADDRESS`]
pub const KNOWN_PAYLOAD: &[u8] = &[0x01, 0x02, 0x03, 0x04, 0x05];

/// Address the stub answers with the null buffer sentinel
pub const FAILING_ADDRESS: (u16, u16, u16) = (99, 99, 99);

/// Address the stub maps to a zero-length payload
pub const EMPTY_ADDRESS: (u16, u16, u16) = (7, 0, 0);

/// Four-word XTEA key used in keyed-read tests
pub const TEST_KEY: [u32; 4] = [0x0011_2233, 0x4455_6677, 0x8899_AABB, 0xCCDD_EEFF];

// ============================================================================
// Boundary accounting
// ============================================================================

/// Call and buffer accounting shared between a [`StubEngine`] and the test
/// that boxed it away into a client.
#[derive(Default)]
pub struct EngineSpy {
    opens: AtomicUsize,
    reads: AtomicUsize,
    closes: AtomicUsize,
    releases: AtomicUsize,
    last_path: Mutex<Option<String>>,
    last_key: Mutex<Option<[u32; 4]>>,
    live: Mutex<HashMap<usize, Box<[u8]>>>,
}

impl EngineSpy {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Path string the last open call received
    pub fn last_path(&self) -> Option<String> {
        self.last_path.lock().unwrap().clone()
    }

    /// Key words the last read call received (None = null key pointer)
    pub fn last_key(&self) -> Option<[u32; 4]> {
        *self.last_key.lock().unwrap()
    }

    /// Buffers handed out by read and not yet released
    pub fn live_buffers(&self) -> usize {
        self.live.lock().unwrap().len()
    }
}

// ============================================================================
// Stub engine
// ============================================================================

/// Scripted engine double speaking the raw boundary contract.
///
/// Built with the `with_*` methods, then boxed into a
/// [`oscache::CacheClient`]; keep a [`StubEngine::spy`] handle around to
/// assert on boundary traffic afterwards.
pub struct StubEngine {
    entries: HashMap<(u16, u16, u16), Vec<u8>>,
    failing: HashSet<(u16, u16, u16)>,
    negative_len: HashSet<(u16, u16, u16)>,
    fail_open: bool,
    spy: Arc<EngineSpy>,
}

impl StubEngine {
    pub fn new() -> Self {
        StubEngine {
            entries: HashMap::new(),
            failing: HashSet::new(),
            negative_len: HashSet::new(),
            fail_open: false,
            spy: Arc::new(EngineSpy::default()),
        }
    }

    /// Stub preloaded with the standard scenario: [`KNOWN_ADDRESS`] maps to
    /// [`KNOWN_PAYLOAD`], [`EMPTY_ADDRESS`] to an empty file, and
    /// [`FAILING_ADDRESS`] answers with the null buffer sentinel.
    pub fn scripted() -> Self {
        StubEngine::new()
            .with_entry(KNOWN_ADDRESS, KNOWN_PAYLOAD.to_vec())
            .with_entry(EMPTY_ADDRESS, Vec::new())
            .with_failing_read(FAILING_ADDRESS)
    }

    pub fn with_entry(mut self, address: (u16, u16, u16), payload: Vec<u8>) -> Self {
        self.entries.insert(address, payload);
        self
    }

    /// Answer this address with the null buffer sentinel
    pub fn with_failing_read(mut self, address: (u16, u16, u16)) -> Self {
        self.failing.insert(address);
        self
    }

    /// Answer this address with a real buffer but a negative reported length
    pub fn with_negative_length(mut self, address: (u16, u16, u16)) -> Self {
        self.negative_len.insert(address);
        self
    }

    /// Answer open with the null handle sentinel
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn spy(&self) -> Arc<EngineSpy> {
        Arc::clone(&self.spy)
    }

    fn handle(&self) -> *mut c_void {
        self as *const StubEngine as *mut c_void
    }

    /// Register a buffer as engine-owned and report its pointer + length
    fn hand_out(&self, payload: Vec<u8>, reported_len: i32, out_len: *mut i32) -> *const u8 {
        let boxed = payload.into_boxed_slice();
        let buf = boxed.as_ptr();
        self.spy.live.lock().unwrap().insert(buf as usize, boxed);
        unsafe { *out_len = reported_len };
        buf
    }
}

impl Default for StubEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheEngine for StubEngine {
    fn open(&self, path: &CStr) -> *mut c_void {
        self.spy.opens.fetch_add(1, Ordering::SeqCst);
        *self.spy.last_path.lock().unwrap() = Some(path.to_string_lossy().into_owned());

        if self.fail_open {
            ptr::null_mut()
        } else {
            self.handle()
        }
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
        assert_eq!(
            handle as usize,
            self.handle() as usize,
            "read must receive the handle open returned"
        );
        self.spy.reads.fetch_add(1, Ordering::SeqCst);

        let key = if keys.is_null() {
            None
        } else {
            Some(unsafe { *keys })
        };
        *self.spy.last_key.lock().unwrap() = key;

        let address = (archive, group, file);

        if self.failing.contains(&address) {
            // Garbage length alongside the sentinel: the access layer must
            // not trust it
            unsafe { *out_len = i32::MAX };
            return ptr::null();
        }

        if self.negative_len.contains(&address) {
            return self.hand_out(vec![0xEE], -1, out_len);
        }

        match self.entries.get(&address) {
            Some(payload) => {
                let len = payload.len() as i32;
                self.hand_out(payload.clone(), len, out_len)
            }
            None => ptr::null(),
        }
    }

    unsafe fn release(&self, buf: *const u8) {
        self.spy.releases.fetch_add(1, Ordering::SeqCst);
        let removed = self.spy.live.lock().unwrap().remove(&(buf as usize));
        assert!(
            removed.is_some(),
            "release of a buffer this engine did not hand out"
        );
    }

    unsafe fn close(&self, handle: *mut c_void) {
        assert_eq!(
            handle as usize,
            self.handle() as usize,
            "close must receive the handle open returned"
        );
        self.spy.closes.fetch_add(1, Ordering::SeqCst);
    }
}

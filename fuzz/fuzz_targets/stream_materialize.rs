#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use oscache::{CacheAddress, CacheClient, CacheEngine};
use std::ffi::{CStr, c_void};
use std::io::Read;

/// Minimal engine serving one fixed payload from memory. Buffers point into
/// the engine's own allocation, which stays valid until the engine drops,
/// so no per-iteration allocation or release bookkeeping is needed.
struct FixedEngine {
    payload: Vec<u8>,
}

impl CacheEngine for FixedEngine {
    fn open(&self, _path: &CStr) -> *mut c_void {
        self as *const FixedEngine as *mut c_void
    }

    unsafe fn read(
        &self,
        _handle: *mut c_void,
        _archive: u16,
        _group: u16,
        _file: u16,
        _keys: *const [u32; 4],
        out_len: *mut i32,
    ) -> *const u8 {
        unsafe { *out_len = self.payload.len() as i32 };
        self.payload.as_ptr()
    }
}

#[derive(Arbitrary, Debug)]
struct StreamCase {
    payload: Vec<u8>,
    chunk_size: u16,
}

fuzz_target!(|case: StreamCase| {
    // Attack: arbitrary payloads (including empty and large) through both
    // output modes with arbitrary chunk sizes
    // Validates: no panics, byte-exact materialization, stream/read
    // equivalence, EOF past the end instead of over-read

    let StreamCase {
        payload,
        chunk_size,
    } = case;
    // Length crosses the boundary as i32
    if payload.len() > i32::MAX as usize {
        return;
    }

    let engine = FixedEngine {
        payload: payload.clone(),
    };
    let client =
        CacheClient::open_with_engine(Box::new(engine), "./cache").expect("open succeeds");
    let address = CacheAddress::new(0, 0, 0);

    let bytes = client.read(address, None).expect("read succeeds");
    assert_eq!(bytes, payload, "materialized bytes must be byte-exact");

    let mut stream = client.read_stream(address, None).expect("stream succeeds");
    let mut collected = Vec::new();
    let mut chunk = vec![0u8; (chunk_size as usize).max(1)];
    loop {
        let n = stream.read(&mut chunk).expect("stream read never faults");
        if n == 0 {
            break;
        }
        collected.extend_from_slice(&chunk[..n]);
    }

    assert_eq!(collected, bytes, "stream must equal read for one address");
    assert_eq!(stream.remaining(), 0);
});

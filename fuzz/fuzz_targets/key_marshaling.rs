#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use oscache::{CacheAddress, CacheClient, CacheEngine, CacheError};
use std::ffi::{CStr, c_void};
use std::sync::{Arc, Mutex};

/// Engine that records the key words each read call received.
struct KeySpyEngine {
    last_key: Arc<Mutex<Option<[u32; 4]>>>,
    payload: Vec<u8>,
}

impl CacheEngine for KeySpyEngine {
    fn open(&self, _path: &CStr) -> *mut c_void {
        self as *const KeySpyEngine as *mut c_void
    }

    unsafe fn read(
        &self,
        _handle: *mut c_void,
        _archive: u16,
        _group: u16,
        _file: u16,
        keys: *const [u32; 4],
        out_len: *mut i32,
    ) -> *const u8 {
        let key = if keys.is_null() {
            None
        } else {
            Some(unsafe { *keys })
        };
        *self.last_key.lock().unwrap() = key;

        unsafe { *out_len = self.payload.len() as i32 };
        self.payload.as_ptr()
    }
}

#[derive(Arbitrary, Debug)]
struct KeyCase {
    words: Vec<u32>,
    keyed: bool,
}

fuzz_target!(|case: KeyCase| {
    // Attack: arbitrary key material lengths, with and without a key
    // Validates: exactly-four-words invariant, wrong arity rejected before
    // the engine sees it, four words marshalled verbatim, absent key
    // crossing as the null pointer

    let KeyCase { words, keyed } = case;

    let last_key = Arc::new(Mutex::new(None));
    let engine = KeySpyEngine {
        last_key: Arc::clone(&last_key),
        payload: vec![0xA5],
    };
    let client =
        CacheClient::open_with_engine(Box::new(engine), "./cache").expect("open succeeds");
    let address = CacheAddress::new(0, 0, 0);

    let key = keyed.then_some(words.as_slice());
    let result = client.read(address, key);

    match key {
        Some(words) if words.len() != 4 => {
            assert_eq!(
                result.err(),
                Some(CacheError::InvalidKey { len: words.len() }),
                "wrong arity must be InvalidKey"
            );
            assert_eq!(
                *last_key.lock().unwrap(),
                None,
                "invalid key must never reach the engine"
            );
        }
        Some(words) => {
            assert!(result.is_ok());
            let mut expected = [0u32; 4];
            expected.copy_from_slice(words);
            assert_eq!(
                *last_key.lock().unwrap(),
                Some(expected),
                "all four words must cross verbatim"
            );
        }
        None => {
            assert!(result.is_ok());
            assert_eq!(
                *last_key.lock().unwrap(),
                None,
                "absent key must cross as the null pointer"
            );
        }
    }
});

//! # oscache
//!
//! Typed, memory-safe read access to a hierarchical, optionally-encrypted
//! game-asset cache served by a native engine.
//!
//! Files live in groups, groups in archives, and a file is addressed by the
//! `(archive, group, file)` triple. Individual files may be protected with
//! a four-word XTEA key that the engine uses for decryption on read. The
//! engine owns the on-disk format, decompression, and the cipher; this
//! crate owns the boundary: validating addresses and key material, calling
//! the engine, converting its sentinel values into typed errors, and
//! copying its foreign-owned buffers into memory the caller can keep.
//!
//! ## Features
//!
//! | Feature | Description | Default |
//! |:--------|:------------|:-------:|
//! | `native` | Link the native engine library (`osrscache`) | No |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use oscache::{CacheAddress, CacheClient};
//!
//! // Requires the `native` feature and the engine library on the link path
//! let client = CacheClient::open("./cache")?;
//!
//! // Unencrypted file: owned bytes, safe to retain indefinitely
//! let bytes = client.read(CacheAddress::new(2, 10, 1042), None)?;
//!
//! // Encrypted file: pass the four XTEA key words
//! let key = [0x0011_2233, 0x4455_6677, 0x8899_AABB, 0xCCDD_EEFF];
//! let bytes = client.read(CacheAddress::new(5, 0, 3), Some(&key))?;
//!
//! client.close();
//! ```
//!
//! ## Streaming
//!
//! ```rust,ignore
//! use std::io::Read;
//!
//! // Same content as read(), exposed as a sequential std::io::Read.
//! // The stream is backed by an owned copy, so it outlives the handle.
//! let mut stream = client.read_stream(CacheAddress::new(2, 10, 1042), None)?;
//! let mut content = Vec::new();
//! stream.read_to_end(&mut content)?;
//! ```
//!
//! ## Safety model
//!
//! - **Sentinels stop at the boundary**: a null handle or null buffer from
//!   the engine becomes [`CacheError::OpenFailed`] / [`CacheError::ReadFailed`];
//!   no sentinel value reaches calling code.
//! - **Foreign memory is copied before it escapes**: the engine's buffer
//!   lifetime is undocumented, so content is materialized into owned bytes
//!   while the read lock is held, and the buffer is released immediately.
//! - **One read in flight per handle**: the engine gives no concurrency
//!   guarantee, so the client serializes reads with a mutex.
//! - **Key hygiene**: XTEA key words are zeroized on drop (`zeroize`).

// Cache addressing and key material
pub mod address;
pub use address::{CacheAddress, XteaKey};

// Foreign buffer handling and the streaming surface
pub mod buffer;
pub use buffer::CacheStream;

// The public facade
pub mod client;
pub use client::CacheClient;

// The engine boundary trait
pub mod engine;
pub use engine::CacheEngine;

// Error taxonomy
pub mod error;
pub use error::CacheError;

// Read observability
pub mod metrics;
pub use metrics::ReadMetrics;

// Native engine bindings (feature-gated)
#[cfg(feature = "native")]
pub mod native;
#[cfg(feature = "native")]
pub use native::NativeEngine;

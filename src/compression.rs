// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The pluggable decompressor table.
//!
//! The reader itself never bundles codec implementations; page bodies are
//! routed through a [`CodecRegistry`] keyed by [`Compression`]. Crate
//! features register default implementations for the common codecs, and
//! callers may register their own, e.g. for LZO which has no default.
//! [`Compression::UNCOMPRESSED`] never dispatches.

use std::collections::HashMap;
use std::sync::Arc;

use crate::basic::Compression;
use crate::errors::{ParquetError, Result};

/// A block decompressor for one codec.
pub trait Codec: Send + Sync {
    /// Decompress `input`, which is expected to inflate to exactly
    /// `uncompressed_size` bytes.
    ///
    /// Implementations may use `uncompressed_size` to size the output buffer;
    /// the registry verifies the returned length.
    fn decompress(&self, input: &[u8], uncompressed_size: usize) -> Result<Vec<u8>>;
}

/// Mapping from [`Compression`] to a [`Codec`] implementation.
#[derive(Clone)]
pub struct CodecRegistry {
    codecs: HashMap<Compression, Arc<dyn Codec>>,
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("codecs", &self.codecs.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for CodecRegistry {
    /// A registry holding every codec enabled by crate features.
    fn default() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::empty();
        #[cfg(feature = "snap")]
        registry.register(Compression::SNAPPY, Arc::new(SnappyCodec));
        #[cfg(feature = "flate2")]
        registry.register(Compression::GZIP, Arc::new(GzipCodec));
        #[cfg(feature = "brotli")]
        registry.register(Compression::BROTLI, Arc::new(BrotliCodec));
        #[cfg(feature = "lz4")]
        registry.register(Compression::LZ4, Arc::new(Lz4Codec));
        #[cfg(feature = "lz4")]
        registry.register(Compression::LZ4_RAW, Arc::new(Lz4RawCodec));
        #[cfg(feature = "zstd")]
        registry.register(Compression::ZSTD, Arc::new(ZstdCodec));
        registry
    }
}

impl CodecRegistry {
    /// A registry with no codecs at all.
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Register (or replace) the decompressor for `codec`.
    pub fn register(&mut self, codec: Compression, implementation: Arc<dyn Codec>) {
        self.codecs.insert(codec, implementation);
    }

    /// Whether a decompressor is registered for `codec`.
    pub fn supports(&self, codec: Compression) -> bool {
        codec == Compression::UNCOMPRESSED || self.codecs.contains_key(&codec)
    }

    /// Decompress a page body, verifying the codec produced exactly
    /// `uncompressed_size` bytes.
    pub(crate) fn decompress(
        &self,
        codec: Compression,
        input: &[u8],
        uncompressed_size: usize,
    ) -> Result<Vec<u8>> {
        if codec == Compression::UNCOMPRESSED {
            return Err(internal_err!("UNCOMPRESSED must not dispatch to a codec"));
        }
        let implementation = self
            .codecs
            .get(&codec)
            .ok_or(ParquetError::DecompressorMissing(codec))?;
        let output = implementation.decompress(input, uncompressed_size)?;
        if output.len() != uncompressed_size {
            return Err(ParquetError::DecompressionSizeMismatch {
                expected: uncompressed_size,
                actual: output.len(),
            });
        }
        Ok(output)
    }
}

#[cfg(feature = "snap")]
struct SnappyCodec;

#[cfg(feature = "snap")]
impl Codec for SnappyCodec {
    fn decompress(&self, input: &[u8], _uncompressed_size: usize) -> Result<Vec<u8>> {
        Ok(snap::raw::Decoder::new().decompress_vec(input)?)
    }
}

#[cfg(feature = "flate2")]
struct GzipCodec;

#[cfg(feature = "flate2")]
impl Codec for GzipCodec {
    fn decompress(&self, input: &[u8], uncompressed_size: usize) -> Result<Vec<u8>> {
        use std::io::Read;
        let mut output = Vec::with_capacity(uncompressed_size);
        flate2::read::MultiGzDecoder::new(input).read_to_end(&mut output)?;
        Ok(output)
    }
}

#[cfg(feature = "brotli")]
struct BrotliCodec;

#[cfg(feature = "brotli")]
impl Codec for BrotliCodec {
    fn decompress(&self, input: &[u8], uncompressed_size: usize) -> Result<Vec<u8>> {
        use std::io::Read;
        const BUFFER_SIZE: usize = 4096;
        let mut output = Vec::with_capacity(uncompressed_size);
        brotli::Decompressor::new(input, BUFFER_SIZE).read_to_end(&mut output)?;
        Ok(output)
    }
}

#[cfg(feature = "lz4")]
struct Lz4Codec;

#[cfg(feature = "lz4")]
impl Codec for Lz4Codec {
    fn decompress(&self, input: &[u8], uncompressed_size: usize) -> Result<Vec<u8>> {
        use std::io::Read;
        let mut output = Vec::with_capacity(uncompressed_size);
        lz4_flex::frame::FrameDecoder::new(input).read_to_end(&mut output)?;
        Ok(output)
    }
}

#[cfg(feature = "lz4")]
struct Lz4RawCodec;

#[cfg(feature = "lz4")]
impl Codec for Lz4RawCodec {
    fn decompress(&self, input: &[u8], uncompressed_size: usize) -> Result<Vec<u8>> {
        lz4_flex::block::decompress(input, uncompressed_size)
            .map_err(|e| ParquetError::External(Box::new(e)))
    }
}

#[cfg(feature = "zstd")]
struct ZstdCodec;

#[cfg(feature = "zstd")]
impl Codec for ZstdCodec {
    fn decompress(&self, input: &[u8], uncompressed_size: usize) -> Result<Vec<u8>> {
        Ok(zstd::bulk::decompress(input, uncompressed_size)?)
    }
}

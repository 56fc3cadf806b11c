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

//! Byte sources the reader pulls file data from.
//!
//! Two flavors are provided: the synchronous [`ChunkReader`] for in-memory
//! buffers and local files, and (with the `async` feature) the asynchronous
//! [`ByteSource`] for anything range-addressable, such as an object store or
//! an HTTP server honoring `Range` requests.
//!
//! The reader never reads outside the ranges it requests, and transport
//! errors pass through to the caller unchanged.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use bytes::Bytes;

use crate::errors::{ParquetError, Result};

/// Synchronous access to a range-addressable blob.
pub trait ChunkReader: Send + Sync {
    /// Total length of the blob in bytes.
    fn len(&self) -> u64;

    /// Whether the blob is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return `length` bytes starting at `start`.
    ///
    /// Fails with an EOF error when the range does not lie within the blob.
    fn get_bytes(&self, start: u64, length: usize) -> Result<Bytes>;
}

impl ChunkReader for Bytes {
    fn len(&self) -> u64 {
        self.as_ref().len() as u64
    }

    fn get_bytes(&self, start: u64, length: usize) -> Result<Bytes> {
        let start = start as usize;
        if start + length > self.as_ref().len() {
            return Err(eof_err!(
                "Range {}..{} is beyond the {} byte buffer",
                start,
                start + length,
                self.as_ref().len()
            ));
        }
        Ok(self.slice(start..start + length))
    }
}

impl ChunkReader for File {
    fn len(&self) -> u64 {
        self.metadata().map(|m| m.len()).unwrap_or(0)
    }

    fn get_bytes(&self, start: u64, length: usize) -> Result<Bytes> {
        let mut file = self.try_clone()?;
        file.seek(SeekFrom::Start(start))?;
        let mut buffer = vec![0; length];
        file.read_exact(&mut buffer)?;
        Ok(buffer.into())
    }
}

#[cfg(feature = "async")]
pub use r#async::ByteSource;

#[cfg(feature = "async")]
mod r#async {
    use std::ops::Range;

    use bytes::Bytes;
    use futures::FutureExt;
    use futures::future::BoxFuture;
    use tokio::io::{AsyncReadExt, AsyncSeekExt};

    use crate::errors::Result;

    /// Asynchronous access to a range-addressable blob.
    ///
    /// # Example implementation for a `tokio` file
    ///
    /// ```no_run
    /// # use bytes::Bytes;
    /// # use futures::FutureExt;
    /// # use futures::future::BoxFuture;
    /// # use parquet_row::errors::Result;
    /// # use parquet_row::source::ByteSource;
    /// # use std::io::SeekFrom;
    /// # use std::ops::Range;
    /// # use tokio::io::{AsyncReadExt, AsyncSeekExt};
    /// struct FileSource {
    ///     file: tokio::fs::File,
    /// }
    ///
    /// impl ByteSource for FileSource {
    ///     fn byte_length(&mut self) -> BoxFuture<'_, Result<u64>> {
    ///         async move { Ok(self.file.metadata().await?.len()) }.boxed()
    ///     }
    ///
    ///     fn slice(&mut self, range: Range<u64>) -> BoxFuture<'_, Result<Bytes>> {
    ///         async move {
    ///             let mut buf = vec![0; (range.end - range.start) as usize];
    ///             self.file.seek(SeekFrom::Start(range.start)).await?;
    ///             self.file.read_exact(&mut buf).await?;
    ///             Ok(Bytes::from(buf))
    ///         }
    ///         .boxed()
    ///     }
    /// }
    /// ```
    pub trait ByteSource: Send {
        /// Return a future resolving to the total length of the blob.
        fn byte_length(&mut self) -> BoxFuture<'_, Result<u64>>;

        /// Return a future fetching the bytes in `range`.
        ///
        /// `range` always satisfies `0 <= start <= end <= byte_length`.
        /// Truncation and I/O failures surface as transport errors.
        fn slice(&mut self, range: Range<u64>) -> BoxFuture<'_, Result<Bytes>>;
    }

    impl ByteSource for tokio::fs::File {
        fn byte_length(&mut self) -> BoxFuture<'_, Result<u64>> {
            async move { Ok(self.metadata().await?.len()) }.boxed()
        }

        fn slice(&mut self, range: Range<u64>) -> BoxFuture<'_, Result<Bytes>> {
            async move {
                let len = (range.end - range.start) as usize;
                let mut buffer = vec![0; len];
                self.seek(std::io::SeekFrom::Start(range.start)).await?;
                self.read_exact(&mut buffer).await?;
                Ok(buffer.into())
            }
            .boxed()
        }
    }

    /// In-memory source, mainly useful for tests and already-buffered files.
    impl ByteSource for Bytes {
        fn byte_length(&mut self) -> BoxFuture<'_, Result<u64>> {
            let len = self.len() as u64;
            async move { Ok(len) }.boxed()
        }

        fn slice(&mut self, range: Range<u64>) -> BoxFuture<'_, Result<Bytes>> {
            let result = crate::source::ChunkReader::get_bytes(
                self,
                range.start,
                (range.end - range.start) as usize,
            );
            async move { result }.boxed()
        }
    }
}

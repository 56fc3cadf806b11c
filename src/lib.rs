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

//! A self-contained, row-oriented [Apache Parquet] reader.
//!
//! This crate materializes rows, row ranges, or individual columns from
//! Parquet files written by any conforming writer, including remote files
//! accessed through byte-range requests. The Thrift compact protocol, the
//! page encodings (PLAIN, RLE/bit-packed hybrid, dictionary,
//! DELTA_BINARY_PACKED, BYTE_STREAM_SPLIT) and Dremel record assembly are
//! implemented here; decompression is delegated to a pluggable
//! [codec registry](compression::CodecRegistry).
//!
//! # Reading rows from a file
//!
//! ```no_run
//! use bytes::Bytes;
//! use parquet_row::reader::{ParquetReader, ReadOptions};
//!
//! # fn main() -> parquet_row::errors::Result<()> {
//! let data = Bytes::from(std::fs::read("data.parquet")?);
//! let reader = ParquetReader::try_new(data)?;
//! for row in reader.read_rows(ReadOptions::builder().build())? {
//!     println!("{row:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Reading a remote file with range requests
//!
//! With the `async` feature, [`source::ByteSource`] abstracts any
//! range-addressable blob. Metadata is located with a single suffix fetch
//! (plus at most one follow-up request), and each column chunk is fetched
//! with one range request.
//!
//! [Apache Parquet]: https://parquet.apache.org/

#![warn(missing_docs)]

#[macro_use]
pub mod errors;
pub mod basic;
pub mod compression;
pub mod source;

pub(crate) mod thrift;
pub(crate) mod util;

pub mod column;
pub mod file;
pub mod record;
pub mod schema;

pub(crate) mod encodings;

pub mod reader;

#[cfg(test)]
pub(crate) mod test_util;

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

//! File-level metadata: the footer, the Thrift-encoded [`metadata`] block,
//! and its asynchronous range-request loader.

pub mod footer;
pub mod metadata;

#[cfg(feature = "async")]
pub mod async_metadata;

/// Size of the footer: a 4 byte little-endian metadata length plus the
/// 4 byte "PAR1" magic.
pub const FOOTER_SIZE: usize = 8;

/// The "PAR1" magic opening and closing every Parquet file.
pub const PARQUET_MAGIC: [u8; 4] = [b'P', b'A', b'R', b'1'];

/// Default number of trailing bytes fetched when loading metadata from an
/// asynchronous source. Large enough to cover the footer of most files in a
/// single request.
pub const DEFAULT_FOOTER_READ_SIZE: usize = 512 * 1024;

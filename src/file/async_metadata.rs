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

//! Loading [`ParquetMetaData`] from an asynchronous byte source.
//!
//! The loader fetches the trailing `initial_fetch_size` bytes as a single
//! range request. When the metadata block fits in that suffix it is parsed
//! directly; otherwise exactly one additional request covers the missing
//! prefix of the metadata region.

use crate::errors::{ParquetError, Result};
use crate::file::footer::{check_metadata_length, decode_footer};
use crate::file::metadata::{ParquetMetaData, decode_metadata};
use crate::file::{DEFAULT_FOOTER_READ_SIZE, FOOTER_SIZE};
use crate::source::ByteSource;

/// Read [`ParquetMetaData`] from `source` with the default initial fetch of
/// 512 KiB.
pub async fn read_metadata_async<S: ByteSource>(source: &mut S) -> Result<ParquetMetaData> {
    read_metadata_async_with_size(source, DEFAULT_FOOTER_READ_SIZE).await
}

/// Read [`ParquetMetaData`] from `source`, fetching `initial_fetch_size`
/// trailing bytes up front.
///
/// A larger fetch trades bandwidth for the chance of a second round trip on
/// files with big footers; the loader never issues more than two requests.
pub async fn read_metadata_async_with_size<S: ByteSource>(
    source: &mut S,
    initial_fetch_size: usize,
) -> Result<ParquetMetaData> {
    let file_size = source.byte_length().await?;
    if file_size < FOOTER_SIZE as u64 {
        return Err(general_err!(
            "Invalid Parquet file. Size is smaller than footer"
        ));
    }

    let fetch = (initial_fetch_size.max(FOOTER_SIZE) as u64).min(file_size);
    let suffix = source.slice(file_size - fetch..file_size).await?;

    let footer = &suffix[suffix.len() - FOOTER_SIZE..];
    let metadata_len = decode_footer(footer.try_into().unwrap())?;
    check_metadata_length(metadata_len, file_size)?;

    let metadata_end = suffix.len() - FOOTER_SIZE;
    if metadata_len <= metadata_end {
        // the whole metadata block is inside the suffix
        return decode_metadata(&suffix[metadata_end - metadata_len..metadata_end]);
    }

    // one more request for the missing prefix of the metadata region
    let metadata_start = file_size - (metadata_len + FOOTER_SIZE) as u64;
    let prefix = source
        .slice(metadata_start..file_size - fetch)
        .await?;
    let mut buf = Vec::with_capacity(metadata_len);
    buf.extend_from_slice(&prefix);
    buf.extend_from_slice(&suffix[..metadata_end]);
    decode_metadata(&buf)
}

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

//! Locating and decoding the metadata from the footer of a Parquet file.

use crate::errors::{ParquetError, Result};
use crate::file::metadata::{ParquetMetaData, decode_metadata};
use crate::file::{FOOTER_SIZE, PARQUET_MAGIC};
use crate::source::ChunkReader;

/// Decode the 8 byte footer, returning the length of the metadata block.
///
/// A Parquet footer has the following layout:
/// ```text
/// +-----+--------+
/// | len | 'PAR1' |
/// +-----+--------+
/// ```
pub fn decode_footer(slice: &[u8; FOOTER_SIZE]) -> Result<usize> {
    if slice[4..] != PARQUET_MAGIC {
        return Err(ParquetError::InvalidMagic);
    }
    let metadata_len = u32::from_le_bytes(slice[..4].try_into().unwrap());
    Ok(metadata_len as usize)
}

/// Validate that a metadata block of `metadata_len` bytes fits in a file of
/// `file_size` bytes.
pub(crate) fn check_metadata_length(metadata_len: usize, file_size: u64) -> Result<()> {
    if metadata_len == 0 || (metadata_len + FOOTER_SIZE) as u64 > file_size {
        return Err(ParquetError::InvalidMetadataLength {
            metadata_len: metadata_len as u64,
            file_size,
        });
    }
    Ok(())
}

/// Read the [`ParquetMetaData`] from the footer of a file.
///
/// The metadata block occupies `[file_size - 8 - metadata_len,
/// file_size - 8)`; this reads the trailing 8 bytes to size it, then reads
/// and decodes the block.
pub fn parse_metadata<R: ChunkReader>(chunk_reader: &R) -> Result<ParquetMetaData> {
    let file_size = chunk_reader.len();
    if file_size < FOOTER_SIZE as u64 {
        return Err(general_err!(
            "Invalid Parquet file. Size is smaller than footer"
        ));
    }

    let footer = chunk_reader.get_bytes(file_size - FOOTER_SIZE as u64, FOOTER_SIZE)?;
    let metadata_len = decode_footer(footer.as_ref().try_into().unwrap())?;
    check_metadata_length(metadata_len, file_size)?;

    let start = file_size - (metadata_len + FOOTER_SIZE) as u64;
    decode_metadata(chunk_reader.get_bytes(start, metadata_len)?.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_decode_footer() {
        let footer = [0x10, 0x00, 0x00, 0x00, b'P', b'A', b'R', b'1'];
        assert_eq!(decode_footer(&footer).unwrap(), 16);
    }

    #[test]
    fn test_corrupt_magic() {
        let footer = [0x10, 0x00, 0x00, 0x00, b'P', b'A', b'R', b'2'];
        assert!(matches!(
            decode_footer(&footer),
            Err(ParquetError::InvalidMagic)
        ));
    }

    #[test]
    fn test_file_smaller_than_footer() {
        let data = Bytes::from_static(&[b'P', b'A', b'R', b'1']);
        assert!(parse_metadata(&data).is_err());
    }

    #[test]
    fn test_metadata_length_zero() {
        let data = Bytes::from_static(&[0, 0, 0, 0, b'P', b'A', b'R', b'1']);
        assert!(matches!(
            parse_metadata(&data),
            Err(ParquetError::InvalidMetadataLength { .. })
        ));
    }

    #[test]
    fn test_metadata_length_larger_than_file() {
        let data = Bytes::from_static(&[0xff, 0, 0, 0, b'P', b'A', b'R', b'1']);
        let err = parse_metadata(&data).unwrap_err();
        assert!(matches!(
            err,
            ParquetError::InvalidMetadataLength {
                metadata_len: 255,
                file_size: 8
            }
        ));
    }
}

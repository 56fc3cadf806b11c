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

//! Rust mappings for the enums of the Thrift [`parquet.thrift`] definition.
//! Thrift structs are handled by their consumers.
//!
//! [`parquet.thrift`]: https://github.com/apache/parquet-format/blob/master/src/main/thrift/parquet.thrift

use std::fmt;

use crate::errors::{ParquetError, Result};
use crate::thrift::ThriftSliceReader;

// ----------------------------------------------------------------------
// Mirrors thrift enum `Type`

/// Physical types supported by Parquet.
///
/// These types are intended to be used in combination with the encodings to
/// control the on-disk storage format. For example INT16 is not included as a
/// type since a good encoding of INT32 would handle this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum Type {
    /// A boolean value.
    BOOLEAN,
    /// 32-bit signed integer.
    INT32,
    /// 64-bit signed integer.
    INT64,
    /// 96-bit signed integer for timestamps. Deprecated, only used by legacy
    /// writers.
    INT96,
    /// IEEE 754 single-precision floating point value.
    FLOAT,
    /// IEEE 754 double-precision floating point value.
    DOUBLE,
    /// Arbitrary length byte array.
    BYTE_ARRAY,
    /// Fixed length byte array, with the length defined in the schema.
    FIXED_LEN_BYTE_ARRAY,
}

impl TryFrom<i32> for Type {
    type Error = ParquetError;

    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            0 => Type::BOOLEAN,
            1 => Type::INT32,
            2 => Type::INT64,
            3 => Type::INT96,
            4 => Type::FLOAT,
            5 => Type::DOUBLE,
            6 => Type::BYTE_ARRAY,
            7 => Type::FIXED_LEN_BYTE_ARRAY,
            _ => return Err(thrift_err!("Unexpected Type {}", value)),
        })
    }
}

impl Type {
    pub(crate) fn read_thrift(prot: &mut ThriftSliceReader<'_>) -> Result<Self> {
        Self::try_from(prot.read_i32()?)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

// ----------------------------------------------------------------------
// Mirrors thrift enum `ConvertedType`

/// Common types (converted types) used by frameworks when using Parquet.
///
/// This helps map between types in those frameworks to the base types in
/// Parquet. This is only metadata and may drive value conversion when
/// materializing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum ConvertedType {
    /// No type conversion.
    NONE,
    /// A BYTE_ARRAY actually contains UTF8 encoded chars.
    UTF8,
    /// A map is converted as an optional field containing a repeated key/value
    /// pair.
    MAP,
    /// A key/value pair is converted into a group of two fields.
    MAP_KEY_VALUE,
    /// A list is converted into an optional field containing a repeated field
    /// for its values.
    LIST,
    /// An enum is converted into a binary field.
    ENUM,
    /// A decimal value: the unscaled value stored as two's complement
    /// big-endian, with precision and scale carried in the schema element.
    DECIMAL,
    /// A date stored as days since the Unix epoch, encoded as INT32.
    DATE,
    /// Milliseconds since midnight, stored as INT32.
    TIME_MILLIS,
    /// Microseconds since midnight, stored as INT64.
    TIME_MICROS,
    /// Milliseconds since the Unix epoch, stored as INT64.
    TIMESTAMP_MILLIS,
    /// Microseconds since the Unix epoch, stored as INT64.
    TIMESTAMP_MICROS,
    /// An unsigned 8 bit integer stored as INT32.
    UINT_8,
    /// An unsigned 16 bit integer stored as INT32.
    UINT_16,
    /// An unsigned 32 bit integer stored as INT32.
    UINT_32,
    /// An unsigned 64 bit integer stored as INT64.
    UINT_64,
    /// A signed 8 bit integer stored as INT32.
    INT_8,
    /// A signed 16 bit integer stored as INT32.
    INT_16,
    /// A signed 32 bit integer stored as INT32.
    INT_32,
    /// A signed 64 bit integer stored as INT64.
    INT_64,
    /// A JSON document embedded in a UTF8 BYTE_ARRAY.
    JSON,
    /// A BSON document embedded in a BYTE_ARRAY. Not supported by this reader.
    BSON,
    /// A time interval of months, days and milliseconds in a
    /// FIXED_LEN_BYTE_ARRAY of 12 bytes. Not supported by this reader.
    INTERVAL,
}

impl TryFrom<i32> for ConvertedType {
    type Error = ParquetError;

    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            0 => ConvertedType::UTF8,
            1 => ConvertedType::MAP,
            2 => ConvertedType::MAP_KEY_VALUE,
            3 => ConvertedType::LIST,
            4 => ConvertedType::ENUM,
            5 => ConvertedType::DECIMAL,
            6 => ConvertedType::DATE,
            7 => ConvertedType::TIME_MILLIS,
            8 => ConvertedType::TIME_MICROS,
            9 => ConvertedType::TIMESTAMP_MILLIS,
            10 => ConvertedType::TIMESTAMP_MICROS,
            11 => ConvertedType::UINT_8,
            12 => ConvertedType::UINT_16,
            13 => ConvertedType::UINT_32,
            14 => ConvertedType::UINT_64,
            15 => ConvertedType::INT_8,
            16 => ConvertedType::INT_16,
            17 => ConvertedType::INT_32,
            18 => ConvertedType::INT_64,
            19 => ConvertedType::JSON,
            20 => ConvertedType::BSON,
            21 => ConvertedType::INTERVAL,
            _ => return Err(thrift_err!("Unexpected ConvertedType {}", value)),
        })
    }
}

impl ConvertedType {
    pub(crate) fn read_thrift(prot: &mut ThriftSliceReader<'_>) -> Result<Self> {
        Self::try_from(prot.read_i32()?)
    }
}

impl fmt::Display for ConvertedType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

// ----------------------------------------------------------------------
// Mirrors thrift enum `FieldRepetitionType`

/// Representation of field types in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum Repetition {
    /// The field is required (can not be null) and each row has exactly one
    /// value.
    REQUIRED,
    /// The field is optional (can be null) and each row has zero or one
    /// values.
    OPTIONAL,
    /// The field is repeated and can contain zero or more values.
    REPEATED,
}

impl TryFrom<i32> for Repetition {
    type Error = ParquetError;

    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            0 => Repetition::REQUIRED,
            1 => Repetition::OPTIONAL,
            2 => Repetition::REPEATED,
            _ => return Err(thrift_err!("Unexpected FieldRepetitionType {}", value)),
        })
    }
}

impl Repetition {
    pub(crate) fn read_thrift(prot: &mut ThriftSliceReader<'_>) -> Result<Self> {
        Self::try_from(prot.read_i32()?)
    }
}

impl fmt::Display for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

// ----------------------------------------------------------------------
// Mirrors thrift enum `Encoding`

/// Encodings supported by Parquet.
///
/// Not all encodings are valid for all types. These enums are also used to
/// specify the encoding of definition and repetition levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum Encoding {
    /// The default encoding: values are stored back to back.
    ///
    /// - BOOLEAN - 1 bit per value, LSB first within each byte.
    /// - INT32 - 4 bytes per value, little-endian.
    /// - INT64 - 8 bytes per value, little-endian.
    /// - FLOAT - 4 bytes per value, IEEE, little-endian.
    /// - DOUBLE - 8 bytes per value, IEEE, little-endian.
    /// - BYTE_ARRAY - 4 byte little-endian length followed by the bytes.
    /// - FIXED_LEN_BYTE_ARRAY - just the bytes.
    PLAIN,
    /// **Deprecated** dictionary encoding.
    ///
    /// The values in the dictionary are encoded using PLAIN. The dictionary
    /// page is written first, before the data pages of the column chunk.
    PLAIN_DICTIONARY,
    /// Group packed run length encoding.
    ///
    /// Usable for definition/repetition levels encoding and booleans.
    RLE,
    /// **Deprecated** bit-packed encoding for levels. Not decoded by this
    /// reader.
    BIT_PACKED,
    /// Delta encoding for integers, either INT32 or INT64.
    ///
    /// Works best on sorted data.
    DELTA_BINARY_PACKED,
    /// Encoding for byte arrays to separate the length values and the data.
    ///
    /// The lengths are encoded using DELTA_BINARY_PACKED encoding.
    DELTA_LENGTH_BYTE_ARRAY,
    /// Incremental encoding for byte arrays.
    ///
    /// Prefix lengths are encoded using DELTA_BINARY_PACKED encoding.
    /// Suffixes are stored using DELTA_LENGTH_BYTE_ARRAY encoding.
    DELTA_BYTE_ARRAY,
    /// Dictionary encoding: the ids are encoded using the RLE encoding.
    RLE_DICTIONARY,
    /// Encoding for fixed-width data: K byte streams of length `count` for a
    /// K-byte element width.
    BYTE_STREAM_SPLIT,
}

impl TryFrom<i32> for Encoding {
    type Error = ParquetError;

    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            0 => Encoding::PLAIN,
            2 => Encoding::PLAIN_DICTIONARY,
            3 => Encoding::RLE,
            4 => Encoding::BIT_PACKED,
            5 => Encoding::DELTA_BINARY_PACKED,
            6 => Encoding::DELTA_LENGTH_BYTE_ARRAY,
            7 => Encoding::DELTA_BYTE_ARRAY,
            8 => Encoding::RLE_DICTIONARY,
            9 => Encoding::BYTE_STREAM_SPLIT,
            _ => return Err(thrift_err!("Unexpected Encoding {}", value)),
        })
    }
}

impl Encoding {
    pub(crate) fn read_thrift(prot: &mut ThriftSliceReader<'_>) -> Result<Self> {
        Self::try_from(prot.read_i32()?)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

// ----------------------------------------------------------------------
// Mirrors thrift enum `CompressionCodec`

/// Supported block compression algorithms.
///
/// The reader never bundles codec implementations; it resolves these through
/// the [codec registry](crate::compression::CodecRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum Compression {
    /// No compression.
    UNCOMPRESSED,
    /// [Snappy compression](https://en.wikipedia.org/wiki/Snappy_(compression))
    SNAPPY,
    /// [Gzip compression](https://www.ietf.org/rfc/rfc1952.txt)
    GZIP,
    /// [LZO compression](https://en.wikipedia.org/wiki/Lempel%E2%80%93Ziv%E2%80%93Oberhumer)
    LZO,
    /// [Brotli compression](https://datatracker.ietf.org/doc/html/rfc7932)
    BROTLI,
    /// [LZ4 compression](https://lz4.org/), [deprecated in favour of](https://issues.apache.org/jira/browse/PARQUET-2032) `LZ4_RAW`
    LZ4,
    /// [Zstandard compression](https://datatracker.ietf.org/doc/html/rfc8878)
    ZSTD,
    /// [LZ4 compression](https://lz4.org/) without a frame header.
    LZ4_RAW,
}

impl TryFrom<i32> for Compression {
    type Error = ParquetError;

    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            0 => Compression::UNCOMPRESSED,
            1 => Compression::SNAPPY,
            2 => Compression::GZIP,
            3 => Compression::LZO,
            4 => Compression::BROTLI,
            5 => Compression::LZ4,
            6 => Compression::ZSTD,
            7 => Compression::LZ4_RAW,
            _ => return Err(thrift_err!("Unexpected CompressionCodec {}", value)),
        })
    }
}

impl Compression {
    pub(crate) fn read_thrift(prot: &mut ThriftSliceReader<'_>) -> Result<Self> {
        Self::try_from(prot.read_i32()?)
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

// ----------------------------------------------------------------------
// Mirrors thrift enum `PageType`

/// Types of pages found inside a column chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum PageType {
    /// Data page Parquet 1.0
    DATA_PAGE,
    /// Index page. Skipped by this reader.
    INDEX_PAGE,
    /// Dictionary page
    DICTIONARY_PAGE,
    /// Data page Parquet 2.0
    DATA_PAGE_V2,
}

impl TryFrom<i32> for PageType {
    type Error = ParquetError;

    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            0 => PageType::DATA_PAGE,
            1 => PageType::INDEX_PAGE,
            2 => PageType::DICTIONARY_PAGE,
            3 => PageType::DATA_PAGE_V2,
            _ => return Err(thrift_err!("Unexpected PageType {}", value)),
        })
    }
}

impl PageType {
    pub(crate) fn read_thrift(prot: &mut ThriftSliceReader<'_>) -> Result<Self> {
        Self::try_from(prot.read_i32()?)
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_from_thrift_id() {
        assert_eq!(Type::try_from(0).unwrap(), Type::BOOLEAN);
        assert_eq!(Type::try_from(3).unwrap(), Type::INT96);
        assert_eq!(Type::try_from(7).unwrap(), Type::FIXED_LEN_BYTE_ARRAY);
        assert!(Type::try_from(8).is_err());
    }

    #[test]
    fn test_encoding_from_thrift_id() {
        assert_eq!(Encoding::try_from(0).unwrap(), Encoding::PLAIN);
        // 1 was never assigned
        assert!(Encoding::try_from(1).is_err());
        assert_eq!(Encoding::try_from(8).unwrap(), Encoding::RLE_DICTIONARY);
        assert_eq!(Encoding::try_from(9).unwrap(), Encoding::BYTE_STREAM_SPLIT);
    }

    #[test]
    fn test_compression_from_thrift_id() {
        assert_eq!(Compression::try_from(0).unwrap(), Compression::UNCOMPRESSED);
        assert_eq!(Compression::try_from(6).unwrap(), Compression::ZSTD);
        assert_eq!(Compression::try_from(7).unwrap(), Compression::LZ4_RAW);
        assert!(Compression::try_from(8).is_err());
    }

    #[test]
    fn test_converted_type_from_thrift_id() {
        assert_eq!(ConvertedType::try_from(0).unwrap(), ConvertedType::UTF8);
        assert_eq!(ConvertedType::try_from(5).unwrap(), ConvertedType::DECIMAL);
        assert_eq!(ConvertedType::try_from(21).unwrap(), ConvertedType::INTERVAL);
        assert!(ConvertedType::try_from(22).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Type::BYTE_ARRAY.to_string(), "BYTE_ARRAY");
        assert_eq!(Encoding::DELTA_BINARY_PACKED.to_string(), "DELTA_BINARY_PACKED");
        assert_eq!(Compression::SNAPPY.to_string(), "SNAPPY");
        assert_eq!(Repetition::REPEATED.to_string(), "REPEATED");
    }
}

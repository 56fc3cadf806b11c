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

//! Common Parquet errors and macros.

use std::error::Error;
use std::{io, result, str, string};

use crate::basic::{Compression, ConvertedType, Encoding};

/// Parquet error enumeration.
///
/// Every error is fatal to the read that produced it; the reader performs no
/// retries. Transport errors raised by a byte source pass through unchanged
/// in the [`ParquetError::External`] variant.
#[derive(Debug)]
pub enum ParquetError {
    /// General Parquet error.
    /// Returned when code violates normal workflow of working with Parquet files.
    General(String),
    /// "Not yet implemented" Parquet error.
    /// Returned when functionality is not yet available.
    NYI(String),
    /// "End of file" Parquet error.
    /// Returned when a decode would read past the end of a buffer, e.g. when
    /// there are not enough bytes to decode.
    EOF(String),
    /// The leading or trailing "PAR1" file magic was not found.
    InvalidMagic,
    /// The footer declared a metadata length of zero, or one that does not fit
    /// in the file.
    InvalidMetadataLength {
        /// Metadata length read from the footer
        metadata_len: u64,
        /// Total length of the file
        file_size: u64,
    },
    /// Malformed Thrift compact protocol input: unknown wire type, oversized
    /// varint, or bad field structure.
    Thrift(String),
    /// Page or level data uses an encoding this reader does not decode.
    UnsupportedEncoding(Encoding),
    /// The converted type has no supported logical representation (BSON,
    /// INTERVAL).
    UnsupportedConvertedType(ConvertedType),
    /// A column chunk references a codec with no entry in the codec registry.
    DecompressorMissing(Compression),
    /// A codec produced a different number of bytes than the page header
    /// declared.
    DecompressionSizeMismatch {
        /// `uncompressed_page_size` declared by the page header
        expected: usize,
        /// Bytes actually produced by the codec
        actual: usize,
    },
    /// A DATA_PAGE_V2 level section decoded to fewer values than its declared
    /// byte length should hold.
    LevelsByteLengthMismatch {
        /// Level count the page header requires
        expected: usize,
        /// Levels actually decoded from the section
        actual: usize,
    },
    /// An internal invariant was violated, e.g. record-assembly stack
    /// underflow or a bit-pack offset past the end of a run.
    Internal(String),
    /// An external error variant, wrapping I/O and codec failures unchanged.
    External(Box<dyn Error + Send + Sync>),
}

impl std::fmt::Display for ParquetError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self {
            ParquetError::General(message) => write!(fmt, "Parquet error: {message}"),
            ParquetError::NYI(message) => write!(fmt, "NYI: {message}"),
            ParquetError::EOF(message) => write!(fmt, "EOF: {message}"),
            ParquetError::InvalidMagic => write!(fmt, "Invalid Parquet file. Corrupt magic"),
            ParquetError::InvalidMetadataLength {
                metadata_len,
                file_size,
            } => write!(
                fmt,
                "Invalid Parquet file. Reported metadata length of {metadata_len} does not fit in {file_size} byte file"
            ),
            ParquetError::Thrift(message) => write!(fmt, "Thrift error: {message}"),
            ParquetError::UnsupportedEncoding(encoding) => {
                write!(fmt, "Unsupported encoding: {encoding}")
            }
            ParquetError::UnsupportedConvertedType(converted_type) => {
                write!(fmt, "Unsupported converted type: {converted_type}")
            }
            ParquetError::DecompressorMissing(codec) => {
                write!(fmt, "No decompressor registered for codec {codec}")
            }
            ParquetError::DecompressionSizeMismatch { expected, actual } => write!(
                fmt,
                "Actual decompressed size doesn't match the expected one ({actual} vs {expected})"
            ),
            ParquetError::LevelsByteLengthMismatch { expected, actual } => write!(
                fmt,
                "Level section too short: expected {expected} levels, decoded {actual}"
            ),
            ParquetError::Internal(message) => write!(fmt, "Internal error: {message}"),
            ParquetError::External(e) => write!(fmt, "External: {e}"),
        }
    }
}

impl Error for ParquetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParquetError::External(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for ParquetError {
    fn from(e: io::Error) -> ParquetError {
        ParquetError::External(Box::new(e))
    }
}

impl From<str::Utf8Error> for ParquetError {
    fn from(e: str::Utf8Error) -> ParquetError {
        ParquetError::External(Box::new(e))
    }
}

impl From<string::FromUtf8Error> for ParquetError {
    fn from(e: string::FromUtf8Error) -> ParquetError {
        ParquetError::External(Box::new(e))
    }
}

#[cfg(feature = "snap")]
impl From<snap::Error> for ParquetError {
    fn from(e: snap::Error) -> ParquetError {
        ParquetError::External(Box::new(e))
    }
}

/// A specialized `Result` for Parquet errors.
pub type Result<T, E = ParquetError> = result::Result<T, E>;

// ----------------------------------------------------------------------
// Conversion from `ParquetError` to other types of `Error`s

impl From<ParquetError> for io::Error {
    fn from(e: ParquetError) -> Self {
        io::Error::other(e)
    }
}

// ----------------------------------------------------------------------
// Convenient macros for different errors

macro_rules! general_err {
    ($fmt:expr) => (ParquetError::General($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::General(format!($fmt, $($args),*)));
}

macro_rules! nyi_err {
    ($fmt:expr) => (ParquetError::NYI($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::NYI(format!($fmt, $($args),*)));
}

macro_rules! eof_err {
    ($fmt:expr) => (ParquetError::EOF($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::EOF(format!($fmt, $($args),*)));
}

macro_rules! thrift_err {
    ($fmt:expr) => (ParquetError::Thrift($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::Thrift(format!($fmt, $($args),*)));
}

macro_rules! internal_err {
    ($fmt:expr) => (ParquetError::Internal($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::Internal(format!($fmt, $($args),*)));
}

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

//! Decoder for BYTE_STREAM_SPLIT encoded FLOAT and DOUBLE values.
//!
//! A K-byte element type is stored as K streams of `count` bytes each; byte
//! `j` of value `i` lives at index `i` of stream `j`.

use bytes::Bytes;

use crate::basic::{Encoding, Type};
use crate::errors::{ParquetError, Result};
use crate::record::value::Value;

/// Reassemble `num_values` split values of `physical_type` from `data`.
pub(crate) fn decode_byte_stream_split(
    data: &Bytes,
    physical_type: Type,
    num_values: usize,
) -> Result<Vec<Value>> {
    let width = match physical_type {
        Type::FLOAT => 4,
        Type::DOUBLE => 8,
        _ => return Err(ParquetError::UnsupportedEncoding(Encoding::BYTE_STREAM_SPLIT)),
    };
    if data.len() < num_values * width {
        return Err(eof_err!(
            "BYTE_STREAM_SPLIT needs {} bytes, have {}",
            num_values * width,
            data.len()
        ));
    }

    let mut values = Vec::with_capacity(num_values);
    let mut scratch = [0u8; 8];
    for i in 0..num_values {
        for (j, byte) in scratch[..width].iter_mut().enumerate() {
            *byte = data[j * num_values + i];
        }
        values.push(match physical_type {
            Type::FLOAT => Value::Float(f32::from_le_bytes(scratch[..4].try_into().unwrap())),
            _ => Value::Double(f64::from_le_bytes(scratch)),
        });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(values: &[Vec<u8>]) -> Vec<u8> {
        let width = values[0].len();
        let mut out = vec![];
        for j in 0..width {
            for v in values {
                out.push(v[j]);
            }
        }
        out
    }

    #[test]
    fn test_float_reassembly() {
        let floats = [1.5f32, -2.25, 1e-3];
        let encoded: Vec<Vec<u8>> = floats.iter().map(|f| f.to_le_bytes().to_vec()).collect();
        let data = Bytes::from(split(&encoded));
        let values = decode_byte_stream_split(&data, Type::FLOAT, 3).unwrap();
        for (value, expected) in values.iter().zip(floats) {
            assert_eq!(value.as_f64(), Some(expected as f64));
        }
    }

    #[test]
    fn test_double_reassembly() {
        let doubles = [0.0f64, -1.0, 123456.789];
        let encoded: Vec<Vec<u8>> = doubles.iter().map(|f| f.to_le_bytes().to_vec()).collect();
        let data = Bytes::from(split(&encoded));
        let values = decode_byte_stream_split(&data, Type::DOUBLE, 3).unwrap();
        for (value, expected) in values.iter().zip(doubles) {
            assert_eq!(value.as_f64(), Some(expected));
        }
    }

    #[test]
    fn test_rejects_non_float_types() {
        let data = Bytes::from_static(&[0; 8]);
        assert!(matches!(
            decode_byte_stream_split(&data, Type::INT32, 2),
            Err(ParquetError::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn test_short_input() {
        let data = Bytes::from_static(&[0; 7]);
        assert!(decode_byte_stream_split(&data, Type::DOUBLE, 1).is_err());
    }
}

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

//! PLAIN decoding for all physical types.
//!
//! Fixed-width values are read back to back, little-endian. Booleans pack one
//! bit per value, LSB first. BYTE_ARRAY values carry a little-endian i32
//! length prefix; FIXED_LEN_BYTE_ARRAY values are `type_length` raw bytes.
//! Byte arrays are returned as zero-copy sub-slices of the page buffer.

use crate::basic::Type;
use crate::errors::{ParquetError, Result};
use crate::record::value::{Int96, Value};
use crate::util::bit_util::ceil;
use crate::util::cursor::ByteCursor;

/// Decode `num_values` PLAIN values of `physical_type` from `cursor`.
///
/// `type_length` is the byte width of FIXED_LEN_BYTE_ARRAY values and is
/// ignored for every other type.
pub(crate) fn decode_plain(
    cursor: &mut ByteCursor,
    physical_type: Type,
    num_values: usize,
    type_length: usize,
) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(num_values);
    match physical_type {
        Type::BOOLEAN => {
            let packed = cursor.read_slice(ceil(num_values, 8))?;
            for i in 0..num_values {
                values.push(Value::Bool(packed[i / 8] >> (i % 8) & 1 != 0));
            }
        }
        Type::INT32 => {
            for _ in 0..num_values {
                values.push(Value::Int(cursor.read_i32()?));
            }
        }
        Type::INT64 => {
            for _ in 0..num_values {
                values.push(Value::Long(cursor.read_i64()?));
            }
        }
        Type::INT96 => {
            for _ in 0..num_values {
                let raw = cursor.read_slice(12)?;
                values.push(Value::Int96(Int96::from_le_bytes(
                    raw.as_ref().try_into().unwrap(),
                )));
            }
        }
        Type::FLOAT => {
            for _ in 0..num_values {
                values.push(Value::Float(cursor.read_f32()?));
            }
        }
        Type::DOUBLE => {
            for _ in 0..num_values {
                values.push(Value::Double(cursor.read_f64()?));
            }
        }
        Type::BYTE_ARRAY => {
            for _ in 0..num_values {
                let len = cursor.read_i32()?;
                if len < 0 {
                    return Err(general_err!("Negative byte array length {}", len));
                }
                values.push(Value::Bytes(cursor.read_slice(len as usize)?));
            }
        }
        Type::FIXED_LEN_BYTE_ARRAY => {
            if type_length == 0 && num_values > 0 {
                return Err(general_err!(
                    "FIXED_LEN_BYTE_ARRAY column has no type_length"
                ));
            }
            for _ in 0..num_values {
                values.push(Value::Bytes(cursor.read_slice(type_length)?));
            }
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn cursor(data: Vec<u8>) -> ByteCursor {
        ByteCursor::new(Bytes::from(data))
    }

    #[test]
    fn test_booleans_lsb_first() {
        // 10 values use 2 bytes; bits: 1,0,1,1,0,0,0,1 then 1,0
        let mut cursor = cursor(vec![0b1000_1101, 0b0000_0001]);
        let values = decode_plain(&mut cursor, Type::BOOLEAN, 10, 0).unwrap();
        let expected = [true, false, true, true, false, false, false, true, true, false];
        for (value, expected) in values.iter().zip(expected) {
            assert_eq!(value.as_bool(), Some(expected));
        }
    }

    #[test]
    fn test_int32_and_int64() {
        let mut data = vec![];
        data.extend_from_slice(&1i32.to_le_bytes());
        data.extend_from_slice(&(-1i32).to_le_bytes());
        let mut cursor = cursor(data);
        let values = decode_plain(&mut cursor, Type::INT32, 2, 0).unwrap();
        assert_eq!(values, vec![Value::Int(1), Value::Int(-1)]);

        let mut data = vec![];
        data.extend_from_slice(&i64::MIN.to_le_bytes());
        let mut cursor = ByteCursor::new(Bytes::from(data));
        let values = decode_plain(&mut cursor, Type::INT64, 1, 0).unwrap();
        assert_eq!(values, vec![Value::Long(i64::MIN)]);
    }

    #[test]
    fn test_floats_ieee_le() {
        let mut data = vec![];
        data.extend_from_slice(&1.5f32.to_le_bytes());
        data.extend_from_slice(&(-0.25f32).to_le_bytes());
        let mut cursor = cursor(data);
        let values = decode_plain(&mut cursor, Type::FLOAT, 2, 0).unwrap();
        assert_eq!(values, vec![Value::Float(1.5), Value::Float(-0.25)]);
    }

    #[test]
    fn test_byte_array_length_prefix() {
        let mut data = vec![];
        data.extend_from_slice(&2i32.to_le_bytes());
        data.extend_from_slice(b"hi");
        data.extend_from_slice(&0i32.to_le_bytes());
        data.extend_from_slice(&1i32.to_le_bytes());
        data.extend_from_slice(b"!");
        let mut cursor = cursor(data);
        let values = decode_plain(&mut cursor, Type::BYTE_ARRAY, 3, 0).unwrap();
        assert_eq!(values[0].as_bytes(), Some(b"hi".as_ref()));
        assert_eq!(values[1].as_bytes(), Some(b"".as_ref()));
        assert_eq!(values[2].as_bytes(), Some(b"!".as_ref()));
    }

    #[test]
    fn test_fixed_len_byte_array() {
        let mut cursor = cursor(b"abcdef".to_vec());
        let values = decode_plain(&mut cursor, Type::FIXED_LEN_BYTE_ARRAY, 2, 3).unwrap();
        assert_eq!(values[0].as_bytes(), Some(b"abc".as_ref()));
        assert_eq!(values[1].as_bytes(), Some(b"def".as_ref()));
    }

    #[test]
    fn test_int96_twelve_bytes() {
        let mut data = vec![];
        data.extend_from_slice(&7u64.to_le_bytes());
        data.extend_from_slice(&9u32.to_le_bytes());
        let mut cursor = cursor(data);
        let values = decode_plain(&mut cursor, Type::INT96, 1, 0).unwrap();
        match &values[0] {
            Value::Int96(v) => assert_eq!(v.as_u128(), (9u128 << 64) | 7),
            other => panic!("expected Int96, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_input() {
        let mut cursor = cursor(vec![1, 2, 3]);
        assert!(matches!(
            decode_plain(&mut cursor, Type::INT32, 2, 0),
            Err(ParquetError::EOF(_))
        ));
    }
}

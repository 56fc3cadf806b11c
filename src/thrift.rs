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

//! Decoder for the Thrift [compact protocol], used for the Parquet file
//! footer and page headers.
//!
//! The decoder is streaming: consumers drive a [`ThriftSliceReader`] directly
//! and map field ids onto typed structs, rather than materializing a generic
//! field tree.
//!
//! [compact protocol]: https://github.com/apache/thrift/blob/master/doc/specs/thrift-compact-protocol.md

use crate::errors::{ParquetError, Result};

/// The longest legal ULEB128 varint: ten 7-bit groups cover 64 bits.
const MAX_VARINT_BYTES: usize = 10;

/// Wire types used for struct fields in the compact protocol.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FieldType {
    Stop = 0,
    BooleanTrue = 1,
    BooleanFalse = 2,
    Byte = 3,
    I16 = 4,
    I32 = 5,
    I64 = 6,
    Double = 7,
    Binary = 8,
    List = 9,
    Set = 10,
    Map = 11,
    Struct = 12,
    Uuid = 13,
}

impl TryFrom<u8> for FieldType {
    type Error = ParquetError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Stop),
            1 => Ok(Self::BooleanTrue),
            2 => Ok(Self::BooleanFalse),
            3 => Ok(Self::Byte),
            4 => Ok(Self::I16),
            5 => Ok(Self::I32),
            6 => Ok(Self::I64),
            7 => Ok(Self::Double),
            8 => Ok(Self::Binary),
            9 => Ok(Self::List),
            10 => Ok(Self::Set),
            11 => Ok(Self::Map),
            12 => Ok(Self::Struct),
            13 => Ok(Self::Uuid),
            _ => Err(thrift_err!("Unexpected struct field type {}", value)),
        }
    }
}

impl FieldType {
    /// Map the low nibble of a list/set header to a field type.
    ///
    /// The original compact protocol spec used 2 for booleans inside
    /// collections, but a widespread implementation bug made 1 equally common;
    /// readers must accept both.
    fn from_element_nibble(value: u8) -> Result<Self> {
        match value {
            1 | 2 => Ok(Self::BooleanTrue),
            3..=13 => Self::try_from(value),
            _ => Err(thrift_err!("Unexpected list element type {}", value)),
        }
    }
}

/// Describes a struct field encountered during decoding.
pub(crate) struct FieldIdent {
    /// The wire type for the field.
    pub(crate) field_type: FieldType,
    /// The field id, either computed from the delta or read in full.
    pub(crate) id: i16,
    /// Boolean fields carry no payload; the value is the field type itself.
    pub(crate) bool_val: Option<bool>,
}

/// Describes a Thrift-encoded list or set.
pub(crate) struct ListIdent {
    /// The wire type for each element.
    pub(crate) element_type: FieldType,
    /// Number of elements in the list.
    pub(crate) size: usize,
}

/// Streaming compact-protocol reader over a byte slice.
pub(crate) struct ThriftSliceReader<'a> {
    buf: &'a [u8],
}

impl<'a> ThriftSliceReader<'a> {
    /// Create a new reader over the bytes in `buf`.
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Return the unconsumed remainder of the input.
    pub(crate) fn as_slice(&self) -> &'a [u8] {
        self.buf
    }

    #[inline]
    pub(crate) fn read_byte(&mut self) -> Result<u8> {
        let ret = *self
            .buf
            .first()
            .ok_or_else(|| eof_err!("Unexpected EOF in Thrift input"))?;
        self.buf = &self.buf[1..];
        Ok(ret)
    }

    /// Read a ULEB128 encoded unsigned varint.
    pub(crate) fn read_vlq(&mut self) -> Result<u64> {
        // the single-byte case dominates
        let byte = self.read_byte()?;
        if byte & 0x80 == 0 {
            return Ok(byte as u64);
        }
        let mut in_progress = (byte & 0x7f) as u64;
        let mut shift = 7;
        for _ in 1..MAX_VARINT_BYTES {
            let byte = self.read_byte()?;
            in_progress |= ((byte & 0x7f) as u64).wrapping_shl(shift);
            if byte & 0x80 == 0 {
                return Ok(in_progress);
            }
            shift += 7;
        }
        Err(thrift_err!("Varint longer than {} bytes", MAX_VARINT_BYTES))
    }

    /// Read a zig-zag encoded signed varint.
    pub(crate) fn read_zig_zag(&mut self) -> Result<i64> {
        let val = self.read_vlq()?;
        Ok((val >> 1) as i64 ^ -((val & 1) as i64))
    }

    pub(crate) fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_zig_zag()? as _)
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_zig_zag()? as _)
    }

    pub(crate) fn read_i64(&mut self) -> Result<i64> {
        self.read_zig_zag()
    }

    pub(crate) fn read_double(&mut self) -> Result<f64> {
        let slice = self
            .buf
            .get(..8)
            .ok_or_else(|| eof_err!("Unexpected EOF in Thrift double"))?;
        self.buf = &self.buf[8..];
        Ok(f64::from_le_bytes(slice.try_into().unwrap()))
    }

    /// Read a length-prefixed Thrift `binary`, borrowing from the input.
    pub(crate) fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_vlq()? as usize;
        let ret = self
            .buf
            .get(..len)
            .ok_or_else(|| eof_err!("Unexpected EOF in Thrift binary of {} bytes", len))?;
        self.buf = &self.buf[len..];
        Ok(ret)
    }

    /// Read a Thrift `binary` as a UTF-8 string.
    pub(crate) fn read_string(&mut self) -> Result<&'a str> {
        Ok(std::str::from_utf8(self.read_bytes()?)?)
    }

    /// Read a boolean list element. Struct-field booleans are carried in the
    /// field type instead; see [`FieldIdent::bool_val`].
    pub(crate) fn read_bool(&mut self) -> Result<bool> {
        match self.read_byte()? {
            0x01 => Ok(true),
            0x00 | 0x02 => Ok(false),
            b => Err(thrift_err!("Cannot convert {} into bool", b)),
        }
    }

    /// Read a UUID as sixteen raw bytes, rendered as a lowercase hex string.
    pub(crate) fn read_uuid(&mut self) -> Result<String> {
        let slice = self
            .buf
            .get(..16)
            .ok_or_else(|| eof_err!("Unexpected EOF in Thrift uuid"))?;
        self.buf = &self.buf[16..];
        let mut out = String::with_capacity(32);
        for b in slice {
            out.push_str(&format!("{b:02x}"));
        }
        Ok(out)
    }

    pub(crate) fn skip_bytes(&mut self, n: usize) -> Result<()> {
        if self.buf.len() < n {
            return Err(eof_err!("Unexpected EOF skipping {} bytes", n));
        }
        self.buf = &self.buf[n..];
        Ok(())
    }

    /// Read the header of a Thrift-encoded list or set.
    pub(crate) fn read_list_begin(&mut self) -> Result<ListIdent> {
        let header = self.read_byte()?;
        // some writers emit an element type of 0 for an empty list
        if header == 0 {
            return Ok(ListIdent {
                element_type: FieldType::Byte,
                size: 0,
            });
        }
        let element_type = FieldType::from_element_nibble(header & 0x0f)?;
        let size = match (header & 0xf0) >> 4 {
            // sizes >= 15 are stored out of line as a varint
            15 => self.read_vlq()? as usize,
            n => n as usize,
        };
        Ok(ListIdent { element_type, size })
    }

    /// Read the header for a field in a Thrift-encoded struct.
    ///
    /// A field delta of zero signals an absolute zig-zag field id that
    /// replaces `last_field_id`; otherwise the id is `last_field_id + delta`.
    pub(crate) fn read_field_begin(&mut self, last_field_id: i16) -> Result<FieldIdent> {
        let header = self.read_byte()?;
        let field_delta = (header & 0xf0) >> 4;
        let field_type = FieldType::try_from(header & 0x0f)?;

        if field_type == FieldType::Stop {
            return Ok(FieldIdent {
                field_type,
                id: 0,
                bool_val: None,
            });
        }

        let bool_val = match field_type {
            FieldType::BooleanTrue => Some(true),
            FieldType::BooleanFalse => Some(false),
            _ => None,
        };
        let id = if field_delta != 0 {
            last_field_id
                .checked_add(field_delta as i16)
                .ok_or_else(|| thrift_err!("Cannot add {} to {}", field_delta, last_field_id))?
        } else {
            self.read_i16()?
        };

        Ok(FieldIdent {
            field_type,
            id,
            bool_val,
        })
    }

    fn skip_vlq(&mut self) -> Result<()> {
        for _ in 0..MAX_VARINT_BYTES {
            if self.read_byte()? & 0x80 == 0 {
                return Ok(());
            }
        }
        Err(thrift_err!("Varint longer than {} bytes", MAX_VARINT_BYTES))
    }

    fn skip_binary(&mut self) -> Result<()> {
        let len = self.read_vlq()? as usize;
        self.skip_bytes(len)
    }

    /// Skip a field of type `field_type`, recursing up to the default depth.
    pub(crate) fn skip(&mut self, field_type: FieldType) -> Result<()> {
        const DEFAULT_SKIP_DEPTH: i8 = 64;
        self.skip_till_depth(field_type, DEFAULT_SKIP_DEPTH)
    }

    fn skip_till_depth(&mut self, field_type: FieldType, depth: i8) -> Result<()> {
        if depth == 0 {
            return Err(thrift_err!("Cannot parse past {:?}", field_type));
        }
        match field_type {
            // boolean struct fields carry no payload
            FieldType::BooleanTrue | FieldType::BooleanFalse => Ok(()),
            FieldType::Byte => self.read_byte().map(|_| ()),
            FieldType::I16 | FieldType::I32 | FieldType::I64 => self.skip_vlq(),
            FieldType::Double => self.skip_bytes(8),
            FieldType::Binary => self.skip_binary(),
            FieldType::Uuid => self.skip_bytes(16),
            FieldType::Struct => {
                let mut last_field_id = 0i16;
                loop {
                    let field_ident = self.read_field_begin(last_field_id)?;
                    if field_ident.field_type == FieldType::Stop {
                        return Ok(());
                    }
                    self.skip_till_depth(field_ident.field_type, depth - 1)?;
                    last_field_id = field_ident.id;
                }
            }
            FieldType::List | FieldType::Set => {
                let list_ident = self.read_list_begin()?;
                for _ in 0..list_ident.size {
                    if list_ident.element_type == FieldType::BooleanTrue {
                        self.read_bool()?;
                    } else {
                        self.skip_till_depth(list_ident.element_type, depth - 1)?;
                    }
                }
                Ok(())
            }
            FieldType::Map => {
                // a varint count, then (for non-empty maps) one byte holding
                // the key and value types in its nibbles
                let size = self.read_vlq()? as usize;
                if size == 0 {
                    return Ok(());
                }
                let header = self.read_byte()?;
                let key_type = FieldType::from_element_nibble((header & 0xf0) >> 4)?;
                let val_type = FieldType::from_element_nibble(header & 0x0f)?;
                for _ in 0..size {
                    self.skip_till_depth(key_type, depth - 1)?;
                    self.skip_till_depth(val_type, depth - 1)?;
                }
                Ok(())
            }
            FieldType::Stop => Err(thrift_err!("Cannot skip stop field")),
        }
    }
}

/// Read a Thrift-encoded list of strings.
pub(crate) fn read_string_list(prot: &mut ThriftSliceReader<'_>) -> Result<Vec<String>> {
    let list_ident = prot.read_list_begin()?;
    let mut res = Vec::with_capacity(list_ident.size);
    for _ in 0..list_ident.size {
        res.push(prot.read_string()?.to_owned());
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_single_and_multi_byte() {
        let mut prot = ThriftSliceReader::new(&[0x96, 0x01]);
        assert_eq!(prot.read_vlq().unwrap(), 150);
        let mut prot = ThriftSliceReader::new(&[0xac, 0x02]);
        assert_eq!(prot.read_vlq().unwrap(), 300);
        let mut prot = ThriftSliceReader::new(&[0x7f]);
        assert_eq!(prot.read_vlq().unwrap(), 127);
    }

    #[test]
    fn test_varint_u64_max_roundtrip() {
        // u64::MAX is ten groups: nine 0xff then 0x01
        let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
        let mut prot = ThriftSliceReader::new(&bytes);
        assert_eq!(prot.read_vlq().unwrap(), u64::MAX);
    }

    #[test]
    fn test_varint_too_long() {
        let bytes = [0x80u8; 11];
        let mut prot = ThriftSliceReader::new(&bytes);
        assert!(matches!(prot.read_vlq(), Err(ParquetError::Thrift(_))));
    }

    #[test]
    fn test_zig_zag() {
        // 0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, 2 -> 4
        let mut prot = ThriftSliceReader::new(&[0x00, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(prot.read_zig_zag().unwrap(), 0);
        assert_eq!(prot.read_zig_zag().unwrap(), -1);
        assert_eq!(prot.read_zig_zag().unwrap(), 1);
        assert_eq!(prot.read_zig_zag().unwrap(), -2);
        assert_eq!(prot.read_zig_zag().unwrap(), 2);
    }

    #[test]
    fn test_zig_zag_extremes() {
        fn encode(n: i64) -> Vec<u8> {
            let mut v = ((n << 1) ^ (n >> 63)) as u64;
            let mut out = vec![];
            while v > 0x7f {
                out.push(v as u8 | 0x80);
                v >>= 7;
            }
            out.push(v as u8);
            out
        }
        for n in [i64::MIN, i64::MAX, -1, 0, 1, 300, -300] {
            let bytes = encode(n);
            let mut prot = ThriftSliceReader::new(&bytes);
            assert_eq!(prot.read_zig_zag().unwrap(), n, "value {n}");
        }
    }

    #[test]
    fn test_field_header_delta_and_absolute() {
        // delta 1, type I32 (5); then delta 0 with absolute id 100 (zigzag 200 = 0xc8 0x01)
        let mut prot = ThriftSliceReader::new(&[0x15, 0x05, 0xc8, 0x01]);
        let f = prot.read_field_begin(0).unwrap();
        assert_eq!(f.id, 1);
        assert_eq!(f.field_type, FieldType::I32);
        let f = prot.read_field_begin(f.id).unwrap();
        assert_eq!(f.id, 100);
    }

    #[test]
    fn test_boolean_field_value_in_type() {
        let mut prot = ThriftSliceReader::new(&[0x11, 0x12, 0x00]);
        let f = prot.read_field_begin(0).unwrap();
        assert_eq!(f.bool_val, Some(true));
        let f = prot.read_field_begin(f.id).unwrap();
        assert_eq!(f.id, 2);
        assert_eq!(f.bool_val, Some(false));
        let f = prot.read_field_begin(f.id).unwrap();
        assert_eq!(f.field_type, FieldType::Stop);
    }

    #[test]
    fn test_list_header_short_and_long() {
        // 3 elements of type I32
        let mut prot = ThriftSliceReader::new(&[0x35]);
        let l = prot.read_list_begin().unwrap();
        assert_eq!(l.size, 3);
        assert_eq!(l.element_type, FieldType::I32);

        // 20 elements of type Binary: sentinel nibble 15 then varint 20
        let mut prot = ThriftSliceReader::new(&[0xf8, 0x14]);
        let l = prot.read_list_begin().unwrap();
        assert_eq!(l.size, 20);
        assert_eq!(l.element_type, FieldType::Binary);
    }

    #[test]
    fn test_empty_list_element_type_zero() {
        let mut prot = ThriftSliceReader::new(&[0x00]);
        let l = prot.read_list_begin().unwrap();
        assert_eq!(l.size, 0);
    }

    #[test]
    fn test_skip_struct() {
        // struct { 1: i32 = 300; 2: binary "ab" } then a trailing byte
        let data = [0x15, 0xd8, 0x04, 0x18, 0x02, b'a', b'b', 0x00, 0xee];
        let mut prot = ThriftSliceReader::new(&data);
        prot.skip(FieldType::Struct).unwrap();
        assert_eq!(prot.as_slice(), &[0xee]);
    }

    #[test]
    fn test_double_le() {
        let bytes = (-2.5f64).to_le_bytes();
        let mut prot = ThriftSliceReader::new(&bytes);
        assert_eq!(prot.read_double().unwrap(), -2.5);
    }

    #[test]
    fn test_uuid_renders_lowercase_hex() {
        let bytes: [u8; 16] = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ];
        let mut prot = ThriftSliceReader::new(&bytes);
        assert_eq!(
            prot.read_uuid().unwrap(),
            "00112233445566778899aabbccddeeff"
        );
    }

    #[test]
    fn test_unknown_wire_type() {
        let mut prot = ThriftSliceReader::new(&[0x1e]);
        assert!(matches!(
            prot.read_field_begin(0),
            Err(ParquetError::Thrift(_))
        ));
    }

    #[test]
    fn test_truncated_input() {
        let mut prot = ThriftSliceReader::new(&[0x18, 0x05, b'a']);
        let f = prot.read_field_begin(0).unwrap();
        assert_eq!(f.field_type, FieldType::Binary);
        assert!(matches!(prot.read_bytes(), Err(ParquetError::EOF(_))));
    }
}

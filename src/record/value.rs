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

//! The dynamic value model rows are materialized into.

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::errors::{ParquetError, Result};

/// Number of days between the Julian epoch and 1970-01-01.
const JULIAN_DAY_OF_UNIX_EPOCH: i64 = 2_440_588;

/// A decoded value of a single cell.
///
/// Physical values carry the variant matching their Parquet physical type;
/// logical conversion may rewrite them (e.g. `Bytes` into `Str`, `Int` into
/// `Date`). Repeated fields materialize as `List`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A missing value.
    Null,
    /// BOOLEAN.
    Bool(bool),
    /// INT32 narrowed by the INT_8 converted type.
    Byte(i8),
    /// INT32 narrowed by the INT_16 converted type.
    Short(i16),
    /// INT32.
    Int(i32),
    /// INT64.
    Long(i64),
    /// INT32 reinterpreted by the UINT_8 converted type.
    UByte(u8),
    /// INT32 reinterpreted by the UINT_16 converted type.
    UShort(u16),
    /// INT32 reinterpreted by the UINT_32 converted type.
    UInt(u32),
    /// INT64 reinterpreted by the UINT_64 converted type.
    ULong(u64),
    /// INT96, a legacy timestamp representation.
    Int96(Int96),
    /// FLOAT.
    Float(f32),
    /// DOUBLE.
    Double(f64),
    /// DECIMAL: unscaled two's complement value and its scale. The logical
    /// value is `unscaled * 10^(-scale)`.
    Decimal(i128, i32),
    /// UTF8, ENUM, or JSON (without the `json` feature) text.
    Str(String),
    /// BYTE_ARRAY or FIXED_LEN_BYTE_ARRAY, zero-copy into the page buffer
    /// where possible.
    Bytes(Bytes),
    /// DATE: an instant at midnight UTC.
    Date(DateTime<Utc>),
    /// TIME_*, TIMESTAMP_*, or INT96: an instant.
    Timestamp(DateTime<Utc>),
    /// JSON parsed into a structured value.
    #[cfg(feature = "json")]
    Json(serde_json::Value),
    /// A repeated field's values, possibly nested.
    List(Vec<Value>),
}

impl Value {
    /// Whether this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The name of this value's variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Byte(_) => "Byte",
            Value::Short(_) => "Short",
            Value::Int(_) => "Int",
            Value::Long(_) => "Long",
            Value::UByte(_) => "UByte",
            Value::UShort(_) => "UShort",
            Value::UInt(_) => "UInt",
            Value::ULong(_) => "ULong",
            Value::Int96(_) => "Int96",
            Value::Float(_) => "Float",
            Value::Double(_) => "Double",
            Value::Decimal(..) => "Decimal",
            Value::Str(_) => "Str",
            Value::Bytes(_) => "Bytes",
            Value::Date(_) => "Date",
            Value::Timestamp(_) => "Timestamp",
            #[cfg(feature = "json")]
            Value::Json(_) => "Json",
            Value::List(_) => "List",
        }
    }

    /// The boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value widened to `i64`, if this is any signed or unsigned integer
    /// that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(*v as i64),
            Value::Short(v) => Some(*v as i64),
            Value::Int(v) => Some(*v as i64),
            Value::Long(v) => Some(*v),
            Value::UByte(v) => Some(*v as i64),
            Value::UShort(v) => Some(*v as i64),
            Value::UInt(v) => Some(*v as i64),
            Value::ULong(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// The value widened to `f64`, if this is a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// The text payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The binary payload, if this is `Bytes`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b.as_ref()),
            _ => None,
        }
    }

    /// The elements, if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

/// An INT96 value: 96 bits assembled from a 64-bit low word and a 32-bit
/// high word, both little-endian.
///
/// Legacy writers use INT96 for timestamps, storing the Julian day in the
/// high word and nanoseconds within the day in the low word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Int96 {
    low: u64,
    high: u32,
}

impl Int96 {
    /// Build from the 12-byte on-disk representation.
    pub fn from_le_bytes(bytes: [u8; 12]) -> Self {
        Self {
            low: u64::from_le_bytes(bytes[..8].try_into().unwrap()),
            high: u32::from_le_bytes(bytes[8..].try_into().unwrap()),
        }
    }

    /// The low 64 bits of the unsigned magnitude.
    pub fn low(&self) -> u64 {
        self.low
    }

    /// The high 32 bits of the unsigned magnitude.
    pub fn high(&self) -> u32 {
        self.high
    }

    /// The full magnitude as `(high << 64) | low`.
    pub fn as_u128(&self) -> u128 {
        ((self.high as u128) << 64) | self.low as u128
    }

    /// Interpret as a timestamp: Julian day in the high word, nanoseconds of
    /// day in the low word.
    pub fn to_instant(self) -> Result<DateTime<Utc>> {
        let days = self.high as i64 - JULIAN_DAY_OF_UNIX_EPOCH;
        let secs_of_day = (self.low / 1_000_000_000) as i64;
        let subsec_nanos = (self.low % 1_000_000_000) as u32;
        let secs = days
            .checked_mul(86_400)
            .and_then(|s| s.checked_add(secs_of_day))
            .ok_or_else(|| general_err!("INT96 timestamp out of range"))?;
        DateTime::from_timestamp(secs, subsec_nanos)
            .ok_or_else(|| general_err!("INT96 timestamp out of range"))
    }
}

/// A materialized row: named column values in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    pub(crate) fn new(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The value of the column named `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Column name/value pairs in schema order.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Consume the row, yielding its name/value pairs.
    pub fn into_fields(self) -> Vec<(String, Value)> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int96_layout() {
        let mut bytes = [0u8; 12];
        bytes[..8].copy_from_slice(&0x0102030405060708u64.to_le_bytes());
        bytes[8..].copy_from_slice(&0x0a0b0c0du32.to_le_bytes());
        let v = Int96::from_le_bytes(bytes);
        assert_eq!(v.low(), 0x0102030405060708);
        assert_eq!(v.high(), 0x0a0b0c0d);
        assert_eq!(v.as_u128(), (0x0a0b0c0du128 << 64) | 0x0102030405060708);
    }

    #[test]
    fn test_int96_epoch_instant() {
        // Julian day of 1970-01-01 at exactly midnight
        let mut bytes = [0u8; 12];
        bytes[8..].copy_from_slice(&2_440_588u32.to_le_bytes());
        let instant = Int96::from_le_bytes(bytes).to_instant().unwrap();
        assert_eq!(instant.timestamp(), 0);
    }

    #[test]
    fn test_int96_with_nanos_of_day() {
        let mut bytes = [0u8; 12];
        // 01:00:00.000000001 on the day after the Unix epoch
        let nanos: u64 = 3_600 * 1_000_000_000 + 1;
        bytes[..8].copy_from_slice(&nanos.to_le_bytes());
        bytes[8..].copy_from_slice(&(2_440_588u32 + 1).to_le_bytes());
        let instant = Int96::from_le_bytes(bytes).to_instant().unwrap();
        assert_eq!(instant.timestamp(), 86_400 + 3_600);
        assert_eq!(instant.timestamp_subsec_nanos(), 1);
    }

    #[test]
    fn test_row_lookup() {
        let row = Row::new(vec![
            ("id".to_owned(), Value::Long(7)),
            ("name".to_owned(), Value::Str("seven".to_owned())),
        ]);
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("id").unwrap().as_i64(), Some(7));
        assert_eq!(row.get("name").unwrap().as_str(), Some("seven"));
        assert!(row.get("missing").is_none());
    }
}

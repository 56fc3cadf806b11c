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

//! Logical value conversion: applying the column's converted type to freshly
//! decoded physical values, before rows are assembled and emitted.

use chrono::{DateTime, Utc};

use crate::basic::{ConvertedType, Type};
use crate::errors::{ParquetError, Result};
use crate::record::value::Value;
use crate::schema::types::ColumnDescriptor;

/// Convert a column's physical values to their logical representation.
///
/// INT96 values default to the legacy timestamp interpretation when no
/// converted type is present. BSON and INTERVAL have no supported
/// representation and fail.
pub(crate) fn convert_column(values: Vec<Value>, descr: &ColumnDescriptor) -> Result<Vec<Value>> {
    let converted_type = descr.converted_type();
    match converted_type {
        ConvertedType::NONE if descr.physical_type() != Type::INT96 => return Ok(values),
        ConvertedType::BSON | ConvertedType::INTERVAL => {
            return Err(ParquetError::UnsupportedConvertedType(converted_type));
        }
        _ => {}
    }
    let scale = descr.primitive.scale.unwrap_or(0);
    values
        .into_iter()
        .map(|value| convert_value(value, converted_type, scale))
        .collect()
}

fn convert_value(value: Value, converted_type: ConvertedType, scale: i32) -> Result<Value> {
    use ConvertedType::*;
    Ok(match (converted_type, value) {
        (NONE, Value::Int96(v)) => Value::Timestamp(v.to_instant()?),
        (NONE, v) => v,

        (UTF8 | ENUM, Value::Bytes(b)) => Value::Str(String::from_utf8(b.to_vec())?),
        #[cfg(feature = "json")]
        (JSON, Value::Bytes(b)) => Value::Json(
            serde_json::from_slice(&b).map_err(|e| ParquetError::External(Box::new(e)))?,
        ),
        #[cfg(not(feature = "json"))]
        (JSON, Value::Bytes(b)) => Value::Str(String::from_utf8(b.to_vec())?),

        (DATE, Value::Int(days)) => Value::Date(instant_at_midnight(days)?),
        (TIME_MILLIS, Value::Int(millis)) => Value::Timestamp(instant_from_millis(millis as i64)?),
        (TIMESTAMP_MILLIS, Value::Long(millis)) => Value::Timestamp(instant_from_millis(millis)?),
        (TIME_MICROS | TIMESTAMP_MICROS, Value::Long(micros)) => {
            Value::Timestamp(instant_from_micros(micros)?)
        }

        (DECIMAL, Value::Int(v)) => Value::Decimal(v as i128, scale),
        (DECIMAL, Value::Long(v)) => Value::Decimal(v as i128, scale),
        (DECIMAL, Value::Bytes(b)) => Value::Decimal(decimal_from_be_bytes(&b)?, scale),

        (UINT_8, Value::Int(v)) => Value::UByte(v as u8),
        (UINT_16, Value::Int(v)) => Value::UShort(v as u16),
        (UINT_32, Value::Int(v)) => Value::UInt(v as u32),
        (UINT_64, Value::Long(v)) => Value::ULong(v as u64),
        (INT_8, Value::Int(v)) => Value::Byte(v as i8),
        (INT_16, Value::Int(v)) => Value::Short(v as i16),
        (INT_32, v @ Value::Int(_)) => v,
        (INT_64, v @ Value::Long(_)) => v,

        // structural annotations on group nodes; leaf values pass through
        (MAP | MAP_KEY_VALUE | LIST, v) => v,

        (converted_type, v) => {
            return Err(general_err!(
                "Converted type {} does not apply to a {} value",
                converted_type,
                v.type_name()
            ));
        }
    })
}

/// DATE: days since 1970-01-01, as an instant at midnight UTC.
fn instant_at_midnight(days: i32) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(days as i64 * 86_400, 0)
        .ok_or_else(|| general_err!("Date {} days from epoch out of range", days))
}

fn instant_from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| general_err!("Timestamp {}ms out of range", millis))
}

fn instant_from_micros(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| general_err!("Timestamp {}us out of range", micros))
}

/// Big-endian two's complement unscaled decimal, at most 16 bytes.
fn decimal_from_be_bytes(bytes: &[u8]) -> Result<i128> {
    if bytes.len() > 16 {
        return Err(nyi_err!(
            "Decimal of {} bytes exceeds 128 bits",
            bytes.len()
        ));
    }
    if bytes.is_empty() {
        return Ok(0);
    }
    let fill = if bytes[0] & 0x80 != 0 { 0xff } else { 0x00 };
    let mut buf = [fill; 16];
    buf[16 - bytes.len()..].copy_from_slice(bytes);
    Ok(i128::from_be_bytes(buf))
}

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

//! Walks the pages of a column chunk, yielding level/value triples.
//!
//! The reader decodes sequentially from the chunk's first page. A leading
//! dictionary page is decoded once and held for the rest of the chunk;
//! dictionary-encoded data pages resolve their indices against it as they are
//! read. Row-range pruning byte-skips whole pages for non-repeated columns
//! and stops once the requested range is covered.

use std::sync::Arc;

use bytes::Bytes;

use crate::basic::{Compression, Encoding, PageType, Type};
use crate::column::page::{Page, decode_page, read_page_header};
use crate::compression::CodecRegistry;
use crate::encodings::byte_stream_split::decode_byte_stream_split;
use crate::encodings::delta::DeltaBinaryPackedDecoder;
use crate::encodings::plain::decode_plain;
use crate::encodings::rle::RleDecoder;
use crate::errors::{ParquetError, Result};
use crate::record::value::Value;
use crate::schema::types::ColumnDescriptor;
use crate::util::bit_util::num_required_bits;
use crate::util::cursor::ByteCursor;

/// The flat triples decoded from a column chunk: parallel repetition and
/// definition levels plus the non-null physical values.
///
/// `|values| = |def_levels at max| <= num_values`; for non-repeated columns
/// `rep_levels` is empty, for required paths `def_levels` is empty.
#[derive(Debug, Default)]
pub(crate) struct ColumnChunkData {
    pub(crate) rep_levels: Vec<u16>,
    pub(crate) def_levels: Vec<u16>,
    pub(crate) values: Vec<Value>,
    /// Number of values (including nulls) decoded.
    pub(crate) num_values: usize,
    /// Row index within the chunk of the first decoded record. Non-zero when
    /// leading pages of a non-repeated column were byte-skipped.
    pub(crate) first_row_index: u64,
}

/// Decodes the pages of one column chunk.
pub(crate) struct ColumnChunkReader<'a> {
    descr: Arc<ColumnDescriptor>,
    /// The chunk's bytes: optional dictionary page followed by data pages.
    chunk: Bytes,
    codec: Compression,
    codecs: &'a CodecRegistry,
    /// Total values (including nulls) the chunk metadata declares.
    total_values: u64,
}

impl<'a> ColumnChunkReader<'a> {
    pub(crate) fn new(
        descr: Arc<ColumnDescriptor>,
        chunk: Bytes,
        codec: Compression,
        codecs: &'a CodecRegistry,
        total_values: u64,
    ) -> Self {
        Self {
            descr,
            chunk,
            codec,
            codecs,
            total_values,
        }
    }

    /// Decode the pages covering records `[row_start, row_end)` of this
    /// chunk.
    ///
    /// For repeated columns decoding can only start at a page boundary, so
    /// the result may begin before `row_start`; `first_row_index` tells the
    /// caller where it actually starts. Pages past `row_end` are not read.
    pub(crate) fn read(&self, row_start: u64, row_end: u64) -> Result<ColumnChunkData> {
        let max_rep = self.descr.max_rep_level;
        let mut dictionary: Option<Vec<Value>> = None;
        let mut out = ColumnChunkData::default();
        let mut offset = 0usize;
        let mut rows_seen = 0u64;
        let mut values_seen = 0u64;
        let mut first_decoded_row: Option<u64> = None;

        while offset < self.chunk.len() && values_seen < self.total_values {
            // stop once the requested range is covered; a repeated column's
            // last in-range record may continue into the next page, so its
            // bound is one record looser
            let done = if max_rep == 0 {
                rows_seen >= row_end
            } else {
                rows_seen > row_end
            };
            if done {
                break;
            }

            let (header, header_len) = read_page_header(&self.chunk[offset..])?;
            offset += header_len;
            let body_len = header.compressed_page_size as usize;
            if offset + body_len > self.chunk.len() {
                return Err(eof_err!(
                    "Page body of {} bytes overruns the {} byte chunk",
                    body_len,
                    self.chunk.len()
                ));
            }
            let body = self.chunk.slice(offset..offset + body_len);
            offset += body_len;

            // byte-skip data pages wholly before the range; only sound for
            // non-repeated columns, where pages carry no repetition state
            let page_values = header.data_page_num_values() as u64;
            let is_data_page = matches!(
                header.page_type,
                PageType::DATA_PAGE | PageType::DATA_PAGE_V2
            );
            if is_data_page && max_rep == 0 && rows_seen + page_values <= row_start {
                rows_seen += page_values;
                values_seen += page_values;
                continue;
            }

            let Some(page) = decode_page(header, body, self.codec, self.codecs)? else {
                continue;
            };

            match page {
                Page::Dictionary {
                    buf,
                    num_values,
                    encoding,
                } => {
                    if dictionary.is_some() {
                        return Err(general_err!("Column chunk has more than one dictionary page"));
                    }
                    dictionary = Some(self.decode_dictionary(buf, num_values as usize, encoding)?);
                }
                Page::DataV1 { .. } | Page::DataV2 { .. } => {
                    if first_decoded_row.is_none() {
                        first_decoded_row = Some(rows_seen);
                    }
                    let page_rows =
                        self.decode_data_page(page, dictionary.as_ref(), &mut out)?;
                    rows_seen += page_rows;
                    values_seen += page_values;
                }
            }
        }

        out.first_row_index = first_decoded_row.unwrap_or(rows_seen);
        Ok(out)
    }

    /// Dictionary page values are PLAIN encoded regardless of the declared
    /// dictionary encoding.
    fn decode_dictionary(
        &self,
        buf: Bytes,
        num_values: usize,
        encoding: Encoding,
    ) -> Result<Vec<Value>> {
        match encoding {
            Encoding::PLAIN | Encoding::PLAIN_DICTIONARY => {}
            other => return Err(ParquetError::UnsupportedEncoding(other)),
        }
        let mut cursor = ByteCursor::new(buf);
        decode_plain(
            &mut cursor,
            self.descr.physical_type(),
            num_values,
            self.descr.type_length(),
        )
    }

    /// Decode one data page into `out`, returning the number of records it
    /// covers.
    fn decode_data_page(
        &self,
        page: Page,
        dictionary: Option<&Vec<Value>>,
        out: &mut ColumnChunkData,
    ) -> Result<u64> {
        let max_rep = self.descr.max_rep_level;
        let max_def = self.descr.max_def_level;

        let (rep, def, values, num_values) = match page {
            Page::DataV1 {
                buf,
                num_values,
                encoding,
                def_level_encoding,
                rep_level_encoding,
            } => {
                let num_values = num_values as usize;
                let mut cursor = ByteCursor::new(buf);

                let rep = if max_rep > 0 {
                    check_level_encoding(rep_level_encoding)?;
                    let section = read_level_section(&mut cursor)?;
                    let (levels, produced) = decode_levels(section, num_values, max_rep)?;
                    if produced < num_values {
                        return Err(eof_err!(
                            "Expected {} repetition levels, decoded {}",
                            num_values,
                            produced
                        ));
                    }
                    levels
                } else {
                    vec![]
                };

                let def = if max_def > 0 {
                    check_level_encoding(def_level_encoding)?;
                    let section = read_level_section(&mut cursor)?;
                    let (levels, produced) = decode_levels(section, num_values, max_def)?;
                    if produced < num_values {
                        return Err(eof_err!(
                            "Expected {} definition levels, decoded {}",
                            num_values,
                            produced
                        ));
                    }
                    levels
                } else {
                    vec![]
                };

                let num_nulls = def.iter().filter(|&&d| d < max_def).count();
                let values =
                    self.decode_values(&mut cursor, encoding, num_values - num_nulls, dictionary)?;
                (rep, def, values, num_values)
            }
            Page::DataV2 {
                buf,
                num_values,
                num_nulls,
                encoding,
                def_levels_byte_len,
                rep_levels_byte_len,
                ..
            } => {
                let num_values = num_values as usize;
                let rep_len = rep_levels_byte_len as usize;
                let def_len = def_levels_byte_len as usize;
                if rep_len + def_len > buf.len() {
                    return Err(eof_err!(
                        "Level sections of {} bytes overrun the {} byte page",
                        rep_len + def_len,
                        buf.len()
                    ));
                }

                let rep = if max_rep > 0 {
                    let (levels, produced) =
                        decode_levels(buf.slice(..rep_len), num_values, max_rep)?;
                    if produced < num_values {
                        return Err(ParquetError::LevelsByteLengthMismatch {
                            expected: num_values,
                            actual: produced,
                        });
                    }
                    levels
                } else {
                    vec![]
                };

                let def = if max_def > 0 {
                    let (levels, produced) =
                        decode_levels(buf.slice(rep_len..rep_len + def_len), num_values, max_def)?;
                    if produced < num_values {
                        return Err(ParquetError::LevelsByteLengthMismatch {
                            expected: num_values,
                            actual: produced,
                        });
                    }
                    levels
                } else {
                    vec![]
                };

                let non_null = num_values - num_nulls as usize;
                let mut cursor = ByteCursor::new(buf.slice(rep_len + def_len..));
                let values = self.decode_values(&mut cursor, encoding, non_null, dictionary)?;
                (rep, def, values, num_values)
            }
            Page::Dictionary { .. } => {
                return Err(internal_err!("Dictionary page in data page path"));
            }
        };

        let page_rows = if max_rep == 0 {
            num_values as u64
        } else {
            rep.iter().filter(|&&r| r == 0).count() as u64
        };

        out.rep_levels.extend_from_slice(&rep);
        out.def_levels.extend_from_slice(&def);
        out.values.extend(values);
        out.num_values += num_values;
        Ok(page_rows)
    }

    fn decode_values(
        &self,
        cursor: &mut ByteCursor,
        encoding: Encoding,
        num_values: usize,
        dictionary: Option<&Vec<Value>>,
    ) -> Result<Vec<Value>> {
        let physical = self.descr.physical_type();
        match encoding {
            Encoding::PLAIN => {
                decode_plain(cursor, physical, num_values, self.descr.type_length())
            }
            Encoding::PLAIN_DICTIONARY | Encoding::RLE_DICTIONARY => {
                let dictionary = dictionary.ok_or_else(|| {
                    general_err!("Data page references a dictionary but the chunk has none")
                })?;
                let bit_width = cursor.read_u8()?;
                if bit_width > 32 {
                    return Err(general_err!(
                        "Dictionary index bit width {} out of range",
                        bit_width
                    ));
                }
                let mut decoder = RleDecoder::new(bit_width);
                decoder.set_data(cursor.remaining_bytes());
                let mut indices = vec![0u32; num_values];
                let produced = decoder.get_batch(&mut indices)?;
                if produced < num_values {
                    return Err(eof_err!(
                        "Expected {} dictionary indices, decoded {}",
                        num_values,
                        produced
                    ));
                }
                indices
                    .into_iter()
                    .map(|i| {
                        dictionary.get(i as usize).cloned().ok_or_else(|| {
                            general_err!(
                                "Dictionary index {} out of bounds ({} entries)",
                                i,
                                dictionary.len()
                            )
                        })
                    })
                    .collect()
            }
            Encoding::RLE => {
                if physical != Type::BOOLEAN {
                    return Err(ParquetError::UnsupportedEncoding(Encoding::RLE));
                }
                let section = read_level_section(cursor)?;
                let mut decoder = RleDecoder::new(1);
                decoder.set_data(section);
                let mut bits = vec![0u32; num_values];
                let produced = decoder.get_batch(&mut bits)?;
                if produced < num_values {
                    return Err(eof_err!(
                        "Expected {} RLE booleans, decoded {}",
                        num_values,
                        produced
                    ));
                }
                Ok(bits.into_iter().map(|b| Value::Bool(b != 0)).collect())
            }
            Encoding::DELTA_BINARY_PACKED => {
                let mut decoder = DeltaBinaryPackedDecoder::try_new(cursor.remaining_bytes())?;
                let decoded = decoder.decode(num_values)?;
                if decoded.len() < num_values {
                    return Err(eof_err!(
                        "Delta stream declares {} values, page needs {}",
                        decoder.total_count(),
                        num_values
                    ));
                }
                match physical {
                    Type::INT32 => Ok(decoded.into_iter().map(|v| Value::Int(v as i32)).collect()),
                    Type::INT64 => Ok(decoded.into_iter().map(Value::Long).collect()),
                    _ => Err(ParquetError::UnsupportedEncoding(
                        Encoding::DELTA_BINARY_PACKED,
                    )),
                }
            }
            Encoding::BYTE_STREAM_SPLIT => {
                decode_byte_stream_split(&cursor.remaining_bytes(), physical, num_values)
            }
            other => Err(ParquetError::UnsupportedEncoding(other)),
        }
    }
}

/// The level encodings this reader decodes. The deprecated BIT_PACKED level
/// encoding is rejected.
fn check_level_encoding(encoding: Encoding) -> Result<()> {
    match encoding {
        Encoding::RLE => Ok(()),
        other => Err(ParquetError::UnsupportedEncoding(other)),
    }
}

/// Read a length-prefixed v1 level section (or RLE boolean value section).
fn read_level_section(cursor: &mut ByteCursor) -> Result<Bytes> {
    let len = cursor.read_i32()?;
    if len < 0 {
        return Err(general_err!("Negative level section length {}", len));
    }
    cursor.read_slice(len as usize)
}

/// Decode up to `count` levels from an RLE/bit-packed hybrid section, with
/// the bit width implied by `max_level`.
fn decode_levels(data: Bytes, count: usize, max_level: u16) -> Result<(Vec<u16>, usize)> {
    let bit_width = num_required_bits(max_level as u64);
    let mut decoder = RleDecoder::new(bit_width);
    decoder.set_data(data);
    let mut buffer = vec![0u32; count];
    let produced = decoder.get_batch(&mut buffer)?;
    buffer.truncate(produced);
    let levels = buffer
        .into_iter()
        .map(|l| {
            let level = l as u16;
            if level > max_level {
                Err(general_err!(
                    "Level {} exceeds maximum {}",
                    level,
                    max_level
                ))
            } else {
                Ok(level)
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((levels, produced))
}

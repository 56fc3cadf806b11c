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

//! Page headers and decompressed pages.

use bytes::Bytes;

use crate::basic::{Compression, Encoding, PageType};
use crate::compression::CodecRegistry;
use crate::errors::{ParquetError, Result};
use crate::thrift::{FieldType, ThriftSliceReader};

/// Header of a DATA_PAGE.
#[derive(Debug, Clone)]
pub(crate) struct DataPageHeader {
    pub(crate) num_values: i32,
    pub(crate) encoding: Encoding,
    pub(crate) definition_level_encoding: Encoding,
    pub(crate) repetition_level_encoding: Encoding,
}

impl DataPageHeader {
    // page statistics are not materialized; unknown fields are skipped
    fn read_thrift(prot: &mut ThriftSliceReader<'_>) -> Result<Self> {
        let mut num_values: Option<i32> = None;
        let mut encoding: Option<Encoding> = None;
        let mut definition_level_encoding: Option<Encoding> = None;
        let mut repetition_level_encoding: Option<Encoding> = None;
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => num_values = Some(prot.read_i32()?),
                2 => encoding = Some(Encoding::read_thrift(prot)?),
                3 => definition_level_encoding = Some(Encoding::read_thrift(prot)?),
                4 => repetition_level_encoding = Some(Encoding::read_thrift(prot)?),
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        let Some(num_values) = num_values else {
            return Err(general_err!("Required field num_values is missing"));
        };
        let Some(encoding) = encoding else {
            return Err(general_err!("Required field encoding is missing"));
        };
        let Some(definition_level_encoding) = definition_level_encoding else {
            return Err(general_err!(
                "Required field definition_level_encoding is missing"
            ));
        };
        let Some(repetition_level_encoding) = repetition_level_encoding else {
            return Err(general_err!(
                "Required field repetition_level_encoding is missing"
            ));
        };
        Ok(Self {
            num_values,
            encoding,
            definition_level_encoding,
            repetition_level_encoding,
        })
    }
}

/// Header of a DATA_PAGE_V2.
#[derive(Debug, Clone)]
pub(crate) struct DataPageHeaderV2 {
    pub(crate) num_values: i32,
    pub(crate) num_nulls: i32,
    pub(crate) num_rows: i32,
    pub(crate) encoding: Encoding,
    pub(crate) definition_levels_byte_length: i32,
    pub(crate) repetition_levels_byte_length: i32,
    /// Whether the values section is compressed. Absent means compressed.
    pub(crate) is_compressed: bool,
}

impl DataPageHeaderV2 {
    fn read_thrift(prot: &mut ThriftSliceReader<'_>) -> Result<Self> {
        let mut num_values: Option<i32> = None;
        let mut num_nulls: Option<i32> = None;
        let mut num_rows: Option<i32> = None;
        let mut encoding: Option<Encoding> = None;
        let mut definition_levels_byte_length: Option<i32> = None;
        let mut repetition_levels_byte_length: Option<i32> = None;
        let mut is_compressed = true;
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => num_values = Some(prot.read_i32()?),
                2 => num_nulls = Some(prot.read_i32()?),
                3 => num_rows = Some(prot.read_i32()?),
                4 => encoding = Some(Encoding::read_thrift(prot)?),
                5 => definition_levels_byte_length = Some(prot.read_i32()?),
                6 => repetition_levels_byte_length = Some(prot.read_i32()?),
                7 => {
                    is_compressed = field_ident
                        .bool_val
                        .ok_or_else(|| thrift_err!("is_compressed is not a boolean"))?;
                }
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        let Some(num_values) = num_values else {
            return Err(general_err!("Required field num_values is missing"));
        };
        let Some(num_nulls) = num_nulls else {
            return Err(general_err!("Required field num_nulls is missing"));
        };
        let Some(num_rows) = num_rows else {
            return Err(general_err!("Required field num_rows is missing"));
        };
        let Some(encoding) = encoding else {
            return Err(general_err!("Required field encoding is missing"));
        };
        let Some(definition_levels_byte_length) = definition_levels_byte_length else {
            return Err(general_err!(
                "Required field definition_levels_byte_length is missing"
            ));
        };
        let Some(repetition_levels_byte_length) = repetition_levels_byte_length else {
            return Err(general_err!(
                "Required field repetition_levels_byte_length is missing"
            ));
        };
        Ok(Self {
            num_values,
            num_nulls,
            num_rows,
            encoding,
            definition_levels_byte_length,
            repetition_levels_byte_length,
            is_compressed,
        })
    }
}

/// Header of a DICTIONARY_PAGE.
#[derive(Debug, Clone)]
pub(crate) struct DictionaryPageHeader {
    pub(crate) num_values: i32,
    pub(crate) encoding: Encoding,
}

impl DictionaryPageHeader {
    fn read_thrift(prot: &mut ThriftSliceReader<'_>) -> Result<Self> {
        let mut num_values: Option<i32> = None;
        let mut encoding: Option<Encoding> = None;
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => num_values = Some(prot.read_i32()?),
                2 => encoding = Some(Encoding::read_thrift(prot)?),
                // 3: is_sorted does not affect decoding
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        let Some(num_values) = num_values else {
            return Err(general_err!("Required field num_values is missing"));
        };
        let Some(encoding) = encoding else {
            return Err(general_err!("Required field encoding is missing"));
        };
        Ok(Self {
            num_values,
            encoding,
        })
    }
}

/// The common page header, carrying exactly one type-specific header.
#[derive(Debug, Clone)]
pub(crate) struct PageHeader {
    pub(crate) page_type: PageType,
    pub(crate) uncompressed_page_size: i32,
    pub(crate) compressed_page_size: i32,
    /// CRC of the page body. Parsed but not verified.
    #[allow(dead_code)]
    pub(crate) crc: Option<i32>,
    pub(crate) data_page_header: Option<DataPageHeader>,
    pub(crate) dictionary_page_header: Option<DictionaryPageHeader>,
    pub(crate) data_page_header_v2: Option<DataPageHeaderV2>,
}

impl PageHeader {
    /// Number of values (including nulls) a data page covers; zero for other
    /// page types.
    pub(crate) fn data_page_num_values(&self) -> i64 {
        if let Some(header) = &self.data_page_header {
            header.num_values as i64
        } else if let Some(header) = &self.data_page_header_v2 {
            header.num_values as i64
        } else {
            0
        }
    }
}

/// Decode a [`PageHeader`] from the front of `buf`, returning the header and
/// its encoded length.
pub(crate) fn read_page_header(buf: &[u8]) -> Result<(PageHeader, usize)> {
    let mut prot = ThriftSliceReader::new(buf);

    let mut page_type: Option<PageType> = None;
    let mut uncompressed_page_size: Option<i32> = None;
    let mut compressed_page_size: Option<i32> = None;
    let mut crc: Option<i32> = None;
    let mut data_page_header: Option<DataPageHeader> = None;
    let mut dictionary_page_header: Option<DictionaryPageHeader> = None;
    let mut data_page_header_v2: Option<DataPageHeaderV2> = None;

    let mut last_field_id = 0i16;
    loop {
        let field_ident = prot.read_field_begin(last_field_id)?;
        if field_ident.field_type == FieldType::Stop {
            break;
        }
        match field_ident.id {
            1 => page_type = Some(PageType::read_thrift(&mut prot)?),
            2 => uncompressed_page_size = Some(prot.read_i32()?),
            3 => compressed_page_size = Some(prot.read_i32()?),
            4 => crc = Some(prot.read_i32()?),
            5 => data_page_header = Some(DataPageHeader::read_thrift(&mut prot)?),
            // 6: index_page_header is an empty struct
            7 => dictionary_page_header = Some(DictionaryPageHeader::read_thrift(&mut prot)?),
            8 => data_page_header_v2 = Some(DataPageHeaderV2::read_thrift(&mut prot)?),
            _ => prot.skip(field_ident.field_type)?,
        }
        last_field_id = field_ident.id;
    }

    let Some(page_type) = page_type else {
        return Err(general_err!("Required field type is missing"));
    };
    let Some(uncompressed_page_size) = uncompressed_page_size else {
        return Err(general_err!(
            "Required field uncompressed_page_size is missing"
        ));
    };
    let Some(compressed_page_size) = compressed_page_size else {
        return Err(general_err!(
            "Required field compressed_page_size is missing"
        ));
    };
    if uncompressed_page_size < 0 || compressed_page_size < 0 {
        return Err(general_err!("Negative page size"));
    }

    let header_len = buf.len() - prot.as_slice().len();
    Ok((
        PageHeader {
            page_type,
            uncompressed_page_size,
            compressed_page_size,
            crc,
            data_page_header,
            dictionary_page_header,
            data_page_header_v2,
        },
        header_len,
    ))
}

/// A page with its body decompressed.
#[derive(Debug, Clone)]
pub(crate) enum Page {
    /// A dictionary page; its values index the data pages that follow.
    Dictionary {
        buf: Bytes,
        num_values: u32,
        encoding: Encoding,
    },
    /// A v1 data page: level sections and values share one (possibly
    /// compressed) body.
    DataV1 {
        buf: Bytes,
        num_values: u32,
        encoding: Encoding,
        def_level_encoding: Encoding,
        rep_level_encoding: Encoding,
    },
    /// A v2 data page: level sections are uncompressed and sized by the
    /// header.
    DataV2 {
        buf: Bytes,
        num_values: u32,
        num_nulls: u32,
        num_rows: u32,
        encoding: Encoding,
        def_levels_byte_len: u32,
        rep_levels_byte_len: u32,
    },
}

/// Decompress `buffer` per the header and codec, yielding a [`Page`].
///
/// Returns `None` for page types with no decoded representation
/// (INDEX_PAGE), which the chunk reader skips.
pub(crate) fn decode_page(
    page_header: PageHeader,
    buffer: Bytes,
    codec: Compression,
    codecs: &CodecRegistry,
) -> Result<Option<Page>> {
    // For data page v2 the level sections stay uncompressed; only the values
    // portion is subject to the codec, and only when is_compressed is set.
    let mut levels_len: usize = 0;
    let mut can_decompress = true;
    if let Some(header_v2) = &page_header.data_page_header_v2 {
        if header_v2.definition_levels_byte_length < 0
            || header_v2.repetition_levels_byte_length < 0
        {
            return Err(general_err!("Negative level byte length"));
        }
        levels_len = (header_v2.definition_levels_byte_length
            + header_v2.repetition_levels_byte_length) as usize;
        can_decompress = header_v2.is_compressed;
    }

    let uncompressed_size = page_header.uncompressed_page_size as usize;
    let buffer = if codec != Compression::UNCOMPRESSED && can_decompress {
        if levels_len > buffer.len() || levels_len > uncompressed_size {
            return Err(eof_err!(
                "Level sections of {} bytes exceed the page body",
                levels_len
            ));
        }
        let mut decompressed = Vec::with_capacity(uncompressed_size);
        decompressed.extend_from_slice(&buffer[..levels_len]);
        decompressed.extend(codecs.decompress(
            codec,
            &buffer[levels_len..],
            uncompressed_size - levels_len,
        )?);
        Bytes::from(decompressed)
    } else {
        buffer
    };

    let page = match page_header.page_type {
        PageType::DICTIONARY_PAGE => {
            let Some(dict_header) = page_header.dictionary_page_header else {
                return Err(general_err!("Missing dictionary page header"));
            };
            if dict_header.num_values < 0 {
                return Err(general_err!(
                    "Negative dictionary page value count {}",
                    dict_header.num_values
                ));
            }
            Page::Dictionary {
                buf: buffer,
                num_values: dict_header.num_values as u32,
                encoding: dict_header.encoding,
            }
        }
        PageType::DATA_PAGE => {
            let Some(header) = page_header.data_page_header else {
                return Err(general_err!("Missing v1 data page header"));
            };
            if header.num_values < 0 {
                return Err(general_err!(
                    "Negative data page value count {}",
                    header.num_values
                ));
            }
            Page::DataV1 {
                buf: buffer,
                num_values: header.num_values as u32,
                encoding: header.encoding,
                def_level_encoding: header.definition_level_encoding,
                rep_level_encoding: header.repetition_level_encoding,
            }
        }
        PageType::DATA_PAGE_V2 => {
            let Some(header) = page_header.data_page_header_v2 else {
                return Err(general_err!("Missing v2 data page header"));
            };
            if header.num_values < 0 || header.num_nulls < 0 || header.num_rows < 0 {
                return Err(general_err!("Negative v2 data page count"));
            }
            if header.num_nulls > header.num_values {
                return Err(general_err!(
                    "Page declares {} nulls in {} values",
                    header.num_nulls,
                    header.num_values
                ));
            }
            Page::DataV2 {
                buf: buffer,
                num_values: header.num_values as u32,
                num_nulls: header.num_nulls as u32,
                num_rows: header.num_rows as u32,
                encoding: header.encoding,
                def_levels_byte_len: header.definition_levels_byte_length as u32,
                rep_levels_byte_len: header.repetition_levels_byte_length as u32,
            }
        }
        // unknown page types are skipped, not an error
        PageType::INDEX_PAGE => return Ok(None),
    };
    Ok(Some(page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::ThriftWriter;

    fn v1_header(num_values: i32, compressed: i32, uncompressed: i32) -> Vec<u8> {
        let mut w = ThriftWriter::new();
        w.i32_field(1, 0); // DATA_PAGE
        w.i32_field(2, uncompressed);
        w.i32_field(3, compressed);
        w.struct_field(5, |w| {
            w.i32_field(1, num_values);
            w.i32_field(2, 0); // PLAIN
            w.i32_field(3, 3); // RLE
            w.i32_field(4, 3); // RLE
        });
        w.stop();
        w.buf
    }

    #[test]
    fn test_read_v1_header() {
        let buf = v1_header(10, 40, 40);
        let (header, len) = read_page_header(&buf).unwrap();
        assert_eq!(len, buf.len());
        assert_eq!(header.page_type, PageType::DATA_PAGE);
        assert_eq!(header.compressed_page_size, 40);
        assert_eq!(header.data_page_num_values(), 10);
        let data = header.data_page_header.unwrap();
        assert_eq!(data.encoding, Encoding::PLAIN);
        assert_eq!(data.definition_level_encoding, Encoding::RLE);
    }

    #[test]
    fn test_header_length_excludes_body() {
        let mut buf = v1_header(1, 4, 4);
        let header_len = buf.len();
        buf.extend_from_slice(&42i32.to_le_bytes());
        let (_, len) = read_page_header(&buf).unwrap();
        assert_eq!(len, header_len);
    }

    #[test]
    fn test_read_v2_header_with_bool_field() {
        let mut w = ThriftWriter::new();
        w.i32_field(1, 3); // DATA_PAGE_V2
        w.i32_field(2, 100);
        w.i32_field(3, 60);
        w.struct_field(8, |w| {
            w.i32_field(1, 8);
            w.i32_field(2, 2);
            w.i32_field(3, 8);
            w.i32_field(4, 0);
            w.i32_field(5, 3);
            w.i32_field(6, 0);
            w.bool_field(7, false);
        });
        w.stop();
        let (header, _) = read_page_header(&w.buf).unwrap();
        let v2 = header.data_page_header_v2.unwrap();
        assert_eq!(v2.num_values, 8);
        assert_eq!(v2.num_nulls, 2);
        assert_eq!(v2.definition_levels_byte_length, 3);
        assert!(!v2.is_compressed);
    }

    #[test]
    fn test_missing_required_field() {
        let mut w = ThriftWriter::new();
        w.i32_field(1, 0);
        w.stop();
        assert!(read_page_header(&w.buf).is_err());
    }

    #[test]
    fn test_index_page_decodes_to_none() {
        let header = PageHeader {
            page_type: PageType::INDEX_PAGE,
            uncompressed_page_size: 0,
            compressed_page_size: 0,
            crc: None,
            data_page_header: None,
            dictionary_page_header: None,
            data_page_header_v2: None,
        };
        let page = decode_page(
            header,
            Bytes::new(),
            Compression::UNCOMPRESSED,
            &CodecRegistry::default(),
        )
        .unwrap();
        assert!(page.is_none());
    }

    #[cfg(feature = "snap")]
    #[test]
    fn test_decode_page_decompresses_body() {
        let body = b"0123456789".repeat(5);
        let compressed = snap::raw::Encoder::new().compress_vec(&body).unwrap();
        let header = PageHeader {
            page_type: PageType::DATA_PAGE,
            uncompressed_page_size: body.len() as i32,
            compressed_page_size: compressed.len() as i32,
            crc: None,
            data_page_header: Some(DataPageHeader {
                num_values: 1,
                encoding: Encoding::PLAIN,
                definition_level_encoding: Encoding::RLE,
                repetition_level_encoding: Encoding::RLE,
            }),
            dictionary_page_header: None,
            data_page_header_v2: None,
        };
        let page = decode_page(
            header,
            compressed.into(),
            Compression::SNAPPY,
            &CodecRegistry::default(),
        )
        .unwrap()
        .unwrap();
        match page {
            Page::DataV1 { buf, .. } => assert_eq!(buf.as_ref(), body.as_slice()),
            other => panic!("expected v1 page, got {other:?}"),
        }
    }

    #[cfg(feature = "snap")]
    #[test]
    fn test_v2_levels_stay_uncompressed() {
        let levels: &[u8] = &[0xaa, 0xbb];
        let values = b"valuesvaluesvalues".to_vec();
        let compressed_values = snap::raw::Encoder::new().compress_vec(&values).unwrap();
        let mut body = levels.to_vec();
        body.extend_from_slice(&compressed_values);

        let header = PageHeader {
            page_type: PageType::DATA_PAGE_V2,
            uncompressed_page_size: (levels.len() + values.len()) as i32,
            compressed_page_size: body.len() as i32,
            crc: None,
            data_page_header: None,
            dictionary_page_header: None,
            data_page_header_v2: Some(DataPageHeaderV2 {
                num_values: 4,
                num_nulls: 0,
                num_rows: 4,
                encoding: Encoding::PLAIN,
                definition_levels_byte_length: 2,
                repetition_levels_byte_length: 0,
                is_compressed: true,
            }),
        };
        let page = decode_page(
            header,
            body.into(),
            Compression::SNAPPY,
            &CodecRegistry::default(),
        )
        .unwrap()
        .unwrap();
        match page {
            Page::DataV2 { buf, .. } => {
                assert_eq!(&buf[..2], levels);
                assert_eq!(&buf[2..], values.as_slice());
            }
            other => panic!("expected v2 page, got {other:?}"),
        }
    }
}

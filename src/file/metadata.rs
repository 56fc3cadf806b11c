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

//! Typed Parquet file metadata and its Thrift decoding.
//!
//! Metadata is constructed once per file and immutable thereafter. Decoding
//! is streaming: each struct maps Thrift field ids directly onto its typed
//! fields, tracking required fields with a seen-mask.

use std::sync::Arc;

use bytes::Bytes;

use crate::basic::{Compression, Encoding, PageType};
use crate::errors::{ParquetError, Result};
use crate::schema::types::{ColumnDescriptor, SchemaDescriptor, SchemaElement};
use crate::thrift::{FieldType, ThriftSliceReader, read_string_list};

/// Global Parquet metadata for a file: the file-level metadata plus the row
/// groups.
#[derive(Debug, Clone)]
pub struct ParquetMetaData {
    file_metadata: FileMetaData,
    row_groups: Vec<RowGroupMetaData>,
}

impl ParquetMetaData {
    /// Creates metadata from already decoded parts.
    pub fn new(file_metadata: FileMetaData, row_groups: Vec<RowGroupMetaData>) -> Self {
        Self {
            file_metadata,
            row_groups,
        }
    }

    /// File-level metadata.
    pub fn file_metadata(&self) -> &FileMetaData {
        &self.file_metadata
    }

    /// Row group metadata, in file order.
    pub fn row_groups(&self) -> &[RowGroupMetaData] {
        &self.row_groups
    }

    /// Number of rows across all row groups.
    pub fn num_rows(&self) -> i64 {
        self.file_metadata.num_rows
    }
}

/// A key/value pair from the optional user metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// Metadata key.
    pub key: String,
    /// Metadata value, possibly absent.
    pub value: Option<String>,
}

impl KeyValue {
    fn read_thrift(prot: &mut ThriftSliceReader<'_>) -> Result<Self> {
        let mut key: Option<String> = None;
        let mut value: Option<String> = None;
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => key = Some(prot.read_string()?.to_owned()),
                2 => value = Some(prot.read_string()?.to_owned()),
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        let Some(key) = key else {
            return Err(general_err!("Required field key is missing"));
        };
        Ok(Self { key, value })
    }
}

/// File-level metadata: schema, row count and writer details.
#[derive(Debug, Clone)]
pub struct FileMetaData {
    version: i32,
    num_rows: i64,
    created_by: Option<String>,
    key_value_metadata: Option<Vec<KeyValue>>,
    schema_descr: Arc<SchemaDescriptor>,
    metadata_len: usize,
}

impl FileMetaData {
    /// Format version recorded by the writer.
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Total number of rows in the file.
    pub fn num_rows(&self) -> i64 {
        self.num_rows
    }

    /// Writer identification, e.g. `parquet-mr version 1.12.0`.
    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    /// Optional user key/value metadata.
    pub fn key_value_metadata(&self) -> Option<&Vec<KeyValue>> {
        self.key_value_metadata.as_ref()
    }

    /// The schema tree built from the flat schema list.
    pub fn schema_descr(&self) -> &Arc<SchemaDescriptor> {
        &self.schema_descr
    }

    /// Byte length of the Thrift-encoded metadata block this was decoded
    /// from.
    pub fn metadata_len(&self) -> usize {
        self.metadata_len
    }
}

/// Metadata for a row group.
#[derive(Debug, Clone)]
pub struct RowGroupMetaData {
    columns: Vec<ColumnChunkMetaData>,
    num_rows: i64,
    total_byte_size: i64,
    sorting_columns: Option<Vec<SortingColumn>>,
}

impl RowGroupMetaData {
    /// Column chunks of this row group, in schema order.
    pub fn columns(&self) -> &[ColumnChunkMetaData] {
        &self.columns
    }

    /// Metadata of the `i`th column chunk.
    pub fn column(&self, i: usize) -> &ColumnChunkMetaData {
        &self.columns[i]
    }

    /// Number of rows in this row group.
    pub fn num_rows(&self) -> i64 {
        self.num_rows
    }

    /// Total uncompressed byte size of all column data.
    pub fn total_byte_size(&self) -> i64 {
        self.total_byte_size
    }

    /// Sort order of the rows, when the writer recorded one.
    pub fn sorting_columns(&self) -> Option<&Vec<SortingColumn>> {
        self.sorting_columns.as_ref()
    }
}

/// A sort criterion recorded for a row group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortingColumn {
    /// Index of the sorting column within the row group's columns.
    pub column_idx: i32,
    /// Whether the column is sorted descending.
    pub descending: bool,
    /// Whether nulls sort before non-null values.
    pub nulls_first: bool,
}

impl SortingColumn {
    fn read_thrift(prot: &mut ThriftSliceReader<'_>) -> Result<Self> {
        let mut column_idx: Option<i32> = None;
        let mut descending: Option<bool> = None;
        let mut nulls_first: Option<bool> = None;
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => column_idx = Some(prot.read_i32()?),
                2 => descending = field_ident.bool_val,
                3 => nulls_first = field_ident.bool_val,
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        match (column_idx, descending, nulls_first) {
            (Some(column_idx), Some(descending), Some(nulls_first)) => Ok(Self {
                column_idx,
                descending,
                nulls_first,
            }),
            _ => Err(general_err!("SortingColumn is missing a required field")),
        }
    }
}

/// Per-page encoding usage recorded in the column metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEncodingStats {
    /// The page type these stats cover.
    pub page_type: PageType,
    /// Encoding of the pages.
    pub encoding: Encoding,
    /// Number of pages with this type and encoding.
    pub count: i32,
}

impl PageEncodingStats {
    fn read_thrift(prot: &mut ThriftSliceReader<'_>) -> Result<Self> {
        let mut page_type: Option<PageType> = None;
        let mut encoding: Option<Encoding> = None;
        let mut count: Option<i32> = None;
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => page_type = Some(PageType::read_thrift(prot)?),
                2 => encoding = Some(Encoding::read_thrift(prot)?),
                3 => count = Some(prot.read_i32()?),
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        match (page_type, encoding, count) {
            (Some(page_type), Some(encoding), Some(count)) => Ok(Self {
                page_type,
                encoding,
                count,
            }),
            _ => Err(general_err!("PageEncodingStats is missing a required field")),
        }
    }
}

/// Raw column chunk statistics: min/max in PLAIN value encoding (without the
/// length prefix for byte arrays) plus null and distinct counts.
///
/// Exposed for metadata fidelity; this reader performs no statistics-based
/// page skipping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    min_value: Option<Bytes>,
    max_value: Option<Bytes>,
    null_count: Option<i64>,
    distinct_count: Option<i64>,
    /// Whether min/max came from the deprecated (pre 2.x) fields, whose
    /// ordering semantics for signed values are unreliable.
    old_format: bool,
}

impl Statistics {
    /// Encoded minimum value, preferring the modern `min_value` field.
    pub fn min_bytes(&self) -> Option<&[u8]> {
        self.min_value.as_deref()
    }

    /// Encoded maximum value, preferring the modern `max_value` field.
    pub fn max_bytes(&self) -> Option<&[u8]> {
        self.max_value.as_deref()
    }

    /// Number of null values in the chunk, when recorded.
    pub fn null_count(&self) -> Option<i64> {
        self.null_count
    }

    /// Number of distinct values in the chunk, when recorded.
    pub fn distinct_count(&self) -> Option<i64> {
        self.distinct_count
    }

    /// Whether min/max were read from the deprecated statistics fields.
    pub fn is_old_format(&self) -> bool {
        self.old_format
    }

    fn read_thrift(prot: &mut ThriftSliceReader<'_>) -> Result<Self> {
        let mut deprecated_max: Option<Bytes> = None;
        let mut deprecated_min: Option<Bytes> = None;
        let mut stats = Statistics::default();
        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => deprecated_max = Some(Bytes::copy_from_slice(prot.read_bytes()?)),
                2 => deprecated_min = Some(Bytes::copy_from_slice(prot.read_bytes()?)),
                3 => stats.null_count = Some(prot.read_i64()?),
                4 => stats.distinct_count = Some(prot.read_i64()?),
                5 => stats.max_value = Some(Bytes::copy_from_slice(prot.read_bytes()?)),
                6 => stats.min_value = Some(Bytes::copy_from_slice(prot.read_bytes()?)),
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }
        if stats.min_value.is_none() && stats.max_value.is_none() {
            stats.min_value = deprecated_min;
            stats.max_value = deprecated_max;
            stats.old_format = stats.min_value.is_some() || stats.max_value.is_some();
        }
        Ok(stats)
    }
}

/// Metadata for a column chunk.
#[derive(Debug, Clone)]
pub struct ColumnChunkMetaData {
    column_descr: Arc<ColumnDescriptor>,
    encodings: Vec<Encoding>,
    compression: Compression,
    num_values: i64,
    total_uncompressed_size: i64,
    total_compressed_size: i64,
    data_page_offset: i64,
    index_page_offset: Option<i64>,
    dictionary_page_offset: Option<i64>,
    statistics: Option<Statistics>,
    encoding_stats: Option<Vec<PageEncodingStats>>,
}

impl ColumnChunkMetaData {
    /// Descriptor of the leaf column this chunk stores.
    pub fn column_descr(&self) -> &Arc<ColumnDescriptor> {
        &self.column_descr
    }

    /// The dotted column path.
    pub fn column_path(&self) -> String {
        self.column_descr.path_string()
    }

    /// All encodings used in this chunk.
    pub fn encodings(&self) -> &[Encoding] {
        &self.encodings
    }

    /// Compression codec of the page bodies.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Total number of values (including nulls) in this chunk.
    pub fn num_values(&self) -> i64 {
        self.num_values
    }

    /// Total uncompressed byte size of all pages.
    pub fn total_uncompressed_size(&self) -> i64 {
        self.total_uncompressed_size
    }

    /// Total compressed byte size of all pages, i.e. the chunk's extent in
    /// the file.
    pub fn total_compressed_size(&self) -> i64 {
        self.total_compressed_size
    }

    /// File offset of the first data page.
    pub fn data_page_offset(&self) -> i64 {
        self.data_page_offset
    }

    /// File offset of the index page, if any.
    pub fn index_page_offset(&self) -> Option<i64> {
        self.index_page_offset
    }

    /// File offset of the dictionary page, if the chunk has one.
    pub fn dictionary_page_offset(&self) -> Option<i64> {
        self.dictionary_page_offset
    }

    /// Column chunk statistics, when recorded.
    pub fn statistics(&self) -> Option<&Statistics> {
        self.statistics.as_ref()
    }

    /// Per-page encoding statistics, when recorded.
    pub fn encoding_stats(&self) -> Option<&Vec<PageEncodingStats>> {
        self.encoding_stats.as_ref()
    }

    /// The minimum byte range covering every page of this chunk.
    pub fn byte_range(&self) -> (u64, u64) {
        let start = match self.dictionary_page_offset {
            Some(dict_offset) => dict_offset.min(self.data_page_offset),
            None => self.data_page_offset,
        };
        (start as u64, self.total_compressed_size as u64)
    }
}

// bit positions of the required ColumnMetaData fields
const COL_META_TYPE: u16 = 1 << 1;
const COL_META_ENCODINGS: u16 = 1 << 2;
const COL_META_PATH: u16 = 1 << 3;
const COL_META_CODEC: u16 = 1 << 4;
const COL_META_NUM_VALUES: u16 = 1 << 5;
const COL_META_TOTAL_UNCOMP_SZ: u16 = 1 << 6;
const COL_META_TOTAL_COMP_SZ: u16 = 1 << 7;
const COL_META_DATA_PAGE_OFFSET: u16 = 1 << 9;

const COL_META_ALL_REQUIRED: u16 = COL_META_TYPE
    | COL_META_ENCODINGS
    | COL_META_PATH
    | COL_META_CODEC
    | COL_META_NUM_VALUES
    | COL_META_TOTAL_UNCOMP_SZ
    | COL_META_TOTAL_COMP_SZ
    | COL_META_DATA_PAGE_OFFSET;

fn validate_column_metadata(mask: u16) -> Result<()> {
    if mask != COL_META_ALL_REQUIRED {
        let missing = [
            (COL_META_TYPE, "type"),
            (COL_META_ENCODINGS, "encodings"),
            (COL_META_PATH, "path_in_schema"),
            (COL_META_CODEC, "codec"),
            (COL_META_NUM_VALUES, "num_values"),
            (COL_META_TOTAL_UNCOMP_SZ, "total_uncompressed_size"),
            (COL_META_TOTAL_COMP_SZ, "total_compressed_size"),
            (COL_META_DATA_PAGE_OFFSET, "data_page_offset"),
        ];
        for (bit, name) in missing {
            if mask & bit == 0 {
                return Err(general_err!("Required field {} is missing", name));
            }
        }
    }
    Ok(())
}

// struct ColumnMetaData {
//   1: required Type type
//   2: required list<Encoding> encodings
//   3: required list<string> path_in_schema
//   4: required CompressionCodec codec
//   5: required i64 num_values
//   6: required i64 total_uncompressed_size
//   7: required i64 total_compressed_size
//   8: optional list<KeyValue> key_value_metadata
//   9: required i64 data_page_offset
//   10: optional i64 index_page_offset
//   11: optional i64 dictionary_page_offset
//   12: optional Statistics statistics
//   13: optional list<PageEncodingStats> encoding_stats
// }
fn read_column_metadata(
    prot: &mut ThriftSliceReader<'_>,
    column: &mut ColumnChunkMetaData,
) -> Result<u16> {
    let mut seen_mask = 0u16;

    let mut last_field_id = 0i16;
    loop {
        let field_ident = prot.read_field_begin(last_field_id)?;
        if field_ident.field_type == FieldType::Stop {
            break;
        }
        match field_ident.id {
            1 => {
                // the physical type is carried by the column descriptor; read
                // for validation only
                let physical = crate::basic::Type::read_thrift(prot)?;
                if physical != column.column_descr.physical_type() {
                    return Err(general_err!(
                        "Column chunk type {} does not match schema type {}",
                        physical,
                        column.column_descr.physical_type()
                    ));
                }
                seen_mask |= COL_META_TYPE;
            }
            2 => {
                let list_ident = prot.read_list_begin()?;
                let mut encodings = Vec::with_capacity(list_ident.size);
                for _ in 0..list_ident.size {
                    encodings.push(Encoding::read_thrift(prot)?);
                }
                column.encodings = encodings;
                seen_mask |= COL_META_ENCODINGS;
            }
            3 => {
                // redundant with the schema-derived descriptor path
                read_string_list(prot)?;
                seen_mask |= COL_META_PATH;
            }
            4 => {
                column.compression = Compression::read_thrift(prot)?;
                seen_mask |= COL_META_CODEC;
            }
            5 => {
                column.num_values = prot.read_i64()?;
                seen_mask |= COL_META_NUM_VALUES;
            }
            6 => {
                column.total_uncompressed_size = prot.read_i64()?;
                seen_mask |= COL_META_TOTAL_UNCOMP_SZ;
            }
            7 => {
                column.total_compressed_size = prot.read_i64()?;
                seen_mask |= COL_META_TOTAL_COMP_SZ;
            }
            9 => {
                column.data_page_offset = prot.read_i64()?;
                seen_mask |= COL_META_DATA_PAGE_OFFSET;
            }
            10 => column.index_page_offset = Some(prot.read_i64()?),
            11 => column.dictionary_page_offset = Some(prot.read_i64()?),
            12 => column.statistics = Some(Statistics::read_thrift(prot)?),
            13 => {
                let list_ident = prot.read_list_begin()?;
                let mut stats = Vec::with_capacity(list_ident.size);
                for _ in 0..list_ident.size {
                    stats.push(PageEncodingStats::read_thrift(prot)?);
                }
                column.encoding_stats = Some(stats);
            }
            _ => prot.skip(field_ident.field_type)?,
        }
        last_field_id = field_ident.id;
    }

    Ok(seen_mask)
}

// struct ColumnChunk {
//   1: optional string file_path
//   2: required i64 file_offset
//   3: optional ColumnMetaData meta_data
// }
fn read_column_chunk(
    prot: &mut ThriftSliceReader<'_>,
    column_descr: &Arc<ColumnDescriptor>,
) -> Result<ColumnChunkMetaData> {
    let mut col = ColumnChunkMetaData {
        column_descr: column_descr.clone(),
        encodings: vec![],
        compression: Compression::UNCOMPRESSED,
        num_values: 0,
        total_uncompressed_size: 0,
        total_compressed_size: 0,
        data_page_offset: 0,
        index_page_offset: None,
        dictionary_page_offset: None,
        statistics: None,
        encoding_stats: None,
    };

    let mut col_meta_mask = 0u16;
    let mut last_field_id = 0i16;
    loop {
        let field_ident = prot.read_field_begin(last_field_id)?;
        if field_ident.field_type == FieldType::Stop {
            break;
        }
        match field_ident.id {
            // multi-file datasets are out of scope; reject rather than
            // silently read the wrong file
            1 => {
                let path = prot.read_string()?;
                return Err(nyi_err!(
                    "Column chunk stored in external file {}",
                    path
                ));
            }
            2 => {
                prot.read_i64()?;
            }
            3 => col_meta_mask = read_column_metadata(prot, &mut col)?,
            _ => prot.skip(field_ident.field_type)?,
        }
        last_field_id = field_ident.id;
    }

    validate_column_metadata(col_meta_mask)?;
    Ok(col)
}

// struct RowGroup {
//   1: required list<ColumnChunk> columns
//   2: required i64 total_byte_size
//   3: required i64 num_rows
//   4: optional list<SortingColumn> sorting_columns
// }
fn read_row_group(
    prot: &mut ThriftSliceReader<'_>,
    schema_descr: &Arc<SchemaDescriptor>,
) -> Result<RowGroupMetaData> {
    const RG_COLUMNS: u8 = 1 << 1;
    const RG_TOT_BYTE_SIZE: u8 = 1 << 2;
    const RG_NUM_ROWS: u8 = 1 << 3;
    const RG_ALL_REQUIRED: u8 = RG_COLUMNS | RG_TOT_BYTE_SIZE | RG_NUM_ROWS;

    let mut columns = Vec::new();
    let mut total_byte_size = 0i64;
    let mut num_rows = 0i64;
    let mut sorting_columns = None;
    let mut mask = 0u8;

    let mut last_field_id = 0i16;
    loop {
        let field_ident = prot.read_field_begin(last_field_id)?;
        if field_ident.field_type == FieldType::Stop {
            break;
        }
        match field_ident.id {
            1 => {
                let list_ident = prot.read_list_begin()?;
                if schema_descr.num_columns() != list_ident.size {
                    return Err(general_err!(
                        "Column count mismatch. Schema has {} columns while Row Group has {}",
                        schema_descr.num_columns(),
                        list_ident.size
                    ));
                }
                columns.reserve(list_ident.size);
                for i in 0..list_ident.size {
                    columns.push(read_column_chunk(prot, &schema_descr.columns()[i])?);
                }
                mask |= RG_COLUMNS;
            }
            2 => {
                total_byte_size = prot.read_i64()?;
                mask |= RG_TOT_BYTE_SIZE;
            }
            3 => {
                num_rows = prot.read_i64()?;
                mask |= RG_NUM_ROWS;
            }
            4 => {
                let list_ident = prot.read_list_begin()?;
                let mut sorting = Vec::with_capacity(list_ident.size);
                for _ in 0..list_ident.size {
                    sorting.push(SortingColumn::read_thrift(prot)?);
                }
                sorting_columns = Some(sorting);
            }
            _ => prot.skip(field_ident.field_type)?,
        }
        last_field_id = field_ident.id;
    }

    if mask != RG_ALL_REQUIRED {
        if mask & RG_COLUMNS == 0 {
            return Err(general_err!("Required field columns is missing"));
        }
        if mask & RG_TOT_BYTE_SIZE == 0 {
            return Err(general_err!("Required field total_byte_size is missing"));
        }
        return Err(general_err!("Required field num_rows is missing"));
    }

    Ok(RowGroupMetaData {
        columns,
        num_rows,
        total_byte_size,
        sorting_columns,
    })
}

/// Decode [`ParquetMetaData`] from a Thrift-encoded metadata block, normally
/// the bytes immediately preceding the footer.
//
// struct FileMetaData {
//   1: required i32 version
//   2: required list<SchemaElement> schema
//   3: required i64 num_rows
//   4: required list<RowGroup> row_groups
//   5: optional list<KeyValue> key_value_metadata
//   6: optional string created_by
// }
pub fn decode_metadata(buf: &[u8]) -> Result<ParquetMetaData> {
    let mut prot = ThriftSliceReader::new(buf);

    let mut version: Option<i32> = None;
    let mut num_rows: Option<i64> = None;
    let mut row_groups: Option<Vec<RowGroupMetaData>> = None;
    let mut key_value_metadata: Option<Vec<KeyValue>> = None;
    let mut created_by: Option<String> = None;
    let mut schema_descr: Option<Arc<SchemaDescriptor>> = None;

    let mut last_field_id = 0i16;
    loop {
        let field_ident = prot.read_field_begin(last_field_id)?;
        if field_ident.field_type == FieldType::Stop {
            break;
        }
        match field_ident.id {
            1 => version = Some(prot.read_i32()?),
            2 => {
                let list_ident = prot.read_list_begin()?;
                let mut elements = Vec::with_capacity(list_ident.size);
                for _ in 0..list_ident.size {
                    elements.push(SchemaElement::read_thrift(&mut prot)?);
                }
                schema_descr = Some(Arc::new(SchemaDescriptor::try_new(elements)?));
            }
            3 => num_rows = Some(prot.read_i64()?),
            4 => {
                let Some(schema_descr) = schema_descr.as_ref() else {
                    return Err(general_err!("Required field schema is missing"));
                };
                let list_ident = prot.read_list_begin()?;
                let mut groups = Vec::with_capacity(list_ident.size);
                for _ in 0..list_ident.size {
                    groups.push(read_row_group(&mut prot, schema_descr)?);
                }
                row_groups = Some(groups);
            }
            5 => {
                let list_ident = prot.read_list_begin()?;
                let mut kvs = Vec::with_capacity(list_ident.size);
                for _ in 0..list_ident.size {
                    kvs.push(KeyValue::read_thrift(&mut prot)?);
                }
                key_value_metadata = Some(kvs);
            }
            6 => created_by = Some(prot.read_string()?.to_owned()),
            _ => prot.skip(field_ident.field_type)?,
        }
        last_field_id = field_ident.id;
    }

    let Some(version) = version else {
        return Err(general_err!("Required field version is missing"));
    };
    let Some(schema_descr) = schema_descr else {
        return Err(general_err!("Required field schema is missing"));
    };
    let Some(num_rows) = num_rows else {
        return Err(general_err!("Required field num_rows is missing"));
    };
    let Some(row_groups) = row_groups else {
        return Err(general_err!("Required field row_groups is missing"));
    };

    let file_metadata = FileMetaData {
        version,
        num_rows,
        created_by,
        key_value_metadata,
        schema_descr,
        metadata_len: buf.len(),
    };
    Ok(ParquetMetaData::new(file_metadata, row_groups))
}

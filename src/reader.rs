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

//! The public reading API: materializing rows, row ranges, or individual
//! columns.
//!
//! Rows are delivered one [`RowChunk`] per row group, each column's values in
//! row-ascending order; a chunk is emitted only once every requested column
//! of its row group has been decoded. Cancellation is cooperative: dropping
//! the future between range requests abandons the read.

use std::sync::Arc;

use bytes::Bytes;

use crate::column::reader::ColumnChunkReader;
use crate::compression::CodecRegistry;
use crate::errors::{ParquetError, Result};
use crate::file::footer::parse_metadata;
use crate::file::metadata::{ColumnChunkMetaData, ParquetMetaData, RowGroupMetaData};
use crate::record::assembler::RecordAssembler;
use crate::record::convert::convert_column;
use crate::record::value::{Row, Value};
use crate::schema::types::SchemaDescriptor;
use crate::source::ChunkReader;

/// Options for a read: column projection, row range, and the codec table.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    columns: Option<Vec<String>>,
    row_start: Option<u64>,
    row_end: Option<u64>,
    codecs: CodecRegistry,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions::builder().build()
    }
}

impl ReadOptions {
    /// Returns a new builder with no projection, the full row range, and the
    /// default codec table.
    pub fn builder() -> ReadOptionsBuilder {
        ReadOptionsBuilder::new()
    }
}

/// Builder for [`ReadOptions`].
pub struct ReadOptionsBuilder {
    columns: Option<Vec<String>>,
    row_start: Option<u64>,
    row_end: Option<u64>,
    codecs: CodecRegistry,
}

impl ReadOptionsBuilder {
    fn new() -> Self {
        Self {
            columns: None,
            row_start: None,
            row_end: None,
            codecs: CodecRegistry::default(),
        }
    }

    /// Restrict the read to the named columns. Names match the dotted column
    /// path, or a leaf field name when unique.
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Restrict the read to rows `[row_start, row_end)` in file order.
    ///
    /// For repeated columns decoding restarts at a page boundary, so pages
    /// holding rows outside the range may still be decoded; the returned
    /// rows are trimmed exactly.
    pub fn with_row_range(mut self, row_start: u64, row_end: u64) -> Self {
        self.row_start = Some(row_start);
        self.row_end = Some(row_end);
        self
    }

    /// Use `codecs` to decompress page bodies instead of the default table.
    pub fn with_codecs(mut self, codecs: CodecRegistry) -> Self {
        self.codecs = codecs;
        self
    }

    /// Build the options.
    pub fn build(self) -> ReadOptions {
        ReadOptions {
            columns: self.columns,
            row_start: self.row_start,
            row_end: self.row_end,
            codecs: self.codecs,
        }
    }
}

/// A batch of materialized rows covering one row group's slice of the
/// requested range.
#[derive(Debug, Clone)]
pub struct RowChunk {
    /// File-order index of the first row in `rows`.
    pub row_offset: u64,
    /// The materialized rows.
    pub rows: Vec<Row>,
}

/// Synchronous Parquet reader over a [`ChunkReader`].
pub struct ParquetReader<R: ChunkReader> {
    reader: R,
    metadata: Arc<ParquetMetaData>,
}

impl<R: ChunkReader> ParquetReader<R> {
    /// Open a reader, parsing the metadata from the footer.
    pub fn try_new(reader: R) -> Result<Self> {
        let metadata = Arc::new(parse_metadata(&reader)?);
        Ok(Self { reader, metadata })
    }

    /// Open a reader with already parsed metadata.
    pub fn new_with_metadata(reader: R, metadata: Arc<ParquetMetaData>) -> Self {
        Self { reader, metadata }
    }

    /// The file metadata.
    pub fn metadata(&self) -> &Arc<ParquetMetaData> {
        &self.metadata
    }

    /// The schema tree of the file.
    pub fn schema(&self) -> &Arc<SchemaDescriptor> {
        self.metadata.file_metadata().schema_descr()
    }

    /// Materialize the requested rows, accumulated across row groups.
    pub fn read_rows(&self, options: ReadOptions) -> Result<Vec<Row>> {
        let mut rows = vec![];
        self.read_chunks(&options, |chunk| rows.extend(chunk.rows))?;
        Ok(rows)
    }

    /// Materialize rows one row group at a time, handing each batch to
    /// `on_chunk`.
    pub fn read_chunks<F: FnMut(RowChunk)>(
        &self,
        options: &ReadOptions,
        mut on_chunk: F,
    ) -> Result<()> {
        let plan = ReadPlan::try_new(&self.metadata, options)?;
        for group in plan.groups() {
            let mut columns = Vec::with_capacity(plan.column_indices.len());
            for &i in &plan.column_indices {
                let chunk_meta = group.meta.column(i);
                let (start, len) = chunk_meta.byte_range();
                let chunk = self.reader.get_bytes(start, len as usize)?;
                let records =
                    decode_column_records(chunk_meta, chunk, &options.codecs, group.local_range)?;
                columns.push((chunk_meta.column_path(), records));
            }
            on_chunk(zip_rows(group.first_row, columns)?);
        }
        Ok(())
    }

    /// Materialize a single column's records across the requested row range.
    pub fn read_column(&self, column: &str, options: &ReadOptions) -> Result<Vec<Value>> {
        let index = self
            .schema()
            .column_index(column)
            .ok_or_else(|| general_err!("Column {} not found in schema", column))?;
        let plan = ReadPlan::try_new(&self.metadata, options)?;
        let mut values = vec![];
        for group in plan.groups() {
            let chunk_meta = group.meta.column(index);
            let (start, len) = chunk_meta.byte_range();
            let chunk = self.reader.get_bytes(start, len as usize)?;
            values.extend(decode_column_records(
                chunk_meta,
                chunk,
                &options.codecs,
                group.local_range,
            )?);
        }
        Ok(values)
    }
}

/// A row group intersected with the requested row range.
struct GroupSlice<'a> {
    meta: &'a RowGroupMetaData,
    /// File-order index of the first requested row in this group.
    first_row: u64,
    /// Requested rows relative to the group start.
    local_range: (u64, u64),
}

/// The row groups and columns a read touches.
struct ReadPlan<'a> {
    groups: Vec<GroupSlice<'a>>,
    column_indices: Vec<usize>,
}

impl<'a> ReadPlan<'a> {
    fn try_new(metadata: &'a ParquetMetaData, options: &ReadOptions) -> Result<Self> {
        let schema = metadata.file_metadata().schema_descr();
        let column_indices = match &options.columns {
            None => (0..schema.num_columns()).collect(),
            Some(names) => names
                .iter()
                .map(|name| {
                    schema
                        .column_index(name)
                        .ok_or_else(|| general_err!("Column {} not found in schema", name))
                })
                .collect::<Result<Vec<_>>>()?,
        };

        let total_rows = metadata.num_rows().max(0) as u64;
        let row_start = options.row_start.unwrap_or(0);
        let row_end = options.row_end.unwrap_or(total_rows).min(total_rows);

        let mut groups = vec![];
        let mut group_start = 0u64;
        for group in metadata.row_groups() {
            let group_rows = group.num_rows().max(0) as u64;
            let group_end = group_start + group_rows;
            if group_start < row_end && group_end > row_start {
                let lo = row_start.max(group_start) - group_start;
                let hi = row_end.min(group_end) - group_start;
                groups.push(GroupSlice {
                    meta: group,
                    first_row: group_start + lo,
                    local_range: (lo, hi),
                });
            }
            group_start = group_end;
        }

        Ok(Self {
            groups,
            column_indices,
        })
    }

    fn groups(&self) -> &[GroupSlice<'a>] {
        &self.groups
    }
}

/// Decode one column chunk to assembled records, trimmed to the requested
/// local row range.
fn decode_column_records(
    chunk_meta: &ColumnChunkMetaData,
    chunk: Bytes,
    codecs: &CodecRegistry,
    (local_start, local_end): (u64, u64),
) -> Result<Vec<Value>> {
    if !codecs.supports(chunk_meta.compression()) {
        return Err(ParquetError::DecompressorMissing(chunk_meta.compression()));
    }

    let descr = chunk_meta.column_descr();
    let reader = ColumnChunkReader::new(
        descr.clone(),
        chunk,
        chunk_meta.compression(),
        codecs,
        chunk_meta.num_values().max(0) as u64,
    );
    let data = reader.read(local_start, local_end)?;

    let values = convert_column(data.values, descr)?;
    let assembler = RecordAssembler::new(descr.max_def_level, descr.max_rep_level, descr.nullable);
    let mut records = assembler.assemble(&data.rep_levels, &data.def_levels, data.num_values, values)?;

    // decoding is page-granular; trim to the exact request
    let lo = (local_start.saturating_sub(data.first_row_index) as usize).min(records.len());
    let hi = (local_end.saturating_sub(data.first_row_index) as usize).min(records.len());
    records.truncate(hi);
    records.drain(..lo);
    Ok(records)
}

/// Zip per-column records into rows. Row assembly requires every column to
/// have produced the same number of records.
fn zip_rows(row_offset: u64, columns: Vec<(String, Vec<Value>)>) -> Result<RowChunk> {
    let num_rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
    for (name, records) in &columns {
        if records.len() != num_rows {
            return Err(internal_err!(
                "Column {} produced {} records, expected {}",
                name,
                records.len(),
                num_rows
            ));
        }
    }

    let num_columns = columns.len();
    let mut fields: Vec<Vec<(String, Value)>> = (0..num_rows)
        .map(|_| Vec::with_capacity(num_columns))
        .collect();
    for (name, records) in columns {
        for (row, value) in fields.iter_mut().zip(records) {
            row.push((name.clone(), value));
        }
    }
    Ok(RowChunk {
        row_offset,
        rows: fields.into_iter().map(Row::new).collect(),
    })
}

#[cfg(feature = "async")]
pub use r#async::AsyncParquetReader;

#[cfg(feature = "async")]
mod r#async {
    use super::*;
    use crate::file::DEFAULT_FOOTER_READ_SIZE;
    use crate::file::async_metadata::read_metadata_async_with_size;
    use crate::source::ByteSource;

    /// Asynchronous Parquet reader over a range-addressable [`ByteSource`].
    ///
    /// Metadata is loaded with one suffix fetch (plus at most one follow-up
    /// request); each column chunk is fetched with a single range request
    /// sized to the minimum byte range satisfying the read.
    pub struct AsyncParquetReader<S: ByteSource> {
        source: S,
        metadata: Arc<ParquetMetaData>,
    }

    impl<S: ByteSource> AsyncParquetReader<S> {
        /// Open a reader, fetching and parsing the footer metadata.
        pub async fn try_new(source: S) -> Result<Self> {
            Self::try_new_with_prefetch(source, DEFAULT_FOOTER_READ_SIZE).await
        }

        /// Open a reader with a custom initial metadata fetch size.
        pub async fn try_new_with_prefetch(mut source: S, prefetch: usize) -> Result<Self> {
            let metadata = Arc::new(read_metadata_async_with_size(&mut source, prefetch).await?);
            Ok(Self { source, metadata })
        }

        /// Open a reader with already parsed metadata, issuing no requests.
        pub fn new_with_metadata(source: S, metadata: Arc<ParquetMetaData>) -> Self {
            Self { source, metadata }
        }

        /// The file metadata.
        pub fn metadata(&self) -> &Arc<ParquetMetaData> {
            &self.metadata
        }

        /// The schema tree of the file.
        pub fn schema(&self) -> &Arc<SchemaDescriptor> {
            self.metadata.file_metadata().schema_descr()
        }

        /// Materialize the requested rows, accumulated across row groups.
        pub async fn read_rows(&mut self, options: ReadOptions) -> Result<Vec<Row>> {
            let mut rows = vec![];
            self.read_chunks(&options, |chunk| rows.extend(chunk.rows))
                .await?;
            Ok(rows)
        }

        /// Materialize rows one row group at a time, handing each batch to
        /// `on_chunk`. Completes when all requested data has been delivered.
        pub async fn read_chunks<F: FnMut(RowChunk)>(
            &mut self,
            options: &ReadOptions,
            mut on_chunk: F,
        ) -> Result<()> {
            let metadata = self.metadata.clone();
            let plan = ReadPlan::try_new(&metadata, options)?;
            for group in plan.groups() {
                let mut columns = Vec::with_capacity(plan.column_indices.len());
                for &i in &plan.column_indices {
                    let chunk_meta = group.meta.column(i);
                    let (start, len) = chunk_meta.byte_range();
                    let chunk = self.source.slice(start..start + len).await?;
                    let records = decode_column_records(
                        chunk_meta,
                        chunk,
                        &options.codecs,
                        group.local_range,
                    )?;
                    columns.push((chunk_meta.column_path(), records));
                }
                on_chunk(zip_rows(group.first_row, columns)?);
            }
            Ok(())
        }

        /// Materialize a single column's records across the requested range.
        pub async fn read_column(&mut self, column: &str, options: &ReadOptions) -> Result<Vec<Value>> {
            let metadata = self.metadata.clone();
            let index = metadata
                .file_metadata()
                .schema_descr()
                .column_index(column)
                .ok_or_else(|| general_err!("Column {} not found in schema", column))?;
            let plan = ReadPlan::try_new(&metadata, options)?;
            let mut values = vec![];
            for group in plan.groups() {
                let chunk_meta = group.meta.column(index);
                let (start, len) = chunk_meta.byte_range();
                let chunk = self.source.slice(start..start + len).await?;
                values.extend(decode_column_records(
                    chunk_meta,
                    chunk,
                    &options.codecs,
                    group.local_range,
                )?);
            }
            Ok(values)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::Compression;
    use crate::test_util::{ThriftWriter, data_page_v1, dictionary_page};

    /// A column to place in a hand-built single-row-group test file.
    struct TestColumn {
        name: &'static str,
        physical_type: i32,
        repetition: i32,
        converted_type: Option<i32>,
        /// Complete encoded pages, dictionary page first when present.
        pages: Vec<u8>,
        num_values: i64,
        dictionary: bool,
    }

    impl TestColumn {
        fn required_i32(name: &'static str, values: &[i32]) -> Self {
            let mut body = vec![];
            for v in values {
                body.extend_from_slice(&v.to_le_bytes());
            }
            Self {
                name,
                physical_type: 1, // INT32
                repetition: 0,    // REQUIRED
                converted_type: None,
                pages: data_page_v1(values.len() as i32, 0, &body),
                num_values: values.len() as i64,
                dictionary: false,
            }
        }

        /// An OPTIONAL UTF8 column; `None` entries are nulls.
        fn optional_utf8(name: &'static str, values: &[Option<&str>]) -> Self {
            // def levels, bit width 1, one bit-packed group per 8 values
            let mut levels = vec![];
            let groups = values.len().div_ceil(8);
            levels.push(((groups as u8) << 1) | 1);
            for chunk in values.chunks(8) {
                let mut byte = 0u8;
                for (i, v) in chunk.iter().enumerate() {
                    if v.is_some() {
                        byte |= 1 << i;
                    }
                }
                levels.push(byte);
            }
            let mut body = (levels.len() as i32).to_le_bytes().to_vec();
            body.extend_from_slice(&levels);
            for v in values.iter().flatten() {
                body.extend_from_slice(&(v.len() as i32).to_le_bytes());
                body.extend_from_slice(v.as_bytes());
            }
            Self {
                name,
                physical_type: 6, // BYTE_ARRAY
                repetition: 1,    // OPTIONAL
                converted_type: Some(0), // UTF8
                pages: data_page_v1(values.len() as i32, 0, &body),
                num_values: values.len() as i64,
                dictionary: false,
            }
        }
    }

    /// Assemble a complete single-row-group Parquet file from encoded column
    /// chunks.
    fn build_file(num_rows: i64, columns: Vec<TestColumn>) -> Bytes {
        let mut file = b"PAR1".to_vec();
        let mut offsets = vec![];
        for column in &columns {
            offsets.push(file.len() as i64);
            file.extend_from_slice(&column.pages);
        }
        let total_size: i64 = columns.iter().map(|c| c.pages.len() as i64).sum();

        let mut w = ThriftWriter::new();
        w.i32_field(1, 1); // version

        // flat schema: root group then one element per column
        let mut schema: Vec<Box<dyn FnOnce(&mut ThriftWriter)>> = vec![];
        let num_children = columns.len() as i32;
        schema.push(Box::new(move |w: &mut ThriftWriter| {
            w.string_field(4, "schema");
            w.i32_field(5, num_children);
        }));
        for column in &columns {
            let (physical_type, repetition, name, converted_type) = (
                column.physical_type,
                column.repetition,
                column.name,
                column.converted_type,
            );
            schema.push(Box::new(move |w: &mut ThriftWriter| {
                w.i32_field(1, physical_type);
                w.i32_field(3, repetition);
                w.string_field(4, name);
                if let Some(converted_type) = converted_type {
                    w.i32_field(6, converted_type);
                }
            }));
        }
        w.struct_list_field(2, schema);

        w.i64_field(3, num_rows);

        // a single row group holding every chunk
        let chunks: Vec<Box<dyn FnOnce(&mut ThriftWriter)>> = columns
            .iter()
            .zip(&offsets)
            .map(|(column, &offset)| {
                let (name, physical_type, num_values, dictionary) = (
                    column.name,
                    column.physical_type,
                    column.num_values,
                    column.dictionary,
                );
                let size = column.pages.len() as i64;
                Box::new(move |w: &mut ThriftWriter| {
                    w.i64_field(2, offset);
                    w.struct_field(3, |w| {
                        w.i32_field(1, physical_type);
                        w.i32_list_field(2, &[0]);
                        w.string_list_field(3, &[name]);
                        w.i32_field(4, 0); // UNCOMPRESSED
                        w.i64_field(5, num_values);
                        w.i64_field(6, size);
                        w.i64_field(7, size);
                        w.i64_field(9, offset);
                        if dictionary {
                            w.i64_field(11, offset);
                        }
                    });
                }) as Box<dyn FnOnce(&mut ThriftWriter)>
            })
            .collect();
        w.struct_list_field(
            4,
            vec![Box::new(move |w: &mut ThriftWriter| {
                w.struct_list_field(1, chunks);
                w.i64_field(2, total_size);
                w.i64_field(3, num_rows);
            })],
        );
        w.stop();

        let metadata = w.buf;
        file.extend_from_slice(&metadata);
        file.extend_from_slice(&(metadata.len() as u32).to_le_bytes());
        file.extend_from_slice(b"PAR1");
        Bytes::from(file)
    }

    #[test]
    fn test_read_single_column_file() {
        let file = build_file(5, vec![TestColumn::required_i32("v", &[1, 2, 3, 4, 5])]);
        let reader = ParquetReader::try_new(file).unwrap();

        assert_eq!(reader.metadata().num_rows(), 5);
        assert_eq!(reader.metadata().file_metadata().version(), 1);
        assert_eq!(reader.schema().num_columns(), 1);

        let rows = reader.read_rows(ReadOptions::default()).unwrap();
        assert_eq!(rows.len(), 5);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.get("v").unwrap().as_i64(), Some(i as i64 + 1));
        }
    }

    #[test]
    fn test_read_two_columns_with_nulls() {
        let file = build_file(
            3,
            vec![
                TestColumn::required_i32("id", &[10, 20, 30]),
                TestColumn::optional_utf8("name", &[Some("a"), None, Some("c")]),
            ],
        );
        let reader = ParquetReader::try_new(file).unwrap();
        let rows = reader.read_rows(ReadOptions::default()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("name").unwrap().as_str(), Some("a"));
        assert!(rows[1].get("name").unwrap().is_null());
        assert_eq!(rows[2].get("name").unwrap().as_str(), Some("c"));
        assert_eq!(rows[2].get("id").unwrap().as_i64(), Some(30));
    }

    #[test]
    fn test_projection_and_row_range() {
        let file = build_file(
            5,
            vec![
                TestColumn::required_i32("a", &[1, 2, 3, 4, 5]),
                TestColumn::required_i32("b", &[6, 7, 8, 9, 10]),
            ],
        );
        let reader = ParquetReader::try_new(file).unwrap();
        let options = ReadOptions::builder()
            .with_columns(vec!["b".to_owned()])
            .with_row_range(1, 4)
            .build();
        let rows = reader.read_rows(options).unwrap();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].get("a").is_none());
        assert_eq!(rows[0].get("b").unwrap().as_i64(), Some(7));
        assert_eq!(rows[2].get("b").unwrap().as_i64(), Some(9));
    }

    #[test]
    fn test_read_column_values() {
        let file = build_file(4, vec![TestColumn::required_i32("v", &[4, 3, 2, 1])]);
        let reader = ParquetReader::try_new(file).unwrap();
        let values = reader
            .read_column("v", &ReadOptions::default())
            .unwrap();
        assert_eq!(
            values,
            vec![Value::Int(4), Value::Int(3), Value::Int(2), Value::Int(1)]
        );
    }

    #[test]
    fn test_unknown_column_fails() {
        let file = build_file(1, vec![TestColumn::required_i32("v", &[1])]);
        let reader = ParquetReader::try_new(file).unwrap();
        assert!(reader.read_column("missing", &ReadOptions::default()).is_err());
        let options = ReadOptions::builder()
            .with_columns(vec!["missing".to_owned()])
            .build();
        assert!(reader.read_rows(options).is_err());
    }

    #[test]
    fn test_dictionary_encoded_column_end_to_end() {
        // dictionary ["x", "y"], indices [0, 1, 0]
        let mut dict_body = vec![];
        for v in ["x", "y"] {
            dict_body.extend_from_slice(&(v.len() as i32).to_le_bytes());
            dict_body.extend_from_slice(v.as_bytes());
        }
        let mut pages = dictionary_page(2, &dict_body);
        let body = [1u8, 0x03, 0b0000_0010];
        pages.extend_from_slice(&data_page_v1(3, 8, &body)); // RLE_DICTIONARY

        let column = TestColumn {
            name: "tag",
            physical_type: 6,
            repetition: 0,
            converted_type: Some(0), // UTF8
            num_values: 3,
            dictionary: true,
            pages,
        };
        let file = build_file(3, vec![column]);
        let reader = ParquetReader::try_new(file).unwrap();
        let values = reader.read_column("tag", &ReadOptions::default()).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Str("x".to_owned()),
                Value::Str("y".to_owned()),
                Value::Str("x".to_owned()),
            ]
        );
    }

    #[test]
    fn test_missing_codec_is_reported() {
        let file = build_file(2, vec![TestColumn::required_i32("v", &[1, 2])]);
        let reader = ParquetReader::try_new(file).unwrap();
        // an empty registry still reads UNCOMPRESSED chunks
        let options = ReadOptions::builder()
            .with_codecs(CodecRegistry::empty())
            .build();
        assert_eq!(reader.read_rows(options).unwrap().len(), 2);

        let registry = CodecRegistry::empty();
        assert!(matches!(
            registry.decompress(Compression::ZSTD, &[], 1),
            Err(ParquetError::DecompressorMissing(Compression::ZSTD))
        ));
    }

    #[test]
    fn test_row_count_matches_declared_num_rows() {
        let values: Vec<i32> = (0..100).collect();
        let file = build_file(100, vec![TestColumn::required_i32("v", &values)]);
        let reader = ParquetReader::try_new(file).unwrap();
        let rows = reader.read_rows(ReadOptions::default()).unwrap();
        assert_eq!(rows.len() as i64, reader.metadata().num_rows());
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_async_reader_over_byte_source() {
        let file = build_file(4, vec![TestColumn::required_i32("v", &[7, 8, 9, 10])]);
        let mut reader = AsyncParquetReader::try_new(file).await.unwrap();
        assert_eq!(reader.metadata().num_rows(), 4);

        let mut chunks = vec![];
        reader
            .read_chunks(&ReadOptions::default(), |chunk| chunks.push(chunk))
            .await
            .unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].row_offset, 0);
        assert_eq!(chunks[0].rows.len(), 4);
        assert_eq!(chunks[0].rows[3].get("v").unwrap().as_i64(), Some(10));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_async_row_range() {
        let file = build_file(
            6,
            vec![TestColumn::required_i32("v", &[0, 1, 2, 3, 4, 5])],
        );
        let mut reader = AsyncParquetReader::try_new(file).await.unwrap();
        let options = ReadOptions::builder().with_row_range(2, 5).build();
        let rows = reader.read_rows(options).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("v").unwrap().as_i64(), Some(2));
        assert_eq!(rows[2].get("v").unwrap().as_i64(), Some(4));
    }
}

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

//! Test-only helpers for hand-encoding Thrift compact structures and whole
//! Parquet files.

/// A minimal Thrift compact protocol writer. Field ids must be written in
/// ascending order with deltas of at most 15.
pub(crate) struct ThriftWriter {
    pub(crate) buf: Vec<u8>,
    last_field_id: i16,
}

impl ThriftWriter {
    pub(crate) fn new() -> Self {
        Self {
            buf: vec![],
            last_field_id: 0,
        }
    }

    pub(crate) fn write_vlq(&mut self, mut v: u64) {
        while v > 0x7f {
            self.buf.push(v as u8 | 0x80);
            v >>= 7;
        }
        self.buf.push(v as u8);
    }

    fn write_zigzag(&mut self, v: i64) {
        self.write_vlq(((v << 1) ^ (v >> 63)) as u64);
    }

    fn field_header(&mut self, field_id: i16, field_type: u8) {
        let delta = field_id - self.last_field_id;
        assert!((1..=15).contains(&delta), "field ids must ascend");
        self.buf.push((delta as u8) << 4 | field_type);
        self.last_field_id = field_id;
    }

    pub(crate) fn i32_field(&mut self, field_id: i16, v: i32) {
        self.field_header(field_id, 5);
        self.write_zigzag(v as i64);
    }

    pub(crate) fn i64_field(&mut self, field_id: i16, v: i64) {
        self.field_header(field_id, 6);
        self.write_zigzag(v);
    }

    pub(crate) fn bool_field(&mut self, field_id: i16, v: bool) {
        self.field_header(field_id, if v { 1 } else { 2 });
    }

    pub(crate) fn string_field(&mut self, field_id: i16, v: &str) {
        self.field_header(field_id, 8);
        self.write_vlq(v.len() as u64);
        self.buf.extend_from_slice(v.as_bytes());
    }

    pub(crate) fn struct_field<F: FnOnce(&mut ThriftWriter)>(&mut self, field_id: i16, f: F) {
        self.field_header(field_id, 12);
        self.write_struct(f);
    }

    fn write_struct<F: FnOnce(&mut ThriftWriter)>(&mut self, f: F) {
        let mut inner = ThriftWriter::new();
        f(&mut inner);
        inner.stop();
        self.buf.extend_from_slice(&inner.buf);
    }

    /// Write a list field of structs, one closure call per element.
    pub(crate) fn struct_list_field(
        &mut self,
        field_id: i16,
        elements: Vec<Box<dyn FnOnce(&mut ThriftWriter)>>,
    ) {
        self.field_header(field_id, 9);
        self.list_header(elements.len(), 12);
        for element in elements {
            self.write_struct(element);
        }
    }

    /// Write a list field of i32 values (e.g. an encoding list).
    pub(crate) fn i32_list_field(&mut self, field_id: i16, values: &[i32]) {
        self.field_header(field_id, 9);
        self.list_header(values.len(), 5);
        for &v in values {
            self.write_zigzag(v as i64);
        }
    }

    /// Write a list field of strings (e.g. path_in_schema).
    pub(crate) fn string_list_field(&mut self, field_id: i16, values: &[&str]) {
        self.field_header(field_id, 9);
        self.list_header(values.len(), 8);
        for v in values {
            self.write_vlq(v.len() as u64);
            self.buf.extend_from_slice(v.as_bytes());
        }
    }

    fn list_header(&mut self, size: usize, element_type: u8) {
        if size < 15 {
            self.buf.push((size as u8) << 4 | element_type);
        } else {
            self.buf.push(0xf0 | element_type);
            self.write_vlq(size as u64);
        }
    }

    pub(crate) fn stop(&mut self) {
        self.buf.push(0);
    }
}

/// Encode an uncompressed DATA_PAGE (v1) with the given value encoding id.
/// Level encodings are RLE.
pub(crate) fn data_page_v1(num_values: i32, encoding: i32, body: &[u8]) -> Vec<u8> {
    let mut w = ThriftWriter::new();
    w.i32_field(1, 0); // DATA_PAGE
    w.i32_field(2, body.len() as i32);
    w.i32_field(3, body.len() as i32);
    w.struct_field(5, |w| {
        w.i32_field(1, num_values);
        w.i32_field(2, encoding);
        w.i32_field(3, 3); // RLE
        w.i32_field(4, 3); // RLE
    });
    w.stop();
    let mut page = w.buf;
    page.extend_from_slice(body);
    page
}

/// Encode an uncompressed DICTIONARY_PAGE with PLAIN values.
pub(crate) fn dictionary_page(num_values: i32, body: &[u8]) -> Vec<u8> {
    let mut w = ThriftWriter::new();
    w.i32_field(1, 2); // DICTIONARY_PAGE
    w.i32_field(2, body.len() as i32);
    w.i32_field(3, body.len() as i32);
    w.struct_field(7, |w| {
        w.i32_field(1, num_values);
        w.i32_field(2, 0); // PLAIN
    });
    w.stop();
    let mut page = w.buf;
    page.extend_from_slice(body);
    page
}

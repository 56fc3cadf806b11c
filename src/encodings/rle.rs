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

//! Decoder for the RLE/bit-packed hybrid encoding.
//!
//! The stream is a sequence of runs, each prefixed by a varint header:
//!
//! ```text
//! header & 1 == 0  =>  RLE run: header >> 1 copies of one value, stored
//!                      little-endian in ceil(bit_width / 8) bytes
//! header & 1 == 1  =>  bit-packed run: (header >> 1) * 8 values, packed
//!                      LSB-first at bit_width bits each
//! ```
//!
//! Runs continue until the input is exhausted or the caller has read enough
//! values. A declared bit-packed run may be cut short by the end of the
//! stream; the missing trailing values read as zero.

use bytes::Bytes;

use crate::errors::{ParquetError, Result};
use crate::util::bit_util::{BitReader, ceil};

/// Decoder for definition levels, repetition levels and dictionary indices.
pub(crate) struct RleDecoder {
    bit_width: u8,
    reader: Option<BitReader>,
    /// Values remaining in the current RLE run.
    rle_left: usize,
    /// The repeated value of the current RLE run.
    current_value: u32,
    /// Values remaining in the current bit-packed run.
    bit_packed_left: usize,
}

impl RleDecoder {
    pub(crate) fn new(bit_width: u8) -> Self {
        assert!(bit_width <= 32, "bit width {bit_width} out of range");
        Self {
            bit_width,
            reader: None,
            rle_left: 0,
            current_value: 0,
            bit_packed_left: 0,
        }
    }

    pub(crate) fn set_data(&mut self, data: Bytes) {
        self.reader = Some(BitReader::new(data));
        self.rle_left = 0;
        self.current_value = 0;
        self.bit_packed_left = 0;
    }

    /// Whole bytes consumed from the stream so far.
    pub(crate) fn consumed_bytes(&self) -> usize {
        self.reader.as_ref().map_or(0, |r| r.consumed_bytes())
    }

    /// Fill `buffer` with decoded values, returning how many were produced
    /// before the stream ran out.
    pub(crate) fn get_batch(&mut self, buffer: &mut [u32]) -> Result<usize> {
        let mut filled = 0;
        while filled < buffer.len() {
            if self.rle_left > 0 {
                let n = self.rle_left.min(buffer.len() - filled);
                buffer[filled..filled + n].fill(self.current_value);
                self.rle_left -= n;
                filled += n;
            } else if self.bit_packed_left > 0 {
                let reader = self
                    .reader
                    .as_mut()
                    .ok_or_else(|| internal_err!("RleDecoder has no data"))?;
                let n = self.bit_packed_left.min(buffer.len() - filled);
                for out in &mut buffer[filled..filled + n] {
                    // a truncated final run reads as zeros
                    *out = reader.get_value(self.bit_width as usize).unwrap_or(0) as u32;
                }
                self.bit_packed_left -= n;
                filled += n;
            } else if !self.reload()? {
                break;
            }
        }
        Ok(filled)
    }

    /// Skip `n` values, returning how many were actually skipped.
    pub(crate) fn skip(&mut self, n: usize) -> Result<usize> {
        let mut buffer = vec![0u32; n];
        self.get_batch(&mut buffer)
    }

    /// Start the next run. Returns false when the stream is exhausted.
    fn reload(&mut self) -> Result<bool> {
        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| internal_err!("RleDecoder has no data"))?;
        let Some(header) = reader.get_vlq_int() else {
            return Ok(false);
        };
        if header & 1 == 1 {
            self.bit_packed_left = ((header >> 1) * 8) as usize;
        } else {
            self.rle_left = (header >> 1) as usize;
            let value_bytes = ceil(self.bit_width as usize, 8);
            // a width of 0 reads no bytes and repeats zero
            match reader.get_aligned_bytes(value_bytes) {
                Some(bytes) => {
                    let mut value = [0u8; 4];
                    value[..bytes.len()].copy_from_slice(&bytes);
                    self.current_value = u32::from_le_bytes(value);
                }
                None => return Ok(false),
            }
        }
        Ok(true)
    }
}

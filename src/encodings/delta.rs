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

//! Decoder for the DELTA_BINARY_PACKED encoding of INT32 and INT64.
//!
//! The stream starts with a header of four varints: block size, miniblocks
//! per block, total value count, and the zig-zag encoded first value. Each
//! block then carries a zig-zag minimum delta, one bit-width byte per
//! miniblock, and the miniblocks' packed deltas. A value is reconstructed as
//! `previous + min_delta + delta`.

use bytes::Bytes;

use crate::errors::{ParquetError, Result};
use crate::util::bit_util::BitReader;

pub(crate) struct DeltaBinaryPackedDecoder {
    reader: BitReader,

    /// Number of values in each block.
    block_size: usize,
    /// Number of miniblocks in each block.
    mini_blocks_per_block: usize,
    /// Number of values in each miniblock.
    values_per_mini_block: usize,
    /// Values remaining in the stream.
    values_left: usize,
    /// Total values declared by the header.
    total_count: usize,

    /// First value from the header, emitted before any delta.
    first_value: i64,
    first_pending: bool,

    /// Minimum delta of the current block.
    min_delta: i64,
    /// Bit width of each miniblock in the current block.
    widths: Vec<u8>,
    mini_block_idx: usize,
    /// Values remaining in the current miniblock.
    mini_block_remaining: usize,
    /// Byte offset one past the current block, including padded trailing
    /// miniblocks.
    block_end_offset: usize,

    last_value: i64,
}

impl DeltaBinaryPackedDecoder {
    /// Parse the stream header and prepare to decode.
    pub(crate) fn try_new(data: Bytes) -> Result<Self> {
        let mut reader = BitReader::new(data);

        let block_size = read_header_vlq(&mut reader, "block_size")? as usize;
        let mini_blocks_per_block = read_header_vlq(&mut reader, "mini_blocks_per_block")? as usize;
        let total_count = read_header_vlq(&mut reader, "total_value_count")? as usize;
        let first_value = reader
            .get_zigzag_vlq_int()
            .ok_or_else(|| eof_err!("Not enough data to decode 'first_value'"))?;

        if block_size == 0 || block_size % 128 != 0 {
            return Err(general_err!(
                "'block_size' must be a multiple of 128, got {}",
                block_size
            ));
        }
        if mini_blocks_per_block == 0 || block_size % mini_blocks_per_block != 0 {
            return Err(general_err!(
                "'block_size' must be a multiple of 'mini_blocks_per_block' got {} and {}",
                block_size,
                mini_blocks_per_block
            ));
        }
        let values_per_mini_block = block_size / mini_blocks_per_block;
        if values_per_mini_block % 32 != 0 {
            return Err(general_err!(
                "'values_per_mini_block' must be a multiple of 32 got {}",
                values_per_mini_block
            ));
        }

        Ok(Self {
            reader,
            block_size,
            mini_blocks_per_block,
            values_per_mini_block,
            values_left: total_count,
            total_count,
            first_value,
            first_pending: total_count > 0,
            min_delta: 0,
            widths: vec![],
            mini_block_idx: 0,
            mini_block_remaining: 0,
            block_end_offset: 0,
            last_value: 0,
        })
    }

    /// Total number of values the header declares.
    pub(crate) fn total_count(&self) -> usize {
        self.total_count
    }

    /// Bytes of the stream this decoder has consumed. Once the declared
    /// values are exhausted this includes the current block's padded trailing
    /// miniblocks.
    #[allow(dead_code)]
    pub(crate) fn consumed_bytes(&self) -> usize {
        match self.values_left {
            0 => self.reader.consumed_bytes().max(self.block_end_offset),
            _ => self.reader.consumed_bytes(),
        }
    }

    /// Decode the next `n` values.
    pub(crate) fn decode(&mut self, n: usize) -> Result<Vec<i64>> {
        let to_read = n.min(self.values_left);
        let mut out = Vec::with_capacity(to_read);

        if self.first_pending && to_read > 0 {
            self.last_value = self.first_value;
            out.push(self.first_value);
            self.first_pending = false;
            self.values_left -= 1;
        }

        while out.len() < to_read {
            if self.mini_block_remaining == 0 {
                self.next_mini_block()?;
            }
            let bit_width = self.widths[self.mini_block_idx] as usize;
            let batch = self.mini_block_remaining.min(to_read - out.len());
            for _ in 0..batch {
                let delta = self.reader.get_value(bit_width).ok_or_else(|| {
                    eof_err!("Not enough data for {} bit miniblock delta", bit_width)
                })? as i64;
                // deltas may wrap around i64 when encoded (e.g. i64::MAX -
                // i64::MIN); wrapping arithmetic restores the original value
                let value = self
                    .last_value
                    .wrapping_add(self.min_delta)
                    .wrapping_add(delta);
                self.last_value = value;
                out.push(value);
            }
            self.mini_block_remaining -= batch;
            self.values_left -= batch;
        }

        // everything decoded: step over the current block's padding so the
        // consumed length covers the whole stream
        if self.values_left == 0 && self.block_end_offset > self.reader.consumed_bytes() {
            self.reader.skip_to_byte(self.block_end_offset);
        }

        Ok(out)
    }

    fn next_mini_block(&mut self) -> Result<()> {
        if self.mini_block_idx + 1 < self.widths.len() {
            self.mini_block_idx += 1;
            self.mini_block_remaining = self.values_per_mini_block;
            Ok(())
        } else {
            self.next_block()
        }
    }

    fn next_block(&mut self) -> Result<()> {
        self.min_delta = self
            .reader
            .get_zigzag_vlq_int()
            .ok_or_else(|| eof_err!("Not enough data to decode 'min_delta'"))?;

        let widths = self
            .reader
            .get_aligned_bytes(self.mini_blocks_per_block)
            .ok_or_else(|| eof_err!("Insufficient miniblock bit widths"))?;
        self.widths = widths.to_vec();
        for &w in &self.widths {
            if w > 64 {
                return Err(general_err!("Miniblock bit width {} out of range", w));
            }
        }

        // end of this block in the stream, counting every declared miniblock
        let mut offset = self.reader.consumed_bytes();
        for &w in &self.widths {
            offset += w as usize * self.values_per_mini_block / 8;
        }
        self.block_end_offset = offset;

        self.mini_block_idx = 0;
        self.mini_block_remaining = self.values_per_mini_block;
        Ok(())
    }
}

fn read_header_vlq(reader: &mut BitReader, field: &str) -> Result<u64> {
    reader
        .get_vlq_int()
        .ok_or_else(|| eof_err!("Not enough data to decode '{}'", field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_vlq(out: &mut Vec<u8>, mut v: u64) {
        while v > 0x7f {
            out.push(v as u8 | 0x80);
            v >>= 7;
        }
        out.push(v as u8);
    }

    fn write_zigzag(out: &mut Vec<u8>, v: i64) {
        write_vlq(out, ((v << 1) ^ (v >> 63)) as u64);
    }

    /// Hand-rolled encoder matching the format, used to exercise the decoder.
    fn encode(values: &[i64], block_size: usize, mini_blocks: usize) -> Vec<u8> {
        let mut out = vec![];
        write_vlq(&mut out, block_size as u64);
        write_vlq(&mut out, mini_blocks as u64);
        write_vlq(&mut out, values.len() as u64);
        write_zigzag(&mut out, values[0]);

        let values_per_mini = block_size / mini_blocks;
        let deltas: Vec<i64> = values.windows(2).map(|w| w[1] - w[0]).collect();

        for block in deltas.chunks(block_size) {
            let min_delta = block.iter().copied().min().unwrap();
            write_zigzag(&mut out, min_delta);

            let adjusted: Vec<u64> = block.iter().map(|d| (d - min_delta) as u64).collect();
            let mut widths = vec![0u8; mini_blocks];
            for (i, mini) in adjusted.chunks(values_per_mini).enumerate() {
                let max = mini.iter().copied().max().unwrap_or(0);
                widths[i] = (64 - max.leading_zeros()) as u8;
            }
            out.extend_from_slice(&widths);

            for (i, mini) in adjusted.chunks(values_per_mini).enumerate() {
                let width = widths[i] as usize;
                if width == 0 {
                    continue;
                }
                let mut bit_buf = 0u64;
                let mut bit_len = 0usize;
                // trailing miniblock positions are padded with zeros
                for slot in 0..values_per_mini {
                    let v = mini.get(slot).copied().unwrap_or(0);
                    bit_buf |= v << bit_len;
                    bit_len += width;
                    while bit_len >= 8 {
                        out.push(bit_buf as u8);
                        bit_buf >>= 8;
                        bit_len -= 8;
                    }
                }
                if bit_len > 0 {
                    out.push(bit_buf as u8);
                }
            }
        }
        out
    }

    #[test]
    fn test_ascending_sequence_roundtrip() {
        let values: Vec<i64> = (1..=10).collect();
        let data = encode(&values, 128, 4);
        let mut decoder = DeltaBinaryPackedDecoder::try_new(Bytes::from(data)).unwrap();
        assert_eq!(decoder.total_count(), 10);
        assert_eq!(decoder.decode(10).unwrap(), values);
    }

    #[test]
    fn test_constant_deltas_need_no_bits() {
        // deltas are all 1, so every miniblock width is 0
        let values: Vec<i64> = (0..200).map(|i| 5 + i).collect();
        let data = encode(&values, 128, 4);
        let mut decoder = DeltaBinaryPackedDecoder::try_new(Bytes::from(data)).unwrap();
        assert_eq!(decoder.decode(200).unwrap(), values);
    }

    #[test]
    fn test_negative_and_mixed_deltas() {
        let values = vec![7i64, -3, 4, 4, -100, 250, 0, i32::MAX as i64, i32::MIN as i64];
        let data = encode(&values, 128, 4);
        let mut decoder = DeltaBinaryPackedDecoder::try_new(Bytes::from(data)).unwrap();
        assert_eq!(decoder.decode(values.len()).unwrap(), values);
    }

    #[test]
    fn test_multiple_blocks() {
        let values: Vec<i64> = (0..300).map(|i| i * i).collect();
        let data = encode(&values, 128, 4);
        let mut decoder = DeltaBinaryPackedDecoder::try_new(Bytes::from(data)).unwrap();
        assert_eq!(decoder.decode(300).unwrap(), values);
    }

    #[test]
    fn test_incremental_decode() {
        let values: Vec<i64> = (0..100).map(|i| i * 3 - 50).collect();
        let data = encode(&values, 128, 4);
        let mut decoder = DeltaBinaryPackedDecoder::try_new(Bytes::from(data)).unwrap();
        assert_eq!(decoder.decode(40).unwrap(), &values[..40]);
        assert_eq!(decoder.decode(60).unwrap(), &values[40..]);
    }

    #[test]
    fn test_single_value_stream() {
        let data = encode(&[42], 128, 4);
        let mut decoder = DeltaBinaryPackedDecoder::try_new(Bytes::from(data)).unwrap();
        assert_eq!(decoder.decode(1).unwrap(), vec![42]);
        assert_eq!(decoder.decode(1).unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn test_block_size_must_be_multiple_of_128() {
        let mut data = vec![];
        write_vlq(&mut data, 100);
        write_vlq(&mut data, 4);
        write_vlq(&mut data, 1);
        write_zigzag(&mut data, 0);
        assert!(DeltaBinaryPackedDecoder::try_new(Bytes::from(data)).is_err());
    }

    #[test]
    fn test_truncated_header() {
        let mut data = vec![];
        write_vlq(&mut data, 128);
        assert!(matches!(
            DeltaBinaryPackedDecoder::try_new(Bytes::from(data)),
            Err(ParquetError::EOF(_))
        ));
    }

    #[test]
    fn test_consumed_bytes_covers_padded_trailers() {
        let values: Vec<i64> = (0..10).map(|i| i * 7).collect();
        let data = encode(&values, 128, 4);
        let total = data.len();
        let mut decoder = DeltaBinaryPackedDecoder::try_new(Bytes::from(data)).unwrap();
        decoder.decode(10).unwrap();
        assert_eq!(decoder.consumed_bytes(), total);
    }
}

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

//! Utilities for bit-packed reads that cross byte boundaries.

use bytes::Bytes;

/// Returns the ceiling of `value`/`divisor`.
pub(crate) fn ceil(value: usize, divisor: usize) -> usize {
    value.div_ceil(divisor)
}

/// Returns the number of bits needed to store `x`.
pub(crate) fn num_required_bits(x: u64) -> u8 {
    (64 - x.leading_zeros()) as u8
}

#[inline]
fn low_mask(bits: u8) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Reads values packed LSB-first at arbitrary bit widths.
///
/// Bytes are pulled into a sliding 64-bit register and never reread; values
/// are extracted by mask and shift, refilling the register when fewer than the
/// requested number of bits remain.
pub(crate) struct BitReader {
    data: Bytes,
    /// Next byte to pull into the register.
    byte_offset: usize,
    /// Register of loaded, unconsumed bits (low bits valid).
    buffered: u64,
    /// Number of valid bits in `buffered`.
    bit_count: u8,
}

impl BitReader {
    pub(crate) fn new(data: Bytes) -> Self {
        Self {
            data,
            byte_offset: 0,
            buffered: 0,
            bit_count: 0,
        }
    }

    /// Total unconsumed bits, including those buffered in the register.
    fn remaining_bits(&self) -> usize {
        (self.data.len() - self.byte_offset) * 8 + self.bit_count as usize
    }

    fn refill(&mut self) {
        while self.bit_count <= 56 && self.byte_offset < self.data.len() {
            self.buffered |= (self.data[self.byte_offset] as u64) << self.bit_count;
            self.bit_count += 8;
            self.byte_offset += 1;
        }
    }

    #[inline]
    fn consume(&mut self, bits: u8) -> u64 {
        let v = self.buffered & low_mask(bits);
        if bits >= 64 {
            self.buffered = 0;
        } else {
            self.buffered >>= bits;
        }
        self.bit_count -= bits;
        v
    }

    /// Read the next `num_bits` bits as an unsigned integer, LSB first.
    ///
    /// Returns `None` when fewer than `num_bits` bits remain. A width of zero
    /// always yields zero.
    pub(crate) fn get_value(&mut self, num_bits: usize) -> Option<u64> {
        if num_bits == 0 {
            return Some(0);
        }
        if num_bits > 64 || self.remaining_bits() < num_bits {
            return None;
        }
        let mut v = 0u64;
        let mut got = 0u8;
        let num_bits = num_bits as u8;
        while got < num_bits {
            if self.bit_count == 0 {
                self.refill();
            }
            let take = self.bit_count.min(num_bits - got);
            v |= self.consume(take) << got;
            got += take;
        }
        Some(v)
    }

    /// Fill `batch` with values of `bit_width` bits each, returning the number
    /// of values read before the input ran out.
    pub(crate) fn get_batch(&mut self, batch: &mut [u64], bit_width: usize) -> usize {
        for (i, out) in batch.iter_mut().enumerate() {
            match self.get_value(bit_width) {
                Some(v) => *out = v,
                None => return i,
            }
        }
        batch.len()
    }

    /// Read a ULEB128 varint. Only valid at a byte boundary.
    pub(crate) fn get_vlq_int(&mut self) -> Option<u64> {
        let mut v = 0u64;
        let mut shift = 0u32;
        for _ in 0..10 {
            let byte = self.get_value(8)? as u8;
            v |= ((byte & 0x7f) as u64).wrapping_shl(shift);
            if byte & 0x80 == 0 {
                return Some(v);
            }
            shift += 7;
        }
        None
    }

    /// Read a zig-zag encoded varint. Only valid at a byte boundary.
    pub(crate) fn get_zigzag_vlq_int(&mut self) -> Option<i64> {
        let v = self.get_vlq_int()?;
        Some((v >> 1) as i64 ^ -((v & 1) as i64))
    }

    /// Number of whole bytes consumed so far, counting a partially consumed
    /// byte as consumed.
    pub(crate) fn consumed_bytes(&self) -> usize {
        ceil(self.byte_offset * 8 - self.bit_count as usize, 8)
    }

    /// Read `n` raw bytes starting at the next byte boundary.
    pub(crate) fn get_aligned_bytes(&mut self, n: usize) -> Option<Bytes> {
        let start = self.consumed_bytes();
        if start + n > self.data.len() {
            return None;
        }
        let ret = self.data.slice(start..start + n);
        self.byte_offset = start + n;
        self.buffered = 0;
        self.bit_count = 0;
        Some(ret)
    }

    /// Reposition the reader to an absolute byte offset at or past the
    /// current position.
    pub(crate) fn skip_to_byte(&mut self, offset: usize) -> bool {
        if offset < self.consumed_bytes() || offset > self.data.len() {
            return false;
        }
        self.byte_offset = offset;
        self.buffered = 0;
        self.bit_count = 0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil() {
        assert_eq!(ceil(0, 8), 0);
        assert_eq!(ceil(1, 8), 1);
        assert_eq!(ceil(8, 8), 1);
        assert_eq!(ceil(9, 8), 2);
    }

    #[test]
    fn test_num_required_bits() {
        assert_eq!(num_required_bits(0), 0);
        assert_eq!(num_required_bits(1), 1);
        assert_eq!(num_required_bits(2), 2);
        assert_eq!(num_required_bits(7), 3);
        assert_eq!(num_required_bits(8), 4);
        assert_eq!(num_required_bits(u64::MAX), 64);
    }

    #[test]
    fn test_packed_values_cross_byte_boundaries() {
        // 0..=7 packed at 3 bits: 10001000 11000110 11111010
        let data = Bytes::from_static(&[0x88, 0xc6, 0xfa]);
        let mut reader = BitReader::new(data);
        let mut batch = [0u64; 8];
        assert_eq!(reader.get_batch(&mut batch, 3), 8);
        assert_eq!(batch, [0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(reader.get_value(3), None);
    }

    #[test]
    fn test_width_zero_always_yields_zeros() {
        let mut reader = BitReader::new(Bytes::new());
        assert_eq!(reader.get_value(0), Some(0));
        assert_eq!(reader.get_value(1), None);
    }

    #[test]
    fn test_wide_values() {
        let mut data = vec![];
        data.extend_from_slice(&u64::MAX.to_le_bytes());
        data.extend_from_slice(&0x0123456789abcdefu64.to_le_bytes());
        let mut reader = BitReader::new(Bytes::from(data));
        assert_eq!(reader.get_value(64), Some(u64::MAX));
        assert_eq!(reader.get_value(64), Some(0x0123456789abcdef));
    }

    #[test]
    fn test_misaligned_wide_value() {
        // a 4-bit value followed by a 60-bit value
        let mut data = vec![0u8; 8];
        let packed: u64 = 0x5 | (0x0fff_ffff_ffff_fffu64 << 4);
        data.copy_from_slice(&packed.to_le_bytes());
        let mut reader = BitReader::new(Bytes::from(data));
        assert_eq!(reader.get_value(4), Some(0x5));
        assert_eq!(reader.get_value(60), Some(0x0fff_ffff_ffff_fff));
    }

    #[test]
    fn test_vlq_and_zigzag() {
        let data = Bytes::from_static(&[0xac, 0x02, 0x03]);
        let mut reader = BitReader::new(data);
        assert_eq!(reader.get_vlq_int(), Some(300));
        assert_eq!(reader.get_zigzag_vlq_int(), Some(-2));
    }

    #[test]
    fn test_aligned_bytes_after_partial_byte() {
        let data = Bytes::from_static(&[0b0000_0101, 0xaa, 0xbb, 0xcc]);
        let mut reader = BitReader::new(data);
        assert_eq!(reader.get_value(3), Some(5));
        // partially consumed byte counts as consumed
        assert_eq!(reader.consumed_bytes(), 1);
        let bytes = reader.get_aligned_bytes(2).unwrap();
        assert_eq!(bytes.as_ref(), &[0xaa, 0xbb]);
        assert_eq!(reader.get_value(8), Some(0xcc));
    }

    #[test]
    fn test_skip_to_byte() {
        let data = Bytes::from_static(&[0x01, 0x02, 0x03]);
        let mut reader = BitReader::new(data);
        assert!(reader.skip_to_byte(2));
        assert_eq!(reader.get_value(8), Some(0x03));
        assert!(!reader.skip_to_byte(1));
    }
}

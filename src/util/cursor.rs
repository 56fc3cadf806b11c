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

//! Bounds-checked little-endian cursor over an in-memory page buffer.

use bytes::Bytes;

use crate::errors::{ParquetError, Result};

/// A byte slice bundled with a mutable offset.
///
/// All reads are little-endian and bounds-checked; an underflow surfaces as a
/// truncated-input error. Byte runs are returned as zero-copy sub-slices of
/// the underlying buffer.
pub(crate) struct ByteCursor {
    data: Bytes,
    offset: usize,
}

macro_rules! read_le {
    ($name:ident, $ty:ty) => {
        #[allow(dead_code)]
        pub(crate) fn $name(&mut self) -> Result<$ty> {
            const N: usize = std::mem::size_of::<$ty>();
            let slice: [u8; N] = self.bytes_checked(N)?.try_into().unwrap();
            self.offset += N;
            Ok(<$ty>::from_le_bytes(slice))
        }
    };
}

impl ByteCursor {
    pub(crate) fn new(data: Bytes) -> Self {
        Self { data, offset: 0 }
    }

    /// The current byte offset.
    pub(crate) fn position(&self) -> usize {
        self.offset
    }

    /// Bytes left between the offset and the end of the slice.
    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn bytes_checked(&self, n: usize) -> Result<&[u8]> {
        self.data.get(self.offset..self.offset + n).ok_or_else(|| {
            eof_err!(
                "Truncated input: need {} bytes at offset {}, have {}",
                n,
                self.offset,
                self.data.len() - self.offset
            )
        })
    }

    read_le!(read_u8, u8);
    read_le!(read_u16, u16);
    read_le!(read_i16, i16);
    read_le!(read_u32, u32);
    read_le!(read_i32, i32);
    read_le!(read_u64, u64);
    read_le!(read_i64, i64);
    read_le!(read_f32, f32);
    read_le!(read_f64, f64);

    /// Read a fixed-length run of bytes as a zero-copy sub-slice.
    pub(crate) fn read_slice(&mut self, len: usize) -> Result<Bytes> {
        self.bytes_checked(len)?;
        let ret = self.data.slice(self.offset..self.offset + len);
        self.offset += len;
        Ok(ret)
    }

    /// Advance the offset by `n` bytes.
    pub(crate) fn advance(&mut self, n: usize) -> Result<()> {
        self.bytes_checked(n)?;
        self.offset += n;
        Ok(())
    }

    /// The unconsumed remainder as a zero-copy sub-slice.
    pub(crate) fn remaining_bytes(&self) -> Bytes {
        self.data.slice(self.offset..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_reads() {
        let mut data = vec![];
        data.extend_from_slice(&0x12u8.to_le_bytes());
        data.extend_from_slice(&0x3456u16.to_le_bytes());
        data.extend_from_slice(&(-7i32).to_le_bytes());
        data.extend_from_slice(&0x1122334455667788u64.to_le_bytes());
        data.extend_from_slice(&1.5f32.to_le_bytes());
        data.extend_from_slice(&(-2.25f64).to_le_bytes());

        let mut cursor = ByteCursor::new(Bytes::from(data));
        assert_eq!(cursor.read_u8().unwrap(), 0x12);
        assert_eq!(cursor.read_u16().unwrap(), 0x3456);
        assert_eq!(cursor.read_i32().unwrap(), -7);
        assert_eq!(cursor.read_u64().unwrap(), 0x1122334455667788);
        assert_eq!(cursor.read_f32().unwrap(), 1.5);
        assert_eq!(cursor.read_f64().unwrap(), -2.25);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_slice_is_zero_copy() {
        let data = Bytes::from_static(b"hello world");
        let mut cursor = ByteCursor::new(data.clone());
        cursor.advance(6).unwrap();
        let s = cursor.read_slice(5).unwrap();
        assert_eq!(s.as_ref(), b"world");
        // sub-slice shares the original allocation
        assert_eq!(s.as_ptr(), data[6..].as_ptr());
    }

    #[test]
    fn test_underflow_is_eof() {
        let mut cursor = ByteCursor::new(Bytes::from_static(&[1, 2, 3]));
        assert!(matches!(cursor.read_u32(), Err(ParquetError::EOF(_))));
        // a failed read must not move the offset
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.read_u8().unwrap(), 1);
    }
}

//! Bit framing over byte streams.
//!
//! Every physical representation in this crate is a flat bit stream, most-significant bit
//! first within each byte. [`BitsToByteSink`] packs bits into bytes through an 8-bit shift
//! register and only emits a byte once 8 bits have accumulated. [`ByteToBitSource`] is its
//! inverse and refills from the underlying byte iterator every 8 bits.
use smallvec::{Array, SmallVec};

/// Destination for bytes.
pub trait ByteSink {
    fn append_byte(&mut self, byte: u8);

    fn append_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.append_byte(byte);
        }
    }
}

impl ByteSink for Vec<u8> {
    #[inline]
    fn append_byte(&mut self, byte: u8) {
        self.push(byte);
    }

    fn append_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl<A: Array<Item = u8>> ByteSink for SmallVec<A> {
    #[inline]
    fn append_byte(&mut self, byte: u8) {
        self.push(byte);
    }
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    #[inline]
    fn append_byte(&mut self, byte: u8) {
        (**self).append_byte(byte)
    }
}

/// Destination for single bits.
pub trait BitSink {
    fn append_bit(&mut self, bit: bool);
}

impl BitSink for Vec<bool> {
    #[inline]
    fn append_bit(&mut self, bit: bool) {
        self.push(bit);
    }
}

impl<A: Array<Item = bool>> BitSink for SmallVec<A> {
    #[inline]
    fn append_bit(&mut self, bit: bool) {
        self.push(bit);
    }
}

impl<T: BitSink + ?Sized> BitSink for &mut T {
    #[inline]
    fn append_bit(&mut self, bit: bool) {
        (**self).append_bit(bit)
    }
}

const BITS_IN_BYTE: u8 = 8;

/// Packs bits into bytes, most-significant bit first.
///
/// ```rust
/// # use sdschema::bits::{BitSink, BitsToByteSink};
/// let mut sink = BitsToByteSink::new(Vec::new());
/// for bit in [true, false, true, false, true, false, true, false] {
///     sink.append_bit(bit);
/// }
/// assert_eq!(sink.finish(), vec![0xAA]);
/// ```
#[derive(Debug)]
pub struct BitsToByteSink<S> {
    bytes: S,
    next_byte: u8,
    buffered_bits: u8,
}

impl<S: ByteSink> BitsToByteSink<S> {
    pub fn new(bytes: S) -> Self {
        Self {
            bytes,
            next_byte: 0,
            buffered_bits: 0,
        }
    }

    /// Number of bits waiting for the current byte to be completed.
    #[inline]
    pub fn buffered_bits(&self) -> usize {
        self.buffered_bits as usize
    }

    /// Emit a trailing partial byte (padded with zero bits) and return the byte sink.
    pub fn finish(mut self) -> S {
        if self.buffered_bits != 0 {
            self.bytes.append_byte(self.next_byte);
        }
        self.bytes
    }
}

impl<S: ByteSink> BitSink for BitsToByteSink<S> {
    fn append_bit(&mut self, bit: bool) {
        if self.buffered_bits == 0 {
            self.next_byte = 0;
        }
        self.next_byte |= (bit as u8) << (BITS_IN_BYTE - 1 - self.buffered_bits);
        self.buffered_bits += 1;
        if self.buffered_bits == BITS_IN_BYTE {
            self.bytes.append_byte(self.next_byte);
            self.buffered_bits = 0;
        }
    }
}

/// Unpacks bytes into bits, most-significant bit first.
#[derive(Debug, Clone)]
pub struct ByteToBitSource<I> {
    bytes: I,
    buffer: u8,
    buffered_bits: u8,
}

impl<I: Iterator<Item = u8>> ByteToBitSource<I> {
    pub fn new(bytes: I) -> Self {
        Self {
            bytes,
            buffer: 0,
            buffered_bits: 0,
        }
    }

    /// Discard `count` bits. Returns `false` if the source ran dry first.
    pub fn skip_bits(&mut self, count: u64) -> bool {
        (0..count).all(|_| self.next().is_some())
    }
}

impl<I: Iterator<Item = u8>> Iterator for ByteToBitSource<I> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.buffered_bits == 0 {
            self.buffer = self.bytes.next()?;
            self.buffered_bits = BITS_IN_BYTE;
        }
        let bit = (self.buffer >> (self.buffered_bits - 1)) & 0x01 != 0;
        self.buffered_bits -= 1;
        Some(bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_sink_emits_only_full_bytes() {
        let mut buffer: Vec<u8> = Vec::new();
        let mut expected: Vec<u8> = Vec::new();
        {
            let mut writer = BitsToByteSink::new(&mut buffer);
            assert_eq!(writer.buffered_bits(), 0);
            for _ in 0..3 {
                for (i, bit) in [true, false, true, false, true, false, true]
                    .into_iter()
                    .enumerate()
                {
                    writer.append_bit(bit);
                    assert_eq!(writer.buffered_bits(), i + 1);
                }
                writer.append_bit(false);
                assert_eq!(writer.buffered_bits(), 0);
            }
            writer.finish();
        }
        expected.extend([0xAA, 0xAA, 0xAA]);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn finish_pads_partial_byte() {
        let mut writer = BitsToByteSink::new(Vec::new());
        writer.append_bit(true);
        writer.append_bit(true);
        writer.append_bit(false);
        writer.append_bit(true);
        assert_eq!(writer.finish(), vec![0b1101_0000]);
    }

    #[test]
    fn finish_without_bits_emits_nothing() {
        let writer = BitsToByteSink::new(Vec::new());
        assert!(writer.finish().is_empty());
    }

    #[test]
    fn source_reads_msb_first() {
        let bits: Vec<bool> = ByteToBitSource::new([0x81u8, 0x40].into_iter()).collect();
        assert_eq!(bits.len(), 16);
        assert!(bits[0] && bits[7] && bits[9]);
        assert_eq!(bits.iter().filter(|b| **b).count(), 3);
    }

    #[test]
    fn source_skip_reports_exhaustion() {
        let mut source = ByteToBitSource::new([0x0Fu8].into_iter());
        assert!(source.skip_bits(4));
        assert_eq!(source.next(), Some(true));
        assert!(!source.skip_bits(4));
        assert_eq!(source.next(), None);
    }
}

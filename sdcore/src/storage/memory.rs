use std::iter::Copied;
use std::slice::Iter;

use log::trace;
use sdschema::bits::ByteSink;

use super::Storage;
use crate::{
    address::Address,
    config::StorageConfig,
    utils::error::{SdError, SdResult},
};

/// Storage backed by a single contiguous, growable byte buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    memory: Vec<u8>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            memory: Vec::with_capacity(capacity),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::with_capacity(config.initial_capacity)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.memory
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Drop every byte from `len` onward.
    pub fn truncate(&mut self, len: usize) {
        self.memory.truncate(len);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.memory
    }

    /// Offset of the byte containing `address`, clamped to the end of the buffer.
    fn clamp(&self, address: Address) -> usize {
        usize::try_from(address.byte_index())
            .map_or(self.memory.len(), |index| index.min(self.memory.len()))
    }
}

impl From<Vec<u8>> for MemoryStorage {
    fn from(memory: Vec<u8>) -> Self {
        Self { memory }
    }
}

/// Writer over a [`MemoryStorage`]: overwrites in place, then appends.
#[derive(Debug)]
pub struct MemoryWriter<'a> {
    memory: &'a mut Vec<u8>,
    position: usize,
}

impl ByteSink for MemoryWriter<'_> {
    fn append_byte(&mut self, byte: u8) {
        match self.memory.get_mut(self.position) {
            Some(slot) => *slot = byte,
            None => self.memory.push(byte),
        }
        self.position += 1;
    }
}

impl Storage for MemoryStorage {
    type Reader<'a> = Copied<Iter<'a, u8>>;
    type Writer<'a> = MemoryWriter<'a>;

    fn read_at(&self, address: Address) -> Self::Reader<'_> {
        let start = self.clamp(address);
        self.memory[start..].iter().copied()
    }

    /// Writing past the end zero-fills the gap up to the byte containing `address`.
    ///
    /// The gap is reserved up front, so an unreachable address fails with
    /// [`SdError::StorageExhausted`] and leaves the buffer unchanged.
    fn write_at(&mut self, address: Address) -> SdResult<Self::Writer<'_>> {
        let requested = address.byte_index();
        let position =
            usize::try_from(requested).map_err(|_| SdError::StorageExhausted { requested })?;
        if position > self.memory.len() {
            self.memory
                .try_reserve(position - self.memory.len())
                .map_err(|_| SdError::StorageExhausted { requested })?;
            trace!(
                "Zero-filling storage from {} to {} bytes",
                self.memory.len(),
                position
            );
            self.memory.resize(position, 0);
        }
        Ok(MemoryWriter {
            memory: &mut self.memory,
            position,
        })
    }
}

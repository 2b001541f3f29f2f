use std::ops::Deref;

use crate::value::Value;

// ── Opcodes (one byte, optional one-byte operand) ────────────────────

pub const OP_CONSTANT: u8 = 0; // operand: constant pool index
pub const OP_ADD: u8 = 1;
pub const OP_SUBTRACT: u8 = 2;
pub const OP_MULTIPLY: u8 = 3;
pub const OP_DIVIDE: u8 = 4;
pub const OP_NEGATE: u8 = 5;
pub const OP_RETURN: u8 = 6;

// ── Growable buffer ──────────────────────────────────────────────────

const MIN_CAPACITY: usize = 8;

fn grow_capacity(capacity: usize) -> usize {
    if capacity < MIN_CAPACITY { MIN_CAPACITY } else { capacity * 2 }
}

/// Append-only buffer with an explicit doubling growth policy, shared by
/// the instruction stream, the line table, and the constant pool. The
/// growth schedule is managed here rather than left to the allocator so
/// appends stay amortized O(1) with a predictable capacity sequence
/// (8, 16, 32, ...).
#[derive(Debug, Default, Clone)]
pub struct DynArray<T> {
    items: Vec<T>,
}

impl<T> DynArray<T> {
    pub fn new() -> Self {
        DynArray { items: Vec::new() }
    }

    /// Append one element, doubling capacity first if the buffer is full.
    pub fn write(&mut self, value: T) {
        if self.items.len() == self.items.capacity() {
            let grown = grow_capacity(self.items.capacity());
            self.items.reserve_exact(grown - self.items.len());
        }
        self.items.push(value);
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Release the backing storage and reset to the empty state.
    /// Idempotent; the buffer is reusable afterwards.
    pub fn free(&mut self) {
        self.items = Vec::new();
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

// ── Chunk ────────────────────────────────────────────────────────────

/// A unit of compiled bytecode: instruction bytes, a parallel per-byte
/// source line table, and a constant pool. `lines` and `code` always have
/// the same length; keeping the line table out of `code` keeps the hot
/// instruction stream compact while staying indexable by the same offset
/// the VM's cursor uses.
#[derive(Debug, Default, Clone)]
pub struct Chunk {
    pub code: DynArray<u8>,
    pub lines: DynArray<u32>,
    pub constants: DynArray<Value>,
}

impl Chunk {
    pub fn new() -> Self {
        Chunk {
            code: DynArray::new(),
            lines: DynArray::new(),
            constants: DynArray::new(),
        }
    }

    /// Append one instruction or operand byte, tagged with the source line
    /// that produced it.
    pub fn write(&mut self, byte: u8, line: u32) {
        self.code.write(byte);
        self.lines.write(line);
    }

    /// Add a value to the constant pool and return its index. Indices are
    /// stable for the lifetime of the chunk; constants are never removed
    /// or reordered. An `OP_CONSTANT` operand holds a single byte, so a
    /// producer emitting more than 256 constants needs a wider encoding —
    /// the VM bounds-checks the operand at execution time regardless.
    pub fn add_constant(&mut self, value: Value) -> usize {
        self.constants.write(value);
        self.constants.count() - 1
    }

    /// Release all three buffers. The chunk is reusable afterwards.
    pub fn free(&mut self) {
        self.code.free();
        self.lines.free();
        self.constants.free();
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty_with_no_storage() {
        let array: DynArray<u8> = DynArray::new();
        assert_eq!(array.count(), 0);
        assert_eq!(array.capacity(), 0);
    }

    #[test]
    fn capacity_doubles_from_minimum() {
        let mut array = DynArray::new();
        let mut capacities = Vec::new();
        for i in 0..100u8 {
            array.write(i);
            if capacities.last() != Some(&array.capacity()) {
                capacities.push(array.capacity());
            }
        }
        assert_eq!(capacities, vec![8, 16, 32, 64, 128]);
    }

    #[test]
    fn append_count_and_amortized_growth() {
        let mut array = DynArray::new();
        let mut reallocations = 0;
        let mut capacity = array.capacity();
        for i in 0..10_000usize {
            array.write(i);
            assert_eq!(array.count(), i + 1);
            assert!(array.capacity() >= array.count());
            if array.capacity() != capacity {
                assert_eq!(array.capacity(), grow_capacity(capacity));
                capacity = array.capacity();
                reallocations += 1;
            }
        }
        // Doubling from 8 reaches 10_000 elements in 11 growth steps.
        assert_eq!(reallocations, 11);
    }

    #[test]
    fn free_resets_and_is_idempotent() {
        let mut array = DynArray::new();
        array.write(1u8);
        array.write(2u8);
        array.free();
        assert_eq!(array.count(), 0);
        assert_eq!(array.capacity(), 0);
        array.free();
        assert_eq!(array.count(), 0);
        array.write(3u8);
        assert_eq!(array.count(), 1);
        assert_eq!(array[0], 3);
    }

    #[test]
    fn write_keeps_lines_in_lockstep() {
        let mut chunk = Chunk::new();
        let index = chunk.add_constant(1.2);
        chunk.write(OP_CONSTANT, 123);
        chunk.write(index as u8, 123);
        chunk.write(OP_RETURN, 124);
        assert_eq!(chunk.code.count(), chunk.lines.count());
        assert_eq!(&chunk.code[..], &[OP_CONSTANT, 0, OP_RETURN]);
        assert_eq!(&chunk.lines[..], &[123, 123, 124]);
    }

    #[test]
    fn constant_indices_are_stable_and_increasing() {
        let mut chunk = Chunk::new();
        for i in 0..10 {
            let value = i as Value * 1.5;
            let index = chunk.add_constant(value);
            assert_eq!(index, i);
            assert_eq!(chunk.constants[index], value);
        }
        // Earlier entries are untouched by later appends.
        assert_eq!(chunk.constants[0], 0.0);
        assert_eq!(chunk.constants[4], 6.0);
    }

    #[test]
    fn chunk_free_releases_all_buffers() {
        let mut chunk = Chunk::new();
        chunk.add_constant(1.0);
        chunk.write(OP_RETURN, 1);
        chunk.free();
        assert_eq!(chunk.code.count(), 0);
        assert_eq!(chunk.lines.count(), 0);
        assert_eq!(chunk.constants.count(), 0);
    }
}

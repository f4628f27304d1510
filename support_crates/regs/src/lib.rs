//! Library for modelling memory mapped register blocks and the bitfields inside them
#![no_std]

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::cell::{Cell, UnsafeCell};
use core::ptr;

/// Geometry of a bitfield inside a register block.
///
/// A field lives in the 32-bit word at byte `offset` from the start of the block and covers `width` bits starting
/// at bit `shift`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Field {
    pub offset: usize,
    pub shift: u8,
    pub width: u8,
}

impl Field {
    pub const fn new(offset: usize, shift: u8, width: u8) -> Self {
        match Self::try_new(offset, shift, width) {
            Some(field) => field,
            None => panic!("bitfield does not fit into a 32-bit register"),
        }
    }

    /// Like [`new`](Field::new) but returns `None` if the field is empty or reaches past bit 31
    pub const fn try_new(offset: usize, shift: u8, width: u8) -> Option<Self> {
        if width == 0 || shift as u32 + width as u32 > 32 {
            return None;
        }
        Some(Self {
            offset,
            shift,
            width,
        })
    }

    /// A single bit field
    pub const fn bit(offset: usize, shift: u8) -> Self {
        Self::new(offset, shift, 1)
    }

    /// The mask of this field, already shifted into position
    pub const fn mask(&self) -> u32 {
        (u32::MAX >> (32 - self.width as u32)) << self.shift
    }

    /// Extract this field's value out of the full register word
    pub const fn extract(&self, word: u32) -> u32 {
        (word & self.mask()) >> self.shift
    }

    /// Replace this field's bits in `word` with `value`.
    ///
    /// Bits of `value` that don't fit into the field are dropped.
    pub const fn insert(&self, word: u32, value: u32) -> u32 {
        (word & !self.mask()) | ((value << self.shift) & self.mask())
    }
}

/// A block of 32-bit registers that is addressed by byte offsets.
pub trait RegisterBlock {
    /// Read the full register word at `offset`
    fn read(&self, offset: usize) -> u32;

    /// Write the full register word at `offset`
    fn write(&self, offset: usize, value: u32);

    /// Number of bytes covered by the block
    fn size(&self) -> usize;

    /// Read the current value of a bitfield
    fn read_field(&self, field: Field) -> u32 {
        field.extract(self.read(field.offset))
    }

    /// Read-modify-write a bitfield, leaving all other bits of the register untouched
    fn write_field(&self, field: Field, value: u32) {
        let word = self.read(field.offset);
        self.write(field.offset, field.insert(word, value));
    }

    /// Whether a single bit is currently set
    fn bit_is_set(&self, offset: usize, shift: u8) -> bool {
        self.read_field(Field::bit(offset, shift)) == 1
    }
}

impl<T: RegisterBlock + ?Sized> RegisterBlock for &T {
    fn read(&self, offset: usize) -> u32 {
        (**self).read(offset)
    }

    fn write(&self, offset: usize, value: u32) {
        (**self).write(offset, value)
    }

    fn size(&self) -> usize {
        (**self).size()
    }
}

/// A volatile memory area that may change unexpectedly and does not honor normal memory semantics.
///
/// This cell variant always uses explicitly volatile read and write operations that are not optimized out by the
/// compiler.
#[repr(transparent)]
struct VolatileCell<T> {
    value: UnsafeCell<T>,
}

impl<T: Copy> VolatileCell<T> {
    #[inline(always)]
    unsafe fn get(&self) -> T {
        ptr::read_volatile(self.value.get())
    }

    #[inline(always)]
    unsafe fn set(&self, value: T) {
        ptr::write_volatile(self.value.get(), value)
    }
}

/// A memory mapped register block accessed through volatile 32-bit loads and stores.
#[derive(Debug)]
pub struct MmioBlock {
    base: *mut u32,
    len: usize,
}

impl MmioBlock {
    /// Create a register block that is memory mapped at `base` and spans `len` bytes.
    ///
    /// # Safety
    /// - `base` must point to a mapped register region of at least `len` bytes that is 4-byte aligned.
    ///
    /// - For correct *mut* semantics the caller must also ensure that no two instances are created for the same
    /// memory mapped device.
    pub unsafe fn from_ptr(base: *mut u32, len: usize) -> Self {
        Self { base, len }
    }

    fn cell(&self, offset: usize) -> &VolatileCell<u32> {
        assert!(
            offset % 4 == 0 && offset + 4 <= self.len,
            "register offset {offset:#x} is outside of the mapped block"
        );
        // the constructor contract guarantees that every aligned word inside `len` is a valid register
        unsafe { &*(self.base.add(offset / 4) as *const VolatileCell<u32>) }
    }
}

impl RegisterBlock for MmioBlock {
    fn read(&self, offset: usize) -> u32 {
        unsafe { self.cell(offset).get() }
    }

    fn write(&self, offset: usize, value: u32) {
        unsafe { self.cell(offset).set(value) }
    }

    fn size(&self) -> usize {
        self.len
    }
}

/// A register block that is backed by normal memory.
///
/// It behaves like a register block without side effects and is used to simulate a device, e.g. to prepare
/// a known hardware state before a driver inspects it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShadowBlock {
    words: Vec<Cell<u32>>,
}

impl ShadowBlock {
    /// Create a zeroed block spanning `len` bytes
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![Cell::new(0); len.div_ceil(4)],
        }
    }

    /// Builder style variant of [`write_field`](RegisterBlock::write_field)
    pub fn with_field(self, field: Field, value: u32) -> Self {
        self.write_field(field, value);
        self
    }

    /// Builder style variant of [`write`](RegisterBlock::write)
    pub fn with_word(self, offset: usize, value: u32) -> Self {
        self.write(offset, value);
        self
    }

    /// Size of the block in bytes
    pub fn len(&self) -> usize {
        self.words.len() * 4
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn word(&self, offset: usize) -> &Cell<u32> {
        assert!(offset % 4 == 0, "unaligned register offset {offset:#x}");
        &self.words[offset / 4]
    }
}

impl RegisterBlock for ShadowBlock {
    fn read(&self, offset: usize) -> u32 {
        self.word(offset).get()
    }

    fn write(&self, offset: usize, value: u32) {
        self.word(offset).set(value)
    }

    fn size(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn field_mask_covers_width_at_shift() {
        assert_eq!(Field::new(0, 0, 11).mask(), 0x7ff);
        assert_eq!(Field::new(0, 16, 3).mask(), 0x7 << 16);
        assert_eq!(Field::new(0, 0, 32).mask(), u32::MAX);
        assert_eq!(Field::bit(0, 31).mask(), 1 << 31);
    }

    #[test]
    fn fields_past_the_register_end_are_rejected() {
        assert_eq!(Field::try_new(0x54, 24, 8), Some(Field::new(0x54, 24, 8)));
        assert_eq!(Field::try_new(0x54, 25, 8), None);
        assert_eq!(Field::try_new(0x54, 0, 0), None);
    }

    #[test]
    fn insert_only_touches_field_bits() {
        let field = Field::new(0, 8, 8);
        assert_eq!(field.insert(0xffff_ffff, 0x12), 0xffff_12ff);
        assert_eq!(field.insert(0, 0x1ff), 0xff00);
        assert_eq!(field.extract(0xabcd_1234), 0x12);
    }

    #[test]
    fn shadow_block_read_modify_write() {
        let regs = ShadowBlock::new(0x100).with_word(0x54, 0xaabb_ccdd);
        regs.write_field(Field::new(0x54, 8, 8), 0x11);
        assert_eq!(regs.read(0x54), 0xaabb_11dd);
        assert_eq!(regs.read_field(Field::new(0x54, 24, 8)), 0xaa);
        assert!(regs.bit_is_set(0x54, 0));
        assert!(!regs.bit_is_set(0x54, 1));
    }

    #[test]
    fn shadow_block_rounds_length_up_to_words() {
        assert_eq!(ShadowBlock::new(5).len(), 8);
        assert_eq!(ShadowBlock::new(5).size(), 8);
        assert!(ShadowBlock::new(0).is_empty());
    }

    #[test]
    fn mmio_block_uses_backing_memory() {
        let mut backing = [0u32; 4];
        let regs = unsafe { MmioBlock::from_ptr(backing.as_mut_ptr(), 16) };
        assert_eq!(regs.size(), 16);
        regs.write(0x8, 0x1234);
        regs.write_field(Field::bit(0xc, 3), 1);
        assert_eq!(regs.read(0x8), 0x1234);
        assert_eq!(regs.read(0xc), 0x8);
        drop(regs);
        assert_eq!(backing, [0, 0, 0x1234, 0x8]);
    }

    #[test]
    #[should_panic]
    fn mmio_block_rejects_offsets_outside_mapping() {
        let mut backing = [0u32; 2];
        let regs = unsafe { MmioBlock::from_ptr(backing.as_mut_ptr(), 8) };
        regs.read(0x8);
    }
}

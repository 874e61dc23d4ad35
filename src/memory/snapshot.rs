// Wed Aug 19 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryReader};
use std::marker::PhantomData;

/// Private scratch copy of one object's instance region. Probing trials run
/// against this copy so a wrong guess can never touch the live object.
pub struct ObjectSnapshot {
    bytes: Box<[u8]>,
}

impl ObjectSnapshot {
    pub fn capture<R: MemoryReader + ?Sized>(
        reader: &R,
        object: Address,
        size: usize,
    ) -> Result<Self, MemoryError> {
        let bytes = reader.read_bytes(object, size)?;
        Ok(Self { bytes: bytes.into_boxed_slice() })
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes: bytes.into_boxed_slice() }
    }

    /// Address of the copy itself; accessors are pointed here during trials.
    pub fn base(&self) -> Address {
        Address::from_ptr(self.bytes.as_ptr())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn byte(&self, offset: usize) -> u8 {
        self.bytes[offset]
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn flip_guard(&mut self, offset: usize) -> ByteFlipGuard<'_> {
        let ptr = &mut self.bytes[offset] as *mut u8;
        ByteFlipGuard { ptr, old: unsafe { *ptr }, _marker: PhantomData }
    }
}

/// Tracks one byte under trial. The original value is written back on drop,
/// including the unwind path after an absorbed accessor fault.
pub struct ByteFlipGuard<'a> {
    ptr: *mut u8,
    old: u8,
    _marker: PhantomData<&'a mut u8>,
}

impl ByteFlipGuard<'_> {
    /// Does the accessor's output track the byte under trial?
    pub fn value_matches(&self, buf: &[u8]) -> bool {
        !buf.is_empty() && buf[0] == unsafe { *self.ptr }
    }

    pub fn flip(&mut self) {
        unsafe { *self.ptr ^= 1 };
    }
}

impl Drop for ByteFlipGuard<'_> {
    fn drop(&mut self) {
        unsafe { *self.ptr = self.old };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_guard_restores() {
        let mut snap = ObjectSnapshot::from_bytes(vec![0xAA, 0xBB, 0xCC]);
        {
            let mut guard = snap.flip_guard(1);
            guard.flip();
        }
        assert_eq!(snap.byte(1), 0xBB);
    }

    #[test]
    fn test_flip_guard_restores_after_double_flip() {
        let mut snap = ObjectSnapshot::from_bytes(vec![0x01, 0x02]);
        {
            let mut guard = snap.flip_guard(0);
            guard.flip();
            guard.flip();
            guard.flip();
        }
        assert_eq!(snap.byte(0), 0x01);
    }

    #[test]
    fn test_value_matches_tracks_flips() {
        let mut snap = ObjectSnapshot::from_bytes(vec![0x10]);
        let mut guard = snap.flip_guard(0);
        assert!(guard.value_matches(&[0x10]));
        guard.flip();
        assert!(guard.value_matches(&[0x11]));
        assert!(!guard.value_matches(&[0x10]));
    }
}

// Wed Aug 19 2026 - Alex

use crate::memory::{Address, MemoryError};

const MAX_STRING_LEN: usize = 4096;

pub trait MemoryReader: Send + Sync {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError>;

    fn read_u8(&self, addr: Address) -> Result<u8, MemoryError> {
        let bytes = self.read_bytes(addr, 1)?;
        Ok(bytes[0])
    }

    fn read_u16(&self, addr: Address) -> Result<u16, MemoryError> {
        let bytes = self.read_bytes(addr, 2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&self, addr: Address) -> Result<u32, MemoryError> {
        let bytes = self.read_bytes(addr, 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_u64(&self, addr: Address) -> Result<u64, MemoryError> {
        let bytes = self.read_bytes(addr, 8)?;
        Ok(u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    fn read_i32(&self, addr: Address) -> Result<i32, MemoryError> {
        Ok(self.read_u32(addr)? as i32)
    }

    fn read_ptr(&self, addr: Address) -> Result<Address, MemoryError> {
        Ok(Address::new(self.read_u64(addr)?))
    }

    fn read_c_string(&self, addr: Address) -> Result<String, MemoryError> {
        let mut bytes = Vec::new();
        let mut current = addr;
        loop {
            let byte = self.read_u8(current)?;
            if byte == 0 {
                break;
            }
            bytes.push(byte);
            current = current + 1;
            if bytes.len() > MAX_STRING_LEN {
                return Err(MemoryError::StringTooLong(addr.as_u64()));
            }
        }
        String::from_utf8(bytes).map_err(|_| MemoryError::StringDecode(addr.as_u64()))
    }

    fn read_w_string(&self, addr: Address) -> Result<String, MemoryError> {
        let mut units = Vec::new();
        let mut current = addr;
        loop {
            let unit = self.read_u16(current)?;
            if unit == 0 {
                break;
            }
            units.push(unit);
            current = current + 2;
            if units.len() > MAX_STRING_LEN {
                return Err(MemoryError::StringTooLong(addr.as_u64()));
            }
        }
        Ok(String::from_utf16_lossy(&units))
    }
}

// Wed Aug 19 2026 - Alex

use std::fmt;

/// Byte signature with wildcard positions, parsed from the usual IDA-style
/// text form ("48 8B 0D ? ? ? ?").
#[derive(Debug, Clone)]
pub struct Pattern {
    bytes: Vec<u8>,
    mask: Vec<bool>,
    name: Option<String>,
}

impl Pattern {
    pub fn from_ida_pattern(pattern: &str) -> Self {
        let mut bytes = Vec::new();
        let mut mask = Vec::new();

        for part in pattern.split_whitespace() {
            if part == "?" || part == "??" {
                bytes.push(0);
                mask.push(false);
            } else if let Ok(byte) = u8::from_str_radix(part, 16) {
                bytes.push(byte);
                mask.push(true);
            }
        }

        Self { bytes, mask, name: None }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        if data.len() < self.bytes.len() {
            return false;
        }

        self.bytes
            .iter()
            .zip(self.mask.iter())
            .zip(data.iter())
            .all(|((pattern_byte, &significant), &data_byte)| {
                !significant || *pattern_byte == data_byte
            })
    }

    pub fn find_in(&self, data: &[u8]) -> Option<usize> {
        if self.bytes.is_empty() || data.len() < self.bytes.len() {
            return None;
        }

        let first_significant = self.mask.iter().position(|&m| m).unwrap_or(0);
        let first_byte = self.bytes[first_significant];

        for i in 0..=(data.len() - self.bytes.len()) {
            if data[i + first_significant] == first_byte && self.matches(&data[i..]) {
                return Some(i);
            }
        }

        None
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (byte, &significant)) in self.bytes.iter().zip(self.mask.iter()).enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if significant {
                write!(f, "{:02X}", byte)?;
            } else {
                write!(f, "?")?;
            }
        }
        Ok(())
    }
}

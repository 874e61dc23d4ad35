// Sat Aug 22 2026 - Alex

#[cfg(unix)]
use crate::memory::MemoryError;

/// One executable mapping of the host module, the scan range for the
/// recovery signatures.
#[derive(Debug, Clone)]
pub struct ModuleRange {
    pub start: usize,
    pub end: usize,
    pub path: String,
}

impl ModuleRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// The mapping is r-x in our own address space; expose it as a slice
    /// for pattern scanning.
    pub fn bytes(&self) -> &'static [u8] {
        unsafe { std::slice::from_raw_parts(self.start as *const u8, self.len()) }
    }

    /// First readable executable mapping whose path contains `name`, or
    /// the main executable's when `name` is None.
    #[cfg(unix)]
    pub fn find(name: Option<&str>) -> Result<Self, MemoryError> {
        let target = match name {
            Some(name) => name.to_string(),
            None => std::env::current_exe()?
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };

        let maps = std::fs::read_to_string("/proc/self/maps")?;
        for line in maps.lines() {
            let mut parts = line.split_whitespace();
            let (Some(range), Some(perms)) = (parts.next(), parts.next()) else {
                continue;
            };
            let path = parts.last().unwrap_or("");
            if !perms.starts_with("r") || !perms.contains('x') {
                continue;
            }
            if !path.contains(&target) {
                continue;
            }
            let Some((start, end)) = range.split_once('-') else {
                continue;
            };
            let (Ok(start), Ok(end)) =
                (usize::from_str_radix(start, 16), usize::from_str_radix(end, 16))
            else {
                continue;
            };
            return Ok(Self { start, end, path: path.to_string() });
        }

        Err(MemoryError::ModuleNotFound(target))
    }
}

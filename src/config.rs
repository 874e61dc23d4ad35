// Wed Aug 19 2026 - Alex

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Fixed object header size; probing candidates start right after it.
    pub header_size: usize,
    /// Upper bound on the candidate scan range, instance size if None.
    pub max_probe_span: Option<usize>,
    /// Type name of the container category (name/folder/transform edges).
    pub container_type_name: String,
    /// Type name of the attachment category (owner/sibling/child edges).
    pub attachment_type_name: String,
    /// Host module scanned for recovery signatures; main executable if None.
    pub module_name: Option<String>,
    /// Per-tag value width overrides, in bytes. The default table carries
    /// the architecturally-correct widths; hosts whose getters fill fewer
    /// bytes can pin the observed width here.
    pub tag_width_overrides: HashMap<String, usize>,
    /// Emit raw pointer-width slot candidates alongside declared fields.
    pub enable_raw_scan: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            header_size: crate::host::abi::OBJECT_HEADER_SIZE,
            max_probe_span: None,
            container_type_name: "via.GameObject".to_string(),
            attachment_type_name: "via.Component".to_string(),
            module_name: None,
            tag_width_overrides: HashMap::new(),
            enable_raw_scan: true,
        }
    }
}

impl ExplorerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header_size(mut self, size: usize) -> Self {
        self.header_size = size;
        self
    }

    pub fn with_max_probe_span(mut self, span: usize) -> Self {
        self.max_probe_span = Some(span);
        self
    }

    pub fn with_tag_width(mut self, tag: &str, width: usize) -> Self {
        self.tag_width_overrides.insert(tag.to_string(), width);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.header_size < std::mem::size_of::<u64>() {
            return Err("header_size must cover at least the descriptor pointer".to_string());
        }
        for (tag, width) in &self.tag_width_overrides {
            if !matches!(width, 1 | 2 | 4 | 8) {
                return Err(format!("unsupported width {} for tag {}", width, tag));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(ExplorerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_bad_width_rejected() {
        let config = ExplorerConfig::default().with_tag_width("s32", 3);
        assert!(config.validate().is_err());
    }
}

// Fri Aug 21 2026 - Alex

use crate::config::ExplorerConfig;
use std::collections::HashMap;

/// Accessors whose declared type resolves here mutate object state instead
/// of reading it; they are never probed or decoded.
const STATE_MUTATING_TAGS: &[&str] = &["undefined"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    I32,
    U32,
    U64,
    F32,
    Bool,
    CStrPtr,
    WStrPtr,
    Vec2,
    Vec3,
    Quat,
    RuntimeString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpec {
    pub tag: TypeTag,
    pub width: usize,
}

/// Closed table mapping declared-type-name tags to formatting rules. The
/// tag-to-width mapping is data, not code: hosts whose getters fill fewer
/// bytes than the tag's nominal width can override per tag.
pub struct TagTable {
    entries: HashMap<String, TagSpec, ahash::RandomState>,
}

impl TagTable {
    pub fn with_defaults() -> Self {
        let mut entries: HashMap<String, TagSpec, ahash::RandomState> = HashMap::default();
        let mut add = |name: &str, tag: TypeTag, width: usize| {
            entries.insert(name.to_string(), TagSpec { tag, width });
        };

        add("s32", TypeTag::I32, 4);
        add("u32", TypeTag::U32, 4);
        add("u64", TypeTag::U64, 8);
        add("f32", TypeTag::F32, 4);
        add("System.Nullable`1<System.Single>", TypeTag::F32, 4);
        add("bool", TypeTag::Bool, 1);
        add("System.Nullable`1<System.Boolean>", TypeTag::Bool, 1);
        add("c8", TypeTag::CStrPtr, 8);
        add("c16", TypeTag::WStrPtr, 8);
        add("via.vec2", TypeTag::Vec2, 8);
        add("System.Nullable`1<via.vec2>", TypeTag::Vec2, 8);
        add("via.vec3", TypeTag::Vec3, 12);
        add("System.Nullable`1<via.vec3>", TypeTag::Vec3, 12);
        add("via.Quaternion", TypeTag::Quat, 16);
        add("via.string", TypeTag::RuntimeString, crate::host::abi::STRING_HANDLE_SIZE);

        Self { entries }
    }

    pub fn from_config(config: &ExplorerConfig) -> Self {
        let mut table = Self::with_defaults();
        for (name, &width) in &config.tag_width_overrides {
            match table.entries.get_mut(name) {
                Some(spec) => {
                    if !matches!(spec.tag, TypeTag::I32 | TypeTag::U32 | TypeTag::U64) {
                        log::warn!("width override for non-integer tag {} ignored", name);
                        continue;
                    }
                    log::info!("tag {} width overridden: {} -> {}", name, spec.width, width);
                    spec.width = width;
                }
                None => log::warn!("width override for unrecognized tag {} ignored", name),
            }
        }
        table
    }

    pub fn lookup(&self, name: &str) -> Option<TagSpec> {
        self.entries.get(name).copied()
    }

    pub fn is_state_mutating(&self, name: &str) -> bool {
        STATE_MUTATING_TAGS.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_known_tags() {
        let table = TagTable::with_defaults();
        assert_eq!(table.lookup("s32").unwrap().tag, TypeTag::I32);
        assert_eq!(table.lookup("s32").unwrap().width, 4);
        assert_eq!(table.lookup("via.vec2").unwrap().tag, TypeTag::Vec2);
        assert_eq!(
            table.lookup("System.Nullable`1<System.Boolean>").unwrap().tag,
            TypeTag::Bool
        );
        assert!(table.lookup("app.SomethingElse").is_none());
    }

    #[test]
    fn test_state_mutating_reserved() {
        let table = TagTable::with_defaults();
        assert!(table.is_state_mutating("undefined"));
        assert!(!table.is_state_mutating("u32"));
    }

    #[test]
    fn test_width_override_applies_to_integers_only() {
        let config = ExplorerConfig::default()
            .with_tag_width("s32", 2)
            .with_tag_width("via.vec2", 4);
        let table = TagTable::from_config(&config);
        assert_eq!(table.lookup("s32").unwrap().width, 2);
        assert_eq!(table.lookup("via.vec2").unwrap().width, 8);
    }
}

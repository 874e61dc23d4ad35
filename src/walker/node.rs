// Sat Aug 22 2026 - Alex

use crate::decode::DecodedValue;
use crate::memory::Address;
use indexmap::IndexMap;
use serde::Serialize;

/// One level of expansion of an object address: type chain, declared
/// fields per level, the category-specific edges, and the raw pointer
/// scan. Expansion is lazy; nested addresses are expanded by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ExpandedObject {
    pub address: Address,
    /// Container objects carry a display name; everything else is
    /// labelled by its type.
    pub display_name: Option<String>,
    pub type_levels: Vec<TypeLevel>,
    pub special_edges: Vec<SpecialEdge>,
    pub raw_slots: Vec<RawSlot>,
}

impl ExpandedObject {
    pub fn label(&self) -> String {
        match (&self.display_name, self.type_levels.first()) {
            (Some(name), _) => name.clone(),
            (None, Some(level)) => level.label(),
            (None, None) => self.address.to_string(),
        }
    }

    /// Field view lookup by name across all levels, most-derived first.
    /// Names are not unique; the first declaration wins here, while the
    /// level maps keep every descriptor.
    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.type_levels
            .iter()
            .find_map(|level| level.fields.values().find(|view| view.name == name))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeLevel {
    pub name: Option<String>,
    /// Measured instance size for the most-derived level, the
    /// descriptor's own declared size for ancestors.
    pub size: u64,
    /// Every field declared at this level, in declaration order, keyed
    /// by descriptor identity. Names may repeat or be stripped.
    pub fields: IndexMap<u64, FieldView>,
}

impl TypeLevel {
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| "<anonymous>".to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub name: String,
    pub type_name: Option<String>,
    pub flags: u32,
    pub variable_type: i32,
    pub static_slot: Option<i32>,
    pub descriptor: Address,
    pub accessor: Address,
    /// Best-effort annotation; 0 means unknown and is omitted by
    /// renderers.
    pub offset: u32,
    /// Authoritative rendered value.
    pub value: DecodedValue,
    /// Present when the value is a nested object the caller may expand.
    pub child: Option<Address>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpecialEdge {
    pub label: String,
    pub offset: u32,
    pub target: Address,
}

#[derive(Debug, Clone, Serialize)]
pub struct RawSlot {
    pub offset: u32,
    pub target: Address,
}

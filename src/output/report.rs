// Sat Aug 22 2026 - Alex

use crate::probe::OFFSET_NOT_FOUND;
use crate::walker::ExpandedObject;

/// Flat text rendition of one expanded node, for log dumps and plain
/// panels. Offsets render only when known.
pub fn render_text(node: &ExpandedObject) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("{} ({})", node.label(), node.address));

    if let Some(name) = &node.display_name {
        lines.push(format!("Name: {}", name));
    }
    for edge in &node.special_edges {
        lines.push(format!("0x{:X}: {} -> {}", edge.offset, edge.label, edge.target));
    }

    for level in &node.type_levels {
        lines.push(level.label());
        lines.push(format!("  Size: 0x{:X}", level.size));
        if !level.fields.is_empty() {
            lines.push(format!("  Fields: {}", level.fields.len()));
        }
        for field in level.fields.values() {
            let mut line = format!(
                "    {} {}",
                field.type_name.as_deref().unwrap_or("<untyped>"),
                field.name
            );
            if field.offset != OFFSET_NOT_FOUND {
                line.push_str(&format!(" 0x{:X}", field.offset));
            }
            let value = field.value.to_string();
            if !value.is_empty() {
                line.push_str(&format!(" = {}", value));
            }
            lines.push(line);
        }
    }

    for slot in &node.raw_slots {
        lines.push(format!("  0x{:X}: {}", slot.offset, slot.target));
    }

    lines
}

pub fn render_json(node: &ExpandedObject) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(node)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DecodedValue;
    use crate::memory::Address;
    use crate::walker::{FieldView, TypeLevel};
    use indexmap::IndexMap;

    fn sample_node() -> ExpandedObject {
        let mut fields = IndexMap::new();
        fields.insert(
            1u64,
            FieldView {
                name: "hp".to_string(),
                type_name: Some("u32".to_string()),
                flags: 0x06,
                variable_type: 0,
                static_slot: None,
                descriptor: Address::new(0x1000),
                accessor: Address::new(0x2000),
                offset: 0x1c,
                value: DecodedValue::Unsigned(250),
                child: None,
            },
        );
        fields.insert(
            2u64,
            FieldView {
                name: "mystery".to_string(),
                type_name: None,
                flags: 0,
                variable_type: 0,
                static_slot: None,
                descriptor: Address::new(0x1008),
                accessor: Address::zero(),
                offset: 0,
                value: DecodedValue::Absent,
                child: None,
            },
        );

        ExpandedObject {
            address: Address::new(0x4000),
            display_name: None,
            type_levels: vec![TypeLevel {
                name: Some("app.Enemy".to_string()),
                size: 0x48,
                fields,
            }],
            special_edges: Vec::new(),
            raw_slots: Vec::new(),
        }
    }

    #[test]
    fn test_render_text_annotates_known_offsets_only() {
        let lines = render_text(&sample_node());
        assert!(lines.iter().any(|l| l.contains("u32 hp 0x1C = 250")));
        let mystery = lines.iter().find(|l| l.contains("mystery")).unwrap();
        assert!(!mystery.contains("0x"));
        assert!(!mystery.contains("="));
    }

    #[test]
    fn test_render_text_reports_size() {
        let lines = render_text(&sample_node());
        assert!(lines.contains(&"  Size: 0x48".to_string()));
    }

    #[test]
    fn test_render_json_is_valid() {
        let json = render_json(&sample_node()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type_levels"][0]["size"], 0x48);
    }
}

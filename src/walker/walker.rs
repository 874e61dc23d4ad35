// Sat Aug 22 2026 - Alex

use crate::config::ExplorerConfig;
use crate::decode::{read_runtime_string, ValueDecoder};
use crate::host::abi;
use crate::memory::Address;
use crate::probe::OffsetProber;
use crate::reflect::{ReflectionSource, TypeModel};
use crate::walker::node::{ExpandedObject, FieldView, RawSlot, SpecialEdge, TypeLevel};
use indexmap::IndexMap;
use std::sync::Arc;

/// Turns a raw address into a typed, navigable tree, one level at a time.
/// Each `expand` is a pure function of current memory state; the only
/// cross-call state is the prober's offset cache.
pub struct GraphWalker {
    source: Arc<dyn ReflectionSource>,
    prober: Arc<OffsetProber>,
    decoder: ValueDecoder,
    config: ExplorerConfig,
}

impl GraphWalker {
    pub fn new(
        source: Arc<dyn ReflectionSource>,
        prober: Arc<OffsetProber>,
        decoder: ValueDecoder,
        config: ExplorerConfig,
    ) -> Self {
        Self { source, prober, decoder, config }
    }

    /// The host's validity oracle. Nested pointers are never trusted;
    /// callers re-check before every recursion step.
    pub fn classify(&self, addr: Address) -> bool {
        self.source.classify(addr)
    }

    pub fn expand(&self, addr: Address) -> Option<ExpandedObject> {
        if !self.source.classify(addr) {
            return None;
        }
        let ty = self.source.type_of(addr)?;
        let measured = self.source.instance_size(addr).unwrap_or(ty.size as usize);

        let mut node = ExpandedObject {
            address: addr,
            display_name: None,
            type_levels: Vec::new(),
            special_edges: Vec::new(),
            raw_slots: Vec::new(),
        };

        if TypeModel::is_a(&ty, &self.config.container_type_name) {
            node.display_name =
                read_runtime_string(&*self.source, addr + abi::CONTAINER_NAME_OFFSET as u64);
            self.push_edge(&mut node, addr, "Transform", abi::CONTAINER_TRANSFORM_OFFSET);
            self.push_edge(&mut node, addr, "Folder", abi::CONTAINER_FOLDER_OFFSET);
        }
        if TypeModel::is_a(&ty, &self.config.attachment_type_name) {
            self.push_edge(&mut node, addr, "Owner", abi::ATTACHMENT_OWNER_OFFSET);
            self.push_edge(&mut node, addr, "ChildComponent", abi::ATTACHMENT_CHILD_OFFSET);
            self.push_edge(&mut node, addr, "PrevComponent", abi::ATTACHMENT_PREV_OFFSET);
            self.push_edge(&mut node, addr, "NextComponent", abi::ATTACHMENT_NEXT_OFFSET);
        }

        for (index, level) in TypeModel::type_chain(&ty).iter().enumerate() {
            // Malformed, null-named levels are skipped, not fatal.
            if level.name.is_none() {
                continue;
            }
            let size = if index == 0 { measured as u64 } else { level.size as u64 };

            let mut fields = IndexMap::new();
            for field in TypeModel::fields_of(level) {
                let offset = self.prober.resolve_offset(addr, field);
                let value = self.decoder.decode(addr, field);
                let child = value.nested_object();
                fields.insert(
                    field.key,
                    FieldView {
                        name: field.display_name().to_string(),
                        type_name: field.type_name.clone(),
                        flags: field.flags.bits(),
                        variable_type: field.variable_type,
                        static_slot: field.static_slot,
                        descriptor: Address::new(field.key),
                        accessor: field.accessor_address,
                        offset,
                        value,
                        child,
                    },
                );
            }

            node.type_levels.push(TypeLevel { name: level.name.clone(), size, fields });
        }

        if self.config.enable_raw_scan {
            node.raw_slots = self.raw_scan(addr, measured);
        }

        Some(node)
    }

    /// Walk every pointer-width slot across the measured instance,
    /// offering whatever classifies as an object. Surfaces fields the
    /// type system failed to describe; deliberately not deduplicated
    /// against the declared-field view.
    fn raw_scan(&self, addr: Address, measured: usize) -> Vec<RawSlot> {
        let mut slots = Vec::new();
        let mut offset = self.config.header_size;
        while offset + abi::POINTER_SIZE <= measured {
            if let Ok(target) = self.source.read_ptr(addr + offset as u64) {
                if self.source.classify(target) {
                    slots.push(RawSlot { offset: offset as u32, target });
                }
            }
            offset += abi::POINTER_SIZE;
        }
        slots
    }

    /// Render the attachment chain starting at `addr`, one line per
    /// attachment. The sibling chain may be circular; the walk stops when
    /// the child link points back at the start, matching the host's own
    /// traversal contract.
    pub fn hierarchy_of(&self, addr: Address) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.source.classify(addr) {
            return lines;
        }
        let Some(ty) = self.source.type_of(addr) else {
            return lines;
        };
        if !TypeModel::is_a(&ty, &self.config.attachment_type_name) {
            return lines;
        }

        let start = addr;
        let mut current = addr;
        loop {
            if let Some(ty) = self.source.type_of(current) {
                let owner = self
                    .source
                    .read_ptr(current + abi::ATTACHMENT_OWNER_OFFSET as u64)
                    .ok()
                    .filter(|owner| !owner.is_null() && self.source.classify(*owner));
                let line = match owner.and_then(|owner| {
                    read_runtime_string(
                        &*self.source,
                        owner + abi::CONTAINER_NAME_OFFSET as u64,
                    )
                }) {
                    Some(owner_name) => {
                        format!("[{}] {} ({})", owner_name, ty.display_name(), current)
                    }
                    None => format!("{} ({})", ty.display_name(), current),
                };
                lines.push(line);
            }

            let Ok(next) = self.source.read_ptr(current + abi::ATTACHMENT_CHILD_OFFSET as u64)
            else {
                break;
            };
            if next == start || next.is_null() || !self.source.classify(next) {
                break;
            }
            current = next;
        }

        lines
    }

    fn push_edge(&self, node: &mut ExpandedObject, addr: Address, label: &str, offset: u32) {
        let Ok(target) = self.source.read_ptr(addr + offset as u64) else {
            return;
        };
        if target.is_null() {
            return;
        }
        node.special_edges.push(SpecialEdge { label: label.to_string(), offset, target });
    }
}

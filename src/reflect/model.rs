// Thu Aug 20 2026 - Alex

use crate::reflect::{FieldDescriptor, TypeDescriptor};
use std::sync::Arc;

/// Cap on the super-type walk. The chain is expected to terminate on its
/// own; the cap only keeps a corrupt descriptor from spinning us forever.
const MAX_TYPE_DEPTH: usize = 128;

/// Read-only view over a type descriptor chain.
pub struct TypeModel;

impl TypeModel {
    /// Most-derived level first, following the super link until null.
    pub fn type_chain(ty: &Arc<TypeDescriptor>) -> Vec<Arc<TypeDescriptor>> {
        let mut chain = Vec::new();
        let mut current = Some(ty.clone());

        while let Some(level) = current {
            if chain.len() >= MAX_TYPE_DEPTH {
                log::warn!(
                    "type chain for {} exceeds depth {}, truncating",
                    ty.display_name(),
                    MAX_TYPE_DEPTH
                );
                break;
            }
            current = level.super_type.clone();
            chain.push(level);
        }

        chain
    }

    /// Fields declared at this level only; empty when none are declared.
    pub fn fields_of(ty: &TypeDescriptor) -> &[Arc<FieldDescriptor>] {
        &ty.fields
    }

    /// Name match anywhere in the chain. Null-named levels are skipped,
    /// never fatal.
    pub fn is_a(ty: &Arc<TypeDescriptor>, name: &str) -> bool {
        Self::type_chain(ty)
            .iter()
            .any(|level| level.name.as_deref() == Some(name))
    }
}

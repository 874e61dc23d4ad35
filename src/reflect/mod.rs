// Thu Aug 20 2026 - Alex

pub mod descriptor;
pub mod model;
pub mod source;

#[cfg(test)]
pub mod testutil;

pub use descriptor::{
    FieldAccessor, FieldDescriptor, FieldFlags, TypeDescriptor, FIELD_KIND_BOOL,
    FIELD_KIND_POINTER,
};
pub use model::TypeModel;
pub use source::ReflectionSource;

// Fri Aug 21 2026 - Alex

use crate::decode::{DecodedValue, TagSpec, TagTable, TypeTag};
use crate::host::abi;
use crate::memory::Address;
use crate::reflect::{FieldDescriptor, ReflectionSource};
use std::sync::Arc;

/// Scratch capacity for one accessor call; holds any recognized primitive,
/// vector, or quaternion encoding with room to spare.
pub const VALUE_BUFFER_SIZE: usize = 0x100;

/// Renders a field's current value from its accessor and runtime type-name
/// tag alone. Never mutates the object; all reads land in transient
/// scratch storage.
#[derive(Clone)]
pub struct ValueDecoder {
    source: Arc<dyn ReflectionSource>,
    tags: Arc<TagTable>,
}

impl ValueDecoder {
    pub fn new(source: Arc<dyn ReflectionSource>, tags: Arc<TagTable>) -> Self {
        Self { source, tags }
    }

    /// Accessor faults surface as `Absent` rather than propagating; decode
    /// shares the probe engine's fault boundary through the accessor
    /// object itself.
    pub fn decode(&self, object: Address, field: &FieldDescriptor) -> DecodedValue {
        let Some(accessor) = field.accessor.as_ref() else {
            // Field is not independently readable.
            return DecodedValue::Absent;
        };

        let mut buf = [0u8; VALUE_BUFFER_SIZE];
        if accessor.read_into(object, &mut buf).is_err() {
            return DecodedValue::Absent;
        }

        // Pointer-shaped storage with no static slot: the payload is
        // itself an object address, no tag dispatch involved.
        if field.flags.is_pointer_shaped() && field.static_slot.is_none() {
            return self.address_value(read_address(&buf));
        }

        let Some(type_name) = field.type_name.as_deref() else {
            return self.fallback(field, &buf);
        };
        match self.tags.lookup(type_name) {
            Some(spec) => self.render(spec, &buf),
            None => self.fallback(field, &buf),
        }
    }

    fn render(&self, spec: TagSpec, buf: &[u8]) -> DecodedValue {
        match spec.tag {
            TypeTag::I32 => DecodedValue::Signed(read_signed(buf, spec.width)),
            TypeTag::U32 | TypeTag::U64 => DecodedValue::Unsigned(read_unsigned(buf, spec.width)),
            TypeTag::F32 => DecodedValue::Float(read_f32(buf, 0)),
            TypeTag::Bool => DecodedValue::Bool(buf[0] != 0),
            TypeTag::CStrPtr => {
                let ptr = read_address(buf);
                if ptr.is_null() {
                    return DecodedValue::Absent;
                }
                match self.source.read_c_string(ptr) {
                    Ok(text) => DecodedValue::Text(text),
                    Err(_) => DecodedValue::Absent,
                }
            }
            TypeTag::WStrPtr => {
                let ptr = read_address(buf);
                if ptr.is_null() {
                    return DecodedValue::Absent;
                }
                match self.source.read_w_string(ptr) {
                    Ok(text) => DecodedValue::Text(text),
                    Err(_) => DecodedValue::Absent,
                }
            }
            TypeTag::Vec2 => DecodedValue::Vec2(read_f32(buf, 0), read_f32(buf, 4)),
            TypeTag::Vec3 => {
                DecodedValue::Vec3(read_f32(buf, 0), read_f32(buf, 4), read_f32(buf, 8))
            }
            TypeTag::Quat => DecodedValue::Quat(
                read_f32(buf, 0),
                read_f32(buf, 4),
                read_f32(buf, 8),
                read_f32(buf, 12),
            ),
            TypeTag::RuntimeString => match decode_runtime_string(&*self.source, buf) {
                Some(text) => DecodedValue::Text(text),
                None => DecodedValue::Absent,
            },
        }
    }

    fn fallback(&self, field: &FieldDescriptor, buf: &[u8]) -> DecodedValue {
        if field.flags.is_bool_shaped() {
            return DecodedValue::Signed(read_signed(buf, 4));
        }
        self.address_value(read_address(buf))
    }

    fn address_value(&self, addr: Address) -> DecodedValue {
        if !addr.is_null() && self.source.classify(addr) {
            DecodedValue::Object(addr)
        } else {
            DecodedValue::RawAddress(addr)
        }
    }
}

fn read_signed(buf: &[u8], width: usize) -> i64 {
    match width {
        1 => buf[0] as i8 as i64,
        2 => i16::from_le_bytes([buf[0], buf[1]]) as i64,
        8 => i64::from_le_bytes(buf[..8].try_into().unwrap()),
        _ => i32::from_le_bytes(buf[..4].try_into().unwrap()) as i64,
    }
}

fn read_unsigned(buf: &[u8], width: usize) -> u64 {
    match width {
        1 => buf[0] as u64,
        2 => u16::from_le_bytes([buf[0], buf[1]]) as u64,
        8 => u64::from_le_bytes(buf[..8].try_into().unwrap()),
        _ => u32::from_le_bytes(buf[..4].try_into().unwrap()) as u64,
    }
}

fn read_f32(buf: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap())
}

fn read_address(buf: &[u8]) -> Address {
    Address::new(u64::from_le_bytes(buf[..8].try_into().unwrap()))
}

/// Decode the host's small-string handle: UTF-16 characters stored inline
/// below the capacity threshold, behind a heap pointer above it. Layout
/// constants live in `host::abi`.
pub fn decode_runtime_string(source: &dyn ReflectionSource, handle: &[u8]) -> Option<String> {
    let length =
        u32::from_le_bytes(handle[abi::STRING_LENGTH_OFFSET..abi::STRING_LENGTH_OFFSET + 4].try_into().ok()?)
            as usize;
    let capacity = u32::from_le_bytes(
        handle[abi::STRING_CAPACITY_OFFSET..abi::STRING_CAPACITY_OFFSET + 4].try_into().ok()?,
    ) as usize;

    if length == 0 {
        return Some(String::new());
    }
    if length > capacity || length > abi::STRING_MAX_LENGTH {
        return None;
    }

    if capacity <= abi::STRING_INLINE_CAPACITY {
        let mut units = Vec::with_capacity(length);
        for i in 0..length {
            units.push(u16::from_le_bytes([handle[i * 2], handle[i * 2 + 1]]));
        }
        return Some(String::from_utf16_lossy(&units));
    }

    let chars = Address::new(u64::from_le_bytes(handle[..8].try_into().ok()?));
    if chars.is_null() {
        return None;
    }
    let bytes = source.read_bytes(chars, length * 2).ok()?;
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    Some(String::from_utf16_lossy(&units))
}

/// Read and decode a runtime string handle embedded at `addr`.
pub fn read_runtime_string(source: &dyn ReflectionSource, addr: Address) -> Option<String> {
    let handle = source.read_bytes(addr, abi::STRING_HANDLE_SIZE).ok()?;
    decode_runtime_string(source, &handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExplorerConfig;
    use crate::reflect::testutil::{
        make_field, make_type, ClosureAccessor, FakeSource, FaultingAccessor, SlotAccessor,
        SyntheticObject,
    };
    use crate::reflect::FIELD_KIND_POINTER;

    fn decoder(source: Arc<FakeSource>) -> ValueDecoder {
        ValueDecoder::new(source, Arc::new(TagTable::with_defaults()))
    }

    fn object_with(ty_name: &str, size: usize) -> (Arc<FakeSource>, SyntheticObject) {
        let source = Arc::new(FakeSource::new());
        let ty = make_type(ty_name, size as u32, None, Vec::new());
        let object = SyntheticObject::new(ty, vec![0u8; size]);
        source.register(&object);
        (source, object)
    }

    #[test]
    fn test_vec2_decodes_and_renders() {
        let (source, mut object) = object_with("app.Point", 0x30);
        object.write_f32(0x20, 1.5);
        object.write_f32(0x24, -2.25);
        let field = make_field("pos", Some("via.vec2"), 0x06, Some(SlotAccessor::new(0x20, 8)));

        let value = decoder(source).decode(object.addr(), &field);
        assert_eq!(value, DecodedValue::Vec2(1.5, -2.25));
        assert_eq!(value.to_string(), "1.5 -2.25");
    }

    #[test]
    fn test_null_narrow_text_is_absent() {
        let (source, object) = object_with("app.Named", 0x30);
        let field = make_field("label", Some("c8"), 0x06, Some(SlotAccessor::new(0x18, 8)));

        let value = decoder(source).decode(object.addr(), &field);
        assert_eq!(value, DecodedValue::Absent);
    }

    #[test]
    fn test_narrow_text_reads_through_pointer() {
        let (source, mut object) = object_with("app.Named", 0x30);
        let text = b"hero\0";
        object.write_u64(0x18, text.as_ptr() as u64);
        let field = make_field("label", Some("c8"), 0x06, Some(SlotAccessor::new(0x18, 8)));

        let value = decoder(source).decode(object.addr(), &field);
        assert_eq!(value, DecodedValue::Text("hero".to_string()));
    }

    #[test]
    fn test_bool_and_u64() {
        let (source, mut object) = object_with("app.Flags", 0x30);
        object.write_u64(0x18, 1);
        object.write_u64(0x20, 0x1122334455667788);
        let decoder = decoder(source);

        let flag = make_field("on", Some("bool"), 0x06, Some(SlotAccessor::new(0x18, 1)));
        assert_eq!(decoder.decode(object.addr(), &flag), DecodedValue::Bool(true));

        let big = make_field("id", Some("u64"), 0x06, Some(SlotAccessor::new(0x20, 8)));
        assert_eq!(
            decoder.decode(object.addr(), &big),
            DecodedValue::Unsigned(0x1122334455667788)
        );
    }

    #[test]
    fn test_s32_width_is_configuration() {
        let (source, mut object) = object_with("app.Num", 0x30);
        object.write_u64(0x18, 0xFFFF_FFFF_8000_0001);
        let field = make_field("n", Some("s32"), 0x06, Some(SlotAccessor::new(0x18, 8)));

        let wide = ValueDecoder::new(source.clone(), Arc::new(TagTable::with_defaults()));
        assert_eq!(
            wide.decode(object.addr(), &field),
            DecodedValue::Signed(0x8000_0001u32 as i32 as i64)
        );

        // Host whose getter really fills two bytes: pin the narrow width.
        let config = ExplorerConfig::default().with_tag_width("s32", 2);
        let narrow = ValueDecoder::new(source, Arc::new(TagTable::from_config(&config)));
        assert_eq!(narrow.decode(object.addr(), &field), DecodedValue::Signed(1));
    }

    #[test]
    fn test_unknown_tag_bool_subcategory_reads_i32() {
        let (source, mut object) = object_with("app.Enumish", 0x30);
        object.write_u64(0x18, 42);
        let field = make_field(
            "mode",
            Some("app.CustomEnum"),
            0x01,
            Some(SlotAccessor::new(0x18, 4)),
        );

        assert_eq!(decoder(source).decode(object.addr(), &field), DecodedValue::Signed(42));
    }

    #[test]
    fn test_unknown_tag_recurses_into_objects() {
        let source = Arc::new(FakeSource::new());
        let inner_ty = make_type("app.Inner", 0x20, None, Vec::new());
        let inner = SyntheticObject::new(inner_ty, vec![0u8; 0x20]);
        source.register(&inner);

        let outer_ty = make_type("app.Outer", 0x30, None, Vec::new());
        let mut outer = SyntheticObject::new(outer_ty, vec![0u8; 0x30]);
        outer.write_u64(0x18, inner.addr().as_u64());
        source.register(&outer);

        let field = make_field(
            "inner",
            Some("app.Inner"),
            0x06,
            Some(SlotAccessor::new(0x18, 8)),
        );
        assert_eq!(
            decoder(source).decode(outer.addr(), &field),
            DecodedValue::Object(inner.addr())
        );
    }

    #[test]
    fn test_unknown_tag_non_object_renders_raw_address() {
        let (source, mut object) = object_with("app.Outer", 0x30);
        object.write_u64(0x18, 0xdead0000);
        let field = make_field(
            "stray",
            Some("app.Mystery"),
            0x06,
            Some(SlotAccessor::new(0x18, 8)),
        );

        assert_eq!(
            decoder(source).decode(object.addr(), &field),
            DecodedValue::RawAddress(Address::new(0xdead0000))
        );
    }

    #[test]
    fn test_pointer_shaped_field_skips_tag_dispatch() {
        let source = Arc::new(FakeSource::new());
        let inner_ty = make_type("app.Inner", 0x20, None, Vec::new());
        let inner = SyntheticObject::new(inner_ty, vec![0u8; 0x20]);
        source.register(&inner);

        let outer_ty = make_type("app.Outer", 0x30, None, Vec::new());
        let mut outer = SyntheticObject::new(outer_ty, vec![0u8; 0x30]);
        outer.write_u64(0x20, inner.addr().as_u64());
        source.register(&outer);

        // Tag says vec2; pointer-shaped flags win.
        let field = make_field(
            "ref",
            Some("via.vec2"),
            FIELD_KIND_POINTER,
            Some(SlotAccessor::new(0x20, 8)),
        );
        assert_eq!(
            decoder(source).decode(outer.addr(), &field),
            DecodedValue::Object(inner.addr())
        );
    }

    #[test]
    fn test_missing_accessor_is_absent() {
        let (source, object) = object_with("app.Thing", 0x20);
        let field = make_field("opaque", Some("u32"), 0x06, None);
        assert_eq!(decoder(source).decode(object.addr(), &field), DecodedValue::Absent);
    }

    #[test]
    fn test_fault_during_decode_is_absent() {
        let (source, object) = object_with("app.Thing", 0x20);
        let field = make_field("cursed", Some("u32"), 0x06, Some(FaultingAccessor::new()));
        assert_eq!(decoder(source).decode(object.addr(), &field), DecodedValue::Absent);
    }

    #[test]
    fn test_panicking_accessor_is_absent() {
        let (source, object) = object_with("app.Thing", 0x20);
        // Unwind inside the callback becomes a fault of that one call.
        let accessor = ClosureAccessor::new(|_, _| panic!("host callback blew up"));
        let field = make_field("volatile", Some("u32"), 0x06, Some(accessor));
        let decoder = decoder(source);
        assert_eq!(decoder.decode(object.addr(), &field), DecodedValue::Absent);

        // The boundary is per call; a later well-behaved read still works.
        let ok = ClosureAccessor::new(|_, out| out[..4].copy_from_slice(&31u32.to_le_bytes()));
        let field = make_field("steady", Some("u32"), 0x06, Some(ok));
        assert_eq!(decoder.decode(object.addr(), &field), DecodedValue::Unsigned(31));
    }

    #[test]
    fn test_runtime_string_inline() {
        let (source, mut object) = object_with("app.Named", 0x40);
        // Inline handle at 0x18: chars, then length/capacity words.
        let name = "hero";
        for (i, unit) in name.encode_utf16().enumerate() {
            object.write_u16(0x18 + i * 2, unit);
        }
        object.write_u32(0x18 + abi::STRING_LENGTH_OFFSET, name.len() as u32);
        object.write_u32(0x18 + abi::STRING_CAPACITY_OFFSET, 8);

        let field = make_field(
            "name",
            Some("via.string"),
            0x06,
            Some(SlotAccessor::new(0x18, abi::STRING_HANDLE_SIZE)),
        );
        assert_eq!(
            decoder(source).decode(object.addr(), &field),
            DecodedValue::Text("hero".to_string())
        );
    }
}

//! Declared storage types, read from the node's runtime metadata.
//!
//! A storage entry's type is named the way polkadot.js names it: the type
//! path in PascalCase with the `pallet` module segment dropped, wrapped in
//! `Option<..>` when the entry is optional. `pallet_stream::streams::StreamDetails`
//! behind an optional map becomes `Option<PalletStreamStreamsStreamDetails>`.

use codec::Decode;
use frame_metadata::v14::{PalletStorageMetadata, StorageEntryModifier, StorageEntryType};
use frame_metadata::{RuntimeMetadata, RuntimeMetadataPrefixed, META_RESERVED};
use scale_info::form::PortableForm;
use scale_info::{PortableRegistry, TypeDef, TypeDefPrimitive};
use std::collections::HashMap;

/// Reported when the runtime has no such storage entry.
pub const MISSING_ENTRY_TYPE: &str = "<absent from runtime>";

/// Storage entry types of one runtime version, keyed by `(pallet, item)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeTypes {
    entries: HashMap<(String, String), String>,
}

impl RuntimeTypes {
    /// Decode `state_getMetadata` output (V14 or V15).
    pub fn from_metadata(bytes: &[u8]) -> Result<Self, String> {
        let prefixed = RuntimeMetadataPrefixed::decode(&mut &bytes[..])
            .map_err(|e| format!("undecodable runtime metadata: {e}"))?;
        if prefixed.0 != META_RESERVED {
            return Err(format!("bad metadata magic {:#x}", prefixed.0));
        }

        let mut types = Self::default();
        match &prefixed.1 {
            RuntimeMetadata::V14(m) => {
                for p in &m.pallets {
                    let name: &str = &p.name;
                    types.collect(&m.types, name, p.storage.as_ref());
                }
            }
            RuntimeMetadata::V15(m) => {
                for p in &m.pallets {
                    let name: &str = &p.name;
                    types.collect(&m.types, name, p.storage.as_ref());
                }
            }
            other => return Err(format!("unsupported metadata version V{}", other.version())),
        }
        Ok(types)
    }

    fn collect(
        &mut self,
        registry: &PortableRegistry,
        pallet: &str,
        storage: Option<&PalletStorageMetadata<PortableForm>>,
    ) {
        let Some(storage) = storage else { return };
        for entry in &storage.entries {
            let value = match &entry.ty {
                StorageEntryType::Plain(ty) => ty.id,
                StorageEntryType::Map { value, .. } => value.id,
            };
            let inner = type_name(registry, value);
            let declared = match entry.modifier {
                StorageEntryModifier::Optional => format!("Option<{inner}>"),
                StorageEntryModifier::Default => inner,
            };
            let item: &str = &entry.name;
            self.entries
                .insert((pallet.to_string(), item.to_string()), declared);
        }
    }

    pub fn declared_type(&self, pallet: &str, item: &str) -> Option<&str> {
        self.entries
            .get(&(pallet.to_string(), item.to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn type_name(registry: &PortableRegistry, id: u32) -> String {
    let Some(ty) = registry.resolve(id) else {
        return format!("<type {id}>");
    };

    let segments: Vec<&str> = ty.path.segments.iter().map(|s| AsRef::<str>::as_ref(s)).collect();
    if let Some(ident) = segments.last() {
        let params: Vec<String> = ty
            .type_params
            .iter()
            .filter_map(|p| p.ty.as_ref())
            .map(|p| type_name(registry, p.id))
            .collect();
        if matches!(*ident, "Option" | "Result" | "BTreeMap" | "BTreeSet") && !params.is_empty() {
            return format!("{ident}<{}>", params.join(", "));
        }
        return segments
            .iter()
            .filter(|s| **s != "pallet")
            .map(|s| pascal_case(s))
            .collect();
    }

    match &ty.type_def {
        TypeDef::Primitive(p) => primitive_name(p).to_string(),
        TypeDef::Sequence(s) => match type_name(registry, s.type_param.id).as_str() {
            "u8" => "Bytes".to_string(),
            inner => format!("Vec<{inner}>"),
        },
        TypeDef::Array(a) => format!("[{};{}]", type_name(registry, a.type_param.id), a.len),
        TypeDef::Tuple(t) => {
            let fields: Vec<String> = t.fields.iter().map(|f| type_name(registry, f.id)).collect();
            format!("({})", fields.join(","))
        }
        TypeDef::Compact(c) => format!("Compact<{}>", type_name(registry, c.type_param.id)),
        _ => format!("<type {id}>"),
    }
}

fn pascal_case(segment: &str) -> String {
    segment
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn primitive_name(p: &TypeDefPrimitive) -> &'static str {
    match p {
        TypeDefPrimitive::Bool => "bool",
        TypeDefPrimitive::Char => "char",
        TypeDefPrimitive::Str => "Text",
        TypeDefPrimitive::U8 => "u8",
        TypeDefPrimitive::U16 => "u16",
        TypeDefPrimitive::U32 => "u32",
        TypeDefPrimitive::U64 => "u64",
        TypeDefPrimitive::U128 => "u128",
        TypeDefPrimitive::U256 => "u256",
        TypeDefPrimitive::I8 => "i8",
        TypeDefPrimitive::I16 => "i16",
        TypeDefPrimitive::I32 => "i32",
        TypeDefPrimitive::I64 => "i64",
        TypeDefPrimitive::I128 => "i128",
        TypeDefPrimitive::I256 => "i256",
    }
}

//! Tagged-union attribute values and their normalized decoding.
//!
//! The external attribute supplier answers each query with a C-style variant:
//! a numeric type tag plus a type-specific payload. This module owns both
//! sides of that boundary: [`RawVariant`] is the value as delivered, and
//! [`AttributeValue`] is the normalized, owned representation the rest of the
//! library works with.

/// Variant type tags used on the attribute dump wire format. These follow the
/// Blackmagic RAW variant type ordering.
pub mod tag {
    pub const EMPTY: u32 = 0;
    pub const U8: u32 = 1;
    pub const S16: u32 = 2;
    pub const U16: u32 = 3;
    pub const S32: u32 = 4;
    pub const U32: u32 = 5;
    pub const FLOAT32: u32 = 6;
    pub const FLOAT64: u32 = 7;
    pub const STRING: u32 = 8;
    pub const SAFEARRAY: u32 = 9;
}

/// Upper bound on the bytes retained from a SafeArray payload.
pub const MAX_RAW_BYTES: usize = 64 * 1024;

/// Upper bound on the bytes rendered in the hex preview.
pub const HEX_PREVIEW_BYTES: usize = 512;

/// A tagged-union value as delivered by the attribute supplier.
#[derive(Debug, Clone, PartialEq)]
pub enum RawVariant {
    Empty,
    U8(u8),
    S16(i16),
    U16(u16),
    S32(i32),
    U32(u32),
    Float32(f32),
    Float64(f64),
    String(String),
    SafeArray {
        variant_type: u32,
        element_count: u32,
        data: Vec<u8>,
    },
    /// A tag this library does not know. Carried through so it is never
    /// silently dropped.
    Unknown(u32),
}

/// A SafeArray attribute after decoding: a bounded copy of the source bytes
/// plus the metadata needed to render it.
#[derive(Debug, Clone, PartialEq)]
pub struct ByteArrayValue {
    pub element_count: u32,
    pub element_type: u32,
    /// Total payload size in bytes as declared by the source. May exceed the
    /// retained copy.
    pub total_size: u64,
    bytes: Vec<u8>,
}

impl ByteArrayValue {
    /// The retained copy of the source bytes, at most [`MAX_RAW_BYTES`] long.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Normalized decoding of one attribute query result.
///
/// Each case carries only the fields relevant to it; `Unavailable` records a
/// failed query and carries nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Empty,
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Float32(f32),
    Float64(f64),
    Text(String),
    ByteArray(ByteArrayValue),
    Unknown(u32),
    Unavailable,
}

/// Returns the per-element byte size for a SafeArray element tag. Unknown
/// tags default to 1 so a size can always be computed.
pub fn element_size(variant_type: u32) -> u64 {
    match variant_type {
        tag::U8 => 1,
        tag::S16 | tag::U16 => 2,
        tag::S32 | tag::U32 | tag::FLOAT32 => 4,
        tag::FLOAT64 => 8,
        _ => 1,
    }
}

impl AttributeValue {
    /// Normalizes a raw variant into an owned attribute value.
    ///
    /// SafeArray payloads are bounded to [`MAX_RAW_BYTES`]; the declared total
    /// size is computed in 64-bit arithmetic so large element counts cannot
    /// overflow.
    pub fn decode(raw: RawVariant) -> Self {
        match raw {
            RawVariant::Empty => AttributeValue::Empty,
            RawVariant::U8(v) => AttributeValue::UInt8(v),
            RawVariant::S16(v) => AttributeValue::Int16(v),
            RawVariant::U16(v) => AttributeValue::UInt16(v),
            RawVariant::S32(v) => AttributeValue::Int32(v),
            RawVariant::U32(v) => AttributeValue::UInt32(v),
            RawVariant::Float32(v) => AttributeValue::Float32(v),
            RawVariant::Float64(v) => AttributeValue::Float64(v),
            RawVariant::String(s) => AttributeValue::Text(s),
            RawVariant::SafeArray {
                variant_type,
                element_count,
                mut data,
            } => {
                let total_size = element_size(variant_type) * u64::from(element_count);
                let keep = total_size.min(MAX_RAW_BYTES as u64) as usize;
                data.truncate(keep.min(data.len()));
                AttributeValue::ByteArray(ByteArrayValue {
                    element_count,
                    element_type: variant_type,
                    total_size,
                    bytes: data,
                })
            }
            RawVariant::Unknown(t) => AttributeValue::Unknown(t),
        }
    }

    /// The decoded string, present only for `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The retained byte copy, present only for `ByteArray`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AttributeValue::ByteArray(a) => Some(a.bytes()),
            _ => None,
        }
    }

    /// Short type label used in report headers and trace lines.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AttributeValue::Empty => "Empty",
            AttributeValue::UInt8(_) => "U8",
            AttributeValue::Int16(_) => "S16",
            AttributeValue::UInt16(_) => "U16",
            AttributeValue::Int32(_) => "S32",
            AttributeValue::UInt32(_) => "U32",
            AttributeValue::Float32(_) => "Float32",
            AttributeValue::Float64(_) => "Float64",
            AttributeValue::Text(_) => "String",
            AttributeValue::ByteArray(_) => "SafeArray",
            AttributeValue::Unknown(_) => "Unknown",
            AttributeValue::Unavailable => "Unavailable",
        }
    }

    /// Renders the value as a human-readable string.
    ///
    /// Scalars get a type-labeled prefix; SafeArrays get their metadata plus
    /// a hex preview of at most [`HEX_PREVIEW_BYTES`] bytes with a truncation
    /// marker when the preview covers less than the declared total size.
    pub fn display(&self) -> String {
        match self {
            AttributeValue::Empty => "Empty value".to_string(),
            AttributeValue::UInt8(v) => format!("U8 value: {v}"),
            AttributeValue::Int16(v) => format!("S16 value: {v}"),
            AttributeValue::UInt16(v) => format!("U16 value: {v}"),
            AttributeValue::Int32(v) => format!("S32 value: {v}"),
            AttributeValue::UInt32(v) => format!("U32 value: {v}"),
            AttributeValue::Float32(v) => format!("Float32 value: {v}"),
            AttributeValue::Float64(v) => format!("Float64 value: {v}"),
            AttributeValue::Text(s) => format!("String value: {s}"),
            AttributeValue::ByteArray(a) => display_byte_array(a),
            AttributeValue::Unknown(t) => format!("Unknown type: {t}"),
            AttributeValue::Unavailable => "Failed to retrieve".to_string(),
        }
    }
}

fn display_byte_array(array: &ByteArrayValue) -> String {
    if array.element_count == 0 || array.bytes.is_empty() {
        return "SafeArray(empty)".to_string();
    }

    let preview_len = array.bytes.len().min(HEX_PREVIEW_BYTES);
    let hex: Vec<String> = array.bytes[..preview_len]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();

    let mut out = format!(
        "SafeArray(count={}, type={}, size={} bytes): {}",
        array.element_count,
        array.element_type,
        array.total_size,
        hex.join(" ")
    );
    if (preview_len as u64) < array.total_size {
        out.push_str(" ... (truncated)");
    }
    out
}

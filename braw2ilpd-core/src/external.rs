//! Attribute supplier backed by an external dump tool.
//!
//! The Blackmagic RAW SDK has no Rust binding, so the clip is queried through
//! a helper tool that drives the SDK and prints every immersive attribute as
//! JSON on stdout. [`DumpToolSource::open`] runs the tool once, parses its
//! output, and serves the fixed attribute queries from the parsed map.
//!
//! Wire format: a JSON object keyed by attribute name. Each entry carries a
//! numeric `type` tag (see [`crate::variant::tag`]) plus either a scalar
//! `value` or, for SafeArrays, `elementType`, `elementCount`, and the raw
//! bytes as a hex `data` string.

use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use crate::attributes::{info, AttributeId, ATTRIBUTES};
use crate::error::{CoreError, CoreResult};
use crate::source::AttributeSource;
use crate::variant::{tag, RawVariant};

/// Default name of the attribute dump tool, looked up on PATH.
pub const DEFAULT_DUMP_TOOL: &str = "braw-attr-dump";

#[derive(Debug, Deserialize)]
struct DumpEntry {
    #[serde(rename = "type")]
    variant_type: u32,
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(rename = "elementType", default)]
    element_type: Option<u32>,
    #[serde(rename = "elementCount", default)]
    element_count: Option<u32>,
    #[serde(default)]
    data: Option<String>,
}

/// Attribute source that queried the clip once through the dump tool.
pub struct DumpToolSource {
    variants: HashMap<AttributeId, RawVariant>,
}

impl DumpToolSource {
    /// Runs the dump tool against `clip_path` and parses its output.
    ///
    /// The tool process is spawned, waited on, and parsed inside this call;
    /// nothing is left running on any return path. Attributes absent from
    /// the dump simply fail their later queries.
    pub fn open(tool: &str, clip_path: &Path) -> CoreResult<Self> {
        let output = Command::new(tool).arg(clip_path).output().map_err(|e| {
            CoreError::DumpTool(format!("failed to run '{tool}': {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CoreError::DumpTool(format!(
                "'{}' failed for '{}' ({}): {}",
                tool,
                clip_path.display(),
                output.status,
                stderr.trim()
            )));
        }

        let entries: HashMap<String, DumpEntry> = serde_json::from_slice(&output.stdout)
            .map_err(|e| CoreError::DumpFormat(e.to_string()))?;

        let mut variants = HashMap::new();
        for (name, entry) in entries {
            let Some(attr) = ATTRIBUTES.iter().find(|a| a.name == name) else {
                debug!("Ignoring unrecognized attribute '{name}' in dump");
                continue;
            };
            variants.insert(attr.id, raw_variant_from_entry(&name, entry)?);
        }

        Ok(Self { variants })
    }
}

impl AttributeSource for DumpToolSource {
    fn query(&self, id: AttributeId) -> CoreResult<RawVariant> {
        self.variants.get(&id).cloned().ok_or_else(|| {
            CoreError::AttributeQuery(format!("{} not present in dump", info(id).name))
        })
    }
}

fn raw_variant_from_entry(name: &str, entry: DumpEntry) -> CoreResult<RawVariant> {
    let variant = match entry.variant_type {
        tag::EMPTY => RawVariant::Empty,
        tag::U8 => RawVariant::U8(scalar_u64(name, &entry)?.try_into().map_err(|_| {
            range_error(name, "u8")
        })?),
        tag::S16 => RawVariant::S16(scalar_i64(name, &entry)?.try_into().map_err(|_| {
            range_error(name, "i16")
        })?),
        tag::U16 => RawVariant::U16(scalar_u64(name, &entry)?.try_into().map_err(|_| {
            range_error(name, "u16")
        })?),
        tag::S32 => RawVariant::S32(scalar_i64(name, &entry)?.try_into().map_err(|_| {
            range_error(name, "i32")
        })?),
        tag::U32 => RawVariant::U32(scalar_u64(name, &entry)?.try_into().map_err(|_| {
            range_error(name, "u32")
        })?),
        tag::FLOAT32 => RawVariant::Float32(scalar_f64(name, &entry)? as f32),
        tag::FLOAT64 => RawVariant::Float64(scalar_f64(name, &entry)?),
        tag::STRING => {
            let value = entry.value.as_ref().and_then(|v| v.as_str()).ok_or_else(|| {
                CoreError::DumpFormat(format!("attribute '{name}' is missing its string value"))
            })?;
            RawVariant::String(value.to_string())
        }
        tag::SAFEARRAY => {
            let element_type = entry.element_type.ok_or_else(|| {
                CoreError::DumpFormat(format!("attribute '{name}' is missing elementType"))
            })?;
            let element_count = entry.element_count.ok_or_else(|| {
                CoreError::DumpFormat(format!("attribute '{name}' is missing elementCount"))
            })?;
            let data = match entry.data {
                Some(hex) => decode_hex(name, &hex)?,
                None => Vec::new(),
            };
            RawVariant::SafeArray {
                variant_type: element_type,
                element_count,
                data,
            }
        }
        other => RawVariant::Unknown(other),
    };
    Ok(variant)
}

fn scalar_u64(name: &str, entry: &DumpEntry) -> CoreResult<u64> {
    entry
        .value
        .as_ref()
        .and_then(|v| v.as_u64())
        .ok_or_else(|| {
            CoreError::DumpFormat(format!("attribute '{name}' is missing its integer value"))
        })
}

fn scalar_i64(name: &str, entry: &DumpEntry) -> CoreResult<i64> {
    entry
        .value
        .as_ref()
        .and_then(|v| v.as_i64())
        .ok_or_else(|| {
            CoreError::DumpFormat(format!("attribute '{name}' is missing its integer value"))
        })
}

fn scalar_f64(name: &str, entry: &DumpEntry) -> CoreResult<f64> {
    entry
        .value
        .as_ref()
        .and_then(|v| v.as_f64())
        .ok_or_else(|| {
            CoreError::DumpFormat(format!("attribute '{name}' is missing its float value"))
        })
}

fn range_error(name: &str, ty: &str) -> CoreError {
    CoreError::DumpFormat(format!("attribute '{name}' value out of range for {ty}"))
}

fn decode_hex(name: &str, hex: &str) -> CoreResult<Vec<u8>> {
    let compact: String = hex.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.len() % 2 != 0 {
        return Err(CoreError::DumpFormat(format!(
            "attribute '{name}' has odd-length hex data"
        )));
    }
    (0..compact.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&compact[i..i + 2], 16).map_err(|_| {
                CoreError::DumpFormat(format!("attribute '{name}' has invalid hex data"))
            })
        })
        .collect()
}

//! The fixed immersive-video attribute list and the extraction cache.
//!
//! A single static table carries each attribute's identity, wire name, and
//! human description; both extraction and report rendering iterate it, so the
//! two can never drift out of order.

use log::debug;

use crate::error::CoreResult;
use crate::source::AttributeSource;
use crate::variant::AttributeValue;

/// Identity of one immersive-video attribute. This is a closed set: the tool
/// extracts exactly these six.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeId {
    LensProcessingDataFileUuid,
    IlpdFileName,
    Interaxial,
    ProjectionKind,
    CalibrationType,
    ProjectionData,
}

/// One row of the static attribute table.
#[derive(Debug, Clone, Copy)]
pub struct AttributeInfo {
    pub id: AttributeId,
    pub name: &'static str,
    pub description: &'static str,
}

/// The canonical ordered attribute list. Extraction queries these in order;
/// the detailed report renders them in the same order.
pub const ATTRIBUTES: [AttributeInfo; 6] = [
    AttributeInfo {
        id: AttributeId::LensProcessingDataFileUuid,
        name: "OpticalLensProcessingDataFileUUID",
        description: "UUID of the projection data file",
    },
    AttributeInfo {
        id: AttributeId::IlpdFileName,
        name: "OpticalILPDFileName",
        description: "Name of the ILPD projection data file",
    },
    AttributeInfo {
        id: AttributeId::Interaxial,
        name: "OpticalInteraxial",
        description: "Interaxial lens separation",
    },
    AttributeInfo {
        id: AttributeId::ProjectionKind,
        name: "OpticalProjectionKind",
        description: "Projection kind set to 'fish' to indicate Apple immersive video",
    },
    AttributeInfo {
        id: AttributeId::CalibrationType,
        name: "OpticalCalibrationType",
        description: "Calibration type set to 'meiRives' to indicate ILPD lens projection",
    },
    AttributeInfo {
        id: AttributeId::ProjectionData,
        name: "OpticalProjectionData",
        description: "The contents of the projection data file",
    },
];

/// Looks up the table row for an attribute identity.
pub fn info(id: AttributeId) -> &'static AttributeInfo {
    ATTRIBUTES
        .iter()
        .find(|a| a.id == id)
        .expect("every AttributeId has a table row")
}

/// Ordered mapping from attribute identity to its decoded value.
///
/// Built exactly once per extraction pass by [`extract_all`] and read-only
/// afterwards. Always holds one entry per identity in the canonical table
/// order.
#[derive(Debug)]
pub struct AttributeSet {
    entries: Vec<(AttributeId, AttributeValue)>,
}

impl AttributeSet {
    pub fn get(&self, id: AttributeId) -> Option<&AttributeValue> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, value)| value)
    }

    /// Iterates entries in canonical extraction order.
    pub fn iter(&self) -> impl Iterator<Item = (AttributeId, &AttributeValue)> {
        self.entries.iter().map(|(id, value)| (*id, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Queries every attribute in the fixed list exactly once, in list order.
///
/// A failed query is absorbed as [`AttributeValue::Unavailable`] and never
/// aborts the batch; the returned set always has six entries.
pub fn extract_all(source: &dyn AttributeSource) -> AttributeSet {
    let mut entries = Vec::with_capacity(ATTRIBUTES.len());
    for attr in &ATTRIBUTES {
        let value = match query_one(source, attr) {
            Ok(value) => {
                debug!("Successfully retrieved {} (type: {})", attr.name, value.kind_name());
                value
            }
            Err(e) => {
                debug!("Failed to retrieve {}: {}", attr.name, e);
                AttributeValue::Unavailable
            }
        };
        entries.push((attr.id, value));
    }
    AttributeSet { entries }
}

fn query_one(source: &dyn AttributeSource, attr: &AttributeInfo) -> CoreResult<AttributeValue> {
    let raw = source.query(attr.id)?;
    Ok(AttributeValue::decode(raw))
}

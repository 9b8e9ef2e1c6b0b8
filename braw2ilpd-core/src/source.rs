//! Boundary to the external clip attribute supplier.

use crate::attributes::AttributeId;
use crate::error::CoreResult;
use crate::variant::RawVariant;

/// An opaque supplier of raw attribute values for one opened clip.
///
/// Implementations own the codec/clip lifecycle; release happens through
/// `Drop` so every exit path cleans up. A failed query is per-attribute data
/// for the caller, not a batch failure.
pub trait AttributeSource {
    /// Queries one attribute and returns its tagged-union value.
    fn query(&self, id: AttributeId) -> CoreResult<RawVariant>;
}

//! Part classifier: decides where one multipart part belongs.

use intake_core::models::DocumentCategory;

/// Destination of one multipart part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartRoute {
    /// Text field, stored under its field name (last writer wins).
    Scalar,
    /// File belonging to one of the six recognized categories.
    Document(DocumentCategory),
    /// Dropped without error: file under an unrecognized field name, or a
    /// nameless text field. The part's bytes are still drained.
    Ignored,
}

/// Total classification over (field name, file-ness) of a part.
pub fn classify(field_name: &str, is_file: bool) -> PartRoute {
    if is_file {
        match DocumentCategory::from_field_name(field_name) {
            Some(category) => PartRoute::Document(category),
            None => PartRoute::Ignored,
        }
    } else if field_name.is_empty() {
        PartRoute::Ignored
    } else {
        PartRoute::Scalar
    }
}

use crate::types::{Metadata, MetadataCandidate};

pub const MISSING_NAME: &str = "Missing name";
pub const MISSING_IMAGE_URL: &str = "Missing image URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Presence check shared by every provider: both fields must be non-empty.
pub fn validate_metadata(candidate: &MetadataCandidate) -> Validation {
    let mut errors = Vec::new();

    if is_blank(&candidate.name) {
        errors.push(MISSING_NAME.to_string());
    }
    if is_blank(&candidate.image_url) {
        errors.push(MISSING_IMAGE_URL.to_string());
    }

    Validation {
        valid: errors.is_empty(),
        errors,
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, str::is_empty)
}

impl MetadataCandidate {
    /// Runs the presence check and hands back complete metadata, or the
    /// failed validation.
    pub fn into_metadata(self) -> Result<Metadata, Validation> {
        let validation = validate_metadata(&self);
        if !validation.valid {
            return Err(validation);
        }

        match (self.name, self.image_url) {
            (Some(name), Some(image_url)) => Ok(Metadata { name, image_url }),
            _ => Err(validation),
        }
    }
}

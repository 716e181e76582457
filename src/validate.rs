//! Structural sanity checks run before and after mutation.
//!
//! # Hard Rules (Never Violate)
//!
//! 1. **Duplicate pre-check**: if the file's name already appears anywhere in
//!    the document, refuse the whole registration. No second entry, ever.
//! 2. **Post-check before commit**: the mutated document must pass
//!    [`validate`] before a single byte reaches the destination file.
//!
//! This is necessary-but-not-sufficient validation: balanced braces plus
//! required-section presence, not a grammar. Keeping it this shallow is what
//! keeps the tool auditable.

use crate::pbx::locator::{begin_marker, end_marker};
use thiserror::Error;

/// Sections every registration touches; all must be present with both
/// markers for the document to be considered editable.
pub const REQUIRED_SECTIONS: [&str; 4] = [
    "PBXBuildFile",
    "PBXFileReference",
    "PBXGroup",
    "PBXSourcesBuildPhase",
];

#[derive(Error, Debug)]
pub enum ValidateError {
    #[error("'{label}' is already registered in the project")]
    DuplicateRegistration { label: String },

    #[error("unbalanced braces: {open} open vs {close} close")]
    UnbalancedBraces { open: usize, close: usize },

    #[error("missing required section: {name}")]
    MissingSection { name: String },

    #[error("missing end marker for section: {name}")]
    MissingEndMarker { name: String },
}

/// Whether the label (file name) already appears anywhere in the document.
///
/// A plain substring scan, matching comment annotations as well as path
/// attributes. Over-matching is intentional: a name that shows up anywhere
/// is grounds to refuse a second registration.
pub fn already_registered(document: &str, label: &str) -> bool {
    document.contains(label)
}

/// Structural integrity check: balanced braces, required sections present.
pub fn validate(document: &str) -> Result<(), ValidateError> {
    let open = document.matches('{').count();
    let close = document.matches('}').count();
    if open != close {
        return Err(ValidateError::UnbalancedBraces { open, close });
    }

    for name in REQUIRED_SECTIONS {
        if !document.contains(&begin_marker(name)) {
            return Err(ValidateError::MissingSection {
                name: name.to_string(),
            });
        }
        if !document.contains(&end_marker(name)) {
            return Err(ValidateError::MissingEndMarker {
                name: name.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_valid() -> String {
        let mut doc = String::from("{\n");
        for name in REQUIRED_SECTIONS {
            doc.push_str(&begin_marker(name));
            doc.push('\n');
            doc.push_str(&end_marker(name));
            doc.push('\n');
        }
        doc.push_str("}\n");
        doc
    }

    #[test]
    fn valid_document_passes() {
        assert!(validate(&minimal_valid()).is_ok());
    }

    #[test]
    fn validator_passes_on_its_own_output() {
        // Round-trip: a document that validates still validates unchanged.
        let doc = minimal_valid();
        validate(&doc).unwrap();
        validate(&doc).unwrap();
    }

    #[test]
    fn unbalanced_braces_rejected() {
        let doc = format!("{}{{", minimal_valid());
        let result = validate(&doc);
        assert!(matches!(
            result,
            Err(ValidateError::UnbalancedBraces { open: 2, close: 1 })
        ));
    }

    #[test]
    fn missing_section_rejected() {
        let doc = minimal_valid().replace(&begin_marker("PBXGroup"), "");
        assert!(matches!(
            validate(&doc),
            Err(ValidateError::MissingSection { .. })
        ));
    }

    #[test]
    fn missing_end_marker_rejected() {
        let doc = minimal_valid().replace(&end_marker("PBXGroup"), "");
        assert!(matches!(
            validate(&doc),
            Err(ValidateError::MissingEndMarker { .. })
        ));
    }

    #[test]
    fn duplicate_detection() {
        let doc = "\t\tAAAA /* Foo.swift */,\n";
        assert!(already_registered(doc, "Foo.swift"));
        assert!(!already_registered(doc, "Bar.swift"));
    }
}

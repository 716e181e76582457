//! Marker-driven location and mutation of pbxproj sections.
//!
//! A pbxproj document is organized into named sections bounded by literal
//! `/* Begin NAME section */` and `/* End NAME section */` comments. This
//! module finds those regions (and delimited lists nested inside them) by
//! linear scan, and splices new entries in without disturbing surrounding
//! bytes. Deliberately not a grammar: the marker conventions are assumed, and
//! a document that does not follow them fails with a locate error rather
//! than being guessed at.

pub mod errors;
pub mod locator;
pub mod mutator;

pub use errors::{LocateError, MutateError};
pub use locator::{find_block, find_section, find_sources_phase_id, Span, BLOCK_LOOKAHEAD};
pub use mutator::{
    build_file_entry, child_element, file_reference_entry, insert_entry, insert_list_element,
    last_known_file_type, phase_element,
};

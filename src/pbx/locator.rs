use crate::pbx::errors::LocateError;
use regex::Regex;
use std::sync::OnceLock;

/// Bounded lookahead window (bytes) when scanning past an anchor for a
/// delimited list. Large enough for any realistic target or group header,
/// small enough that a missing list fails fast instead of matching a later
/// object's list.
pub const BLOCK_LOOKAHEAD: usize = 3000;

/// A half-open byte range within the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn slice<'a>(&self, document: &'a str) -> &'a str {
        &document[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Begin marker literal for a named section.
pub fn begin_marker(name: &str) -> String {
    format!("/* Begin {name} section */")
}

/// End marker literal for a named section.
pub fn end_marker(name: &str) -> String {
    format!("/* End {name} section */")
}

/// Find the interior span of a named section.
///
/// The span starts immediately after the begin marker and ends at the first
/// byte of the end marker. Markers are derived deterministically from the
/// name; the first occurrence of each wins. Sections do not nest.
pub fn find_section(document: &str, name: &str) -> Result<Span, LocateError> {
    let begin = begin_marker(name);
    let begin_at = document
        .find(&begin)
        .ok_or_else(|| LocateError::SectionNotFound {
            name: name.to_string(),
        })?;
    let interior_start = begin_at + begin.len();

    let end = end_marker(name);
    let end_rel =
        document[interior_start..]
            .find(&end)
            .ok_or_else(|| LocateError::EndMarkerNotFound {
                name: name.to_string(),
                begin: begin_at,
            })?;

    Ok(Span {
        start: interior_start,
        end: interior_start + end_rel,
    })
}

/// Find the interior span of a delimited list following an anchor.
///
/// Scans `within` for the first occurrence of `anchor`, then for `open`
/// within [`BLOCK_LOOKAHEAD`] bytes of the anchor, then for `close` between
/// the open token and the end of `within`. Returns the span between the open
/// and close tokens.
pub fn find_block(
    document: &str,
    within: Span,
    anchor: &str,
    open: &str,
    close: &str,
) -> Result<Span, LocateError> {
    let anchor_rel = within
        .slice(document)
        .find(anchor)
        .ok_or_else(|| LocateError::AnchorNotFound {
            anchor: anchor.to_string(),
        })?;
    let anchor_at = within.start + anchor_rel;

    let window_end = (anchor_at + BLOCK_LOOKAHEAD).min(within.end);
    let open_rel =
        document[anchor_at..window_end]
            .find(open)
            .ok_or_else(|| LocateError::BlockNotFound {
                anchor: anchor.to_string(),
                token: open.to_string(),
                lookahead: BLOCK_LOOKAHEAD,
                at: anchor_at,
            })?;
    let open_end = anchor_at + open_rel + open.len();

    let close_rel =
        document[open_end..within.end]
            .find(close)
            .ok_or_else(|| LocateError::BlockNotFound {
                anchor: anchor.to_string(),
                token: close.to_string(),
                lookahead: within.end - open_end,
                at: open_end,
            })?;

    Ok(Span {
        start: open_end,
        end: open_end + close_rel,
    })
}

fn sources_phase_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([A-F0-9]{24}) /\* Sources \*/").expect("sources phase regex is valid")
    })
}

/// Resolve the identifier of a target's Sources build phase.
///
/// Anchors on the target's object in the PBXNativeTarget section, locates its
/// `buildPhases = (...)` list, and extracts the 24-hex token annotated
/// `/* Sources */`. The phase id is how the target's compilation list is
/// found in the PBXSourcesBuildPhase section.
pub fn find_sources_phase_id(document: &str, target: &str) -> Result<String, LocateError> {
    let targets = find_section(document, "PBXNativeTarget")?;
    let anchor = format!("/* {target} */ = {{");
    let phases = find_block(document, targets, &anchor, "buildPhases = (", ");")?;

    sources_phase_regex()
        .captures(phases.slice(document))
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| LocateError::SourcesPhaseNotFound {
            target: target.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
// !$*UTF8*$!
/* Begin PBXFileReference section */
\t\tAAAAAAAAAAAAAAAAAAAAAAA1 /* Old.swift */ = {isa = PBXFileReference; };
/* End PBXFileReference section */

/* Begin PBXNativeTarget section */
\t\tBBBBBBBBBBBBBBBBBBBBBBB1 /* App */ = {
\t\t\tisa = PBXNativeTarget;
\t\t\tbuildPhases = (
\t\t\t\tCCCCCCCCCCCCCCCCCCCCCCC1 /* Sources */,
\t\t\t\tCCCCCCCCCCCCCCCCCCCCCCC2 /* Frameworks */,
\t\t\t);
\t\t\tname = App;
\t\t};
/* End PBXNativeTarget section */
";

    #[test]
    fn section_interior_excludes_markers() {
        let span = find_section(DOC, "PBXFileReference").unwrap();
        let interior = span.slice(DOC);
        assert!(interior.contains("Old.swift"));
        assert!(!interior.contains("Begin PBXFileReference"));
        assert!(!interior.contains("End PBXFileReference"));
    }

    #[test]
    fn missing_section_reported() {
        let result = find_section(DOC, "PBXGroup");
        assert!(matches!(result, Err(LocateError::SectionNotFound { .. })));
    }

    #[test]
    fn missing_end_marker_reported() {
        let doc = "/* Begin PBXGroup section */\n\t\tstuff;\n";
        let result = find_section(doc, "PBXGroup");
        assert!(matches!(result, Err(LocateError::EndMarkerNotFound { .. })));
    }

    #[test]
    fn block_interior_between_delimiters() {
        let section = find_section(DOC, "PBXNativeTarget").unwrap();
        let block = find_block(DOC, section, "/* App */ = {", "buildPhases = (", ");").unwrap();
        let interior = block.slice(DOC);
        assert!(interior.contains("CCCCCCCCCCCCCCCCCCCCCCC1 /* Sources */"));
        assert!(!interior.contains("buildPhases"));
        assert!(!interior.contains("name = App"));
    }

    #[test]
    fn absent_anchor_reported() {
        let section = find_section(DOC, "PBXNativeTarget").unwrap();
        let result = find_block(DOC, section, "/* Widget */ = {", "buildPhases = (", ");");
        assert!(matches!(result, Err(LocateError::AnchorNotFound { .. })));
    }

    #[test]
    fn sources_phase_id_resolved() {
        let id = find_sources_phase_id(DOC, "App").unwrap();
        assert_eq!(id, "CCCCCCCCCCCCCCCCCCCCCCC1");
    }

    #[test]
    fn sources_phase_absent_for_unknown_target() {
        let result = find_sources_phase_id(DOC, "Widget");
        assert!(matches!(result, Err(LocateError::AnchorNotFound { .. })));
    }
}

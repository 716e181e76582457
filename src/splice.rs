use thiserror::Error;

/// The fundamental mutation primitive: a verified byte-offset insertion.
///
/// All section mutators compile down to this single primitive. Intelligence
/// lives in offset acquisition (marker scanning), not in application. The
/// document is rebuilt as new text on every apply — text in, text out.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Insertion does nothing until apply() is called"]
pub struct Insertion {
    /// Byte offset at which the new text is spliced in
    pub at: usize,
    /// Text to insert; surrounding bytes are untouched
    pub text: String,
}

#[derive(Error, Debug)]
pub enum SpliceError {
    #[error("insertion offset {at} out of bounds for document of length {len}")]
    OutOfBounds { at: usize, len: usize },

    #[error("insertion offset {at} is not a UTF-8 character boundary")]
    NotCharBoundary { at: usize },
}

impl Insertion {
    pub fn new(at: usize, text: impl Into<String>) -> Self {
        Self {
            at,
            text: text.into(),
        }
    }

    /// Apply this insertion, returning the rebuilt document.
    ///
    /// Bytes before `at` and bytes from `at` onward are preserved verbatim;
    /// only the new text is added between them.
    pub fn apply(&self, document: &str) -> Result<String, SpliceError> {
        if self.at > document.len() {
            return Err(SpliceError::OutOfBounds {
                at: self.at,
                len: document.len(),
            });
        }
        if !document.is_char_boundary(self.at) {
            return Err(SpliceError::NotCharBoundary { at: self.at });
        }

        let mut out = String::with_capacity(document.len() + self.text.len());
        out.push_str(&document[..self.at]);
        out.push_str(&self.text);
        out.push_str(&document[self.at..]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_in_middle() {
        let ins = Insertion::new(5, " cruel");
        assert_eq!(ins.apply("hello world").unwrap(), "hello cruel world");
    }

    #[test]
    fn insert_at_start_and_end() {
        assert_eq!(Insertion::new(0, "x").apply("ab").unwrap(), "xab");
        assert_eq!(Insertion::new(2, "x").apply("ab").unwrap(), "abx");
    }

    #[test]
    fn out_of_bounds_rejected() {
        let result = Insertion::new(12, "x").apply("hello world");
        assert!(matches!(result, Err(SpliceError::OutOfBounds { .. })));
    }

    #[test]
    fn non_char_boundary_rejected() {
        // 'é' is two bytes; offset 1 lands inside it
        let result = Insertion::new(1, "x").apply("é");
        assert!(matches!(result, Err(SpliceError::NotCharBoundary { .. })));
    }

    #[test]
    fn locality_preserved() {
        let doc = "prefix|suffix";
        let out = Insertion::new(7, "mid|").apply(doc).unwrap();
        assert!(out.starts_with("prefix|"));
        assert!(out.ends_with("suffix"));
    }
}

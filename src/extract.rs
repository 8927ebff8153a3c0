//! Marker-delimited substring extraction for raw alert documents.
//!
//! The upstream alert feed is a JavaScript fragment of the form
//! `alert_content = "…"; alert_default = …`. The notice text sits between two
//! fixed textual markers: one character past the end of the start marker
//! (the opening quote) and three characters before the start of the end
//! marker (the closing quote, semicolon and space).

use thiserror::Error;

/// The ways a marker-delimited extraction can fail.
///
/// Callers treat any of these as "no active alert" rather than propagating a
/// failure; a malformed document must never crash the poll loop.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// The start marker does not occur in the document.
    #[error("start marker not found in document")]
    StartMarkerNotFound,

    /// The end marker does not occur in the document.
    #[error("end marker not found in document")]
    EndMarkerNotFound,

    /// Both markers were found but they resolve to an invalid slice, e.g.
    /// the end marker occurs before the start marker.
    #[error("markers resolve to an invalid slice ({begin}..{end})")]
    InvalidBounds {
        /// Byte offset where the extracted content would begin.
        begin: usize,
        /// Byte offset where the extracted content would end.
        end: usize,
    },
}

/// Extracts the trimmed substring enclosed by two textual markers.
///
/// The slice begins one character after the end of `start_marker` and ends
/// three characters before the first occurrence of `end_marker`. Offsets are
/// computed per character, so multi-byte content cannot produce an invalid
/// slice.
pub fn between_markers(
    document: &str,
    start_marker: &str,
    end_marker: &str,
) -> Result<String, ExtractionError> {
    let start_idx = document
        .find(start_marker)
        .ok_or(ExtractionError::StartMarkerNotFound)?;
    let end_idx = document
        .find(end_marker)
        .ok_or(ExtractionError::EndMarkerNotFound)?;

    let after_start = start_idx + start_marker.len();
    let begin = match document[after_start..].chars().next() {
        Some(c) => after_start + c.len_utf8(),
        None => {
            return Err(ExtractionError::InvalidBounds {
                begin: after_start,
                end: end_idx,
            });
        }
    };

    // Walk back three characters from the start of the end marker.
    let end = document[..end_idx]
        .char_indices()
        .rev()
        .nth(2)
        .map(|(idx, _)| idx)
        .ok_or(ExtractionError::InvalidBounds {
            begin,
            end: end_idx,
        })?;

    if begin > end {
        return Err(ExtractionError::InvalidBounds { begin, end });
    }

    Ok(document[begin..end].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "alert_content = ";
    const END: &str = "alert_default =";

    fn document(text: &str) -> String {
        format!("var x = 1; alert_content = \"{text}\"; alert_default = \"\";")
    }

    #[test]
    fn test_extracts_enclosed_text() {
        let doc = document("Building X closed due to flooding.");
        let text = between_markers(&doc, START, END).unwrap();
        assert_eq!(text, "Building X closed due to flooding.");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let doc = document("  stay indoors \n");
        let text = between_markers(&doc, START, END).unwrap();
        assert_eq!(text, "stay indoors");
    }

    #[test]
    fn test_empty_content_yields_empty_string() {
        let doc = document("");
        let text = between_markers(&doc, START, END).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_missing_start_marker() {
        let doc = "nothing to see here; alert_default = \"\";";
        assert_eq!(
            between_markers(doc, START, END),
            Err(ExtractionError::StartMarkerNotFound)
        );
    }

    #[test]
    fn test_missing_end_marker() {
        let doc = "alert_content = \"something\";";
        assert_eq!(
            between_markers(doc, START, END),
            Err(ExtractionError::EndMarkerNotFound)
        );
    }

    #[test]
    fn test_markers_out_of_order() {
        let doc = "alert_default = \"\"; alert_content = \"late\";";
        assert!(matches!(
            between_markers(doc, START, END),
            Err(ExtractionError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_multibyte_content_is_handled() {
        let doc = document("Route ouverte — métro fermé");
        let text = between_markers(&doc, START, END).unwrap();
        assert_eq!(text, "Route ouverte — métro fermé");
    }
}

//! Heuristic wine-field extraction from OCR output.
//!
//! This is a best-effort guess, not a parser: labels vary wildly and the
//! only inputs are the OCR text block and the vision service's label tags.
//! `extract` never fails; fields it cannot find are left empty, and no
//! confidence score is produced.

use once_cell::sync::Lazy;
use regex::Regex;
use strum::IntoEnumIterator;

use crate::models::label::{ExtractedWineFields, Varietal};

/// Four-digit years starting with 19 or 20, delimited by ASCII word
/// boundaries so a year glued to a non-ASCII letter (`é2015`) still counts.
static VINTAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)(?:19|20)[0-9]{2}(?-u:\b)").expect("vintage pattern is valid")
});

/// Lines this short (in characters) are treated as OCR noise.
const MIN_LINE_CHARS: usize = 3;

/// Derive wine fields from the OCR text and label descriptions.
///
/// - `vintage`: first 19xx/20xx year in the text, read top to bottom.
/// - `varietal`: first vocabulary entry found in the text; failing that,
///   the first one that appears verbatim among the label descriptions.
/// - `name` / `producer`: the first two distinct lines that are not a
///   varietal, a year, or noise.
pub fn extract(full_text: &str, label_descriptions: &[String]) -> ExtractedWineFields {
    let (name, producer) = guess_name_and_producer(full_text);

    ExtractedWineFields {
        name,
        producer,
        varietal: find_varietal(full_text, label_descriptions),
        vintage: find_vintage(full_text),
    }
}

/// First 19xx/20xx year in `text`.
pub fn find_vintage(text: &str) -> Option<i32> {
    VINTAGE_RE
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

/// Varietal named in the text, else in the label tags.
///
/// Ties are broken by vocabulary order, not by position in the text.
pub fn find_varietal(text: &str, label_descriptions: &[String]) -> Option<Varietal> {
    let lowered = text.to_lowercase();

    Varietal::iter()
        .find(|v| lowered.contains(v.as_str()))
        .or_else(|| {
            Varietal::iter().find(|v| label_descriptions.iter().any(|label| label == v.as_str()))
        })
}

fn mentions_varietal(lowered: &str) -> bool {
    Varietal::iter().any(|v| lowered.contains(v.as_str()))
}

fn is_candidate_line(line: &str) -> bool {
    let lowered = line.to_lowercase();

    !mentions_varietal(&lowered)
        && !VINTAGE_RE.is_match(&lowered)
        && lowered.chars().count() >= MIN_LINE_CHARS
}

fn guess_name_and_producer(text: &str) -> (String, String) {
    let mut name: Option<&str> = None;
    let mut producer: Option<&str> = None;

    for line in text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| is_candidate_line(l))
    {
        match name {
            None => name = Some(line),
            Some(n) if line != n => {
                producer = Some(line);
                break;
            }
            Some(_) => {}
        }
    }

    (
        name.unwrap_or_default().to_string(),
        producer.unwrap_or_default().to_string(),
    )
}

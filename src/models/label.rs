use axum::body::Bytes;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Grape varietals recognised on a label.
///
/// Declaration order is matching priority: when a label mentions several
/// varietals, the one declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum Varietal {
    #[strum(serialize = "cabernet sauvignon")]
    CabernetSauvignon,
    #[strum(serialize = "merlot")]
    Merlot,
    #[strum(serialize = "pinotage")]
    Pinotage,
    #[strum(serialize = "shiraz")]
    Shiraz,
    #[strum(serialize = "syrah")]
    Syrah,
    #[strum(serialize = "pinot noir")]
    PinotNoir,
    #[strum(serialize = "chardonnay")]
    Chardonnay,
    #[strum(serialize = "sauvignon blanc")]
    SauvignonBlanc,
    #[strum(serialize = "chenin blanc")]
    CheninBlanc,
    #[strum(serialize = "malbec")]
    Malbec,
    #[strum(serialize = "tempranillo")]
    Tempranillo,
    #[strum(serialize = "grenache")]
    Grenache,
    #[strum(serialize = "riesling")]
    Riesling,
    #[strum(serialize = "nebbiolo")]
    Nebbiolo,
}

impl Varietal {
    /// Lowercase name as it appears in the vocabulary.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Raw output of the vision service for one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisionAnnotations {
    /// Full OCR text block, lines separated by `\n`. Empty when no text was found.
    pub full_text: String,
    /// Label-detection descriptions, lowercased, in the order returned.
    pub label_descriptions: Vec<String>,
}

/// Wine fields guessed from a label.
///
/// Every field is best-effort: an empty string or `None` means the label
/// gave no usable signal, not that something failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedWineFields {
    pub name: String,
    pub producer: String,
    pub varietal: Option<Varietal>,
    pub vintage: Option<i32>,
}

/// A label photo written to object storage.
#[derive(Debug, Clone)]
pub struct LabelImage {
    pub storage_key: String,
    pub public_url: String,
    pub content_type: String,
    pub bytes: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_varietal_names_are_lowercase() {
        for varietal in Varietal::iter() {
            let name = varietal.to_string();
            assert_eq!(name, name.to_lowercase());
            assert_eq!(name, varietal.as_str());
            assert_eq!(Varietal::from_str(&name).unwrap(), varietal);
        }
    }

    #[test]
    fn test_vocabulary_order() {
        let first: Vec<_> = Varietal::iter().take(3).collect();
        assert_eq!(
            first,
            vec![Varietal::CabernetSauvignon, Varietal::Merlot, Varietal::Pinotage]
        );
        assert_eq!(Varietal::iter().count(), 14);
    }
}

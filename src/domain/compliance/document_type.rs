//! Compliance document categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Kind of compliance artifact a vendor uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    W9,
    Coi,
    License,
    Bond,
    Nda,
    Contract,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::W9 => "w9",
            DocumentType::Coi => "coi",
            DocumentType::License => "license",
            DocumentType::Bond => "bond",
            DocumentType::Nda => "nda",
            DocumentType::Contract => "contract",
            DocumentType::Other => "other",
        }
    }

    /// Human-readable label used in notifications.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::W9 => "W-9 Form",
            DocumentType::Coi => "Certificate of Insurance (COI)",
            DocumentType::License => "Business License",
            DocumentType::Bond => "Performance Bond",
            DocumentType::Nda => "Non-Disclosure Agreement",
            DocumentType::Contract => "Contract",
            DocumentType::Other => "Other",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for DocumentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "w9" | "w-9" => Ok(DocumentType::W9),
            "coi" => Ok(DocumentType::Coi),
            "license" => Ok(DocumentType::License),
            "bond" => Ok(DocumentType::Bond),
            "nda" => Ok(DocumentType::Nda),
            "contract" => Ok(DocumentType::Contract),
            "other" => Ok(DocumentType::Other),
            other => Err(ValidationError::invalid_format(
                "document_type",
                format!("unknown document type '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_portal_wording() {
        assert_eq!(DocumentType::W9.label(), "W-9 Form");
        assert_eq!(DocumentType::Coi.label(), "Certificate of Insurance (COI)");
    }

    #[test]
    fn parses_stored_and_dashed_forms() {
        assert_eq!("w9".parse::<DocumentType>(), Ok(DocumentType::W9));
        assert_eq!("W-9".parse::<DocumentType>(), Ok(DocumentType::W9));
        assert!("passport".parse::<DocumentType>().is_err());
    }
}

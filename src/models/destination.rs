//! Destination models

use serde::{Deserialize, Serialize};

/// Entry of the top destinations rotator
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TopDestination {
    pub name: String,
    pub location: String,
    pub image: String,
}

/// Layout size of a destination grid card
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Large,
    Medium,
    Small,
}

impl SizeClass {
    /// CSS class of the grid card
    #[must_use]
    pub fn card_class(self) -> &'static str {
        match self {
            SizeClass::Large => "card card-large",
            SizeClass::Medium => "card card-medium",
            SizeClass::Small => "card card-small",
        }
    }
}

/// Entry of the "more destinations" grid
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MoreDestination {
    pub name: String,
    pub location: String,
    pub image: String,
    pub size: SizeClass,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_class_deserializes_lowercase() {
        let size: SizeClass = serde_json::from_str("\"large\"").unwrap();
        assert_eq!(size, SizeClass::Large);
        assert_eq!(size.card_class(), "card card-large");
    }
}

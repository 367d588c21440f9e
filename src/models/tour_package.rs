//! Tour package model

use serde::{Deserialize, Serialize};

/// A bookable tour package
///
/// Prices are display strings; no arithmetic is performed on them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TourPackage {
    pub title: String,
    /// Location label, e.g. "SRI LANKA"
    pub location: String,
    pub price: String,
    pub original_price: String,
    pub days: u32,
    /// Capacity label, e.g. "2+ People Going"
    pub people: String,
    /// Star rating, 1 to 5
    pub rating: u8,
    pub description: String,
    pub highlights: Vec<String>,
    /// Entries formatted as `"Day N: description"`
    pub itinerary: Vec<String>,
    pub image: String,
}

/// One itinerary entry split into its day label and description
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ItineraryDay<'a> {
    pub label: &'a str,
    pub description: &'a str,
}

impl<'a> ItineraryDay<'a> {
    /// Split on the first `:`; later colons stay in the description.
    #[must_use]
    pub fn parse(entry: &'a str) -> Self {
        match entry.split_once(':') {
            Some((label, description)) => Self {
                label: label.trim(),
                description: description.trim(),
            },
            None => Self {
                label: "",
                description: entry.trim(),
            },
        }
    }
}

impl TourPackage {
    /// Itinerary entries split into label and description
    pub fn itinerary_days(&self) -> impl Iterator<Item = ItineraryDay<'_>> {
        self.itinerary.iter().map(|entry| ItineraryDay::parse(entry))
    }

    /// Rating clamped into the 1..=5 star range
    #[must_use]
    pub fn stars(&self) -> u8 {
        self.rating.clamp(1, 5)
    }
}

//! Traveler review model

use serde::{Deserialize, Serialize};

/// A testimonial shown in the reviews rotator
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: u32,
    pub name: String,
    pub location: String,
    /// Title of the reviewed package. Free text, matched by title only.
    pub tour_package: String,
    pub text: String,
    pub rating: u8,
    pub avatar: String,
    pub tour_image: String,
    /// Display label, e.g. "March 2025"
    pub date: String,
    pub verified: bool,
}

//! Data models for the Wander Lens Tours site
//!
//! All catalog data is read-only after load:
//! - Tour packages with their itineraries
//! - Reviews shown by the testimonials rotator
//! - Top and "more" destinations
//! - Gallery collage photos

pub mod destination;
pub mod photo;
pub mod review;
pub mod tour_package;

// Re-export all public types for convenient access
pub use destination::{MoreDestination, SizeClass, TopDestination};
pub use photo::{HOVER_Z_INDEX, Photo, PhotoPlacement};
pub use review::Review;
pub use tour_package::{ItineraryDay, TourPackage};

use serde::{Deserialize, Serialize};

/// What a package price covers and what it does not
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Inclusions {
    pub included: Vec<String>,
    pub excluded: Vec<String>,
}

//! Static catalog data
//!
//! The catalog ships inside the binary as JSON and is parsed once at
//! startup. Nothing mutates it afterwards.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::WanderLensError;
use crate::models::{Inclusions, MoreDestination, Photo, Review, TopDestination, TourPackage};

const EMBEDDED_CATALOG: &str = include_str!("catalog.json");

/// Every fixed list the page is built from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub packages: Vec<TourPackage>,
    pub top_destinations: Vec<TopDestination>,
    pub more_destinations: Vec<MoreDestination>,
    pub photos: Vec<Photo>,
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub inclusions: Inclusions,
}

impl Catalog {
    /// Parse the catalog compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_CATALOG).context("Failed to load embedded catalog")
    }

    /// Parse and sanity-check a catalog document
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Catalog =
            serde_json::from_str(json).context("Catalog JSON does not match the schema")?;
        catalog.validate()?;

        debug!(
            packages = catalog.packages.len(),
            reviews = catalog.reviews.len(),
            photos = catalog.photos.len(),
            "Catalog loaded"
        );

        for review in catalog.orphaned_reviews() {
            warn!(
                review_id = review.id,
                package = %review.tour_package,
                "Review references a package title that is not in the catalog"
            );
        }

        Ok(catalog)
    }

    fn validate(&self) -> Result<(), WanderLensError> {
        if let Some(package) = self.packages.iter().find(|p| !(1..=5).contains(&p.rating)) {
            return Err(WanderLensError::validation(format!(
                "Package '{}' has rating {} outside 1-5",
                package.title, package.rating
            )));
        }
        if let Some(review) = self.reviews.iter().find(|r| !(1..=5).contains(&r.rating)) {
            return Err(WanderLensError::validation(format!(
                "Review {} has rating {} outside 1-5",
                review.id, review.rating
            )));
        }
        Ok(())
    }

    /// Package at a catalog index
    pub fn package(&self, index: usize) -> Result<&TourPackage, WanderLensError> {
        self.packages
            .get(index)
            .ok_or_else(|| WanderLensError::not_found(format!("tour package #{index}")))
    }

    /// Resolve a review to its package by exact title match.
    ///
    /// Titles are free text on both sides, so this can return `None`.
    #[must_use]
    pub fn package_for_review(&self, review: &Review) -> Option<&TourPackage> {
        self.packages
            .iter()
            .find(|package| package.title == review.tour_package)
    }

    /// Reviews whose package title has no match
    pub fn orphaned_reviews(&self) -> impl Iterator<Item = &Review> {
        self.reviews
            .iter()
            .filter(|review| self.package_for_review(review).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_parses() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(catalog.packages.len(), 4);
        assert_eq!(catalog.reviews.len(), 7);
        assert_eq!(catalog.more_destinations.len(), 6);
        assert_eq!(catalog.photos.len(), 11);
        assert!(!catalog.inclusions.included.is_empty());
        assert!(!catalog.inclusions.excluded.is_empty());
    }

    #[test]
    fn test_rotated_lists_are_longer_than_their_windows() {
        let catalog = Catalog::embedded().unwrap();
        assert!(catalog.top_destinations.len() > 4);
        assert!(catalog.reviews.len() > 3);
    }

    #[test]
    fn test_itinerary_matches_day_count() {
        let catalog = Catalog::embedded().unwrap();
        for package in &catalog.packages {
            assert_eq!(package.itinerary.len(), package.days as usize, "{}", package.title);
            for (n, day) in package.itinerary_days().enumerate() {
                assert_eq!(day.label, format!("Day {}", n + 1));
            }
        }
    }

    #[test]
    fn test_review_package_resolution_by_title() {
        let catalog = Catalog::embedded().unwrap();
        let first = &catalog.reviews[0];
        assert_eq!(
            catalog.package_for_review(first).map(|p| p.title.as_str()),
            Some("12 Days Nature & Wildlife Tour")
        );

        // "14 Days Complete Experience" drifted from the package title
        let orphaned: Vec<u32> = catalog.orphaned_reviews().map(|r| r.id).collect();
        assert_eq!(orphaned, vec![3, 7]);
    }

    #[test]
    fn test_package_lookup() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(catalog.package(3).unwrap().title, "Premium Safari Experience");
        assert!(matches!(
            catalog.package(9),
            Err(WanderLensError::NotFound { .. })
        ));
    }

    #[test]
    fn test_rating_out_of_range_is_rejected() {
        let json = EMBEDDED_CATALOG.replacen("\"rating\": 5", "\"rating\": 9", 1);
        let result = Catalog::from_json(&json);
        assert!(result.is_err());
    }
}

//! `wanderlens` - Wander Lens Tours marketing site
//!
//! Serves the single-page site with its rotating carousels, the contact and
//! booking forms, and the gallery listing API.

pub mod api;
pub mod carousel;
pub mod catalog;
pub mod config;
pub mod error;
pub mod forms;
pub mod gallery;
pub mod messaging;
pub mod modal;
pub mod models;
pub mod telemetry;
pub mod views;
pub mod web;

// Re-export core types for public API
pub use carousel::{Carousel, CarouselView, Control, Rotator, Wrap};
pub use catalog::Catalog;
pub use config::SiteConfig;
pub use error::WanderLensError;
pub use forms::{Field, FormData, FormKind};
pub use gallery::{GalleryImages, GalleryService};
pub use modal::{BookingModal, ChatHandoff, Confirmation, ContactModal};
pub use web::{AppState, app};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WanderLensError>;

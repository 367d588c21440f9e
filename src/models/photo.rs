//! Gallery collage photo model

use serde::{Deserialize, Serialize};

/// Stacking order given to the photo under the pointer
pub const HOVER_Z_INDEX: i32 = 50;

/// Presentation-only placement of a collage photo
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPlacement {
    pub rotate_deg: f32,
    pub translate_x_px: f32,
    pub translate_y_px: f32,
    pub z_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
}

impl PhotoPlacement {
    /// Inline CSS declaration for this placement
    #[must_use]
    pub fn css(&self) -> String {
        let mut css = format!(
            "transform: rotate({}deg) translate({}px, {}px); z-index: {};",
            self.rotate_deg, self.translate_x_px, self.translate_y_px, self.z_index
        );
        for (property, value) in [
            ("top", &self.top),
            ("left", &self.left),
            ("right", &self.right),
            ("bottom", &self.bottom),
        ] {
            if let Some(value) = value {
                css.push_str(&format!(" {property}: {value};"));
            }
        }
        css
    }
}

/// A photo of the gallery collage
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Photo {
    pub id: u32,
    pub src: String,
    /// Caption, also used as alt text
    pub alt: String,
    pub placement: PhotoPlacement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_css() {
        let placement = PhotoPlacement {
            rotate_deg: -8.0,
            translate_x_px: -20.0,
            translate_y_px: 10.0,
            z_index: 1,
            top: Some("3%".to_string()),
            left: Some("5%".to_string()),
            ..PhotoPlacement::default()
        };
        assert_eq!(
            placement.css(),
            "transform: rotate(-8deg) translate(-20px, 10px); z-index: 1; top: 3%; left: 5%;"
        );
    }

    #[test]
    fn test_placement_css_skips_missing_offsets() {
        let placement = PhotoPlacement {
            z_index: 2,
            bottom: Some("5%".to_string()),
            ..PhotoPlacement::default()
        };
        let css = placement.css();
        assert!(css.ends_with("bottom: 5%;"));
        assert!(!css.contains("top"));
    }
}

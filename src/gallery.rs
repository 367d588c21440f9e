//! Gallery directory listing
//!
//! Lists image files in one directory and maps them to public paths. Read
//! failures never reach the caller: they degrade to an empty list and are
//! logged for the operator.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::WanderLensError;
use crate::config::GalleryConfig;

/// Response body of the gallery endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GalleryImages {
    pub images: Vec<String>,
}

/// Lists the images of a fixed directory
#[derive(Debug, Clone)]
pub struct GalleryService {
    directory: PathBuf,
    base_route: String,
    extensions: Vec<String>,
}

impl GalleryService {
    pub fn new(
        directory: impl Into<PathBuf>,
        base_route: impl Into<String>,
        extensions: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        Self {
            directory: directory.into(),
            base_route: base_route.into().trim_end_matches('/').to_string(),
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(&config.directory, &config.base_route, &config.extensions)
    }

    /// Public paths of the images, sorted by file name. Empty on any failure.
    #[instrument(skip(self), fields(directory = %self.directory.display()))]
    pub async fn list_images(&self) -> GalleryImages {
        match self.read_images().await {
            Ok(images) => {
                debug!(count = images.len(), "Listed gallery images");
                GalleryImages { images }
            }
            Err(e) if e.is_missing_directory() => {
                debug!("Gallery directory does not exist");
                GalleryImages::default()
            }
            Err(e) => {
                warn!("Error reading gallery directory: {e}");
                GalleryImages::default()
            }
        }
    }

    /// Fallible listing behind [`GalleryService::list_images`]
    pub async fn read_images(&self) -> Result<Vec<String>, WanderLensError> {
        let unavailable =
            |e: std::io::Error| WanderLensError::directory_unavailable(&self.directory, e);

        let mut entries = tokio::fs::read_dir(&self.directory)
            .await
            .map_err(unavailable)?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(unavailable)? {
            let file_type = entry.file_type().await.map_err(unavailable)?;
            if file_type.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                warn!("Skipping gallery file with a non UTF-8 name");
                continue;
            };
            if self.is_image(&name) {
                names.push(name);
            }
        }

        names.sort();
        Ok(names
            .into_iter()
            .map(|name| format!("{}/{}", self.base_route, name))
            .collect())
    }

    /// Case-insensitive extension check
    fn is_image(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn service(dir: &Path) -> GalleryService {
        GalleryService::new(dir, "/base", ["jpg", "jpeg", "png", "gif", "webp"])
    }

    #[tokio::test]
    async fn test_missing_directory_yields_empty_list() {
        let dir = TempDir::new().unwrap();
        let gallery = service(&dir.path().join("does-not-exist"));
        assert_eq!(gallery.list_images().await, GalleryImages { images: vec![] });

        let err = gallery.read_images().await.unwrap_err();
        assert!(err.is_missing_directory());
    }

    #[tokio::test]
    async fn test_mixed_directory_keeps_images_only() {
        let dir = TempDir::new().unwrap();
        for name in ["a.jpg", "b.txt", "c.PNG"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let images = service(dir.path()).list_images().await;
        assert_eq!(images.images, vec!["/base/a.jpg", "/base/c.PNG"]);
    }

    #[tokio::test]
    async fn test_subdirectories_and_extensionless_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested.jpg")).unwrap();
        fs::write(dir.path().join("README"), b"x").unwrap();
        fs::write(dir.path().join("photo.webp"), b"x").unwrap();

        let images = service(dir.path()).list_images().await;
        assert_eq!(images.images, vec!["/base/photo.webp"]);
    }

    #[tokio::test]
    async fn test_path_that_is_a_file_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("gallery");
        fs::write(&file, b"not a directory").unwrap();

        let gallery = service(&file);
        assert!(gallery.list_images().await.images.is_empty());

        let err = gallery.read_images().await.unwrap_err();
        assert!(matches!(err, WanderLensError::DirectoryUnavailable { .. }));
        assert!(!err.is_missing_directory());
    }

    #[test]
    fn test_extension_normalization() {
        let gallery = GalleryService::new("/tmp", "/img/gallery/", [".JPG"]);
        assert!(gallery.is_image("holiday.jpg"));
        assert!(gallery.is_image("holiday.JpG"));
        assert!(!gallery.is_image("holiday.png"));
        assert!(!gallery.is_image("jpg"));
    }

    #[test]
    fn test_gallery_json_shape() {
        let body = serde_json::to_value(GalleryImages::default()).unwrap();
        assert_eq!(body, serde_json::json!({ "images": [] }));
    }
}

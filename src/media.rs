use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use foodgram_shared::Error;
use image::ImageFormat;
use url::Url;

const IMAGE_DIR: &str = "recipes/images";

#[derive(Debug)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl DecodedImage {
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("bin")
    }
}

fn invalid_image() -> Error {
    Error::field(
        "image",
        "invalid",
        "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
    )
}

/// Parses `data:image/<fmt>;base64,<payload>` and checks the payload is an
/// image the `image` crate can decode.
pub fn decode_data_uri(input: &str) -> Result<DecodedImage, Error> {
    let Some((header, payload)) = input.trim().split_once(',') else {
        return Err(invalid_image());
    };

    let Some(mime) = header
        .strip_prefix("data:")
        .and_then(|h| h.strip_suffix(";base64"))
    else {
        return Err(invalid_image());
    };

    if !mime.starts_with("image/") {
        return Err(invalid_image());
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| invalid_image())?;

    let format = image::guess_format(&bytes).map_err(|_| invalid_image())?;
    image::load_from_memory_with_format(&bytes, format).map_err(|_| invalid_image())?;

    Ok(DecodedImage { bytes, format })
}

/// Local directory holding uploaded images, served under `url_prefix`.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    base_url: Url,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: &str, url_prefix: &str) -> anyhow::Result<Self> {
        let prefix = format!("{}/", url_prefix.trim_end_matches('/'));
        let base_url = Url::parse(base_url)?.join(&prefix)?;

        Ok(Self {
            root: root.into(),
            base_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the image under a fresh name and returns its media path.
    pub async fn save(&self, image: &DecodedImage) -> anyhow::Result<String> {
        let name = format!(
            "{IMAGE_DIR}/{}.{}",
            ulid::Ulid::new().to_string().to_lowercase(),
            image.extension()
        );

        let path = self.root.join(&name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &image.bytes).await?;

        tracing::debug!(path = %path.display(), "image stored");

        Ok(name)
    }

    /// Best-effort removal: failures are logged, never returned.
    pub async fn remove(&self, name: &str) {
        if name.is_empty() || name.contains("..") {
            return;
        }

        let path = self.root.join(name);
        if let Err(err) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), err = %err, "failed to remove image");
        }
    }

    pub fn url(&self, name: &str) -> String {
        match self.base_url.join(name) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{name}", self.base_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_data_uri() -> String {
        let mut bytes = Cursor::new(Vec::new());
        image::RgbImage::new(1, 1)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();

        format!("data:image/png;base64,{}", STANDARD.encode(bytes.into_inner()))
    }

    #[test]
    fn test_decode_png() {
        let image = decode_data_uri(&png_data_uri()).unwrap();

        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!(image.extension(), "png");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        for input in [
            "",
            "hello",
            "data:text/plain;base64,aGVsbG8=",
            "data:image/png;base64,not base64!",
            "data:image/png;base64,aGVsbG8=",
            "data:image/png,aGVsbG8=",
        ] {
            assert!(
                matches!(decode_data_uri(input), Err(Error::Validate(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn test_url_joins_prefix() {
        let media = MediaStorage::new("media", "http://localhost:8000", "/media").unwrap();

        assert_eq!(
            media.url("recipes/images/a.png"),
            "http://localhost:8000/media/recipes/images/a.png"
        );
    }

    #[tokio::test]
    async fn test_save_and_remove() -> anyhow::Result<()> {
        let dir = temp_dir::TempDir::new()?;
        let media = MediaStorage::new(dir.path(), "http://localhost:8000", "/media/")?;

        let image = decode_data_uri(&png_data_uri())?;
        let name = media.save(&image).await?;

        assert!(name.starts_with("recipes/images/"));
        assert!(name.ends_with(".png"));
        assert!(dir.path().join(&name).exists());

        media.remove(&name).await;
        assert!(!dir.path().join(&name).exists());

        // already gone: logged, not an error
        media.remove(&name).await;

        Ok(())
    }
}

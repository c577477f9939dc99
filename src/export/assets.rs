// src/export/assets.rs
//! Image downloads into the asset directory.

use super::paths::relative_path;
use crate::error::AppError;
use crate::transform::AssetFuture;
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

static IMAGE_EXTENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(png|jpe?g|gif|webp)$").expect("image extension regex is valid")
});

/// Retrieves the bytes behind an asset URL.
pub trait AssetFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError>;
}

/// Downloads assets over HTTP.
///
/// The blocking client is built on first use so that it is created on a
/// downloader thread rather than inside the async runtime.
#[derive(Default)]
pub struct HttpAssetFetcher {
    client: OnceCell<reqwest::blocking::Client>,
}

impl HttpAssetFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssetFetcher for HttpAssetFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let client = self
            .client
            .get_or_try_init(|| reqwest::blocking::Client::builder().build())?;

        let response = client.get(url).send()?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(AppError::AssetDownload {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes()?.to_vec())
    }
}

/// Where an asset is stored: `<asset directory>/<block id><extension>`.
pub fn asset_path(asset_directory: &Path, asset: &AssetFuture) -> PathBuf {
    asset_directory.join(format!("{}{}", asset.block_id.as_str(), asset.extension))
}

/// Stores an image asset locally and returns its path relative to the
/// export directory.
///
/// An asset that already exists on disk is reused without downloading.
pub fn download_asset(
    asset: &AssetFuture,
    asset_directory: Option<&Path>,
    export_directory: &Path,
    fetcher: &dyn AssetFetcher,
) -> Result<String, AppError> {
    let asset_directory = asset_directory
        .filter(|dir| !dir.as_os_str().is_empty())
        .ok_or_else(|| {
            AppError::MissingConfiguration("config assetDirectory is empty".to_string())
        })?;

    if !IMAGE_EXTENSION.is_match(&asset.extension) {
        return Err(AppError::UnsupportedExtension(asset.extension.clone()));
    }

    let target = asset_path(asset_directory, asset);
    if target.exists() {
        log::debug!("Reusing downloaded asset {}", target.display());
    } else {
        let bytes = fetcher.fetch(&asset.url)?;
        fs::write(&target, bytes)?;
        log::debug!("Downloaded {} -> {}", asset.url, target.display());
    }

    relative_path(&target, export_directory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockId;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicUsize,
    }

    impl AssetFetcher for CountingFetcher {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(b"\x89PNG".to_vec())
        }
    }

    struct FailingFetcher;

    impl AssetFetcher for FailingFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
            Err(AppError::AssetDownload {
                url: url.to_string(),
                status: 403,
            })
        }
    }

    fn asset(id: &str, url: &str) -> AssetFuture {
        AssetFuture::new(BlockId::parse(id).unwrap(), url)
    }

    const ID: &str = "aaaaaaaabbbbccccddddeeeeeeeeeeee";

    #[test]
    fn test_rejects_non_image_extension() {
        let dir = TempDir::new().unwrap();
        let fetcher = CountingFetcher::default();

        let err = download_asset(
            &asset(ID, "https://files.example.com/notes.txt"),
            Some(dir.path()),
            dir.path(),
            &fetcher,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "unsupported extension: .txt");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_downloads_once_then_reuses() {
        let root = TempDir::new().unwrap();
        let assets = root.path().join("assets");
        let notes = root.path().join("notes");
        fs::create_dir_all(&assets).unwrap();
        fs::create_dir_all(&notes).unwrap();
        let fetcher = CountingFetcher::default();

        let image = asset(ID, "https://files.example.com/photo.PNG?sig=1");
        let first = download_asset(&image, Some(&assets), &notes, &fetcher).unwrap();
        let again = asset(ID, "https://files.example.com/photo.PNG?sig=2");
        let second = download_asset(&again, Some(&assets), &notes, &fetcher).unwrap();

        assert_eq!(first, format!("../assets/{}.png", ID));
        assert_eq!(second, first);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert!(assets.join(format!("{}.png", ID)).exists());
    }

    #[test]
    fn test_other_block_gets_own_file() {
        let dir = TempDir::new().unwrap();
        let fetcher = CountingFetcher::default();

        let a = download_asset(
            &asset(ID, "https://x.example.com/a.jpg"),
            Some(dir.path()),
            dir.path(),
            &fetcher,
        )
        .unwrap();
        let b = download_asset(
            &asset("11111111222233334444555555555555", "https://x.example.com/a.jpg"),
            Some(dir.path()),
            dir.path(),
            &fetcher,
        )
        .unwrap();

        assert_ne!(a, b);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_missing_asset_directory() {
        let fetcher = CountingFetcher::default();
        let err = download_asset(
            &asset(ID, "https://x.example.com/a.gif"),
            None,
            Path::new("."),
            &fetcher,
        )
        .unwrap_err();
        assert!(err.to_string().contains("config assetDirectory is empty"));
    }

    #[test]
    fn test_failed_download_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let err = download_asset(
            &asset(ID, "https://x.example.com/a.webp"),
            Some(dir.path()),
            dir.path(),
            &FailingFetcher,
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "statusCode: 403, URL: https://x.example.com/a.webp"
        );
        assert!(!asset_path(dir.path(), &asset(ID, "https://x.example.com/a.webp")).exists());
    }
}

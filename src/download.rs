//! Image download and display

use crate::client::fetch_bytes;
use crate::image::Image;
use crate::{Result, XkcdError};
use reqwest::Client;
use std::path::{Path, PathBuf};
use url::Url;

/// `{directory}/{image.filename}`
pub fn default_path(directory: &Path, image: &Image) -> Result<PathBuf> {
    if image.filename.is_empty() {
        return Err(XkcdError::Validation(format!(
            "image URL '{}' has no filename, pass an explicit destination",
            image.url
        )));
    }
    Ok(directory.join(&image.filename))
}

/// Fetches the image bytes and writes them to `path`, creating parent directories
pub async fn download_to(client: &Client, image: &Image, path: &Path) -> Result<()> {
    let url = Url::parse(&image.url)?;
    let bytes = fetch_bytes(client, &url).await?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &bytes).await?;

    tracing::debug!("Wrote {} bytes from {} to {}", bytes.len(), url, path.display());
    Ok(())
}

/// Opens a file with the platform's default viewer without waiting for it
pub async fn open_in_viewer(path: &Path) -> Result<()> {
    let mut command = if cfg!(target_os = "windows") {
        let mut command = tokio::process::Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else if cfg!(target_os = "macos") {
        tokio::process::Command::new("open")
    } else {
        tokio::process::Command::new("xdg-open")
    };

    command.arg(path).spawn()?;
    Ok(())
}

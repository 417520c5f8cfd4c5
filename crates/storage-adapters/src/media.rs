//! Local filesystem implementation of `MediaStorage`.
//! Content-addressable storage with directory sharding.

use std::path::PathBuf;

use anyhow::{bail, Context};
use async_trait::async_trait;
use domains::{MediaStorage, MediaUpload};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::debug;

pub struct LocalMediaStorage {
    /// Root directory for all uploads (e.g., "./data/uploads")
    root_path: PathBuf,
    /// Public URL prefix the root is served under (e.g., "/media")
    url_prefix: String,
    max_bytes: usize,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>, max_bytes: usize) -> Self {
        Self {
            root_path: root.into(),
            url_prefix: url_prefix.into(),
            max_bytes,
        }
    }

    /// Relative sharded path: "ab/cd/abcd….png"
    fn sharded_path(hash: &str, extension: &str) -> String {
        format!("{}/{}/{hash}.{extension}", &hash[0..2], &hash[2..4])
    }

    fn check(&self, upload: &MediaUpload) -> anyhow::Result<image::ImageFormat> {
        if upload.bytes.is_empty() {
            bail!("upload is empty");
        }
        if upload.bytes.len() > self.max_bytes {
            bail!(
                "upload is {} bytes, limit is {}",
                upload.bytes.len(),
                self.max_bytes
            );
        }
        let declared = &upload.content_type;
        if declared.type_() != mime::IMAGE && *declared != mime::APPLICATION_OCTET_STREAM {
            bail!("content type {declared} is not an image");
        }
        image::guess_format(&upload.bytes).context("upload is not a recognised image")
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    /// Saves an upload using its SHA-256 hash as the filename.
    /// Identical images therefore share one file.
    async fn upload(&self, upload: MediaUpload) -> anyhow::Result<String> {
        let format = self.check(&upload)?;
        let extension = format.extensions_str().first().copied().unwrap_or("img");

        let hash = hex::encode(Sha256::digest(&upload.bytes));
        let relative = Self::sharded_path(&hash, extension);
        let target = self.root_path.join(&relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        if !fs::try_exists(&target).await? {
            fs::write(&target, &upload.bytes)
                .await
                .with_context(|| format!("writing {}", target.display()))?;
        }

        debug!(
            path = %target.display(),
            file_name = upload.file_name.as_deref().unwrap_or("-"),
            "image stored"
        );
        Ok(format!("{}/{relative}", self.url_prefix.trim_end_matches('/')))
    }
}

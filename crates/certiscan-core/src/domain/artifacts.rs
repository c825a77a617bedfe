// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use anyhow::{Context, bail};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static STAGED_ARTIFACTS: AtomicU64 = AtomicU64::new(0);

/// Uploaded certificate image, owned by a single verification request.
///
/// The underlying file is removed when the artifact is dropped, so every exit path
/// of the request releases it.
#[derive(Debug)]
pub struct UploadedArtifact {
    path: PathBuf,
}

impl UploadedArtifact {
    /// Takes ownership of an already uploaded file
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Copies `source` into `staging_dir`, leaving the original file alone
    pub fn stage(source: &Path, staging_dir: &Path) -> anyhow::Result<Self> {
        if !source.is_file() {
            bail!("certiscan.artifact : no such file ({:?})", source)
        }

        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "certificate".to_string());

        let sequence = STAGED_ARTIFACTS.fetch_add(1, Ordering::Relaxed);
        let staged_name = format!("{}-{}-{}", std::process::id(), sequence, file_name);

        std::fs::create_dir_all(staging_dir)
            .with_context(|| format!("certiscan.artifact : cannot create staging folder {:?}", staging_dir))?;

        let staged_path = staging_dir.join(staged_name);
        std::fs::copy(source, &staged_path)
            .with_context(|| format!("certiscan.artifact : cannot stage {:?}", source))?;

        log::info!("[certiscan.artifact] staged {:?} as {:?}", source, staged_path);
        Ok(Self::new(staged_path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for UploadedArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(_) => log::info!("[certiscan.artifact] removed {:?}", self.path),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                log::info!("[certiscan.artifact] {:?} already gone", self.path)
            },
            Err(error) => log::error!("[certiscan.artifact] cannot remove {:?} : {}", self.path, error),
        }
    }
}

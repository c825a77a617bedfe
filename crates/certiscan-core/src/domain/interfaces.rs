// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::artifacts::UploadedArtifact;
use crate::domain::errors::CertificateError;
use crate::domain::models::{OnlineVerification, VerificationVerdict};
use image::GrayImage;
use std::path::Path;
use url::Url;

pub trait CodeDecoding {
    fn decode(&self, image: &GrayImage) -> anyhow::Result<Option<String>>;
}

pub trait TextRecognition {
    async fn recognize(&self, image_path: &Path) -> anyhow::Result<String>;
}

pub trait PageInspection {
    async fn inspect(&self, url: &Url) -> anyhow::Result<OnlineVerification>;
}

pub trait OnlineVerifying {
    async fn verify(&self, url: &Url) -> Result<OnlineVerification, CertificateError>;
}

pub trait CertificateVerification {
    async fn verify_certificate(&self, artifact: UploadedArtifact, caller_name: Option<&str>) -> VerificationVerdict;
}

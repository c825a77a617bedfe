// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::interfaces::TextRecognition;
use crate::infra::ocr::TesseractRecognizer;
use std::path::Path;

pub enum TextRecognizer {
    Tesseract(TesseractRecognizer),
    #[cfg(test)]
    Fake(FakeTextRecognizer),
}

impl TextRecognition for TextRecognizer {
    async fn recognize(&self, image_path: &Path) -> anyhow::Result<String> {
        match self {
            TextRecognizer::Tesseract(delegate) => delegate.recognize(image_path).await,
            #[cfg(test)]
            TextRecognizer::Fake(fake) => fake.recognize(image_path).await,
        }
    }
}

#[cfg(test)]
pub struct FakeTextRecognizer(Result<String, String>);

#[cfg(test)]
impl FakeTextRecognizer {
    pub fn reading(text: &str) -> Self {
        Self(Ok(text.to_string()))
    }

    pub fn failing(reason: &str) -> Self {
        Self(Err(reason.to_string()))
    }
}

#[cfg(test)]
impl TextRecognition for FakeTextRecognizer {
    async fn recognize(&self, _: &Path) -> anyhow::Result<String> {
        match &self.0 {
            Ok(text) => Ok(text.clone()),
            Err(reason) => anyhow::bail!("{}", reason),
        }
    }
}

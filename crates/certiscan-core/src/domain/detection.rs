// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::interfaces::CodeDecoding;
use crate::domain::models::{DetectedCode, DetectionAttempt};
use crate::domain::preprocessing::PreprocessingStrategy;
use crate::infra::qrcodes::RqrrCodeReader;
use anyhow::{Context, anyhow};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, GrayImage};
use std::sync::Arc;
use std::time::Duration;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

// Upscaling strategies multiply this, so it also bounds the cost of a single decode
static MAX_DETECTION_SIDE: u32 = 2048;

pub enum CodeReader {
    Rqrr(RqrrCodeReader),
    #[cfg(test)]
    Fake(FakeCodeReader),
}

impl CodeDecoding for CodeReader {
    fn decode(&self, image: &GrayImage) -> anyhow::Result<Option<String>> {
        match self {
            CodeReader::Rqrr(delegate) => delegate.decode(image),
            #[cfg(test)]
            CodeReader::Fake(fake) => fake.decode(image),
        }
    }
}

/// Bounded search for a QR code over the fixed list of preprocessing strategies.
///
/// Attempts run one after another and the search stops at the first non-empty payload.
/// A failed or timed out attempt counts as a miss.
pub struct CodeDetector {
    reader: Arc<CodeReader>,
    attempt_timeout: Duration,
}

impl CodeDetector {
    pub fn new(reader: CodeReader, attempt_timeout: Duration) -> Self {
        Self {
            reader: Arc::new(reader),
            attempt_timeout,
        }
    }

    pub async fn detect(&self, image: &DynamicImage) -> Option<DetectedCode> {
        let source = Arc::new(bounded(image));

        let attempts = (1..=PreprocessingStrategy::ALL.len()).filter_map(|index| {
            PreprocessingStrategy::for_attempt(index).map(|strategy| DetectionAttempt::new(index, strategy))
        });

        for attempt in attempts {
            match self.run_attempt(attempt, Arc::clone(&source)).await {
                Ok(Some(payload)) => {
                    log::info!("[certiscan.detector] QR code decoded on {}", attempt);
                    return Some(DetectedCode { attempt, payload });
                },
                Ok(None) => log::info!("[certiscan.detector] no QR code on {}", attempt),
                Err(miss) => log::warn!("[certiscan.detector] {} missed : {:#}", attempt, miss),
            }
        }

        log::info!("[certiscan.detector] all preprocessing strategies exhausted");
        None
    }

    async fn run_attempt(&self, attempt: DetectionAttempt, source: Arc<DynamicImage>) -> anyhow::Result<Option<String>> {
        let reader = Arc::clone(&self.reader);
        let decoding = tokio::task::spawn_blocking(move || {
            let prepared = attempt.strategy.apply(&source).to_luma8();
            reader.decode(&prepared)
        });

        // Blocking decodes cannot be cancelled, so a timed out one finishes in the background
        let finished = tokio::time::timeout(self.attempt_timeout, decoding)
            .await
            .map_err(|_| {
                anyhow!(
                    "timed out after {:?}, decoder left running in the background",
                    self.attempt_timeout
                )
            })?;

        let decoded = finished.context("decoding task aborted")??;
        Ok(decoded.filter(|payload| !payload.trim().is_empty()))
    }
}

fn bounded(image: &DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width.max(height) <= MAX_DETECTION_SIDE {
        return image.clone();
    }

    log::info!("[certiscan.detector] downscaling {}x{} image before detection", width, height);
    image.resize(MAX_DETECTION_SIDE, MAX_DETECTION_SIDE, FilterType::Triangle)
}

#[cfg(test)]
pub struct FakeCodeReader {
    payload: String,
    succeeding_call: Option<usize>,
    failing_calls: usize,
    calls: AtomicUsize,
}

#[cfg(test)]
impl FakeCodeReader {
    pub fn never_decoding() -> Self {
        Self {
            payload: String::new(),
            succeeding_call: None,
            failing_calls: 0,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn decoding_on_call(call: usize, payload: &str) -> Self {
        Self {
            payload: payload.to_string(),
            succeeding_call: Some(call),
            failing_calls: 0,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_first_calls(mut self, failing_calls: usize) -> Self {
        self.failing_calls = failing_calls;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
impl CodeDecoding for FakeCodeReader {
    fn decode(&self, _: &GrayImage) -> anyhow::Result<Option<String>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if call <= self.failing_calls {
            anyhow::bail!("corrupted grid on call {}", call)
        }

        match self.succeeding_call {
            Some(expected) if expected == call => Ok(Some(self.payload.clone())),
            _ => Ok(None),
        }
    }
}

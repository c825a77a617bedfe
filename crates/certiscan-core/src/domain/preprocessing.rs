// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::fmt::{Display, Formatter};

static MAX_UPSCALED_SIDE: u32 = 4096;

static CONTRAST_BOOST: f32 = 30.0;
static HIGH_CONTRAST: f32 = 50.0;
static EXTREME_CONTRAST: f32 = 80.0;
static BRIGHTNESS_BOOST: i32 = 25;
static BRIGHTNESS_REDUCTION: i32 = -25;
static POSTERIZE_LEVELS: u16 = 4;

static SHARPEN_SIGMA: f32 = 1.0;
static SHARPEN_THRESHOLD: i32 = 4;

/// Image transforms tried, in declaration order, to make a QR code readable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreprocessingStrategy {
    Original,
    BoostedContrastAndBrightness,
    GreyscaleHighContrast,
    DoubleScaleSharpened,
    TripleScale,
    InvertedColors,
    Normalized,
    EdgeEnhanced,
    QuadrupleScaleNormalized,
    GreyscaleExtremeContrast,
    Posterized,
    Combined,
}

impl PreprocessingStrategy {
    pub const ALL: [PreprocessingStrategy; 12] = [
        PreprocessingStrategy::Original,
        PreprocessingStrategy::BoostedContrastAndBrightness,
        PreprocessingStrategy::GreyscaleHighContrast,
        PreprocessingStrategy::DoubleScaleSharpened,
        PreprocessingStrategy::TripleScale,
        PreprocessingStrategy::InvertedColors,
        PreprocessingStrategy::Normalized,
        PreprocessingStrategy::EdgeEnhanced,
        PreprocessingStrategy::QuadrupleScaleNormalized,
        PreprocessingStrategy::GreyscaleExtremeContrast,
        PreprocessingStrategy::Posterized,
        PreprocessingStrategy::Combined,
    ];

    /// Strategy for a 1-based attempt index
    pub fn for_attempt(index: usize) -> Option<Self> {
        index
            .checked_sub(1)
            .and_then(|position| Self::ALL.get(position).copied())
    }

    pub fn apply(&self, source: &DynamicImage) -> DynamicImage {
        match self {
            PreprocessingStrategy::Original => source.clone(),
            PreprocessingStrategy::BoostedContrastAndBrightness => {
                source.adjust_contrast(CONTRAST_BOOST).brighten(BRIGHTNESS_BOOST)
            },
            PreprocessingStrategy::GreyscaleHighContrast => source.grayscale().adjust_contrast(HIGH_CONTRAST),
            PreprocessingStrategy::DoubleScaleSharpened => upscale(source, 2)
                .unsharpen(SHARPEN_SIGMA, SHARPEN_THRESHOLD)
                .adjust_contrast(CONTRAST_BOOST),
            PreprocessingStrategy::TripleScale => upscale(source, 3),
            PreprocessingStrategy::InvertedColors => {
                let mut inverted = source.clone();
                inverted.invert();
                inverted.adjust_contrast(CONTRAST_BOOST)
            },
            PreprocessingStrategy::Normalized => normalize(source)
                .adjust_contrast(CONTRAST_BOOST)
                .brighten(BRIGHTNESS_BOOST),
            PreprocessingStrategy::EdgeEnhanced => source.adjust_contrast(HIGH_CONTRAST).brighten(BRIGHTNESS_REDUCTION),
            PreprocessingStrategy::QuadrupleScaleNormalized => normalize(&upscale(source, 4)),
            PreprocessingStrategy::GreyscaleExtremeContrast => source
                .grayscale()
                .adjust_contrast(EXTREME_CONTRAST)
                .brighten(BRIGHTNESS_BOOST),
            PreprocessingStrategy::Posterized => posterize(source, POSTERIZE_LEVELS).adjust_contrast(CONTRAST_BOOST),
            PreprocessingStrategy::Combined => {
                let greyscale = upscale(source, 2).grayscale().adjust_contrast(HIGH_CONTRAST);
                normalize(&greyscale)
            },
        }
    }
}

impl Display for PreprocessingStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let description = match self {
            PreprocessingStrategy::Original => "original",
            PreprocessingStrategy::BoostedContrastAndBrightness => "contrast + brightness",
            PreprocessingStrategy::GreyscaleHighContrast => "greyscale + high contrast",
            PreprocessingStrategy::DoubleScaleSharpened => "2x upscale + sharpened",
            PreprocessingStrategy::TripleScale => "3x upscale",
            PreprocessingStrategy::InvertedColors => "inverted colors + contrast",
            PreprocessingStrategy::Normalized => "normalized + contrast + brightness",
            PreprocessingStrategy::EdgeEnhanced => "edge enhancement",
            PreprocessingStrategy::QuadrupleScaleNormalized => "4x upscale + normalized",
            PreprocessingStrategy::GreyscaleExtremeContrast => "greyscale + extreme contrast",
            PreprocessingStrategy::Posterized => "posterized",
            PreprocessingStrategy::Combined => "2x upscale + greyscale + contrast + normalized",
        };
        f.write_str(description)
    }
}

fn upscale(source: &DynamicImage, factor: u32) -> DynamicImage {
    let (width, height) = source.dimensions();
    let longest_side = width.max(height).max(1);
    let factor = factor.min((MAX_UPSCALED_SIDE / longest_side).max(1));

    if factor == 1 {
        return source.clone();
    }

    source.resize_exact(width * factor, height * factor, FilterType::CatmullRom)
}

// Stretches every color channel to the full 0..=255 range, keeping alpha untouched
fn normalize(source: &DynamicImage) -> DynamicImage {
    let mut rgba = source.to_rgba8();

    let mut lowest = [u8::MAX; 3];
    let mut highest = [u8::MIN; 3];
    for pixel in rgba.pixels() {
        for channel in 0..3 {
            lowest[channel] = lowest[channel].min(pixel[channel]);
            highest[channel] = highest[channel].max(pixel[channel]);
        }
    }

    for pixel in rgba.pixels_mut() {
        for channel in 0..3 {
            let range = u32::from(highest[channel] - lowest[channel]);
            if range == 0 {
                continue;
            }
            let shifted = u32::from(pixel[channel] - lowest[channel]);
            pixel[channel] = ((shifted * 255 + range / 2) / range) as u8;
        }
    }

    DynamicImage::ImageRgba8(rgba)
}

fn posterize(source: &DynamicImage, levels: u16) -> DynamicImage {
    let mut rgba = source.to_rgba8();
    let steps = levels.saturating_sub(1).max(1);
    let step_size = 255 / steps;

    for pixel in rgba.pixels_mut() {
        for channel in 0..3 {
            let value = u16::from(pixel[channel]);
            let bucket = (value * steps + 127) / 255;
            pixel[channel] = (bucket * step_size) as u8;
        }
    }

    DynamicImage::ImageRgba8(rgba)
}

// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::interfaces::CodeDecoding;
use anyhow::bail;
use image::GrayImage;
use rqrr::PreparedImage;

pub struct RqrrCodeReader;

impl CodeDecoding for RqrrCodeReader {
    fn decode(&self, image: &GrayImage) -> anyhow::Result<Option<String>> {
        let (width, height) = image.dimensions();
        let mut prepared = PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
            image.get_pixel(x as u32, y as u32)[0]
        });

        let grids = prepared.detect_grids();
        if grids.is_empty() {
            return Ok(None);
        }

        let mut failures = Vec::new();
        for grid in grids {
            match grid.decode() {
                Ok((_, content)) => return Ok(Some(content)),
                Err(failure) => failures.push(format!("{:?}", failure)),
            }
        }

        bail!("found {} grid(s) but none decoded ({})", failures.len(), failures.join(", "))
    }
}

// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

pub mod browser;
pub mod cli;
pub mod html;
pub mod networking;
pub mod ocr;
pub mod qrcodes;

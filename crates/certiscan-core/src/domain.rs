// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

pub mod artifacts;
pub mod detection;
pub mod errors;
pub mod extraction;
pub mod interfaces;
pub mod keywords;
pub mod models;
pub mod orchestrator;
pub mod preprocessing;
pub mod recognition;
pub mod verifiers;

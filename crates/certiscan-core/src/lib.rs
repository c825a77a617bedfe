// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

pub mod certiscan;
pub mod domain;
pub mod factory;
pub mod infra;

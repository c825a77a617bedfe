// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

pub mod assessment;
pub mod combined;
pub mod standalone;

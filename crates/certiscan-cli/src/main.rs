// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use certiscan_core::factory;
use certiscan_core::infra::cli;
use tikv_jemallocator::Jemalloc;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::troubleshooting::setup_troubleshooting();
    let (task, settings) = cli::parsing::parse_arguments()?;

    let certiscan = factory::create_certiscan(settings)?;
    certiscan.execute(task).await?;

    Ok(())
}

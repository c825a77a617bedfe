// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::certiscan::CertiscanTask;
use crate::domain::models::ReportKind;
use crate::factory::CertiscanSettings;
use crate::infra::cli::parsing::MainCommands::{Check, Extract, Verify};
use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

#[derive(Args, Debug)]
struct VerifyArguments {
    /// Scanned certificate image (png, jpeg, webp, gif, bmp or tiff)
    pub image: PathBuf,

    /// Name expected as the certificate recipient
    #[arg(short, long)]
    pub name: Option<String>,

    /// How the verdict is reported
    #[arg(short, long, value_enum, default_value_t = ReportKind::Console)]
    pub report: ReportKind,
}

#[derive(Args, Debug)]
struct CheckArguments {
    /// Verification page of a certificate
    pub url: String,

    /// How the verdict is reported
    #[arg(short, long, value_enum, default_value_t = ReportKind::Console)]
    pub report: ReportKind,
}

#[derive(Args, Debug)]
struct ExtractArguments {
    /// Free text, for instance OCR output, possibly mentioning a verification URL
    pub text: String,
}

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = false)]
struct CliParser {
    #[command(subcommand)]
    pub command: MainCommands,

    /// Tesseract executable used for OCR
    #[arg(long, global = true, env = "CERTISCAN_TESSERACT", default_value = "tesseract")]
    pub tesseract: PathBuf,

    /// Chromium-family executable used to render verification pages
    #[arg(long, global = true, env = "CERTISCAN_BROWSER", default_value = "chromium")]
    pub browser: PathBuf,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_colors: bool,
}

#[derive(Subcommand)]
enum MainCommands {
    /// Verify a certificate from its scanned image
    Verify(VerifyArguments),
    /// Verify a certificate from its verification page
    Check(CheckArguments),
    /// Find the verification URL mentioned in some text
    Extract(ExtractArguments),
}

pub fn parse_arguments() -> anyhow::Result<(CertiscanTask, CertiscanSettings)> {
    let cli = CliParser::parse();

    let task = match cli.command {
        Verify(args) => {
            if !args.image.is_file() {
                bail!("certiscan.cli : no such file ({:?})", args.image)
            }

            let caller_name = args.name.filter(|name| !name.trim().is_empty());
            CertiscanTask::VerifyCertificate {
                image: args.image,
                caller_name,
                report: args.report,
            }
        },
        Check(args) => {
            let url = Url::parse(&args.url).with_context(|| format!("certiscan.cli : invalid URL ({})", args.url))?;
            if !matches!(url.scheme(), "http" | "https") {
                bail!("certiscan.cli : only http(s) URLs can be checked ({})", url)
            }

            CertiscanTask::CheckUrl {
                url,
                report: args.report,
            }
        },
        Extract(args) => CertiscanTask::ExtractUrl(args.text),
    };

    let settings = CertiscanSettings {
        tesseract: cli.tesseract,
        browser: cli.browser,
        use_colors: !cli.no_colors,
    };

    Ok((task, settings))
}

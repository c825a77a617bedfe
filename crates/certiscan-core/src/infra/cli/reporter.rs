// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::models::{CertificateDetails, DetailField, VerificationStatus, VerificationVerdict};
use comfy_table::Table;
use console::{StyledObject, style};
use minijinja::Environment;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

static TEMPLATE: &str = include_str!("template.html");

static TEMPLATE_NAME: &str = "certiscan-report.html";

static DETAIL_LABELS: [(DetailField, &str); 4] = [
    (DetailField::RecipientName, "Recipient"),
    (DetailField::CourseName, "Course"),
    (DetailField::Issuer, "Issuer"),
    (DetailField::IssueDate, "Issued on"),
];

#[derive(Default)]
pub struct ConsoleReporter {
    use_colors: bool,
}

impl ConsoleReporter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    pub fn report_verification_started(&self, image: &Path) {
        println!();
        println!("Verifying certificate from : {}", self.cyan(image.display()));
        println!("This operation may take some time ...");
    }

    pub fn report_check_started(&self, url: &Url) {
        println!();
        println!("Checking verification page : {}", self.cyan(url));
    }

    pub fn report_extracted_url(&self, url: &Url) {
        println!("{}", url);
    }

    pub fn report_verdict(&self, verdict: &VerificationVerdict) {
        println!();

        let status = match verdict.status {
            VerificationStatus::Valid => self.cyan(verdict.status.to_string()),
            VerificationStatus::Unknown | VerificationStatus::Partial => style(verdict.status.to_string()),
            _ => self.red(verdict.status.to_string()),
        };

        println!("• status : {}", status);
        println!("• verification method : {}", self.cyan(verdict.verification_method));

        if let Some(extracted_url) = &verdict.extracted_url {
            println!("• extracted url : {}", self.cyan(extracted_url));
        }

        if let Some(url) = &verdict.url {
            println!("• verified url : {}", self.cyan(url));
        }

        if let Some(name_match) = verdict.name_match {
            let outcome = if name_match { "yes" } else { "no" };
            println!("• recipient name matches : {}", self.cyan(outcome));
        }

        if let Some(found_keywords) = &verdict.found_keywords {
            println!("• found keywords : {}", self.cyan(found_keywords.join(", ")));
        }

        if let Some(reason) = &verdict.reason {
            println!("• reason : {}", reason);
        }

        if let Some(details) = &verdict.details {
            self.report_details(details);
        }

        if let Some(ocr_text) = &verdict.ocr_text {
            println!();
            println!("Recognized text (sample) : ");
            println!();
            println!("{}", ocr_text.trim());
        }

        println!();
    }

    pub fn report_verdict_as_json(&self, verdict: &VerificationVerdict) -> anyhow::Result<()> {
        let serialized = serde_json::to_string_pretty(verdict)?;
        println!("{}", serialized);
        Ok(())
    }

    fn report_details(&self, details: &CertificateDetails) {
        let mut table = Table::new();
        table.set_header(vec!["Certificate detail", "Value"]);

        if let Some(title) = &details.title {
            table.add_row(vec!["Page title", title.as_str()]);
        }

        DETAIL_LABELS.iter().for_each(|(field, label)| {
            let value = details.get(*field).unwrap_or("not found");
            table.add_row(vec![*label, value]);
        });

        println!();
        println!("{table}");
    }

    fn cyan<T>(&self, what: T) -> StyledObject<T> {
        match self.use_colors {
            true => style(what).cyan(),
            false => style(what),
        }
    }

    fn red<T>(&self, what: T) -> StyledObject<T> {
        match self.use_colors {
            true => style(what).red(),
            false => style(what),
        }
    }
}

pub struct HtmlReporter {
    output_folder: PathBuf,
}

impl HtmlReporter {
    pub fn new(output_folder: PathBuf) -> Self {
        Self { output_folder }
    }

    pub fn report_verdict(&self, verdict: &VerificationVerdict) -> anyhow::Result<PathBuf> {
        let report_file = self.output_folder.join(TEMPLATE_NAME);
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, TEMPLATE)?;
        let template = env.get_template(TEMPLATE_NAME)?;

        let rendered = template.render(verdict)?;
        fs::write(&report_file, rendered)?;

        println!();
        println!("Report available at : {:?} ", report_file);
        println!();

        Ok(report_file)
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::models::VerificationVerdict;
    use crate::infra::cli::reporter::HtmlReporter;
    use assertor::{BooleanAssertion, EqualityAssertion};
    use temp_dir::TempDir;

    #[test]
    fn should_render_html_report() {
        let temp_dir = TempDir::new().expect("temporary folder");
        let reporter = HtmlReporter::new(temp_dir.path().to_path_buf());

        let verdict = VerificationVerdict::partial(vec!["certificate".to_string(), "course".to_string()])
            .with_ocr_text("Certificate <b>of</b> course".to_string());

        let report_file = reporter.report_verdict(&verdict).expect("rendered report");
        let report = std::fs::read_to_string(&report_file).expect("readable report");

        assertor::assert_that!(report_file).is_equal_to(temp_dir.child("certiscan-report.html"));
        assertor::assert_that!(report.contains("Partial")).is_true();
        assertor::assert_that!(report.contains("OCR Text Analysis")).is_true();
        assertor::assert_that!(report.contains("certificate, course")).is_true();
        assertor::assert_that!(report.contains("<b>of</b>")).is_false();
    }
}

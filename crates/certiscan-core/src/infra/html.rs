// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::models::{DetailField, PageEvidence};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

static RAW_DETAIL_SELECTORS: [(DetailField, &[&str]); 4] = [
    (
        DetailField::RecipientName,
        &[
            ".recipient-name",
            ".certificate-recipient",
            ".recipient",
            "[data-recipient]",
            ".earner-name",
            ".user-name",
            ".name",
        ],
    ),
    (
        DetailField::CourseName,
        &[
            ".course-name",
            ".course-title",
            ".certificate-title",
            ".program-name",
            "[data-course]",
            ".badge-name",
        ],
    ),
    (
        DetailField::Issuer,
        &[
            ".issuer-name",
            ".issuer",
            ".issued-by",
            ".organization",
            "[data-issuer]",
            ".provider",
        ],
    ),
    (
        DetailField::IssueDate,
        &[".issue-date", ".issued-on", "[data-issue-date]", "time[datetime]", ".date"],
    ),
];

static DETAIL_SELECTORS: LazyLock<Vec<(DetailField, Vec<Selector>)>> = LazyLock::new(|| {
    RAW_DETAIL_SELECTORS
        .iter()
        .map(|(field, raw_selectors)| {
            let selectors = raw_selectors
                .iter()
                .map(|raw_selector| Selector::parse(raw_selector).expect("valid detail selector"))
                .collect();
            (*field, selectors)
        })
        .collect()
});

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").expect("valid title selector"));

static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").expect("valid body selector"));

static HIGHLIGHTED_BLOCKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, [class*='certificate'], [class*='Certificate']")
        .expect("valid highlighted blocks selector")
});

/// Reads what the verification steps care about from an HTML document.
///
/// Certificate details are probed with an ordered list of selectors per field, and the
/// first element carrying non-blank text wins.
pub fn parse_page(raw_html: &str) -> PageEvidence {
    let document = Html::parse_document(raw_html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .unwrap_or_default();

    let body_text = document
        .select(&BODY)
        .next()
        .map(visible_text)
        .unwrap_or_else(|| visible_text(document.root_element()));

    let mut highlighted_blocks: Vec<String> = Vec::new();
    for element in document.select(&HIGHLIGHTED_BLOCKS) {
        let block = visible_text(element);
        if !block.is_empty() && !highlighted_blocks.contains(&block) {
            highlighted_blocks.push(block);
        }
    }

    let mut evidence = PageEvidence {
        title,
        body_text,
        highlighted_blocks,
        ..Default::default()
    };

    if !evidence.title.is_empty() {
        evidence.details.title = Some(evidence.title.clone());
    }

    for (field, selectors) in DETAIL_SELECTORS.iter() {
        let probed = selectors
            .iter()
            .find_map(|selector| first_non_blank(&document, selector));

        if let Some(value) = probed {
            evidence.details.set(*field, value);
        }
    }

    evidence
}

fn first_non_blank(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(|element| match element.value().attr("datetime") {
            Some(datetime) if visible_text(element).is_empty() => datetime.trim().to_string(),
            _ => visible_text(element),
        })
        .find(|text| !text.is_empty())
}

fn visible_text(element: ElementRef<'_>) -> String {
    let fragments = element
        .descendants()
        .filter(|node| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|tag| HIDDEN_ELEMENTS.contains(&tag.name()))
            })
        })
        .filter_map(|node| node.value().as_text().map(|text| text.to_string()))
        .collect::<Vec<_>>();

    collapse_whitespace(&fragments.join(" "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

//! HTML result page parsing.

use crate::{
    definition::EntrySelectors,
    error::{TargetError, TargetResult},
};
use dirsweep_core::Record;
use scraper::{ElementRef, Html, Selector};

/// What a result page says about a query.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedPage {
    /// The page carries the truncation marker
    TooMany,
    /// Complete list of entries, possibly empty
    Entries(Vec<Record>),
}

/// Extracts `{name, email}` records from a directory result page.
#[derive(Debug)]
pub struct ListingParser {
    entry: Selector,
    name: Selector,
    email: Selector,
    too_many_marker: String,
}

impl ListingParser {
    /// Compile the selectors once for the lifetime of a source.
    pub fn new(
        selectors: &EntrySelectors,
        too_many_marker: impl Into<String>,
    ) -> TargetResult<Self> {
        Ok(Self {
            entry: compile("entry", &selectors.entry)?,
            name: compile("name", &selectors.name)?,
            email: compile("email", &selectors.email)?,
            too_many_marker: too_many_marker.into(),
        })
    }

    /// Parse one page.
    ///
    /// Entries missing either a name or an email are dropped.
    #[must_use]
    pub fn parse(&self, html: &str) -> ParsedPage {
        let document = Html::parse_document(html);

        let page_text: String = document.root_element().text().collect();
        if page_text.contains(&self.too_many_marker) {
            return ParsedPage::TooMany;
        }

        let records = document
            .select(&self.entry)
            .filter_map(|entry| {
                let name = extract_text(&entry, &self.name);
                let email = extract_text(&entry, &self.email);
                if name.is_empty() || email.is_empty() {
                    return None;
                }
                Some(Record::new().with("name", name).with("email", email))
            })
            .collect();

        ParsedPage::Entries(records)
    }
}

fn compile(field: &str, selector: &str) -> TargetResult<Selector> {
    Selector::parse(selector).map_err(|e| TargetError::ValidationError {
        target_id: "html-form".to_string(),
        reason: format!("invalid {field} selector '{selector}': {e}"),
    })
}

/// Text of every match under `element`, concatenated and trimmed.
fn extract_text(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .flat_map(|el| el.text())
        .collect::<String>()
        .trim()
        .to_string()
}

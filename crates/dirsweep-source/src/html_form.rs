//! Directories behind an HTML search form.

use crate::{
    client::header_map,
    definition::EntrySelectors,
    error::{Result, SourceError, TargetResult},
    parser::{ListingParser, ParsedPage},
    source::RecordSource,
};
use async_trait::async_trait;
use dirsweep_core::{Query, Record};
use reqwest::{header::HeaderMap, Client};
use std::collections::BTreeMap;
use tracing::debug;

/// POST-based HTML directory.
pub struct HtmlFormSource {
    client: Client,
    url: String,
    query_field: String,
    form_fields: Vec<(String, String)>,
    headers: HeaderMap,
    parser: ListingParser,
}

impl HtmlFormSource {
    /// Build a source from its definition fields.
    pub fn new(
        client: Client,
        url: impl Into<String>,
        query_field: impl Into<String>,
        form_fields: &BTreeMap<String, String>,
        headers: &BTreeMap<String, String>,
        too_many_marker: &str,
        selectors: &EntrySelectors,
    ) -> TargetResult<Self> {
        Ok(Self {
            client,
            url: url.into(),
            query_field: query_field.into(),
            form_fields: form_fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            headers: header_map(headers)?,
            parser: ListingParser::new(selectors, too_many_marker)?,
        })
    }

    fn form_for(&self, query: &Query) -> Vec<(String, String)> {
        let mut form = self.form_fields.clone();
        form.push((self.query_field.clone(), query.to_string()));
        form
    }

    /// Classify a result page.
    pub fn interpret(&self, query: &Query, html: &str) -> Result<Vec<Record>> {
        match self.parser.parse(html) {
            ParsedPage::TooMany => Err(SourceError::TooMany {
                query: query.to_string(),
            }),
            ParsedPage::Entries(records) if records.is_empty() => Err(SourceError::Empty {
                query: query.to_string(),
            }),
            ParsedPage::Entries(records) => Ok(records),
        }
    }
}

#[async_trait]
impl RecordSource for HtmlFormSource {
    async fn query(&self, query: &Query) -> Result<Vec<Record>> {
        let response = self
            .client
            .post(&self.url)
            .headers(self.headers.clone())
            .form(&self.form_for(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                query: query.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        let records = self.interpret(query, &html)?;

        debug!(query = %query, count = records.len(), "directory answered");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirsweep_core::ErrorKind;

    fn source() -> HtmlFormSource {
        let mut fields = BTreeMap::new();
        fields.insert("rblSearchType".to_string(), "Student".to_string());

        HtmlFormSource::new(
            Client::new(),
            "https://directory.example.edu/search.aspx",
            "txtLastname",
            &fields,
            &BTreeMap::new(),
            "Your search returned too many matches.",
            &EntrySelectors::default(),
        )
        .expect("build source")
    }

    fn query(s: &str) -> Query {
        Query::new(s).expect("valid query")
    }

    #[test]
    fn test_form_carries_query_last() {
        let form = source().form_for(&query("ab"));
        assert_eq!(
            form,
            vec![
                ("rblSearchType".to_string(), "Student".to_string()),
                ("txtLastname".to_string(), "ab".to_string()),
            ]
        );
    }

    #[test]
    fn test_interpret_outcomes() {
        let source = source();

        let too_many = "<p>Your search returned too many matches.</p>";
        let err = source.interpret(&query("a"), too_many).expect_err("too many");
        assert_eq!(err.kind(), ErrorKind::TooMany);

        let err = source
            .interpret(&query("qz"), "<p>Nothing here</p>")
            .expect_err("empty");
        assert_eq!(err.kind(), ErrorKind::Empty);

        let page = r#"<table><tr><th>Doe, Sam</th></tr>
            <tr><td><a href="mailto:sam@example.edu">sam@example.edu</a></td></tr></table>"#;
        let records = source.interpret(&query("do"), page).expect("entries");
        assert_eq!(records.len(), 1);
    }
}

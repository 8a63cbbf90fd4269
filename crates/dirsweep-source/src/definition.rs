//! Target definition types and structures.
//!
//! A target definition describes one institutional directory: how to seed a
//! crawl, how to send a query and how to tell a truncated answer from an empty
//! one. Definitions are loaded from TOML files or taken from the built-ins.

use crate::error::{TargetError, TargetResult};
use dirsweep_core::{Query, TargetId, ALPHABET};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete target definition loaded from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDefinition {
    /// Core target metadata
    pub target: TargetMetadata,

    /// Search configuration
    pub search: SearchMethod,
}

impl TargetDefinition {
    /// Get the target ID.
    #[must_use]
    pub fn id(&self) -> &TargetId {
        &self.target.id
    }

    /// Get the target name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.target.name
    }

    /// Initial queries for a full crawl of this target.
    #[must_use]
    pub fn seeds(&self) -> Vec<Query> {
        self.target.seed.seeds()
    }

    /// Validate the target definition for completeness and correctness.
    pub fn validate(&self) -> TargetResult<()> {
        if self.target.name.trim().is_empty() {
            return Err(self.invalid("target name cannot be empty"));
        }

        if self.target.dedupe_key.trim().is_empty() {
            return Err(self.invalid("dedupe_key cannot be empty"));
        }

        self.search.validate(&self.target.id)
    }

    fn invalid(&self, reason: &str) -> TargetError {
        TargetError::ValidationError {
            target_id: self.target.id.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Core target metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetMetadata {
    /// Unique target identifier (e.g., "psu", "trinity")
    pub id: TargetId,

    /// Human-readable institution name
    pub name: String,

    /// How the first queries are generated
    #[serde(default)]
    pub seed: SeedStrategy,

    /// Record field that identifies a person across queries
    #[serde(default = "default_dedupe_key")]
    pub dedupe_key: String,
}

fn default_dedupe_key() -> String {
    "email".to_string()
}

/// Shape of the initial query set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedStrategy {
    /// Every single letter, `a` to `z`
    #[default]
    Letters,
    /// Every two-letter combination, `aa` to `zz`
    Pairs,
}

impl SeedStrategy {
    /// Generate the seed queries in processing order.
    #[must_use]
    pub fn seeds(self) -> Vec<Query> {
        let letters = ALPHABET.iter().map(|&letter| {
            Query::new(letter.to_string()).expect("single letters are valid queries")
        });

        match self {
            Self::Letters => letters.collect(),
            Self::Pairs => letters.flat_map(|first| first.children()).collect(),
        }
    }
}

/// Methods for querying a directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum SearchMethod {
    /// JSON people-search endpoint queried with a GET parameter
    JsonApi {
        /// Endpoint URL
        url: String,
        /// Name of the parameter that carries the query
        #[serde(default = "default_query_param")]
        query_param: String,
        /// Fixed parameters sent with every request (e.g. page size)
        #[serde(default)]
        extra_params: BTreeMap<String, String>,
        /// Extra request headers
        #[serde(default)]
        headers: BTreeMap<String, String>,
        /// Result count at which the answer is treated as truncated
        #[serde(default)]
        truncation_threshold: Option<usize>,
        /// Report an empty array as a failed query instead of zero results
        #[serde(default)]
        empty_is_error: bool,
    },

    /// HTML search form submitted with a urlencoded POST
    HtmlForm {
        /// Form action URL
        url: String,
        /// Form field that carries the query
        query_field: String,
        /// Fixed form fields sent with every request
        #[serde(default)]
        form_fields: BTreeMap<String, String>,
        /// Extra request headers (cookie, referer)
        #[serde(default)]
        headers: BTreeMap<String, String>,
        /// Page text that signals a truncated result
        too_many_marker: String,
        /// CSS selectors for result entries
        #[serde(default)]
        selectors: EntrySelectors,
    },
}

fn default_query_param() -> String {
    "text".to_string()
}

impl SearchMethod {
    /// Validate the search method configuration.
    fn validate(&self, target_id: &TargetId) -> TargetResult<()> {
        let invalid = |reason: String| TargetError::ValidationError {
            target_id: target_id.to_string(),
            reason,
        };

        match self {
            Self::JsonApi {
                url,
                query_param,
                truncation_threshold,
                ..
            } => {
                if url.trim().is_empty() {
                    return Err(invalid("JSON API URL cannot be empty".to_string()));
                }
                if query_param.trim().is_empty() {
                    return Err(invalid("query_param cannot be empty".to_string()));
                }
                if *truncation_threshold == Some(0) {
                    return Err(invalid(
                        "truncation_threshold must be at least 1".to_string(),
                    ));
                }
            }
            Self::HtmlForm {
                url,
                query_field,
                too_many_marker,
                selectors,
                ..
            } => {
                if url.trim().is_empty() {
                    return Err(invalid("HTML form URL cannot be empty".to_string()));
                }
                if query_field.trim().is_empty() {
                    return Err(invalid("query_field cannot be empty".to_string()));
                }
                if too_many_marker.trim().is_empty() {
                    return Err(invalid("too_many_marker cannot be empty".to_string()));
                }
                selectors.validate().map_err(invalid)?;
            }
        }

        Ok(())
    }
}

/// CSS selectors locating entries in an HTML result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntrySelectors {
    /// One element per person
    pub entry: String,
    /// Name, relative to the entry
    pub name: String,
    /// Email link, relative to the entry
    pub email: String,
}

impl EntrySelectors {
    fn validate(&self) -> Result<(), String> {
        for (field, selector) in [
            ("entry", &self.entry),
            ("name", &self.name),
            ("email", &self.email),
        ] {
            Selector::parse(selector)
                .map_err(|e| format!("invalid {field} selector '{selector}': {e}"))?;
        }
        Ok(())
    }
}

impl Default for EntrySelectors {
    fn default() -> Self {
        Self {
            entry: "table".to_string(),
            name: "th:first-child".to_string(),
            email: r#"td a[href^="mailto:"]"#.to_string(),
        }
    }
}

/// Definitions shipped with the binary.
#[must_use]
pub fn builtin_definitions() -> Vec<TargetDefinition> {
    vec![penn_state(), trinity_college()]
}

fn penn_state() -> TargetDefinition {
    let mut extra_params = BTreeMap::new();
    extra_params.insert("size".to_string(), "100000".to_string());

    let mut headers = BTreeMap::new();
    headers.insert(
        "accept".to_string(),
        "application/json, text/plain, */*".to_string(),
    );
    headers.insert(
        "referer".to_string(),
        "https://directory.psu.edu/".to_string(),
    );

    TargetDefinition {
        target: TargetMetadata {
            id: TargetId::new("psu").expect("valid builtin target ID"),
            name: "Penn State University".to_string(),
            seed: SeedStrategy::Letters,
            dedupe_key: default_dedupe_key(),
        },
        search: SearchMethod::JsonApi {
            url: "https://search-service.k8s.psu.edu/search-service/resources/people".to_string(),
            query_param: default_query_param(),
            extra_params,
            headers,
            truncation_threshold: None,
            empty_is_error: false,
        },
    }
}

fn trinity_college() -> TargetDefinition {
    let mut form_fields = BTreeMap::new();
    for (name, value) in [
        ("__EVENTTARGET", ""),
        ("__EVENTARGUMENT", ""),
        (
            "__VIEWSTATE",
            "/wEPDwUJMzE4NTY4MDE2D2QWAgIDD2QWAgIRDxYCHgdWaXNpYmxlZ2RkkmIGxWj2RrfIOPXr3vRqFoiU4TDEQFERqv6HZ7//pv0=",
        ),
        ("__VIEWSTATEGENERATOR", "6845247C"),
        (
            "__EVENTVALIDATION",
            "/wEdAAmmMYyefDzCj4FMtAbGuEaTcbPKx50kq3egClC2RlspeC2xiRVTqzGkI4MPBO6VPO3lEzO1ijM9q/QSZVzorA1gWWj0ciZIBshSehh2B6iuhwivHF9mc03OEeiXOsVdAx7LHM5qi2WaC+u8uRejijG9E5WL/selN996AS2BLk/PTu6S23tvdLgY/67OcsepzKzJXkJaG2JYf8ull9J0MeoouMmRavGt5rcE8uQD3gZLug==",
        ),
        ("rblSearchType", "Student"),
        ("txtFirstname", ""),
        ("txtMiddlename", ""),
        ("btnSubmitSearch", "Search"),
    ] {
        form_fields.insert(name.to_string(), value.to_string());
    }

    let mut headers = BTreeMap::new();
    headers.insert(
        "referer".to_string(),
        "https://internet3.trincoll.edu/pTools/Directory_wp.aspx".to_string(),
    );

    TargetDefinition {
        target: TargetMetadata {
            id: TargetId::new("trinity").expect("valid builtin target ID"),
            name: "Trinity College".to_string(),
            seed: SeedStrategy::Pairs,
            dedupe_key: default_dedupe_key(),
        },
        search: SearchMethod::HtmlForm {
            url: "https://internet3.trincoll.edu/pTools/Directory_wp.aspx".to_string(),
            query_field: "txtLastname".to_string(),
            form_fields,
            headers,
            too_many_marker: "Your search returned too many matches.".to_string(),
            selectors: EntrySelectors::default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_seeds() {
        let seeds = SeedStrategy::Letters.seeds();
        assert_eq!(seeds.len(), 26);
        assert_eq!(seeds[0].as_str(), "a");
        assert_eq!(seeds[25].as_str(), "z");
    }

    #[test]
    fn test_pair_seeds() {
        let seeds = SeedStrategy::Pairs.seeds();
        assert_eq!(seeds.len(), 26 * 26);
        assert_eq!(seeds[0].as_str(), "aa");
        assert_eq!(seeds[1].as_str(), "ab");
        assert_eq!(seeds[26].as_str(), "ba");
        assert_eq!(seeds[675].as_str(), "zz");
    }

    #[test]
    fn test_builtins_validate() {
        for definition in builtin_definitions() {
            definition
                .validate()
                .unwrap_or_else(|e| panic!("builtin {} invalid: {e}", definition.id()));
        }
    }

    #[test]
    fn test_parse_json_api_definition() {
        let toml_str = r#"
[target]
id = "state-u"
name = "State University"

[search]
method = "json-api"
url = "https://people.example.edu/search"
truncation_threshold = 500

[search.extra_params]
size = "500"
"#;

        let definition: TargetDefinition = toml::from_str(toml_str).expect("parse definition");
        assert_eq!(definition.id().as_str(), "state-u");
        assert_eq!(definition.target.seed, SeedStrategy::Letters);
        assert_eq!(definition.target.dedupe_key, "email");
        match &definition.search {
            SearchMethod::JsonApi {
                query_param,
                extra_params,
                truncation_threshold,
                empty_is_error,
                ..
            } => {
                assert_eq!(query_param, "text");
                assert!(!empty_is_error);
                assert_eq!(extra_params.get("size").map(String::as_str), Some("500"));
                assert_eq!(*truncation_threshold, Some(500));
            }
            SearchMethod::HtmlForm { .. } => panic!("expected json-api"),
        }
        assert!(definition.validate().is_ok());
    }

    #[test]
    fn test_parse_html_form_definition() {
        let toml_str = r#"
[target]
id = "small-college"
name = "Small College"
seed = "pairs"

[search]
method = "html-form"
url = "https://directory.example.edu/search.aspx"
query_field = "lastname"
too_many_marker = "Too many results"

[search.form_fields]
type = "Student"
"#;

        let definition: TargetDefinition = toml::from_str(toml_str).expect("parse definition");
        assert_eq!(definition.target.seed, SeedStrategy::Pairs);
        assert_eq!(definition.seeds().len(), 676);
        match &definition.search {
            SearchMethod::HtmlForm { selectors, .. } => {
                assert_eq!(selectors, &EntrySelectors::default());
            }
            SearchMethod::JsonApi { .. } => panic!("expected html-form"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_selector() {
        let mut definition = trinity_college();
        if let SearchMethod::HtmlForm { selectors, .. } = &mut definition.search {
            selectors.entry = "table[[".to_string();
        }

        let err = definition.validate().expect_err("selector must be rejected");
        assert!(matches!(err, TargetError::ValidationError { .. }));
        assert!(err.to_string().contains("entry selector"));
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let mut definition = penn_state();
        if let SearchMethod::JsonApi { url, .. } = &mut definition.search {
            url.clear();
        }
        assert!(definition.validate().is_err());
    }

    #[test]
    fn test_invalid_target_id_fails_to_parse() {
        let toml_str = r#"
[target]
id = "Bad_ID"
name = "Bad"

[search]
method = "json-api"
url = "https://example.edu"
"#;
        let result: Result<TargetDefinition, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }
}

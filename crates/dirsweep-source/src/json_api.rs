//! People-search endpoints that answer with a JSON array.

use crate::{
    client::header_map,
    error::{Result, SourceError, TargetResult},
    source::RecordSource,
};
use async_trait::async_trait;
use dirsweep_core::{Query, Record};
use reqwest::{header::HeaderMap, Client};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One person as returned by the search service.
///
/// Only the listed fields are kept; the service's `universityEmail` is stored
/// as `email`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryPerson {
    /// Login ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userid: Option<String>,
    /// Central person registry ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cprid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    /// e.g. `STUDENT`, `STAFF`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_affiliation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Institutional email address
    #[serde(
        default,
        rename(serialize = "email", deserialize = "universityEmail"),
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
}

/// GET-based JSON directory.
pub struct JsonApiSource {
    client: Client,
    url: String,
    params: Vec<(String, String)>,
    query_param: String,
    headers: HeaderMap,
    truncation_threshold: Option<usize>,
    empty_is_error: bool,
}

impl JsonApiSource {
    /// Build a source from its definition fields.
    pub fn new(
        client: Client,
        url: impl Into<String>,
        query_param: impl Into<String>,
        extra_params: &BTreeMap<String, String>,
        headers: &BTreeMap<String, String>,
        truncation_threshold: Option<usize>,
        empty_is_error: bool,
    ) -> TargetResult<Self> {
        Ok(Self {
            client,
            url: url.into(),
            params: extra_params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            query_param: query_param.into(),
            headers: header_map(headers)?,
            truncation_threshold,
            empty_is_error,
        })
    }
}

#[async_trait]
impl RecordSource for JsonApiSource {
    async fn query(&self, query: &Query) -> Result<Vec<Record>> {
        let response = self
            .client
            .get(&self.url)
            .headers(self.headers.clone())
            .query(&[(self.query_param.as_str(), query.as_str())])
            .query(&self.params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                query: query.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let records = decode_people(
            query,
            &body,
            self.truncation_threshold,
            self.empty_is_error,
        )?;

        debug!(query = %query, count = records.len(), "directory answered");
        Ok(records)
    }
}

/// Turn a response body into records, classifying truncated answers.
///
/// An empty array is a successful query with no records unless
/// `empty_is_error` is set.
pub fn decode_people(
    query: &Query,
    body: &str,
    truncation_threshold: Option<usize>,
    empty_is_error: bool,
) -> Result<Vec<Record>> {
    let people: Vec<DirectoryPerson> =
        serde_json::from_str(body).map_err(|e| SourceError::Decode {
            query: query.to_string(),
            reason: e.to_string(),
        })?;

    if people.is_empty() && empty_is_error {
        return Err(SourceError::Empty {
            query: query.to_string(),
        });
    }

    if truncation_threshold.is_some_and(|limit| people.len() >= limit) {
        return Err(SourceError::TooMany {
            query: query.to_string(),
        });
    }

    people
        .iter()
        .map(|person| {
            Record::from_serialize(person).map_err(|e| SourceError::Decode {
                query: query.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirsweep_core::ErrorKind;

    fn query(s: &str) -> Query {
        Query::new(s).expect("valid query")
    }

    const BODY: &str = r#"[
        {
            "userid": "abc123",
            "cprid": "900000001",
            "givenName": "Alex",
            "middleName": "J",
            "familyName": "Smith",
            "honorificSuffix": "",
            "preferredGivenName": "Al",
            "active": true,
            "universityEmail": "abc123@example.edu",
            "primaryAffiliation": "STUDENT",
            "affiliation": ["STUDENT"],
            "displayName": "Alex J Smith",
            "link": { "href": "/people/abc123" }
        },
        {
            "userid": "xyz9",
            "givenName": "Kim",
            "familyName": "Lee",
            "universityEmail": "xyz9@example.edu",
            "displayName": "Kim Lee"
        }
    ]"#;

    #[test]
    fn test_decode_maps_fields() {
        let records = decode_people(&query("sm"), BODY, None, false).expect("decode");
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.key("email"), Some("abc123@example.edu"));
        assert_eq!(first.key("givenName"), Some("Alex"));
        assert!(first.get("universityEmail").is_none());
        assert!(first.get("active").is_none());

        let fields: Vec<_> = first.as_map().keys().cloned().collect();
        assert_eq!(
            fields,
            vec![
                "userid",
                "cprid",
                "givenName",
                "middleName",
                "familyName",
                "primaryAffiliation",
                "displayName",
                "email"
            ]
        );

        assert!(records[1].get("cprid").is_none());
    }

    #[test]
    fn test_empty_array_is_zero_results() {
        let records = decode_people(&query("qx"), "[]", None, false).expect("empty array");
        assert!(records.is_empty());
    }

    #[test]
    fn test_empty_array_as_error_when_configured() {
        let err = decode_people(&query("qx"), "[]", None, true).expect_err("empty");
        assert_eq!(err.kind(), ErrorKind::Empty);
    }

    #[test]
    fn test_truncation_threshold() {
        let err = decode_people(&query("s"), BODY, Some(2), false).expect_err("truncated");
        assert_eq!(err.kind(), ErrorKind::TooMany);

        let records = decode_people(&query("s"), BODY, Some(3), false).expect("below threshold");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_malformed_body_is_unknown() {
        let err = decode_people(&query("a"), "<html>gateway timeout</html>", None, false)
            .expect_err("not json");
        assert!(matches!(err, SourceError::Decode { .. }));
        assert_eq!(err.kind(), ErrorKind::Unknown);

        let err = decode_people(&query("a"), r#"{"error": "bad"}"#, None, false)
            .expect_err("object");
        assert_eq!(err.kind(), ErrorKind::Unknown);
    }
}

//! HTTP client construction and source selection.

use crate::{
    definition::{SearchMethod, TargetDefinition},
    error::{TargetError, TargetResult},
    html_form::HtmlFormSource,
    json_api::JsonApiSource,
    source::RecordSource,
};
use dirsweep_core::HttpConfig;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Build the shared HTTP client from configuration.
pub fn build_client(http: &HttpConfig) -> TargetResult<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(http.timeout_secs))
        .user_agent(&http.user_agent)
        .build()?;
    Ok(client)
}

/// Create the record source described by `definition`.
pub fn source_for(
    definition: &TargetDefinition,
    http: &HttpConfig,
) -> TargetResult<Arc<dyn RecordSource>> {
    let client = build_client(http)?;

    let source: Arc<dyn RecordSource> = match &definition.search {
        SearchMethod::JsonApi {
            url,
            query_param,
            extra_params,
            headers,
            truncation_threshold,
            empty_is_error,
        } => Arc::new(JsonApiSource::new(
            client,
            url,
            query_param,
            extra_params,
            headers,
            *truncation_threshold,
            *empty_is_error,
        )?),
        SearchMethod::HtmlForm {
            url,
            query_field,
            form_fields,
            headers,
            too_many_marker,
            selectors,
        } => Arc::new(HtmlFormSource::new(
            client,
            url,
            query_field,
            form_fields,
            headers,
            too_many_marker,
            selectors,
        )?),
    };

    Ok(source)
}

/// Convert configured headers into a reqwest header map.
pub(crate) fn header_map(headers: &BTreeMap<String, String>) -> TargetResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());

    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid_header(name, &e))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid_header(name, &e))?;
        map.insert(header_name, header_value);
    }

    Ok(map)
}

fn invalid_header(name: &str, error: &dyn std::fmt::Display) -> TargetError {
    TargetError::ValidationError {
        target_id: "headers".to_string(),
        reason: format!("invalid header '{name}': {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::builtin_definitions;

    #[test]
    fn test_header_map() {
        let mut headers = BTreeMap::new();
        headers.insert("Referer".to_string(), "https://example.edu/".to_string());
        headers.insert("accept".to_string(), "application/json".to_string());

        let map = header_map(&headers).expect("valid headers");
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get("referer").and_then(|v| v.to_str().ok()),
            Some("https://example.edu/")
        );
    }

    #[test]
    fn test_header_map_rejects_bad_name() {
        let mut headers = BTreeMap::new();
        headers.insert("bad header".to_string(), "x".to_string());

        assert!(matches!(
            header_map(&headers),
            Err(TargetError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_source_for_builtins() {
        let http = HttpConfig::default();
        for definition in builtin_definitions() {
            assert!(source_for(&definition, &http).is_ok());
        }
    }
}

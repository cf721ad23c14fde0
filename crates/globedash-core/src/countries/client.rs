//! Country data fetcher.
//!
//! One GET of `<base>/all?fields=...`, no auth header, no retry, no cache.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use url::Url;

use super::CountryRecord;
use crate::config::Config;

/// Fields requested from the API.
pub const FIELDS: &[&str] = &[
    "name",
    "flags",
    "population",
    "region",
    "capital",
    "languages",
    "currencies",
    "maps",
    "coatOfArms",
    "subregion",
];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid countries endpoint '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("countries API returned status {status}")]
    Status { status: reqwest::StatusCode },
    #[error("failed to decode countries response")]
    Decode(#[from] serde_json::Error),
}

/// Builds the full endpoint URL from an API base URL.
///
/// # Errors
/// Returns `FetchError::InvalidUrl` if the base is not an absolute URL.
pub fn endpoint_url(base_url: &str) -> Result<Url, FetchError> {
    let raw = format!("{}/all", base_url.trim().trim_end_matches('/'));
    let mut url = Url::parse(&raw).map_err(|source| FetchError::InvalidUrl {
        url: raw.clone(),
        source,
    })?;
    url.query_pairs_mut().append_pair("fields", &FIELDS.join(","));
    Ok(url)
}

/// HTTP client for the countries endpoint.
#[derive(Debug, Clone)]
pub struct CountryClient {
    http: Client,
    endpoint: Url,
}

impl CountryClient {
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let endpoint = endpoint_url(base_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(FetchError::Client)?;
        Ok(Self { http, endpoint })
    }

    /// # Errors
    /// Returns an error if the configured URL is invalid.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches every country.
    ///
    /// # Errors
    /// Returns an error on network failure, non-2xx status, or undecodable body.
    pub async fn fetch_all(&self) -> Result<Vec<CountryRecord>, FetchError> {
        let url = self.endpoint.to_string();
        tracing::debug!(%url, "fetching countries");

        let response = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Network { url, source })?;
        let items: Vec<serde_json::Value> = serde_json::from_slice(&body)?;
        let total = items.len();
        let records: Vec<CountryRecord> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!("skipping undecodable country record: {err}");
                    None
                }
            })
            .collect();
        tracing::info!(count = records.len(), total, "fetched countries");
        Ok(records)
    }

    /// Fetches every country, logging failures and returning an empty list.
    pub async fn fetch_all_or_empty(&self) -> Vec<CountryRecord> {
        match self.fetch_all().await {
            Ok(records) => records,
            Err(err) => {
                log_fetch_failure(err);
                Vec::new()
            }
        }
    }
}

/// Fetches with the configured endpoint; any failure yields an empty list.
pub async fn fetch_countries(config: &Config) -> Vec<CountryRecord> {
    match CountryClient::from_config(config) {
        Ok(client) => client.fetch_all_or_empty().await,
        Err(err) => {
            log_fetch_failure(err);
            Vec::new()
        }
    }
}

fn log_fetch_failure(err: FetchError) {
    let err: anyhow::Error = err.into();
    tracing::error!("failed to fetch countries: {err:#}");
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn test_endpoint_url_requests_fixed_fields() {
        let url = endpoint_url("https://restcountries.com/v3.1/").unwrap();
        assert_eq!(url.path(), "/v3.1/all");
        let fields: Vec<_> = url
            .query_pairs()
            .filter(|(k, _)| k == "fields")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(
            fields,
            vec!["name,flags,population,region,capital,languages,currencies,maps,coatOfArms,subregion"]
        );
    }

    #[test]
    fn test_endpoint_url_rejects_relative_base() {
        assert!(matches!(
            endpoint_url("not a url"),
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_all_decodes_records() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/all"))
            .and(query_param("fields", FIELDS.join(",")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "name": { "common": "Chile", "official": "Republic of Chile" }, "population": 19116209 },
                { "name": { "common": "Peru", "official": "Republic of Peru" }, "capital": ["Lima"] }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = CountryClient::new(&server.uri(), None).unwrap();
        let records = client.fetch_all().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name.common, "Chile");
        assert_eq!(records[0].population, 19_116_209);
        assert_eq!(records[1].capital, vec!["Lima".to_string()]);
    }

    #[tokio::test]
    async fn test_null_fields_keep_every_record() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "name": { "common": "France", "official": "French Republic" }, "capital": ["Paris"] },
                { "name": { "common": "Nullland" }, "capital": null, "population": null, "maps": null },
                null,
                { "name": { "common": "Peru" }, "languages": { "spa": "Spanish", "que": null } }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = CountryClient::new(&server.uri(), None).unwrap();
        let records = client.fetch_all_or_empty().await;

        let names: Vec<_> = records.iter().map(|r| r.name.common.as_str()).collect();
        assert_eq!(names, vec!["France", "Nullland", "Peru"]);
        assert_eq!(records[1].population, 0);
        assert!(records[1].capital.is_empty());
        assert_eq!(records[2].languages_display(), "Spanish");
    }

    #[tokio::test]
    async fn test_server_error_yields_empty() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/all"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = CountryClient::new(&server.uri(), None).unwrap();
        assert!(matches!(
            client.fetch_all().await,
            Err(FetchError::Status { status }) if status.as_u16() == 500
        ));
        assert!(client.fetch_all_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_yields_empty() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/all"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = CountryClient::new(&server.uri(), None).unwrap();
        assert!(matches!(
            client.fetch_all().await,
            Err(FetchError::Decode(_))
        ));
        assert!(client.fetch_all_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_yields_empty() {
        // Nothing listens on the discard port of localhost.
        let config = Config {
            api_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            ..Config::default()
        };
        assert!(fetch_countries(&config).await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_config_url_yields_empty() {
        let config = Config {
            api_base_url: "::not-a-url::".to_string(),
            ..Config::default()
        };
        assert!(fetch_countries(&config).await.is_empty());
    }
}

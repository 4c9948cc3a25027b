use std::collections::BTreeMap;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{
    Client, Method, Url,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use tracing::debug;

use crate::batch::BatchConfig;
use crate::error::{AppError, AppResult, HttpError};
use crate::payload::TrialRequest;

use super::{ProbeResponse, RawResponse, Transport, TransportFailure, collect_headers};

/// reqwest-backed transport. Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: Url,
}

impl HttpTransport {
    /// Builds the shared client for a batch: the configured header set is
    /// attached to every request, the timeout bounds each request and the
    /// idle pool is sized to the connection ceiling.
    ///
    /// # Errors
    ///
    /// Returns an error when the target URL or a header is invalid, or the
    /// client cannot be built.
    pub fn new(config: &BatchConfig) -> AppResult<Self> {
        let url = parse_target_url(&config.target_url)?;
        let headers = build_header_map(&config.headers)?;

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.max_connections.get())
            .build()
            .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn probe(&self, request: &TrialRequest) -> Result<ProbeResponse, TransportFailure> {
        let response = self
            .client
            .request(Method::OPTIONS, self.url.clone())
            .send()
            .await?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let drained = read_body(response).await?.len();
        debug!(
            "Probe for trial {} returned {} ({} body bytes)",
            request.index, status, drained
        );
        Ok(ProbeResponse::from_headers(status, &headers))
    }

    async fn submit(&self, request: &TrialRequest) -> Result<RawResponse, TransportFailure> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&request.body())
            .send()
            .await?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = read_body(response).await?;
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

pub(crate) fn parse_target_url(value: &str) -> AppResult<Url> {
    let url = Url::parse(value).map_err(|err| {
        AppError::http(HttpError::InvalidUrl {
            url: value.to_owned(),
            source: err,
        })
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::http(HttpError::UnsupportedScheme {
            url: value.to_owned(),
        }));
    }
    Ok(url)
}

pub(crate) fn build_header_map(headers: &BTreeMap<String, String>) -> AppResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
            AppError::http(HttpError::InvalidHeaderName {
                name: key.clone(),
                source: err,
            })
        })?;
        let val = HeaderValue::from_str(value).map_err(|err| {
            AppError::http(HttpError::InvalidHeaderValue {
                name: key.clone(),
                source: err,
            })
        })?;
        map.insert(name, val);
    }
    Ok(map)
}

async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk?);
    }
    Ok(body)
}

//! HTTP record source for the CRUD backend.
//!
//! # Security Note - Logging
//!
//! The bearer token is kept in a [`SecretString`] and only exposed while the
//! request header is built. Avoid `RUST_LOG=reqwest=debug` outside
//! development: request logging may still include other request details.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, header};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::error::{ApiError, Operation, message_from_body};
use super::{
    ListParams, MutationOutcome, RecordSource, parse_detail_body, parse_list_body,
    parse_mutation_body,
};
use crate::config::Config;
use crate::error::{Result, ScholarError};
use crate::record::Resource;

/// Record source talking to the REST API.
pub struct HttpRecordSource {
    client: Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl HttpRecordSource {
    /// Create a source for `base_url` with a total request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            token: None,
        })
    }

    /// Create a source from the configured API settings.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.api_base_url().ok_or_else(|| {
            ScholarError::Config(
                "API base URL not configured. Set SCHOLARDESK_API_URL or run: scholardesk config set api.base_url <url>".to_string(),
            )
        })?;
        let source = Self::new(&base_url, Duration::from_secs(config.api.timeout))?;
        Ok(match config.api_token() {
            Some(token) => source.with_token(token),
            None => source,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(SecretString::from(token));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of a resource path below the base URL.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ScholarError::Config(format!("API base URL '{}' cannot hold paths", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(
        &self,
        operation: Operation,
        builder: RequestBuilder,
    ) -> std::result::Result<Vec<u8>, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(operation, e))?;
        let response = check_status(operation, response).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_reqwest(operation, e))?;
        Ok(body.to_vec())
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url.trim())
        .map_err(|e| ScholarError::Config(format!("invalid API base URL '{base_url}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ScholarError::Config(format!(
            "API base URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    Ok(url)
}

async fn check_status(
    operation: Operation,
    response: Response,
) -> std::result::Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = message_from_body(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    tracing::warn!("{operation} request failed with HTTP {}: {message}", status.as_u16());

    Err(ApiError::with_status(operation, status, message))
}

/// A 404 on a single-record request means the id does not exist.
fn missing_record(id: &str) -> impl FnOnce(ApiError) -> ScholarError + '_ {
    move |err| {
        if err.is_not_found() {
            ScholarError::RecordNotFound(id.to_string())
        } else {
            err.into()
        }
    }
}

impl RecordSource for HttpRecordSource {
    async fn list<R: DeserializeOwned + Send>(
        &self,
        resource: Resource,
        params: &ListParams,
    ) -> Result<Vec<R>> {
        let mut url = self.endpoint(&[resource.path()])?;
        let pairs = params.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        tracing::debug!("GET {url}");
        let body = self
            .send(Operation::List, self.request(Method::GET, url))
            .await?;
        let records = parse_list_body(&body)?;
        tracing::info!("fetched {} {} records", records.len(), resource);
        Ok(records)
    }

    async fn fetch<R: DeserializeOwned + Send>(&self, resource: Resource, id: &str) -> Result<R> {
        let url = self.endpoint(&[resource.path(), id])?;
        tracing::debug!("GET {url}");
        let body = self
            .send(Operation::Detail, self.request(Method::GET, url))
            .await
            .map_err(missing_record(id))?;
        parse_detail_body(&body)
    }

    async fn create(&self, resource: Resource, payload: &Value) -> Result<MutationOutcome> {
        let url = self.endpoint(&[resource.path()])?;
        tracing::debug!("POST {url}");
        let body = self
            .send(
                Operation::Create,
                self.request(Method::POST, url).json(payload),
            )
            .await?;
        let outcome = parse_mutation_body(&body, Operation::Create)?;
        tracing::info!("created {} record", resource.singular());
        Ok(outcome)
    }

    async fn update(
        &self,
        resource: Resource,
        id: &str,
        payload: &Value,
    ) -> Result<MutationOutcome> {
        let url = self.endpoint(&[resource.path(), id])?;
        tracing::debug!("PUT {url}");
        let body = self
            .send(Operation::Update, self.request(Method::PUT, url).json(payload))
            .await?;
        let outcome = parse_mutation_body(&body, Operation::Update)?;
        tracing::info!("updated {} {id}", resource.singular());
        Ok(outcome)
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<MutationOutcome> {
        let url = self.endpoint(&[resource.path(), id])?;
        tracing::debug!("DELETE {url}");
        let body = self
            .send(Operation::Delete, self.request(Method::DELETE, url))
            .await?;
        let outcome = parse_mutation_body(&body, Operation::Delete)?;
        tracing::info!("deleted {} {id}", resource.singular());
        Ok(outcome)
    }

    async fn download(&self, document_id: &str) -> Result<Vec<u8>> {
        let url = self.endpoint(&[Resource::Documents.path(), document_id, "download"])?;
        tracing::debug!("GET {url}");
        let builder = self
            .request(Method::GET, url)
            .header(header::ACCEPT, "*/*");
        let body = self
            .send(Operation::Download, builder)
            .await
            .map_err(missing_record(document_id))?;
        Ok(body)
    }
}

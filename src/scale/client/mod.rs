//! Blocking client for the Scale REST API.
//!
//! Resource calls live in the sibling modules as `impl ScaleClient` blocks;
//! this module holds the request plumbing they share.

mod job_types;
mod jobs;
mod recipes;
mod strikes;
mod workspaces;

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, LOCATION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Result, ScaleError};
use crate::model::{Page, ValidationResponse, Warning};

/// Upper bound on followed `next` links for one listing.
const MAX_PAGES: usize = 1000;

#[derive(Debug, Clone)]
pub struct ScaleClient {
    http: Client,
    base_url: String,
}

impl ScaleClient {
    /// Creates a client for the API rooted at `base_url`
    /// (e.g. `http://scale.local/api/v5`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ScaleError::Config("Scale URL is empty".to_string()));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_url(&self.url(path), &[])
    }

    fn get_url<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        debug!(url = %url, "GET request");
        let request = self.http.get(url).query(query);
        handle_response(self.send(request)?)
    }

    fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!(url = %url, "POST request");
        handle_response(self.send(self.http.post(&url).json(body))?)
    }

    fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!(url = %url, "PATCH request");
        handle_response(self.send(self.http.patch(&url).json(body))?)
    }

    /// POSTs to a queue endpoint and returns the `Location` of the new resource.
    fn post_created<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String> {
        let url = self.url(path);
        debug!(url = %url, "POST request (expecting Location)");

        let response = self.send(self.http.post(&url).json(body))?;
        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status.as_u16(), response.text().unwrap_or_default()));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if location.is_empty() {
            warn!(url = %url, "created resource without a Location header");
        }
        Ok(location)
    }

    /// Posts a definition to a validation endpoint and collects its warnings.
    fn validate<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Vec<Warning>> {
        let response: ValidationResponse = self.post(path, body)?;
        Ok(response.into_warnings())
    }

    /// Fetches every page of a list endpoint, following `next` links.
    fn list_all<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<T>> {
        let mut page: Page<T> = self.get_url(&self.url(path), query)?;
        let mut items = Vec::new();
        let mut fetched = 1;

        loop {
            items.append(&mut page.results);
            let Some(next) = page.next.take().filter(|n| !n.is_empty()) else {
                break;
            };
            if fetched >= MAX_PAGES {
                warn!(pages = fetched, "stopping pagination");
                break;
            }
            page = self.get_url(&next, &[])?;
            fetched += 1;
        }

        debug!(path, count = items.len(), pages = fetched, "listed resources");
        Ok(items)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        Ok(request.header(ACCEPT, "application/json").send()?)
    }
}

fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let text = response.text()?;

    if status.is_success() {
        serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, body = %text, "failed to parse response");
            ScaleError::Json(e)
        })
    } else {
        Err(api_error(status.as_u16(), text))
    }
}

/// Builds an `Api` error, preferring the `detail` field of a JSON body.
fn api_error(status: u16, body: String) -> ScaleError {
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string));

    let message = match detail {
        Some(detail) => detail,
        None if body.trim().is_empty() => reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("request failed")
            .to_string(),
        None => body.trim().to_string(),
    };

    ScaleError::Api { status, message }
}

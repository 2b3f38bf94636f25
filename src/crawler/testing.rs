//! In-memory transport for unit tests

use crate::crawler::transport::{Transport, TransportError, TransportResponse};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, REFERER};
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

/// Serves canned responses keyed by exact URL; anything unknown is a 404
#[derive(Default)]
pub struct ScriptedTransport {
    routes: HashMap<String, Result<TransportResponse, TransportError>>,
    log: Mutex<Vec<(String, HeaderMap)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, response: TransportResponse) -> Self {
        self.routes.insert(url.to_string(), Ok(response));
        self
    }

    pub fn page(self, url: &str, body: &str) -> Self {
        self.respond(url, TransportResponse::ok(body))
    }

    pub fn fail(mut self, url: &str, error: TransportError) -> Self {
        self.routes.insert(url.to_string(), Err(error));
        self
    }

    /// URLs requested so far, in order
    pub fn requested(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    /// Referer header of every request so far
    pub fn referers(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(_, headers)| headers.get(REFERER))
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(
        &self,
        url: &Url,
        headers: HeaderMap,
    ) -> Result<TransportResponse, TransportError> {
        self.log
            .lock()
            .unwrap()
            .push((url.to_string(), headers));

        self.routes
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| Ok(TransportResponse::status(404)))
    }
}

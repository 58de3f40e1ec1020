//! NASA API adapter (NeoWs feed + Astronomy Picture of the Day).
//!
//! Implements the `neobot-core` `AstronomyApi` port over HTTPS. One request
//! per call, no retries and no caching.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use neobot_core::{
    config::Config,
    domain::{DateRange, FeedDays, PictureOfTheDay},
    errors::Error,
    ports::AstronomyApi,
    Result,
};

mod wire;

use wire::{ApodResponse, FeedResponse};

const FEED_PATH: &str = "/neo/rest/v1/feed";
const APOD_PATH: &str = "/planetary/apod";

#[derive(Clone, Debug)]
pub struct NasaClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl NasaClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("neobot/0.1")
            .build()
            .map_err(|e| Error::External(format!("http client build failed: {e}")))?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            cfg.nasa_api_key.clone(),
            cfg.nasa_api_base.clone(),
            cfg.http_timeout,
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        tracing::debug!(path, ?params, "nasa request");

        let resp = self
            .http
            .get(format!("{}{path}", self.base_url))
            .query(params)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            // The URL carries the API key; keep it out of error messages.
            .map_err(|e| Error::Fetch(format!("request error: {}", e.without_url())))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Fetch(format!(
                "{path} returned {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("body read error: {}", e.without_url())))?;
        decode(path, &body)
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| Error::Fetch(format!("{path} returned malformed json: {e}")))
}

#[async_trait]
impl AstronomyApi for NasaClient {
    async fn neo_feed(&self, range: DateRange) -> Result<FeedDays> {
        let params = [
            ("start_date", range.start_param()),
            ("end_date", range.end_param()),
        ];
        let resp: FeedResponse = self.get_json(FEED_PATH, &params).await?;
        let days = FeedDays::from(resp);
        tracing::info!(
            start = %range.start(),
            end = %range.end(),
            days = days.len(),
            objects = days.iter().map(|d| d.objects.len()).sum::<usize>(),
            "fetched neo feed"
        );
        Ok(days)
    }

    async fn picture_of_the_day(&self) -> Result<PictureOfTheDay> {
        let resp: ApodResponse = self.get_json(APOD_PATH, &[]).await?;
        Ok(resp.into())
    }
}

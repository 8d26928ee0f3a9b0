use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::SmsConfig;

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, phone: &str, message: &str) -> anyhow::Result<()>;
}

/// Sends text messages through the Textbelt HTTP API.
#[derive(Clone, Debug)]
pub struct TextbeltSender {
    url: String,
    key: Option<String>,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct TextbeltRequest<'a> {
    phone: &'a str,
    message: &'a str,
    key: &'a str,
}

#[derive(Debug, Deserialize)]
struct TextbeltResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

impl TextbeltSender {
    pub fn new(cfg: &SmsConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build textbelt http client")?;
        Ok(Self {
            url: cfg.textbelt_url.clone(),
            key: cfg.textbelt_key.clone(),
            http,
        })
    }
}

#[async_trait]
impl SmsSender for TextbeltSender {
    async fn send(&self, phone: &str, message: &str) -> anyhow::Result<()> {
        let key = self
            .key
            .as_deref()
            .context("TEXTBELT_API_KEY is not configured")?;

        let resp = self
            .http
            .post(&self.url)
            .json(&TextbeltRequest {
                phone,
                message,
                key,
            })
            .send()
            .await
            .context("textbelt request")?;

        let status = resp.status();
        let body: TextbeltResponse = resp
            .json()
            .await
            .with_context(|| format!("textbelt response ({status})"))?;

        if !body.success {
            anyhow::bail!(
                "textbelt rejected message: {}",
                body.error.unwrap_or_else(|| "unknown reason".into())
            );
        }
        Ok(())
    }
}

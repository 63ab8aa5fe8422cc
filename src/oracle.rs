// GeckoTerminal price-oracle client: "market cap for token X", nothing more.

use crate::error::SyncError;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    data: TokenData,
}

#[derive(Debug, Deserialize)]
struct TokenData {
    attributes: TokenAttributes,
}

#[derive(Debug, Deserialize)]
struct TokenAttributes {
    market_cap_usd: Option<String>,
}

pub struct MarketCapOracle {
    http: reqwest::Client,
    base_url: String,
}

impl MarketCapOracle {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { http, base_url: base_url.trim_end_matches('/').to_string() }
    }

    /// Current market capitalization in USD for a token mint. Failures are
    /// per-pass: the caller skips this campaign and retries next interval.
    pub async fn market_cap_usd(&self, mint: &str) -> Result<f64, SyncError> {
        let url = format!("{}/api/v2/networks/solana/tokens/{}", self.base_url, mint);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        let body: TokenResponse = response.json().await?;
        body.data
            .attributes
            .market_cap_usd
            .as_deref()
            .and_then(|v| v.parse::<f64>().ok())
            .ok_or_else(|| SyncError::OracleMissingData(mint.to_string()))
    }
}

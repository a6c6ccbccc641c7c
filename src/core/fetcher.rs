use crate::domain::model::{FetchAttempt, FetchOutcome};
use crate::domain::ports::TextFetcher;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 一種取得來源的方式：直接連線，或透過代理服務轉送
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalStrategy {
    pub name: String,
    #[serde(flatten)]
    pub kind: StrategyKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyKind {
    Direct,
    Prefix {
        prefix: String,
        #[serde(default)]
        encode: bool,
    },
    /// `{url}` 與 `{url_encoded}` 會被替換成來源位置
    Template { template: String },
}

impl RetrievalStrategy {
    pub fn direct() -> Self {
        Self {
            name: "direct".to_string(),
            kind: StrategyKind::Direct,
        }
    }

    pub fn prefix(name: impl Into<String>, prefix: impl Into<String>, encode: bool) -> Self {
        Self {
            name: name.into(),
            kind: StrategyKind::Prefix {
                prefix: prefix.into(),
                encode,
            },
        }
    }

    /// 把來源位置轉成這個策略實際要請求的 URL
    pub fn apply(&self, location: &str) -> String {
        match &self.kind {
            StrategyKind::Direct => location.to_string(),
            StrategyKind::Prefix { prefix, encode } => {
                if *encode {
                    format!("{}{}", prefix, encode_location(location))
                } else {
                    format!("{}{}", prefix, location)
                }
            }
            StrategyKind::Template { template } => template
                .replace("{url_encoded}", &encode_location(location))
                .replace("{url}", location),
        }
    }
}

fn encode_location(location: &str) -> String {
    url::form_urlencoded::byte_serialize(location.as_bytes()).collect()
}

/// 依序嘗試每個策略，第一個成功的就停止。
///
/// 嘗試是循序的：前面的策略成功後，後面的策略不會發出任何請求。
/// 沒有重試、沒有退避；全部失敗時回傳空文字並記下最後一個失敗原因。
pub struct RemoteTextFetcher {
    client: Client,
    strategies: Vec<RetrievalStrategy>,
    timeout: Option<Duration>,
}

impl RemoteTextFetcher {
    pub fn new(strategies: Vec<RetrievalStrategy>) -> Self {
        Self {
            client: Client::new(),
            strategies,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        self.timeout = timeout_seconds.map(Duration::from_secs);
        self
    }

    pub fn strategies(&self) -> &[RetrievalStrategy] {
        &self.strategies
    }

    /// 列出某個來源會依序嘗試的 URL (dry run 用)
    pub fn plan(&self, location: &str) -> Vec<(String, String)> {
        self.strategies
            .iter()
            .map(|s| (s.name.clone(), s.apply(location)))
            .collect()
    }

    async fn attempt(&self, url: &str) -> std::result::Result<String, String> {
        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status));
        }

        response.text().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl TextFetcher for RemoteTextFetcher {
    async fn fetch_text(&self, location: &str) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();

        for strategy in &self.strategies {
            let url = strategy.apply(location);
            tracing::debug!("🌐 [{}] GET {}", strategy.name, url);

            match self.attempt(&url).await {
                Ok(text) => {
                    tracing::debug!(
                        "✅ [{}] fetched {} bytes for {}",
                        strategy.name,
                        text.len(),
                        location
                    );
                    outcome.attempts.push(FetchAttempt {
                        strategy: strategy.name.clone(),
                        url,
                        error: None,
                    });
                    outcome.text = Some(text);
                    outcome.error = None;
                    return outcome;
                }
                Err(reason) => {
                    tracing::debug!("⚠️ [{}] failed for {}: {}", strategy.name, location, reason);
                    outcome.attempts.push(FetchAttempt {
                        strategy: strategy.name.clone(),
                        url,
                        error: Some(reason.clone()),
                    });
                    outcome.error = Some(reason);
                }
            }
        }

        tracing::warn!(
            "❌ All {} strategies failed for {}: {}",
            self.strategies.len(),
            location,
            outcome.error.as_deref().unwrap_or("no strategies configured")
        );
        if outcome.error.is_none() {
            outcome.error = Some("no strategies configured".to_string());
        }
        outcome
    }
}

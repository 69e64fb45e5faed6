use crate::models::Module;
use async_trait::async_trait;
use thiserror::Error;

/// ClientError
///
/// Why the dashboard could not load its menu.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("menu service responded with status {0}")]
    Status(u16),

    #[error("menu fetch was cancelled")]
    Cancelled,

    #[error("menu fetch task failed: {0}")]
    Task(String),
}

/// MenuSource
///
/// Where the dashboard gets its navigation tree from.
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn fetch_menu(&self, role_id: i32) -> Result<Vec<Module>, ClientError>;
}

/// HttpMenuSource
///
/// Calls `GET {base_url}/api/menu/{role_id}`. No retries; timeouts are reqwest's defaults.
#[derive(Clone)]
pub struct HttpMenuSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMenuSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MenuSource for HttpMenuSource {
    async fn fetch_menu(&self, role_id: i32) -> Result<Vec<Module>, ClientError> {
        let url = format!("{}/api/menu/{}", self.base_url, role_id);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }

        Ok(response.json::<Vec<Module>>().await?)
    }
}

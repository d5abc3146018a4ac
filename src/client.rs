use crate::order::Order;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a lookup ended without an order. The message is what the error banner
/// shows.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LookupError {
    /// The identifier was blank; no request was made.
    #[error("Пожалуйста, введите ID заказа")]
    EmptyOrderId,

    #[error("Заказ не найден")]
    NotFound,

    /// Any non-success status other than 404.
    #[error("Ошибка сервера: {0}")]
    Server(u16),

    /// The request failed or the body was not an order.
    #[error("Ошибка сети: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LookupError::Transport("некорректный ответ сервера".to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

/// Maps a response status onto the lookup outcome.
pub fn check_status(status: StatusCode) -> Result<(), LookupError> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::NOT_FOUND {
        Err(LookupError::NotFound)
    } else {
        Err(LookupError::Server(status.as_u16()))
    }
}

/// Where orders come from. The viewer only sees this trait.
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn fetch_order(&self, order_id: &str) -> Result<Order, LookupError>;
}

pub struct HttpOrderSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpOrderSource {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder().user_agent("order-viewer");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|e| {
            warn!(error = %e, ?timeout, "failed to build HTTP client, falling back to defaults");
            reqwest::Client::new()
        });

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn order_url(&self, order_id: &str) -> String {
        format!(
            "{}/order/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(order_id)
        )
    }
}

#[async_trait]
impl OrderSource for HttpOrderSource {
    async fn fetch_order(&self, order_id: &str) -> Result<Order, LookupError> {
        let url = self.order_url(order_id);
        debug!(%url, "requesting order");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(%url, error = %e, "order request failed");
            LookupError::from(e)
        })?;

        let status = response.status();
        info!(order_id, status = status.as_u16(), "order response");
        check_status(status)?;

        let order: Order = response.json().await?;
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status() {
        assert_eq!(check_status(StatusCode::OK), Ok(()));
        assert_eq!(check_status(StatusCode::NO_CONTENT), Ok(()));
        assert_eq!(
            check_status(StatusCode::NOT_FOUND),
            Err(LookupError::NotFound)
        );
        assert_eq!(
            check_status(StatusCode::INTERNAL_SERVER_ERROR),
            Err(LookupError::Server(500))
        );
        assert_eq!(
            check_status(StatusCode::BAD_REQUEST),
            Err(LookupError::Server(400))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LookupError::EmptyOrderId.to_string(),
            "Пожалуйста, введите ID заказа"
        );
        assert_eq!(LookupError::NotFound.to_string(), "Заказ не найден");
        assert!(LookupError::Server(503).to_string().contains("503"));
    }

    #[test]
    fn test_order_url() {
        let source = HttpOrderSource::new("http://localhost:8081/", None);
        assert_eq!(
            source.order_url("b563feb7b2b84b6test"),
            "http://localhost:8081/order/b563feb7b2b84b6test"
        );
        assert_eq!(
            source.order_url("a/b c"),
            "http://localhost:8081/order/a%2Fb%20c"
        );
    }

    #[test]
    fn test_source_with_timeout() {
        let source =
            HttpOrderSource::new("https://orders.example.com", Some(Duration::from_secs(5)));
        assert_eq!(source.order_url("42"), "https://orders.example.com/order/42");
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::{header::HeaderMap, Client};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::config::{HeaderConfig, SseConfig};
use crate::error::{McpError, Result};
use crate::session::McpTransport;

pub struct SseTransport {
    config: SseConfig,
    client: Client,
    connected: AtomicBool,
    message_tx: mpsc::Sender<String>,
    message_rx: Mutex<mpsc::Receiver<String>>,
    /// POST target announced by the server's `endpoint` event.
    endpoint_url: Arc<Mutex<Option<String>>>,
    /// Error text recorded by the reader task when the stream dies; the
    /// classification into noise vs. real failure happens at disconnect.
    teardown_error: Arc<Mutex<Option<String>>>,
    sse_handle: Option<tokio::task::JoinHandle<()>>,
}

impl SseTransport {
    pub fn new(config: SseConfig) -> Self {
        let (message_tx, message_rx) = mpsc::channel(100);
        Self {
            config,
            client: Client::new(),
            connected: AtomicBool::new(false),
            message_tx,
            message_rx: Mutex::new(message_rx),
            endpoint_url: Arc::new(Mutex::new(None)),
            teardown_error: Arc::new(Mutex::new(None)),
            sse_handle: None,
        }
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "text/event-stream"
                .parse()
                .map_err(|_| McpError::InvalidConfig("invalid accept header".to_string()))?,
        );

        for HeaderConfig { name, value } in &self.config.headers {
            let header_name = reqwest::header::HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| McpError::InvalidConfig(format!("Invalid header name: {}", e)))?;
            let header_value = value
                .parse()
                .map_err(|e| McpError::InvalidConfig(format!("Invalid header value: {}", e)))?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    /// POST target: the announced endpoint when the server has sent one, a
    /// URL derived from the SSE endpoint otherwise.
    async fn post_url(&self) -> String {
        // The endpoint event usually arrives within the first events after
        // connect; give it a moment before falling back.
        for _ in 0..20 {
            if let Some(url) = self.endpoint_url.lock().await.clone() {
                return url;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        format!("{}/message", self.config.url.trim_end_matches("/sse"))
    }
}

/// Resolve a (possibly relative) endpoint announcement against the SSE URL.
fn resolve_endpoint(base_url: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return endpoint.to_string();
    }

    let origin = match base_url.find("://") {
        Some(scheme_end) => match base_url[scheme_end + 3..].find('/') {
            Some(path_start) => &base_url[..scheme_end + 3 + path_start],
            None => base_url,
        },
        None => base_url,
    };

    if endpoint.starts_with('/') {
        format!("{}{}", origin, endpoint)
    } else {
        format!("{}/{}", origin, endpoint)
    }
}

#[async_trait]
impl McpTransport for SseTransport {
    async fn connect(&mut self) -> Result<()> {
        info!("connecting to tool catalog SSE endpoint: {}", self.config.url);

        let headers = self.build_headers()?;
        let response = self
            .client
            .get(&self.config.url)
            .headers(headers)
            .timeout(Duration::from_secs(self.config.connect_timeout_secs))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(McpError::Connection(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let message_tx = self.message_tx.clone();
        let endpoint_url = self.endpoint_url.clone();
        let teardown_error = self.teardown_error.clone();
        let base_url = self.config.url.clone();

        let handle = tokio::spawn(async move {
            let mut stream = response.bytes_stream().eventsource();
            while let Some(event) = stream.next().await {
                match event {
                    Ok(event) => {
                        debug!("SSE event: {}", event.event);
                        if event.event == "endpoint" {
                            let resolved = resolve_endpoint(&base_url, &event.data);
                            debug!("catalog announced endpoint: {}", resolved);
                            *endpoint_url.lock().await = Some(resolved);
                        } else if event.event == "message" || event.event.is_empty() {
                            if message_tx.send(event.data).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        warn!("SSE stream error: {}", e);
                        *teardown_error.lock().await = Some(e.to_string());
                        break;
                    }
                }
            }
            debug!("SSE stream ended for {}", base_url);
        });

        self.sse_handle = Some(handle);
        self.connected.store(true, Ordering::SeqCst);

        info!("tool catalog SSE transport connected");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        info!("disconnecting tool catalog SSE transport");

        self.connected.store(false, Ordering::SeqCst);

        if let Some(handle) = self.sse_handle.take() {
            handle.abort();
        }

        if let Some(message) = self.teardown_error.lock().await.take() {
            let err = McpError::Transport(message);
            if err.is_cleanup_noise() {
                return Err(McpError::CleanupNoise(err.to_string()));
            }
            return Err(err);
        }

        Ok(())
    }

    async fn send(&self, message: String) -> Result<()> {
        if !self.is_connected() {
            return Err(McpError::Disconnected);
        }

        let post_url = self.post_url().await;
        let headers = self.build_headers()?;

        let response = self
            .client
            .post(&post_url)
            .headers(headers)
            .header("Content-Type", "application/json")
            .body(message)
            .timeout(Duration::from_secs(self.config.read_timeout_secs))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(McpError::Transport(format!(
                "POST failed: {} - {}",
                status, body
            )));
        }

        debug!("sent message via POST to {}", post_url);
        Ok(())
    }

    async fn receive(&self) -> Result<Option<String>> {
        if !self.is_connected() {
            return Err(McpError::Disconnected);
        }

        let mut rx = self.message_rx.lock().await;
        match tokio::time::timeout(Duration::from_millis(100), rx.recv()).await {
            Ok(Some(message)) => {
                debug!("received SSE message: {}", message);
                Ok(Some(message))
            }
            Ok(None) => {
                warn!("SSE message channel closed");
                Err(McpError::Disconnected)
            }
            // No message available yet
            Err(_) => Ok(None),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_endpoints_pass_through() {
        assert_eq!(
            resolve_endpoint(
                "https://catalog.example/gradio_api/mcp/sse",
                "https://other.example/messages"
            ),
            "https://other.example/messages"
        );
    }

    #[test]
    fn relative_endpoints_resolve_against_the_origin() {
        assert_eq!(
            resolve_endpoint(
                "https://catalog.example/gradio_api/mcp/sse",
                "/gradio_api/mcp/messages/?session_id=abc"
            ),
            "https://catalog.example/gradio_api/mcp/messages/?session_id=abc"
        );
    }

    #[test]
    fn bare_paths_get_a_separator() {
        assert_eq!(
            resolve_endpoint("https://catalog.example/sse", "messages"),
            "https://catalog.example/messages"
        );
    }
}

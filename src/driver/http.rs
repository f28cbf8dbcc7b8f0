use super::error::AgentError;
use super::traits::AgentTransport;
use super::types::{
    AgentRequest, AgentResponse, CreateConversationRequest, CreateConversationResponse, AUTO_MODE,
};
use crate::utils::config::Config;
use async_trait::async_trait;
use std::time::Duration;

pub const RUN_PATH: &str = "/api/agent/run";
pub const CREATE_CONVERSATION_PATH: &str = "/api/conversation/create";

/// Agent service client over HTTP with bearer authentication
pub struct HttpAgentClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl HttpAgentClient {
    pub fn new(config: &Config) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AgentError::ClientBuild(e.to_string()))?;

        Ok(Self::with_client(client, config))
    }

    /// Use a prepared reqwest client; its own timeout should match `config`
    pub fn with_client(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            timeout: config.request_timeout,
        }
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, AgentError>
    where
        B: serde::Serialize + Sync,
        R: serde::de::DeserializeOwned + Send,
    {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AgentError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| AgentError::from_reqwest(e, self.timeout))
    }
}

#[async_trait]
impl AgentTransport for HttpAgentClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send_message(&self, request: &AgentRequest) -> Result<AgentResponse, AgentError> {
        self.post_json(RUN_PATH, request).await
    }

    async fn create_conversation(&self, title: &str) -> Result<String, AgentError> {
        let body = CreateConversationRequest {
            title: title.to_string(),
            mode: AUTO_MODE.to_string(),
        };
        let created: CreateConversationResponse =
            self.post_json(CREATE_CONVERSATION_PATH, &body).await?;

        created
            .conversation_id()
            .map(str::to_string)
            .ok_or_else(|| AgentError::Decode("response has no conversation_id".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Seen {
        requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    }

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: &str, timeout: Duration) -> HttpAgentClient {
        let config = Config {
            api_key: "test-key".to_string(),
            request_timeout: timeout,
            ..Config::default()
        }
        .with_base_url(base_url);
        // Loopback mock server; keep proxy settings from the environment out of it
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(timeout)
            .build()
            .unwrap();
        HttpAgentClient::with_client(client, &config)
    }

    async fn record_run(
        State(seen): State<Seen>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        seen.requests.lock().unwrap().push((auth, body));
        Json(json!({
            "conversation_id": "conv-42",
            "content": "Hello from Grace",
            "meta": {"specialist": "general_chat", "mode": "single"}
        }))
    }

    #[test]
    fn test_new_takes_base_url_from_config() {
        let config = Config::default().with_base_url("http://grace.local:5005/");
        let client = HttpAgentClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://grace.local:5005");
    }

    #[tokio::test]
    async fn test_send_message_posts_json_with_bearer() {
        let seen = Seen::default();
        let app = Router::new()
            .route(RUN_PATH, post(record_run))
            .with_state(seen.clone());
        let base = spawn_server(app).await;
        let client = client_for(&base, Duration::from_secs(5));

        let response = client
            .send_message(&AgentRequest::new("Hey Grace!", None))
            .await
            .unwrap();

        assert_eq!(response.conversation_id(), Some("conv-42"));
        assert_eq!(response.content(), "Hello from Grace");
        assert_eq!(response.specialist().as_deref(), Some("general_chat"));

        let requests = seen.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0.as_deref(), Some("Bearer test-key"));
        assert_eq!(requests[0].1, json!({"question": "Hey Grace!", "mode": "auto"}));
    }

    #[tokio::test]
    async fn test_oddly_typed_meta_still_succeeds() {
        let app = Router::new().route(
            RUN_PATH,
            post(|| async { Json(json!({"content": "ok", "meta": {"mode": 1}})) }),
        );
        let base = spawn_server(app).await;
        let client = client_for(&base, Duration::from_secs(5));

        let response = client
            .send_message(&AgentRequest::new("hi", None))
            .await
            .unwrap();
        assert_eq!(response.content(), "ok");
        assert!(!response.is_multi_agent());
        assert_eq!(response.specialist(), None);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let app = Router::new().route(
            RUN_PATH,
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = spawn_server(app).await;
        let client = client_for(&base, Duration::from_secs(5));

        let err = client
            .send_message(&AgentRequest::new("hi", None))
            .await
            .unwrap_err();
        match err {
            AgentError::Status { status, url } => {
                assert_eq!(status, 500);
                assert!(url.ends_with(RUN_PATH));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let app = Router::new().route(RUN_PATH, post(|| async { "definitely not json" }));
        let base = spawn_server(app).await;
        let client = client_for(&base, Duration::from_secs(5));

        let err = client
            .send_message(&AgentRequest::new("hi", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Decode(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let app = Router::new().route(
            RUN_PATH,
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({}))
            }),
        );
        let base = spawn_server(app).await;
        let client = client_for(&base, Duration::from_millis(200));

        let err = client
            .send_message(&AgentRequest::new("hi", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Timeout(_)), "got {:?}", err);
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(&format!("http://{}", addr), Duration::from_secs(5));

        let err = client
            .send_message(&AgentRequest::new("hi", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Network(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_create_conversation() {
        let seen = Seen::default();
        let app = Router::new()
            .route(
                CREATE_CONVERSATION_PATH,
                post(
                    |State(seen): State<Seen>, Json(body): Json<Value>| async move {
                        seen.requests.lock().unwrap().push((None, body));
                        Json(json!({"conversation_id": "fresh-1"}))
                    },
                ),
            )
            .with_state(seen.clone());
        let base = spawn_server(app).await;
        let client = client_for(&base, Duration::from_secs(5));

        let id = client.create_conversation("Smoke").await.unwrap();
        assert_eq!(id, "fresh-1");
        assert_eq!(
            seen.requests.lock().unwrap()[0].1,
            json!({"title": "Smoke", "mode": "auto"})
        );
    }

    #[tokio::test]
    async fn test_create_conversation_without_id_fails() {
        let app = Router::new().route(
            CREATE_CONVERSATION_PATH,
            post(|| async { Json(json!({"ok": true})) }),
        );
        let base = spawn_server(app).await;
        let client = client_for(&base, Duration::from_secs(5));

        let err = client.create_conversation("Smoke").await.unwrap_err();
        assert!(matches!(err, AgentError::Decode(_)));
    }
}

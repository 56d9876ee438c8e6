use crate::config::ServiceConfig;
use crate::debug::normalize::normalize_debug_response;
use crate::debug::workflow::DebugDispatcher;
use crate::debug::DebugRequest;
use crate::error::{Step, WorkflowError};
use crate::event::AppEvent;
use crate::session::SessionId;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use std::sync::mpsc;
use tokio::runtime::Handle;
use tracing::{debug, error, info};

#[derive(Serialize)]
struct SubmitDocumentsBody<'a> {
    session_id: &'a SessionId,
}

/// HTTP side of a debug run: `analyze_error`, then `submit_documents`.
#[derive(Clone)]
pub struct AnalysisService {
    http: Client,
    config: ServiceConfig,
}

impl AnalysisService {
    pub fn new(config: ServiceConfig) -> Result<Self, WorkflowError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(WorkflowError::Client)?;
        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        step: Step,
        body: &B,
    ) -> Result<Response, WorkflowError> {
        let url = self.config.endpoint(step.endpoint());
        debug!(%step, %url, "posting");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| WorkflowError::Transport { step, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WorkflowError::Status { step, status });
        }
        Ok(response)
    }

    /// Runs both calls strictly in order and returns the raw
    /// `submit_documents` payload. The second call is only made after the
    /// first succeeded.
    pub async fn run(&self, request: DebugRequest) -> Result<Value, WorkflowError> {
        self.post(Step::AnalyzeError, &request).await?;

        let session = request.session;
        if session.is_expired(self.config.session_ttl()) {
            return Err(WorkflowError::SessionExpired {
                session_id: session.to_string(),
            });
        }

        let response = self
            .post(
                Step::SubmitDocuments,
                &SubmitDocumentsBody {
                    session_id: &session,
                },
            )
            .await?;

        response
            .json::<Value>()
            .await
            .map_err(|source| WorkflowError::Decode { source })
    }
}

/// Spawns runs onto the app's tokio runtime and reports back over the event
/// channel.
#[derive(Clone)]
pub struct ServiceDispatcher {
    service: AnalysisService,
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
}

impl ServiceDispatcher {
    pub fn new(service: AnalysisService, tx: mpsc::Sender<AppEvent>, runtime_handle: Handle) -> Self {
        Self {
            service,
            tx,
            runtime_handle,
        }
    }

    pub fn base_url(&self) -> &str {
        self.service.base_url()
    }
}

impl DebugDispatcher for ServiceDispatcher {
    fn dispatch(&self, request: DebugRequest) {
        let service = self.service.clone();
        let tx = self.tx.clone();

        self.runtime_handle.spawn(async move {
            let session = request.session.as_uuid();
            match service.run(request).await {
                Ok(raw) => {
                    info!(session = %session, "debug run succeeded");
                    let normalized = normalize_debug_response(&raw);
                    let _ = tx.send(AppEvent::DebugCompleted {
                        session,
                        normalized,
                    });
                }
                Err(err) => {
                    error!(session = %session, error = %err, "debug run failed");
                    let _ = tx.send(AppEvent::DebugFailed {
                        session,
                        message: err.to_string(),
                    });
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{AnalysisService, ServiceDispatcher};
    use crate::config::ServiceConfig;
    use crate::debug::workflow::DebugDispatcher;
    use crate::debug::DebugRequest;
    use crate::error::{Step, WorkflowError};
    use crate::event::AppEvent;
    use crate::session::SessionId;
    use serde_json::{json, Value};
    use std::sync::mpsc;
    use std::time::Duration;
    use tokio::runtime::Handle;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_for(server: &MockServer) -> AnalysisService {
        let config = ServiceConfig {
            base_url: server.uri(),
            ..ServiceConfig::default()
        };
        AnalysisService::new(config).expect("client should build")
    }

    fn sample_request() -> DebugRequest {
        DebugRequest {
            session: SessionId::new(),
            user_prompt: "Please solve the bug".to_string(),
            code_snippet: "print(x)".to_string(),
            stack_trace: json!({"exception": "NameError", "message": "name 'x' is not defined"}),
        }
    }

    async fn mount(server: &MockServer, endpoint: &str, response: ResponseTemplate, calls: u64) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(response)
            .expect(calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn posts_analyze_then_submit_with_shared_session() {
        let server = MockServer::start().await;
        mount(&server, "/analyze_error", ResponseTemplate::new(200), 1).await;
        mount(
            &server,
            "/submit_documents",
            ResponseTemplate::new(200).set_body_json(json!({
                "retrieved_documents": ["http://a"],
                "search_phrase": "NameError",
                "updated_response": "ok"
            })),
            1,
        )
        .await;

        let request = sample_request();
        let session = request.session.to_string();
        let payload = service_for(&server)
            .run(request)
            .await
            .expect("run should succeed");
        assert_eq!(payload["search_phrase"], "NameError");

        let received = server
            .received_requests()
            .await
            .expect("request recording should be enabled");
        let paths: Vec<&str> = received.iter().map(|r| r.url.path()).collect();
        assert_eq!(paths, vec!["/analyze_error", "/submit_documents"]);

        let analyze: Value = received[0].body_json().expect("analyze body should be JSON");
        assert_eq!(analyze["session_id"], session.as_str());
        assert_eq!(analyze["user_prompt"], "Please solve the bug");
        assert_eq!(analyze["code_snippet"], "print(x)");
        assert_eq!(analyze["stack_trace"]["exception"], "NameError");

        let submit: Value = received[1].body_json().expect("submit body should be JSON");
        assert_eq!(submit, json!({"session_id": session}));
    }

    #[tokio::test]
    async fn failed_analyze_skips_submit() {
        let server = MockServer::start().await;
        mount(&server, "/analyze_error", ResponseTemplate::new(500), 1).await;
        mount(&server, "/submit_documents", ResponseTemplate::new(200), 0).await;

        let error = service_for(&server)
            .run(sample_request())
            .await
            .expect_err("run should fail");
        assert!(matches!(
            error,
            WorkflowError::Status {
                step: Step::AnalyzeError,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn failed_submit_is_reported() {
        let server = MockServer::start().await;
        mount(&server, "/analyze_error", ResponseTemplate::new(200), 1).await;
        mount(&server, "/submit_documents", ResponseTemplate::new(404), 1).await;

        let error = service_for(&server)
            .run(sample_request())
            .await
            .expect_err("run should fail");
        match error {
            WorkflowError::Status { step, status } => {
                assert_eq!(step, Step::SubmitDocuments);
                assert_eq!(status.as_u16(), 404);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn non_json_submit_body_is_a_decode_error() {
        let server = MockServer::start().await;
        mount(&server, "/analyze_error", ResponseTemplate::new(200), 1).await;
        mount(
            &server,
            "/submit_documents",
            ResponseTemplate::new(200).set_body_string("<html>oops</html>"),
            1,
        )
        .await;

        let error = service_for(&server)
            .run(sample_request())
            .await
            .expect_err("run should fail");
        assert!(matches!(error, WorkflowError::Decode { .. }));
    }

    #[tokio::test]
    async fn expired_session_stops_before_submit() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/analyze_error",
            ResponseTemplate::new(200).set_delay(Duration::from_millis(20)),
            1,
        )
        .await;
        mount(&server, "/submit_documents", ResponseTemplate::new(200), 0).await;

        let config = ServiceConfig {
            base_url: server.uri(),
            session_ttl_secs: 0,
            ..ServiceConfig::default()
        };
        let service = AnalysisService::new(config).expect("client should build");
        let error = service
            .run(sample_request())
            .await
            .expect_err("run should fail");
        assert!(matches!(error, WorkflowError::SessionExpired { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn dispatcher_reports_normalized_completion() {
        let server = MockServer::start().await;
        mount(&server, "/analyze_error", ResponseTemplate::new(200), 1).await;
        mount(
            &server,
            "/submit_documents",
            ResponseTemplate::new(200)
                .set_body_json(json!({"retrieved_documents": ["http://a", "http://b"]})),
            1,
        )
        .await;

        let (tx, rx) = mpsc::channel();
        let dispatcher = ServiceDispatcher::new(service_for(&server), tx, Handle::current());
        let request = sample_request();
        let expected_session = request.session.as_uuid();
        dispatcher.dispatch(request);

        let event = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .expect("blocking task should join")
            .expect("completion event should arrive");
        match event {
            AppEvent::DebugCompleted {
                session,
                normalized,
            } => {
                assert_eq!(session, expected_session);
                assert!(normalized.result.requires_documentation);
                assert_eq!(normalized.result.documentation_results.len(), 2);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn dispatcher_reports_failure() {
        let server = MockServer::start().await;
        mount(&server, "/analyze_error", ResponseTemplate::new(503), 1).await;

        let (tx, rx) = mpsc::channel();
        let dispatcher = ServiceDispatcher::new(service_for(&server), tx, Handle::current());
        dispatcher.dispatch(sample_request());

        let event = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .expect("blocking task should join")
            .expect("failure event should arrive");
        let AppEvent::DebugFailed { message, .. } = event else {
            panic!("expected failure event, got {event:?}");
        };
        assert!(message.contains("analyze_error"));
    }
}

use crate::debug::normalize::NormalizedResponse;
use crate::debug::{DebugRequest, DebugResult};
use crate::error::ValidationError;
use crate::session::SessionId;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Hands a validated request to whatever performs the service exchange.
/// Completion comes back later through the app event channel.
pub trait DebugDispatcher {
    fn dispatch(&self, request: DebugRequest);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugForm {
    pub stack_trace: String,
    pub code_snippet: String,
    pub prompt: String,
}

impl DebugForm {
    pub fn is_submittable(&self) -> bool {
        !self.stack_trace.trim().is_empty() && !self.code_snippet.trim().is_empty()
    }

    pub fn build_request(&self, default_prompt: &str) -> Result<DebugRequest, ValidationError> {
        let stack_trace =
            serde_json::from_str(&self.stack_trace).map_err(ValidationError::InvalidStackTrace)?;
        let user_prompt = if self.prompt.trim().is_empty() {
            default_prompt.to_string()
        } else {
            self.prompt.clone()
        };

        Ok(DebugRequest {
            session: SessionId::new(),
            user_prompt,
            code_snippet: self.code_snippet.clone(),
            stack_trace,
        })
    }
}

/// Blocking message shown to the user in a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    InvalidStackTrace,
    RequestFailed,
}

impl Notice {
    pub fn title(self) -> &'static str {
        match self {
            Self::InvalidStackTrace => "Invalid input",
            Self::RequestFailed => "Request failed",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidStackTrace => "Stack Trace must be valid JSON.",
            Self::RequestFailed => "Something went wrong. Check the diagnostics log for details.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty input or a run already in flight.
    Ignored,
    Rejected,
    Dispatched(Uuid),
}

pub struct DebugWorkflow {
    pub form: DebugForm,
    default_prompt: String,
    in_flight: Option<Uuid>,
    result: Option<DebugResult>,
    notice: Option<Notice>,
}

impl DebugWorkflow {
    pub fn new(default_prompt: impl Into<String>) -> Self {
        Self {
            form: DebugForm::default(),
            default_prompt: default_prompt.into(),
            in_flight: None,
            result: None,
            notice: None,
        }
    }

    pub fn is_processing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_processing() && self.form.is_submittable()
    }

    /// The stored result, hidden while a run is in flight.
    pub fn visible_result(&self) -> Option<&DebugResult> {
        if self.is_processing() {
            None
        } else {
            self.result.as_ref()
        }
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn submit(&mut self, dispatcher: &dyn DebugDispatcher) -> SubmitOutcome {
        if !self.can_submit() {
            return SubmitOutcome::Ignored;
        }

        let request = match self.form.build_request(&self.default_prompt) {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "rejected debug submission");
                self.notice = Some(Notice::InvalidStackTrace);
                return SubmitOutcome::Rejected;
            }
        };

        let session = request.session.as_uuid();
        info!(session = %session, "dispatching debug request");
        self.in_flight = Some(session);
        dispatcher.dispatch(request);
        SubmitOutcome::Dispatched(session)
    }

    /// Stores the normalized result of a finished run. Returns false when the
    /// completion does not belong to the run in flight.
    pub fn complete(&mut self, session: Uuid, normalized: NormalizedResponse) -> bool {
        if self.in_flight != Some(session) {
            warn!(session = %session, "dropping completion for unknown session");
            return false;
        }

        for issue in &normalized.issues {
            warn!(session = %session, %issue, "malformed field in service response");
        }
        debug!(
            session = %session,
            documents = normalized.result.documentation_results.len(),
            "debug run completed"
        );
        self.in_flight = None;
        self.result = Some(normalized.result);
        true
    }

    /// Ends a failed run. The previous result is kept as-is.
    pub fn fail(&mut self, session: Uuid) -> bool {
        if self.in_flight != Some(session) {
            warn!(session = %session, "dropping failure for unknown session");
            return false;
        }

        self.in_flight = None;
        self.notice = Some(Notice::RequestFailed);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{DebugDispatcher, DebugWorkflow, Notice, SubmitOutcome};
    use crate::debug::normalize::normalize_debug_response;
    use crate::debug::DebugRequest;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingDispatcher {
        requests: RefCell<Vec<DebugRequest>>,
    }

    impl DebugDispatcher for RecordingDispatcher {
        fn dispatch(&self, request: DebugRequest) {
            self.requests.borrow_mut().push(request);
        }
    }

    fn filled_workflow(stack_trace: &str) -> DebugWorkflow {
        let mut workflow = DebugWorkflow::new("Please solve the bug");
        workflow.form.stack_trace = stack_trace.to_string();
        workflow.form.code_snippet = "print(x)".to_string();
        workflow
    }

    #[test]
    fn blank_fields_are_ignored() {
        let dispatcher = RecordingDispatcher::default();
        let mut workflow = filled_workflow("   ");
        assert_eq!(workflow.submit(&dispatcher), SubmitOutcome::Ignored);

        workflow.form.stack_trace = "{}".to_string();
        workflow.form.code_snippet = "\n\t".to_string();
        assert_eq!(workflow.submit(&dispatcher), SubmitOutcome::Ignored);

        assert!(dispatcher.requests.borrow().is_empty());
        assert!(workflow.notice().is_none());
        assert!(!workflow.is_processing());
    }

    #[test]
    fn invalid_json_warns_without_dispatching() {
        let dispatcher = RecordingDispatcher::default();
        let mut workflow = filled_workflow("Traceback (most recent call last):");

        assert_eq!(workflow.submit(&dispatcher), SubmitOutcome::Rejected);
        assert!(dispatcher.requests.borrow().is_empty());
        assert_eq!(workflow.notice(), Some(Notice::InvalidStackTrace));
        assert_eq!(workflow.notice().map(Notice::message), Some("Stack Trace must be valid JSON."));
        assert!(!workflow.is_processing());
    }

    #[test]
    fn valid_input_dispatches_once_and_enters_processing() {
        let dispatcher = RecordingDispatcher::default();
        let mut workflow = filled_workflow(r#"{"exception": "NameError", "message": "x"}"#);

        let outcome = workflow.submit(&dispatcher);
        let SubmitOutcome::Dispatched(session) = outcome else {
            panic!("expected dispatch, got {outcome:?}");
        };
        assert!(workflow.is_processing());
        assert!(!workflow.can_submit());

        let requests = dispatcher.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].session.as_uuid(), session);
        assert_eq!(requests[0].user_prompt, "Please solve the bug");
        assert_eq!(requests[0].stack_trace["exception"], "NameError");
    }

    #[test]
    fn second_submit_while_processing_is_ignored() {
        let dispatcher = RecordingDispatcher::default();
        let mut workflow = filled_workflow("{}");
        assert!(matches!(workflow.submit(&dispatcher), SubmitOutcome::Dispatched(_)));
        assert_eq!(workflow.submit(&dispatcher), SubmitOutcome::Ignored);
        assert_eq!(dispatcher.requests.borrow().len(), 1);
    }

    #[test]
    fn custom_prompt_is_sent_verbatim() {
        let dispatcher = RecordingDispatcher::default();
        let mut workflow = filled_workflow("[]");
        workflow.form.prompt = "Why does this fail?".to_string();
        workflow.submit(&dispatcher);
        assert_eq!(dispatcher.requests.borrow()[0].user_prompt, "Why does this fail?");
    }

    #[test]
    fn completion_replaces_result_and_hides_it_while_processing() {
        let dispatcher = RecordingDispatcher::default();
        let mut workflow = filled_workflow("{}");

        let SubmitOutcome::Dispatched(first) = workflow.submit(&dispatcher) else {
            panic!("first submission should dispatch");
        };
        let normalized = normalize_debug_response(&json!({"retrieved_documents": ["http://a"]}));
        assert!(workflow.complete(first, normalized));
        assert!(workflow.visible_result().is_some_and(|r| r.requires_documentation));

        let SubmitOutcome::Dispatched(second) = workflow.submit(&dispatcher) else {
            panic!("second submission should dispatch");
        };
        assert!(workflow.visible_result().is_none());

        assert!(workflow.complete(second, normalize_debug_response(&json!({}))));
        let result = workflow.visible_result().expect("result should be visible");
        assert!(!result.requires_documentation);
        assert!(result.documentation_results.is_empty());
    }

    #[test]
    fn failure_keeps_previous_result_and_returns_to_idle() {
        let dispatcher = RecordingDispatcher::default();
        let mut workflow = filled_workflow("{}");

        let SubmitOutcome::Dispatched(first) = workflow.submit(&dispatcher) else {
            panic!("first submission should dispatch");
        };
        let normalized = normalize_debug_response(&json!({"search_phrase": "kept"}));
        workflow.complete(first, normalized);
        let before = workflow.visible_result().cloned();

        let SubmitOutcome::Dispatched(second) = workflow.submit(&dispatcher) else {
            panic!("second submission should dispatch");
        };
        assert!(workflow.fail(second));

        assert!(!workflow.is_processing());
        assert!(workflow.can_submit());
        assert_eq!(workflow.notice(), Some(Notice::RequestFailed));
        assert_eq!(workflow.visible_result().cloned(), before);

        workflow.dismiss_notice();
        assert!(workflow.notice().is_none());
    }

    #[test]
    fn stale_completion_is_dropped() {
        let dispatcher = RecordingDispatcher::default();
        let mut workflow = filled_workflow("{}");
        workflow.submit(&dispatcher);

        assert!(!workflow.complete(uuid::Uuid::new_v4(), normalize_debug_response(&json!({}))));
        assert!(!workflow.fail(uuid::Uuid::new_v4()));
        assert!(workflow.is_processing());
        assert!(workflow.notice().is_none());
    }
}

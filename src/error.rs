use reqwest::StatusCode;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    AnalyzeError,
    SubmitDocuments,
}

impl Step {
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::AnalyzeError => "analyze_error",
            Self::SubmitDocuments => "submit_documents",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// Input rejected before anything is sent.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("stack trace is not valid JSON: {0}")]
    InvalidStackTrace(#[source] serde_json::Error),
}

/// Failure of the two-step service exchange.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{step} request failed: {source}")]
    Transport {
        step: Step,
        #[source]
        source: reqwest::Error,
    },
    #[error("{step} request returned {status}")]
    Status { step: Step, status: StatusCode },
    #[error("submit_documents response is not valid JSON: {source}")]
    Decode {
        #[source]
        source: reqwest::Error,
    },
    #[error("session {session_id} expired before submit_documents")]
    SessionExpired { session_id: String },
    #[error("http client setup failed: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

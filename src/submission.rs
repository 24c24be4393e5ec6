use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scheduler::{millis, Scheduler};
use crate::validation::RentalRequest;

pub const RENTAL_ENDPOINT: &str = "/api/rental";
pub const SIMULATED_LATENCY_MS: u64 = 1_500;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
}

impl SubmissionResponse {
    pub fn accepted() -> Self {
        Self {
            ok: true,
            error_reason: None,
        }
    }

    pub fn rejected(reason: &str) -> Self {
        Self {
            ok: false,
            error_reason: Some(reason.to_string()),
        }
    }

    /// A body that says `ok: false` is a failure even on a 2xx status.
    pub fn into_result(self) -> Result<Self, SubmissionError> {
        if self.ok {
            Ok(self)
        } else {
            Err(SubmissionError::Rejected(
                self.error_reason.unwrap_or_else(|| "unknown".to_string()),
            ))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unreadable response: {0}")]
    Decode(String),
}

impl SubmissionError {
    pub fn class(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "rejected",
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
        }
    }
}

pub type SubmissionOutcome = Result<SubmissionResponse, SubmissionError>;
pub type SubmissionCallback = Box<dyn FnOnce(SubmissionOutcome)>;

/// Where a rental request goes once it passed validation. `on_done` is
/// called exactly once, later, on the page thread.
pub trait SubmissionBackend {
    fn submit(&self, request: RentalRequest, on_done: SubmissionCallback);
}

/// Stands in for a server: answers after a fixed delay.
pub struct SimulatedBackend {
    scheduler: Rc<dyn Scheduler>,
    latency: Duration,
    failure: Option<String>,
}

impl SimulatedBackend {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            latency: millis(SIMULATED_LATENCY_MS),
            failure: None,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn failing(mut self, reason: &str) -> Self {
        self.failure = Some(reason.to_string());
        self
    }
}

impl SubmissionBackend for SimulatedBackend {
    fn submit(&self, _request: RentalRequest, on_done: SubmissionCallback) {
        let failure = self.failure.clone();
        self.scheduler.schedule(
            self.latency,
            Box::new(move || {
                let response = match failure {
                    Some(reason) => SubmissionResponse::rejected(&reason),
                    None => SubmissionResponse::accepted(),
                };
                on_done(response.into_result());
            }),
        );
    }
}

#[cfg(target_arch = "wasm32")]
pub use http::HttpBackend;

#[cfg(target_arch = "wasm32")]
mod http {
    use gloo_net::http::Request;
    use wasm_bindgen_futures::spawn_local;

    use super::*;

    pub struct HttpBackend {
        endpoint: String,
    }

    impl HttpBackend {
        pub fn new(endpoint: &str) -> Self {
            Self {
                endpoint: endpoint.to_string(),
            }
        }
    }

    async fn post_rental(endpoint: &str, request: &RentalRequest) -> SubmissionOutcome {
        let response = Request::post(endpoint)
            .json(request)
            .map_err(|error| SubmissionError::Transport(error.to_string()))?
            .send()
            .await
            .map_err(|error| SubmissionError::Transport(error.to_string()))?;

        let payload = response
            .json::<SubmissionResponse>()
            .await
            .map_err(|error| SubmissionError::Decode(error.to_string()))?;

        payload.into_result()
    }

    impl SubmissionBackend for HttpBackend {
        fn submit(&self, request: RentalRequest, on_done: SubmissionCallback) {
            let endpoint = self.endpoint.clone();
            spawn_local(async move {
                on_done(post_rental(&endpoint, &request).await);
            });
        }
    }
}

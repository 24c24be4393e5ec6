use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;

use crate::notify::{NotificationKind, Notifier};
use crate::scheduler::{millis, Scheduler, TaskId};
use crate::submission::{SubmissionBackend, SubmissionOutcome};
use crate::telemetry::{log_event, LogLevel};
use crate::validation::{end_date_min, validate_rental, RentalRequest, ValidationError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Sending,
    Sent,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonTone {
    Normal,
    Success,
    Error,
}

impl ButtonTone {
    pub fn class(self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::Success => Some("is-success"),
            Self::Error => Some("is-error"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonState {
    pub label: String,
    pub disabled: bool,
    pub busy: bool,
    pub tone: ButtonTone,
}

impl ButtonState {
    pub fn idle(label: &str) -> Self {
        Self {
            label: label.to_string(),
            disabled: false,
            busy: false,
            tone: ButtonTone::Normal,
        }
    }

    fn sending() -> Self {
        Self {
            label: "Sending...".to_string(),
            disabled: true,
            busy: true,
            tone: ButtonTone::Normal,
        }
    }

    fn sent() -> Self {
        Self {
            label: "Sent!".to_string(),
            disabled: true,
            busy: false,
            tone: ButtonTone::Success,
        }
    }

    fn failed() -> Self {
        Self {
            label: "Error".to_string(),
            disabled: true,
            busy: false,
            tone: ButtonTone::Error,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormTimings {
    pub result_hold: Duration,
    pub shake: Duration,
}

impl Default for FormTimings {
    fn default() -> Self {
        Self {
            result_hold: millis(2_000),
            shake: millis(1_000),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormMessages {
    pub submit_label: &'static str,
    pub success: &'static str,
    pub failure: &'static str,
    pub reset: &'static str,
}

impl Default for FormMessages {
    fn default() -> Self {
        Self {
            submit_label: "Send Request",
            success: "Rental request sent! Our team will contact you within 1 hour.",
            failure: "Failed to send your request. Please try again.",
            reset: "The form has been reset. Please fill it in again.",
        }
    }
}

pub trait FormSurface {
    fn set_button(&self, state: &ButtonState);
    fn set_shaking(&self, on: bool);
    fn reset_fields(&self);
    fn set_end_date_min(&self, value: &str);
    fn show_success_panel(&self, on: bool);
    fn celebrate(&self);
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("a submission is already in progress")]
    Busy,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

struct FlowInner {
    surface: Rc<dyn FormSurface>,
    backend: Rc<dyn SubmissionBackend>,
    notifier: Notifier,
    scheduler: Rc<dyn Scheduler>,
    timings: FormTimings,
    messages: FormMessages,
    phase: Cell<SubmitPhase>,
    shake_timer: Cell<Option<TaskId>>,
}

#[derive(Clone)]
pub struct SubmitFlow {
    inner: Rc<FlowInner>,
}

impl SubmitFlow {
    pub fn new(
        surface: Rc<dyn FormSurface>,
        backend: Rc<dyn SubmissionBackend>,
        notifier: Notifier,
        scheduler: Rc<dyn Scheduler>,
        timings: FormTimings,
        messages: FormMessages,
    ) -> Self {
        Self {
            inner: Rc::new(FlowInner {
                surface,
                backend,
                notifier,
                scheduler,
                timings,
                messages,
                phase: Cell::new(SubmitPhase::Idle),
                shake_timer: Cell::new(None),
            }),
        }
    }

    pub fn phase(&self) -> SubmitPhase {
        self.inner.phase.get()
    }

    pub fn idle_button(&self) -> ButtonState {
        ButtonState::idle(self.inner.messages.submit_label)
    }

    pub fn submit(&self, request: &RentalRequest, today: NaiveDate) -> Result<(), FormError> {
        let inner = &self.inner;
        if inner.phase.get() != SubmitPhase::Idle {
            return Err(FormError::Busy);
        }

        let valid = match validate_rental(request, today) {
            Ok(valid) => valid,
            Err(error) => {
                log_event(
                    LogLevel::Info,
                    "rental_request_invalid",
                    serde_json::json!({ "reason": error.code() }),
                );
                inner.notifier.notify(&error.to_string(), NotificationKind::Warning);
                inner.shake();
                return Err(error.into());
            }
        };

        inner.phase.set(SubmitPhase::Sending);
        inner.surface.set_button(&ButtonState::sending());
        log_event(
            LogLevel::Info,
            "submission_started",
            serde_json::json!({
                "product": valid.request.product.as_str(),
                "nights": valid.nights(),
            }),
        );

        let weak = Rc::downgrade(inner);
        inner.backend.submit(
            valid.request,
            Box::new(move |outcome| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_outcome(outcome, today);
                }
            }),
        );

        Ok(())
    }

    /// Clears the form. Ignored while a submission is in flight.
    pub fn reset(&self, today: NaiveDate) -> bool {
        let inner = &self.inner;
        if inner.phase.get() != SubmitPhase::Idle {
            return false;
        }

        inner.clear_fields(today);
        inner
            .notifier
            .notify(inner.messages.reset, NotificationKind::Warning);
        inner.shake();
        true
    }

    /// Leaves the success panel for a fresh, empty form.
    pub fn new_request(&self, today: NaiveDate) {
        self.inner.surface.show_success_panel(false);
        self.inner.clear_fields(today);
    }

    pub fn on_start_date_changed(&self, start_date: &str, today: NaiveDate) -> String {
        let minimum = end_date_min(start_date, today);
        self.inner.surface.set_end_date_min(&minimum);
        minimum
    }
}

impl FlowInner {
    fn clear_fields(&self, today: NaiveDate) {
        self.surface.reset_fields();
        self.surface.set_end_date_min(&end_date_min("", today));
    }

    fn shake(self: &Rc<Self>) {
        if let Some(previous) = self.shake_timer.take() {
            self.scheduler.cancel(previous);
        }

        self.surface.set_shaking(true);
        let weak: Weak<Self> = Rc::downgrade(self);
        let timer = self.scheduler.schedule(
            self.timings.shake,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.shake_timer.set(None);
                    inner.surface.set_shaking(false);
                }
            }),
        );
        self.shake_timer.set(Some(timer));
    }

    fn on_outcome(self: &Rc<Self>, outcome: SubmissionOutcome, today: NaiveDate) {
        if self.phase.get() != SubmitPhase::Sending {
            return;
        }

        let succeeded = match outcome {
            Ok(_) => {
                log_event(LogLevel::Info, "submission_succeeded", serde_json::json!({}));
                self.phase.set(SubmitPhase::Sent);
                self.surface.set_button(&ButtonState::sent());
                self.surface.celebrate();
                true
            }
            Err(error) => {
                log_event(
                    LogLevel::Warn,
                    "submission_failed",
                    serde_json::json!({
                        "error_class": error.class(),
                        "message": error.to_string(),
                    }),
                );
                self.phase.set(SubmitPhase::Failed);
                self.surface.set_button(&ButtonState::failed());
                false
            }
        };

        let weak: Weak<Self> = Rc::downgrade(self);
        self.scheduler.schedule(
            self.timings.result_hold,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.settle(succeeded, today);
                }
            }),
        );
    }

    fn settle(&self, succeeded: bool, today: NaiveDate) {
        self.phase.set(SubmitPhase::Idle);
        self.surface
            .set_button(&ButtonState::idle(self.messages.submit_label));

        if succeeded {
            self.clear_fields(today);
            self.surface.show_success_panel(true);
            self.notifier
                .notify(self.messages.success, NotificationKind::Success);
        } else {
            self.notifier
                .notify(self.messages.failure, NotificationKind::Error);
        }
    }
}

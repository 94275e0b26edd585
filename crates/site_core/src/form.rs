//! Submission state machine for the contact and newsletter forms.
//!
//! `idle -> submitting -> succeeded | failed`. Fields stay editable except
//! while a submission is in flight, and at most one submission per form is in
//! flight at a time: `begin_submit` hands out a ticket only when none is
//! outstanding. Success clears the fields; failure keeps them so the visitor
//! can correct and resend.

use std::collections::BTreeMap;

use content_client::ContentService;
use serde::Serialize;
use shared::{domain::SubmissionStatus, error::FetchError, protocol::RecordPayload};
use thiserror::Error;
use tracing::{error, info, warn};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields.";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Contact,
    Newsletter,
}

impl FormKind {
    pub fn collection(self) -> &'static str {
        match self {
            Self::Contact => "contacts",
            Self::Newsletter => "newsletters",
        }
    }

    pub fn field_names(self) -> &'static [&'static str] {
        match self {
            Self::Contact => &["name", "email", "message"],
            Self::Newsletter => &["email"],
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Self::Contact => "Message sent successfully!",
            Self::Newsletter => "Subscribed!",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Contact => "Failed to send message. Please try again.",
            Self::Newsletter => "Subscription failed.",
        }
    }

    fn initial_fields(self) -> BTreeMap<String, String> {
        self.field_names()
            .iter()
            .map(|name| (name.to_string(), String::new()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("form has no field named '{0}'")]
    UnknownField(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingField(&'static str),
    InvalidEmail,
}

impl ValidationIssue {
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingField(_) => REQUIRED_FIELDS_MESSAGE,
            Self::InvalidEmail => INVALID_EMAIL_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub fields: BTreeMap<String, String>,
    pub submission: SubmissionStatus,
    pub message: Option<String>,
}

/// Proof that a submission was started; carries the field snapshot to send.
#[derive(Debug)]
pub struct SubmissionTicket {
    id: u64,
    payload: RecordPayload,
}

impl SubmissionTicket {
    pub fn payload(&self) -> &RecordPayload {
        &self.payload
    }
}

#[derive(Debug)]
pub enum BeginSubmit {
    /// Another submission is in flight or the form is disposed; nothing changed.
    InFlight,
    Rejected(ValidationIssue),
    Started(SubmissionTicket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored,
    Rejected(ValidationIssue),
    Succeeded,
    Failed,
}

#[derive(Debug)]
pub struct FormMachine {
    kind: FormKind,
    state: FormState,
    in_flight: Option<u64>,
    next_ticket: u64,
    disposed: bool,
}

impl FormMachine {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            state: FormState {
                fields: kind.initial_fields(),
                submission: SubmissionStatus::Idle,
                message: None,
            },
            in_flight: None,
            next_ticket: 0,
            disposed: false,
        }
    }

    pub fn contact() -> Self {
        Self::new(FormKind::Contact)
    }

    pub fn newsletter() -> Self {
        Self::new(FormKind::Newsletter)
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn status(&self) -> SubmissionStatus {
        self.state.submission
    }

    pub fn message(&self) -> Option<&str> {
        self.state.message.as_deref()
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.state.fields.get(name).map(String::as_str)
    }

    pub fn is_submitting(&self) -> bool {
        self.state.submission == SubmissionStatus::Submitting
    }

    /// Updates exactly one field. The status is left as it is, so a form that
    /// just failed stays `failed` while the visitor corrects it.
    pub fn edit(&mut self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        if self.is_submitting() {
            return Err(FormError::SubmissionInFlight);
        }
        let slot = self
            .state
            .fields
            .get_mut(field)
            .ok_or_else(|| FormError::UnknownField(field.to_string()))?;
        *slot = value.into();
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationIssue> {
        for &name in self.kind.field_names() {
            let value = self.field(name).unwrap_or_default();
            if value.trim().is_empty() {
                return Err(ValidationIssue::MissingField(name));
            }
            if name == "email" && !looks_like_email(value) {
                return Err(ValidationIssue::InvalidEmail);
            }
        }
        Ok(())
    }

    /// Starts a submission. A disposed form never starts one.
    pub fn begin_submit(&mut self) -> BeginSubmit {
        if self.disposed || self.is_submitting() {
            return BeginSubmit::InFlight;
        }
        if let Err(issue) = self.validate() {
            self.state.submission = SubmissionStatus::Idle;
            self.state.message = Some(issue.message().to_string());
            return BeginSubmit::Rejected(issue);
        }

        self.next_ticket += 1;
        let id = self.next_ticket;
        self.in_flight = Some(id);
        self.state.submission = SubmissionStatus::Submitting;
        self.state.message = None;
        BeginSubmit::Started(SubmissionTicket {
            id,
            payload: self.state.fields.clone(),
        })
    }

    /// Applies the write result for `ticket`. Results for a disposed form or a
    /// ticket that is not the one in flight are discarded.
    pub fn complete(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<(), FetchError>,
    ) -> Option<SubmitOutcome> {
        if self.disposed || self.in_flight != Some(ticket.id) {
            warn!(
                form = ?self.kind,
                ticket = ticket.id,
                "form: discarding result for stale submission"
            );
            return None;
        }
        self.in_flight = None;

        match result {
            Ok(()) => {
                info!(form = ?self.kind, "form: submission succeeded");
                self.state.fields = self.kind.initial_fields();
                self.state.submission = SubmissionStatus::Succeeded;
                self.state.message = Some(self.kind.success_message().to_string());
                Some(SubmitOutcome::Succeeded)
            }
            Err(err) => {
                error!(form = ?self.kind, error = %err, "form: submission failed");
                self.state.submission = SubmissionStatus::Failed;
                self.state.message = Some(self.kind.failure_message().to_string());
                Some(SubmitOutcome::Failed)
            }
        }
    }

    pub async fn submit(&mut self, service: &dyn ContentService) -> SubmitOutcome {
        let ticket = match self.begin_submit() {
            BeginSubmit::InFlight => return SubmitOutcome::Ignored,
            BeginSubmit::Rejected(issue) => return SubmitOutcome::Rejected(issue),
            BeginSubmit::Started(ticket) => ticket,
        };
        let result = service
            .submit_record(self.kind.collection(), ticket.payload())
            .await;
        self.complete(ticket, result)
            .unwrap_or(SubmitOutcome::Ignored)
    }

    /// Marks the form as gone; any in-flight result is dropped on arrival.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }
}

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;

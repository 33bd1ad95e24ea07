//! Contact form: validation, bot trap, submission state and notices.
//!
//! The backend is not wired up yet. [`SimulatedSubmitter`] stands in for it
//! and always succeeds.

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use folio_protocol::Severity;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NAME_MIN_CHARS: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 20;

/// Latency the simulated backend pretends to have.
pub const SIMULATED_LATENCY: Duration = Duration::from_secs(1);

/// How long a notice stays up before hiding itself.
pub const NOTICE_AUTO_HIDE: Duration = Duration::from_millis(6000);

pub const SUCCESS_MESSAGE: &str = "Message sent successfully! I'll get back to you soon.";
pub const FAILURE_MESSAGE: &str = "Failed to send message. Please try again or email me directly.";

#[allow(clippy::expect_used)]
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("email pattern compiles")
});

/// Raw form input, including the hidden honeypot field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub honeypot: String,
}

/// A validated message, ready for the backend. The honeypot never leaves
/// the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Message => "Message",
        }
    }
}

/// Inline, per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(Field, &'static str)>,
}

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| *message)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.errors.iter().copied()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {message}", field.label())?;
            first = false;
        }
        Ok(())
    }
}

pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL.is_match(email)
}

impl ContactFormData {
    /// Check every field; lengths count characters, not bytes.
    pub fn validate(&self) -> Result<ContactMessage, FieldErrors> {
        let mut errors = Vec::new();
        if self.name.chars().count() < NAME_MIN_CHARS {
            errors.push((Field::Name, "Name must be at least 2 characters"));
        }
        if !is_valid_email(&self.email) {
            errors.push((Field::Email, "Please enter a valid email address"));
        }
        if self.message.chars().count() < MESSAGE_MIN_CHARS {
            errors.push((Field::Message, "Message must be at least 20 characters"));
        }
        if !errors.is_empty() {
            return Err(FieldErrors { errors });
        }
        Ok(ContactMessage {
            name: self.name.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
        })
    }

    pub fn is_bot(&self) -> bool {
        !self.honeypot.is_empty()
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Message => &mut self.message,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("network error: {0}")]
    Network(String),
    #[error("backend rejected the message: {0}")]
    Rejected(String),
}

/// Backend contact-submission collaborator.
pub trait ContactSubmitter {
    fn submit(&mut self, message: &ContactMessage) -> Result<(), SubmitError>;
}

/// Stand-in backend: records and accepts every message. Hosts show the
/// sending state for [`SIMULATED_LATENCY`] before completing.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSubmitter {
    sent: Vec<ContactMessage>,
}

impl SimulatedSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> &[ContactMessage] {
        &self.sent
    }
}

impl ContactSubmitter for SimulatedSubmitter {
    fn submit(&mut self, message: &ContactMessage) -> Result<(), SubmitError> {
        log::info!("simulated contact submission from {}", message.email);
        self.sent.push(message.clone());
        Ok(())
    }
}

/// Transient, dismissible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: &'static str,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; errors are shown inline and nothing was sent.
    Invalid,
    /// Honeypot filled: dropped with no visible effect.
    BotDropped,
    /// A submission is already in flight.
    Busy,
    Sent,
    Failed,
}

/// First half of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStep {
    /// Validated; hand this to the backend, then call
    /// [`ContactForm::finish_submit`].
    Send(ContactMessage),
    /// Nothing to send.
    Stopped(SubmitOutcome),
}

#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    data: ContactFormData,
    errors: FieldErrors,
    attempted: bool,
    submitting: bool,
    notice: Option<Notice>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &ContactFormData {
        &self.data
    }

    /// Edit a field. After a failed attempt, errors are re-checked on every
    /// edit so they clear as the user fixes them.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        if self.submitting {
            return;
        }
        *self.data.field_mut(field) = value.into();
        if self.attempted {
            self.errors = self.data.validate().err().unwrap_or_default();
        }
    }

    /// Fill the hidden field. Only bots do this.
    pub fn set_honeypot(&mut self, value: impl Into<String>) {
        self.data.honeypot = value.into();
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Fields are disabled while a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn begin_submit(&mut self) -> SubmitStep {
        if self.submitting {
            return SubmitStep::Stopped(SubmitOutcome::Busy);
        }
        if self.data.is_bot() {
            log::info!("contact submission dropped: honeypot filled");
            return SubmitStep::Stopped(SubmitOutcome::BotDropped);
        }
        self.attempted = true;
        match self.data.validate() {
            Ok(message) => {
                self.errors = FieldErrors::default();
                self.submitting = true;
                SubmitStep::Send(message)
            }
            Err(errors) => {
                log::debug!("contact form invalid: {errors}");
                self.errors = errors;
                SubmitStep::Stopped(SubmitOutcome::Invalid)
            }
        }
    }

    /// Second half: apply the backend's answer. Success clears the form;
    /// failure keeps what the user typed so they can retry.
    pub fn finish_submit(&mut self, result: Result<(), SubmitError>) -> SubmitOutcome {
        self.submitting = false;
        match result {
            Ok(()) => {
                self.data = ContactFormData::default();
                self.errors = FieldErrors::default();
                self.attempted = false;
                self.notice = Some(Notice {
                    message: SUCCESS_MESSAGE,
                    severity: Severity::Success,
                });
                SubmitOutcome::Sent
            }
            Err(e) => {
                log::warn!("contact submission failed: {e}");
                self.notice = Some(Notice {
                    message: FAILURE_MESSAGE,
                    severity: Severity::Error,
                });
                SubmitOutcome::Failed
            }
        }
    }

    /// Validate, send, and apply the result in one go.
    pub fn submit(&mut self, submitter: &mut dyn ContactSubmitter) -> SubmitOutcome {
        match self.begin_submit() {
            SubmitStep::Send(message) => {
                let result = submitter.submit(&message);
                self.finish_submit(result)
            }
            SubmitStep::Stopped(outcome) => outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offline;

    impl ContactSubmitter for Offline {
        fn submit(&mut self, _message: &ContactMessage) -> Result<(), SubmitError> {
            Err(SubmitError::Network("connection refused".into()))
        }
    }

    fn filled(message: &str) -> ContactForm {
        let mut form = ContactForm::new();
        form.set(Field::Name, "Al");
        form.set(Field::Email, "a@b.com");
        form.set(Field::Message, message);
        form
    }

    #[test]
    fn short_message_fails_then_longer_one_succeeds() {
        let mut backend = SimulatedSubmitter::new();
        let mut form = filled("short");

        assert_eq!(form.submit(&mut backend), SubmitOutcome::Invalid);
        assert_eq!(
            form.errors().get(Field::Message),
            Some("Message must be at least 20 characters")
        );
        assert_eq!(form.errors().len(), 1);
        assert!(backend.sent().is_empty());

        form.set(Field::Message, "Hello there, let's build something.");
        assert!(form.errors().is_empty());
        assert_eq!(form.submit(&mut backend), SubmitOutcome::Sent);
        for field in Field::ALL {
            assert!(form.data().field(field).is_empty());
        }
        assert_eq!(backend.sent().len(), 1);
        assert_eq!(
            form.notice().map(|n| n.severity),
            Some(Severity::Success)
        );
    }

    #[test]
    fn message_length_boundary() {
        let mut backend = SimulatedSubmitter::new();
        let mut form = filled(&"x".repeat(19));
        assert_eq!(form.submit(&mut backend), SubmitOutcome::Invalid);
        form.set(Field::Message, "x".repeat(20));
        assert_eq!(form.submit(&mut backend), SubmitOutcome::Sent);
    }

    #[test]
    fn lengths_count_characters() {
        let data = ContactFormData {
            name: "Zé".into(),
            email: "ze@example.org".into(),
            message: "ü".repeat(20),
            honeypot: String::new(),
        };
        assert!(data.validate().is_ok());
    }

    #[test]
    fn all_errors_reported_together() {
        let errors = ContactFormData::default().validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.get(Field::Email),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn email_rules() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@sub.example.io"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@b.c"));
        assert!(!is_valid_email(".a@b.com"));
        assert!(!is_valid_email("a..b@c.com"));
        assert!(!is_valid_email("a.@b.com"));
        assert!(!is_valid_email("no-at-sign.com"));
    }

    #[test]
    fn honeypot_drops_silently() {
        let mut backend = SimulatedSubmitter::new();
        let mut form = filled("This message is certainly long enough.");
        form.set_honeypot("http://spam.example");
        assert_eq!(form.submit(&mut backend), SubmitOutcome::BotDropped);
        assert!(backend.sent().is_empty());
        assert!(form.notice().is_none());
        assert!(form.errors().is_empty());
        assert_eq!(form.data().name, "Al");
    }

    #[test]
    fn failure_keeps_input_and_shows_error() {
        let mut form = filled("This message is certainly long enough.");
        assert_eq!(form.submit(&mut Offline), SubmitOutcome::Failed);
        assert_eq!(form.data().email, "a@b.com");
        let notice = form.notice().unwrap();
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.message, FAILURE_MESSAGE);
        form.dismiss_notice();
        assert!(form.notice().is_none());
    }

    #[test]
    fn fields_locked_while_submitting() {
        let mut form = filled("This message is certainly long enough.");
        let SubmitStep::Send(message) = form.begin_submit() else {
            panic!("expected a message to send");
        };
        assert!(form.is_submitting());
        assert_eq!(form.begin_submit(), SubmitStep::Stopped(SubmitOutcome::Busy));
        form.set(Field::Name, "Changed");
        assert_eq!(form.data().name, "Al");

        let mut backend = SimulatedSubmitter::new();
        let result = backend.submit(&message);
        assert_eq!(form.finish_submit(result), SubmitOutcome::Sent);
        assert!(!form.is_submitting());
    }
}

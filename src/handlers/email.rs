//! Email: a short slot-filling session
//!
//! ```text
//! AwaitRecipient → AwaitSubject → AwaitContent → Send → Done(outcome)
//! ```
//!
//! Any empty answer jumps straight to `Done(Aborted)`. The recipient is
//! validated once all slots are filled, right before sending. Nothing is
//! retried; the user repeats the email command to try again.

use crate::input::{Command, InputResolver};
use crate::services::{CapabilityError, MailTransport, OutgoingEmail};

/// Where an email session currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailState {
    AwaitRecipient,
    AwaitSubject { to: String },
    AwaitContent { to: String, subject: String },
    Send(OutgoingEmail),
    Done(EmailOutcome),
}

/// How an email session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailOutcome {
    Sent { to: String },
    /// The recipient failed local validation
    InvalidRecipient,
    /// The server refused the recipient
    Rejected,
    AuthFailed,
    ServerError(String),
    /// A slot was left empty
    Aborted,
    /// The mail server could not be reached
    Unavailable,
    Unexpected(String),
}

impl EmailOutcome {
    /// The one message spoken when the session ends
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Sent { to } => format!("Email to {to} sent successfully!"),
            Self::InvalidRecipient => {
                "Invalid email format. Please include @ and domain like example.com".to_string()
            }
            Self::Rejected => {
                "The recipient email was rejected. Please check the address.".to_string()
            }
            Self::AuthFailed => "Email login failed. Check your credentials.".to_string(),
            Self::ServerError(detail) => format!("Email server error: {detail}"),
            Self::Aborted => "Email cancelled".to_string(),
            Self::Unavailable => "Email service unavailable".to_string(),
            Self::Unexpected(_) => super::UNEXPECTED.to_string(),
        }
    }
}

impl From<CapabilityError> for EmailOutcome {
    fn from(err: CapabilityError) -> Self {
        match err {
            CapabilityError::RecipientRejected => Self::Rejected,
            CapabilityError::AuthFailed => Self::AuthFailed,
            CapabilityError::ServerError(detail) => Self::ServerError(detail),
            CapabilityError::Unavailable(_) => Self::Unavailable,
            other => Self::Unexpected(other.to_string()),
        }
    }
}

impl EmailState {
    /// Prompt for the slot this state is waiting on
    #[must_use]
    pub const fn prompt(&self) -> Option<&'static str> {
        match self {
            Self::AwaitRecipient => Some("Recipient's email?"),
            Self::AwaitSubject { .. } => Some("Email subject?"),
            Self::AwaitContent { .. } => Some("Message content?"),
            Self::Send(_) | Self::Done(_) => None,
        }
    }

    /// Fill the awaited slot with `answer` and move on
    ///
    /// States that are not waiting on a slot are returned unchanged.
    #[must_use]
    pub fn fill(self, answer: &Command) -> Self {
        if answer.is_empty() && self.prompt().is_some() {
            return Self::Done(EmailOutcome::Aborted);
        }

        match self {
            Self::AwaitRecipient => Self::AwaitSubject {
                to: spoken_address(answer.as_str()),
            },
            Self::AwaitSubject { to } => Self::AwaitContent {
                to,
                subject: answer.to_string(),
            },
            Self::AwaitContent { to, subject } => {
                if is_valid_email(&to) {
                    Self::Send(OutgoingEmail {
                        to,
                        subject,
                        body: answer.to_string(),
                    })
                } else {
                    tracing::info!(to, "invalid recipient address");
                    Self::Done(EmailOutcome::InvalidRecipient)
                }
            }
            done @ (Self::Send(_) | Self::Done(_)) => done,
        }
    }
}

/// Basic address check: an `@`, a non-empty local part, a `.` in the domain
#[must_use]
pub fn is_valid_email(address: &str) -> bool {
    let Some((local, _)) = address.split_once('@') else {
        return false;
    };
    let domain = address.rsplit_once('@').map_or("", |(_, d)| d);
    !local.is_empty() && domain.contains('.')
}

/// Rewrite a dictated address ("jane at example dot com") into written form
#[must_use]
pub fn spoken_address(answer: &str) -> String {
    let written = format!(" {} ", answer.trim())
        .replace(" at ", "@")
        .replace(" dot ", ".");
    written.split_whitespace().collect()
}

/// Run one email session to completion
pub async fn run(io: &mut InputResolver, mail: Option<&dyn MailTransport>) -> EmailOutcome {
    let Some(mail) = mail else {
        let outcome = EmailOutcome::Unavailable;
        io.speak(&outcome.message()).await;
        return outcome;
    };

    let mut state = EmailState::AwaitRecipient;
    let outcome = loop {
        state = match state {
            EmailState::Done(outcome) => break outcome,
            EmailState::Send(email) => {
                tracing::debug!(to = %email.to, "sending email");
                break match mail.send(&email).await {
                    Ok(()) => EmailOutcome::Sent { to: email.to },
                    Err(e) => EmailOutcome::from(e),
                };
            }
            slot => {
                let prompt = slot.prompt().unwrap_or_default();
                let answer = io.ask(prompt).await;
                slot.fill(&answer)
            }
        };
    };

    if let EmailOutcome::Unexpected(detail) = &outcome {
        tracing::error!(detail, "email failed unexpectedly");
    }
    io.speak(&outcome.message()).await;
    outcome
}

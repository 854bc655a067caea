//! Outgoing mail over SMTP with STARTTLS

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;

use super::{CapabilityError, HTTP_TIMEOUT, MailTransport, OutgoingEmail};
use crate::config::MailConfig;
use crate::{Error, Result};

/// Sends mail through an authenticated SMTP relay
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a transport for the configured account
    ///
    /// No connection is made until the first send.
    ///
    /// # Errors
    ///
    /// Returns error if the account is not a valid address or the relay
    /// cannot be configured
    pub fn new(config: &MailConfig) -> Result<Self> {
        let from: Mailbox = config
            .user
            .parse()
            .map_err(|e| Error::Mail(format!("invalid sender address {}: {e}", config.user)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| Error::Mail(e.to_string()))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.expose_secret().to_string(),
            ))
            .timeout(Some(HTTP_TIMEOUT))
            .build();

        tracing::debug!(
            host = %config.smtp_host,
            port = config.smtp_port,
            "smtp transport configured"
        );

        Ok(Self { transport, from })
    }
}

#[async_trait(?Send)]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> std::result::Result<(), CapabilityError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|_| CapabilityError::RecipientRejected)?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| CapabilityError::Unexpected(e.to_string()))?;

        match self.transport.send(message).await {
            Ok(response) => {
                tracing::info!(to = %email.to, code = %response.code(), "email sent");
                Ok(())
            }
            Err(e) => {
                let code = e.status().map(|c| c.to_string());
                tracing::warn!(to = %email.to, code = ?code, error = %e, "email send failed");
                Err(classify_smtp(code.as_deref(), &e.to_string()))
            }
        }
    }
}

/// Map an SMTP reply code to a capability error
///
/// Without a reply code the server was never reached.
fn classify_smtp(code: Option<&str>, detail: &str) -> CapabilityError {
    match code {
        None => CapabilityError::Unavailable(detail.to_string()),
        Some("530" | "534" | "535") => CapabilityError::AuthFailed,
        Some("501" | "550" | "551" | "553") => CapabilityError::RecipientRejected,
        Some(other) => CapabilityError::ServerError(
            smtp_reason(other).map_or_else(|| detail.to_string(), str::to_string),
        ),
    }
}

/// Readable text for common SMTP failure codes
#[must_use]
pub fn smtp_reason(code: &str) -> Option<&'static str> {
    match code {
        "421" => Some("Service not available"),
        "451" => Some("Local error in processing"),
        "452" => Some("Insufficient system storage"),
        "552" => Some("Message size exceeds storage allocation"),
        "554" => Some("Transaction failed"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_auth_and_recipient_codes() {
        assert_eq!(classify_smtp(Some("535"), "bad creds"), CapabilityError::AuthFailed);
        assert_eq!(classify_smtp(Some("550"), "no mailbox"), CapabilityError::RecipientRejected);
        assert_eq!(classify_smtp(Some("553"), "bad address"), CapabilityError::RecipientRejected);
    }

    #[test]
    fn test_classify_server_errors() {
        assert_eq!(
            classify_smtp(Some("554"), "5.7.1 rejected"),
            CapabilityError::ServerError("Transaction failed".to_string())
        );
        assert_eq!(
            classify_smtp(Some("499"), "weird reply"),
            CapabilityError::ServerError("weird reply".to_string())
        );
    }

    #[test]
    fn test_classify_without_code() {
        assert!(matches!(
            classify_smtp(None, "connection refused"),
            CapabilityError::Unavailable(_)
        ));
    }

    #[test]
    fn test_invalid_sender_is_config_error() {
        let config = MailConfig {
            user: "not an address".to_string(),
            password: secrecy::SecretString::from("pw"),
            smtp_host: "localhost".to_string(),
            smtp_port: 2525,
        };
        assert!(matches!(SmtpMailer::new(&config), Err(Error::Mail(_))));
    }
}

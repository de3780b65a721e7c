use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{error, info, instrument};

use crate::config::email_conf::SmtpSecurity;
use crate::config::{ConfigError, EmailConfig};

/// Email service errors
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("SMTP error: {0}")]
    SmtpError(String),

    #[error("Message building error: {0}")]
    MessageError(String),

    #[error("Address error: {0}")]
    AddressError(String),
}

impl From<ConfigError> for EmailError {
    fn from(err: ConfigError) -> Self {
        EmailError::ConfigError(err.to_string())
    }
}

/// Contents of a password reset email
#[derive(Debug, Clone)]
pub struct PasswordResetEmail {
    pub to: String,
    pub user_name: String,
    pub reset_url: String,
    pub expires_in_minutes: u64,
}

/// Outbound mail used by the auth flows
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_password_reset_email(&self, email: PasswordResetEmail) -> Result<(), EmailError>;
}

/// SMTP email service implementation
pub struct SmtpEmailService {
    pub config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailService {
    #[instrument(skip(config), fields(host = %config.smtp_host, port = config.smtp_port))]
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        info!("Initializing SMTP email service");

        config.validate()?;

        let mut transport_builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            .port(config.smtp_port)
            .timeout(Some(std::time::Duration::from_secs(config.connection_timeout_secs)));

        let tls = match config.security {
            SmtpSecurity::None => Tls::None,
            SmtpSecurity::StartTls | SmtpSecurity::Tls => {
                let parameters = TlsParameters::new(config.smtp_host.clone())
                    .map_err(|e| EmailError::ConfigError(format!("TLS configuration error: {}", e)))?;
                if config.security == SmtpSecurity::StartTls {
                    Tls::Required(parameters)
                } else {
                    Tls::Wrapper(parameters)
                }
            }
        };
        transport_builder = transport_builder.tls(tls);

        if config.has_credentials() {
            transport_builder = transport_builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        let transport = transport_builder.build();

        info!("SMTP email service initialized successfully");
        Ok(Self { config, transport })
    }

    fn build_message(&self, to: &str, subject: &str, text: String, html: String) -> Result<Message, EmailError> {
        let from_mailbox: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| EmailError::AddressError(format!("Invalid from address: {}", e)))?;

        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|e| EmailError::AddressError(format!("Invalid to address: {}", e)))?;

        Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(SinglePart::builder().header(ContentType::TEXT_PLAIN).body(text))
                    .singlepart(SinglePart::builder().header(ContentType::TEXT_HTML).body(html)),
            )
            .map_err(|e| EmailError::MessageError(format!("Failed to build multipart message: {}", e)))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailService {
    #[instrument(skip(self, email), fields(to = %email.to))]
    async fn send_password_reset_email(&self, email: PasswordResetEmail) -> Result<(), EmailError> {
        info!("Sending password reset email");

        let text = password_reset_text(&email);
        let html = password_reset_html(&email);
        let message = self.build_message(&email.to, "Password reset token", text, html)?;

        self.transport.send(message).await.map_err(|e| {
            error!("Failed to send email: {}", e);
            EmailError::SmtpError(format!("Failed to send email: {}", e))
        })?;

        info!("Password reset email sent successfully");
        Ok(())
    }
}

pub fn password_reset_text(email: &PasswordResetEmail) -> String {
    format!(
        r#"Hello {user_name},

You are receiving this email because you (or someone else) has requested the reset of a password for your DevCamper account.

Please make a PUT request to:

{reset_url}

with a JSON body containing your new "password". The link expires in {minutes} minutes.

If you did not request a password reset, ignore this email and your password will remain unchanged.

The DevCamper Team"#,
        user_name = email.user_name,
        reset_url = email.reset_url,
        minutes = email.expires_in_minutes,
    )
}

pub fn password_reset_html(email: &PasswordResetEmail) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Password reset token</title>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }}
        .url {{ word-break: break-all; background-color: #f8f9fa; padding: 10px; border-radius: 4px; font-family: monospace; }}
        .footer {{ font-size: 12px; color: #6c757d; }}
    </style>
</head>
<body>
    <h2>DevCamper password reset</h2>
    <p>Hello {user_name},</p>
    <p>You are receiving this email because you (or someone else) has requested the reset of a password.
       Please make a <strong>PUT</strong> request with your new password to:</p>
    <p class="url">{reset_url}</p>
    <p>The link expires in {minutes} minutes.</p>
    <p>If you did not request a password reset, ignore this email and your password will remain unchanged.</p>
    <p class="footer">This is an automated message. Please do not reply to this email.</p>
</body>
</html>"#,
        user_name = html_escape::encode_text(&email.user_name),
        reset_url = html_escape::encode_text(&email.reset_url),
        minutes = email.expires_in_minutes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reset_email(name: &str) -> PasswordResetEmail {
        PasswordResetEmail {
            to: "john@gmail.com".to_string(),
            user_name: name.to_string(),
            reset_url: "http://localhost:5000/api/v1/auth/resetpassword/abc123".to_string(),
            expires_in_minutes: 10,
        }
    }

    #[test]
    fn test_text_template_contains_url_and_expiry() {
        let text = password_reset_text(&reset_email("John"));
        assert!(text.contains("http://localhost:5000/api/v1/auth/resetpassword/abc123"));
        assert!(text.contains("10 minutes"));
        assert!(text.contains("Hello John"));
    }

    #[test]
    fn test_html_template_escapes_user_name() {
        let html = password_reset_html(&reset_email("<script>alert(1)</script>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_service_builds_with_test_config() {
        let service = SmtpEmailService::new(EmailConfig::from_test_env()).unwrap();
        let message = service.build_message("john@gmail.com", "Hi", "text".into(), "<p>html</p>".into());
        assert!(message.is_ok());
        assert!(service.build_message("not an address", "Hi", "t".into(), "h".into()).is_err());
    }
}

use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::error::{AppError, AppResult};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// Transactional email over the Resend HTTP API. Without an API key the
/// message is only logged.
#[derive(Clone)]
pub struct Mailer {
    http: Client,
    config: MailConfig,
}

impl Mailer {
    pub fn new(http: Client, config: MailConfig) -> Self {
        Self { http, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub async fn send(&self, email: &OutgoingEmail) -> AppResult<()> {
        let Some(api_key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) else {
            info!(
                to = %email.to,
                subject = %email.subject,
                "Email delivery not configured, message: {}",
                email.text
            );
            return Ok(());
        };

        let url = format!("{}/emails", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .json(&SendEmailBody {
                from: &self.config.from,
                to: [&email.to],
                subject: &email.subject,
                text: &email.text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(format!(
                "Email provider returned {}: {}",
                status, body
            )));
        }

        info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }

    /// Like [`Mailer::send`] but a failure is only logged.
    pub async fn send_best_effort(&self, email: OutgoingEmail) {
        if let Err(e) = self.send(&email).await {
            warn!(to = %email.to, "Email delivery failed: {}", e);
        }
    }
}

pub fn password_reset_email(to: &str, frontend_base_url: &str, raw_token: &str) -> OutgoingEmail {
    let link = format!(
        "{}/reset-password?token={}&email={}",
        frontend_base_url.trim_end_matches('/'),
        raw_token,
        urlencode(to)
    );
    OutgoingEmail {
        to: to.to_string(),
        subject: "Password reset".to_string(),
        text: format!(
            "Use this link to reset your password (valid for 15 minutes): {}",
            link
        ),
    }
}

pub fn project_invite_email(to: &str, project_name: &str, inviter_name: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: format!("Invitation to {}", project_name),
        text: format!(
            "{} invited you to join the project \"{}\". Open your invitations to respond.",
            inviter_name, project_name
        ),
    }
}

pub fn library_item_email(to: &str, title: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "New article in your library".to_string(),
        text: format!("\"{}\" was added to your library.", title),
    }
}

fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_link_carries_token_and_encoded_email() {
        let email = password_reset_email("a+b@example.com", "http://app.test/", "tok123");
        assert!(email.text.contains(
            "http://app.test/reset-password?token=tok123&email=a%2Bb%40example.com"
        ));
        assert_eq!(email.to, "a+b@example.com");
    }

    #[tokio::test]
    async fn unconfigured_mailer_only_logs() {
        let mailer = Mailer::new(
            Client::new(),
            MailConfig {
                api_key: None,
                base_url: "http://127.0.0.1:1".into(),
                from: "no-reply@example.com".into(),
            },
        );
        assert!(!mailer.is_configured());
        let result = mailer.send(&library_item_email("u@example.com", "Paper")).await;
        assert!(result.is_ok());
    }
}

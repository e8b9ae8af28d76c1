//! Stock report e-mails over SMTP with STARTTLS

use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::MailConfig;

pub const REPORT_BODY: &str = "Attached is the latest stock report.";

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A report ready to be addressed and sent
#[derive(Debug, Clone)]
pub struct ReportMail {
    pub subject: String,
    pub body: String,
    /// File name and xlsx bytes
    pub attachment: Option<(String, Vec<u8>)>,
}

impl ReportMail {
    pub fn stock_report(subject: &str, workbook: Vec<u8>, file_name: String) -> Self {
        Self {
            subject: subject.to_string(),
            body: REPORT_BODY.to_string(),
            attachment: Some((file_name, workbook)),
        }
    }
}

/// Parse and validate a recipient or sender address
pub fn parse_address(address: &str) -> Result<Mailbox> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        anyhow::bail!("Please enter a valid email address");
    }
    trimmed
        .parse::<Mailbox>()
        .with_context(|| format!("Invalid email address: '{}'", trimmed))
}

/// Assemble the MIME message
pub fn build_message(sender: &str, recipient: &str, mail: &ReportMail) -> Result<Message> {
    let builder = Message::builder()
        .from(parse_address(sender).context("Mail sender is not configured correctly")?)
        .to(parse_address(recipient)?)
        .subject(mail.subject.clone());

    let message = match &mail.attachment {
        Some((file_name, bytes)) => {
            let content_type = ContentType::parse(XLSX_MIME)
                .map_err(|e| anyhow::anyhow!("Invalid attachment content type: {}", e))?;
            builder.multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(mail.body.clone()))
                    .singlepart(Attachment::new(file_name.clone()).body(bytes.clone(), content_type)),
            )
        }
        None => builder.body(mail.body.clone()),
    }
    .context("Failed to build report e-mail")?;

    Ok(message)
}

/// Send `mail` to `recipient` through the configured relay
pub async fn send_report(config: &MailConfig, password: &str, recipient: &str, mail: &ReportMail) -> Result<()> {
    let message = build_message(&config.sender, recipient, mail)?;

    let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        .with_context(|| format!("Failed to set up SMTP relay {}", config.smtp_host))?
        .port(config.smtp_port)
        .credentials(Credentials::new(config.login().to_string(), password.to_string()))
        .build();

    transport
        .send(message)
        .await
        .with_context(|| format!("Failed to send report to {}", recipient))?;

    log::info!("Report '{}' sent to {}", mail.subject, recipient);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_carries_subject_body_and_attachment() {
        let mail = ReportMail::stock_report("Stock Report", vec![1, 2, 3], "stock.xlsx".to_string());
        let message = build_message("shop@example.com", "owner@example.com", &mail).unwrap();
        let text = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(text.contains("Subject: Stock Report"));
        assert!(text.contains(REPORT_BODY));
        assert!(text.contains("stock.xlsx"));
    }

    #[test]
    fn test_rejects_missing_or_bad_addresses() {
        let mail = ReportMail {
            subject: "s".to_string(),
            body: "b".to_string(),
            attachment: None,
        };
        assert!(build_message("shop@example.com", "", &mail).is_err());
        assert!(build_message("shop@example.com", "not-an-address", &mail).is_err());
        assert!(build_message("", "owner@example.com", &mail).is_err());
    }
}

//! Message templates for verification codes

use crate::domain::entities::verification_policy::{Channel, VerificationPolicy};

/// A message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Template identifier the message was rendered from
    pub template: &'static str,
    /// Email subject; `None` for SMS
    pub subject: Option<String>,
    pub body: String,
}

/// Render the message for `policy`'s template
pub fn render(policy: &VerificationPolicy, site_name: &str, code: &str) -> RenderedMessage {
    let purpose = purpose(policy.template);
    let minutes = policy.expiry_minutes;

    match policy.channel {
        Channel::Email => RenderedMessage {
            template: policy.template,
            subject: Some(format!("[{}] {}", site_name, capitalize(purpose))),
            body: format!(
                "Hello,\n\nYour verification code for {purpose} on {site_name} is: {code}\n\n\
                 This code expires in {minutes} minutes. If you did not request it, \
                 you can safely ignore this email.\n\n{site_name}"
            ),
        },
        Channel::Sms => RenderedMessage {
            template: policy.template,
            subject: None,
            body: format!(
                "[{site_name}] Your {purpose} code is {code}, valid for {minutes} minutes. \
                 Do not share it with anyone."
            ),
        },
    }
}

fn purpose(template: &str) -> &'static str {
    match template {
        "email_register" | "sms_register" => "account registration",
        "email_login" | "sms_login" => "sign-in",
        "email_password_reset" | "sms_password_reset" => "password reset",
        "email_verify" | "sms_verify" => "contact verification",
        "email_bind" | "sms_bind" => "account binding",
        "email_change" | "sms_change" => "contact change",
        "sensitive_operation" => "security confirmation",
        _ => "verification",
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

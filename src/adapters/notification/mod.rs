//! Notification channel adapters.

mod chat_api;
mod smtp_email;

pub use chat_api::{ChatApiConfig, HttpChatSender};
pub use smtp_email::SmtpEmailSender;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subject/body rendering: HTML for email, Markdown-plain for webhooks.

use crate::event::EventType;

pub struct Rendered {
    pub subject: String,
    pub html_body: String,
    pub plain_body: String,
}

pub fn render(event: &EventType) -> Rendered {
    match event {
        EventType::FailedLogin { username, source_ip, attempt_count } => Rendered {
            subject: format!("Repeated failed login for {username}"),
            html_body: format!(
                "<p><strong>{attempt_count}</strong> failed login attempts for user <code>{username}</code> from <code>{source_ip}</code>.</p>"
            ),
            plain_body: format!(
                "{attempt_count} failed login attempts for user {username} from {source_ip}."
            ),
        },
        EventType::IpBlock { source_ip, reason } => Rendered {
            subject: format!("IP address blocked: {source_ip}"),
            html_body: format!("<p><code>{source_ip}</code> was blocked: {reason}</p>"),
            plain_body: format!("{source_ip} was blocked: {reason}"),
        },
        EventType::CriticalEvent { title, detail } => Rendered {
            subject: format!("Critical event: {title}"),
            html_body: format!("<p><strong>{title}</strong></p><p>{detail}</p>"),
            plain_body: format!("{title}\n{detail}"),
        },
        EventType::SystemError { message } => Rendered {
            subject: "System error".to_string(),
            html_body: format!("<p>{message}</p>"),
            plain_body: message.clone(),
        },
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;

//! Notification mail bodies.
//!
//! Three mails cover the lifecycle: the request-to-verify sent to the
//! target, the confirmation sent to the requester, and the completion mail
//! carrying the extracted claim parameters back to the requester.

use std::collections::BTreeMap;

use super::OutboundEmail;

const FOOTER_TEXT: &str = "This verification is powered by Veriflow.";

fn card(inner: &str) -> String {
    format!(
        "<div style=\"max-width: 600px; margin: 0 auto; padding: 2rem; \
         font-family: system-ui, sans-serif;\">\
         <div style=\"background-color: white; border-radius: 0.5rem; padding: 2rem;\">\
         <h1 style=\"text-align: center; font-size: 1.875rem; color: #111827;\">\
         Verification Request</h1>{inner}\
         <p style=\"text-align: center;\"><small style=\"color: #6B7280;\">{FOOTER_TEXT}\
         </small></p></div></div>"
    )
}

fn message_block(message: Option<&str>) -> String {
    match message {
        Some(message) if !message.is_empty() => format!(
            "<div style=\"margin: 1.5rem 0;\"><h2 style=\"font-size: 1.125rem; \
             color: #111827;\">Message</h2>\
             <div style=\"background-color: #F9FAFB; padding: 1rem; border-radius: 0.5rem;\">\
             <p style=\"margin: 0; color: #374151;\">{}</p></div></div>",
            escape_html(message)
        ),
        _ => String::new(),
    }
}

fn button(href: &str, label: &str) -> String {
    format!(
        "<div style=\"text-align: center; margin-top: 2rem;\">\
         <a href=\"{href}\" style=\"display: inline-block; background-color: #4F46E5; \
         color: white; padding: 0.75rem 1.5rem; border-radius: 0.375rem; \
         text-decoration: none;\">{label}</a></div>"
    )
}

/// Minimal HTML escaping for values interpolated into mail bodies.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Request-to-verify mail, sent to the target.
pub fn verification_requested(
    to: &str,
    sender_email: &str,
    description: &str,
    message: Option<&str>,
    open_url: &str,
) -> OutboundEmail {
    let text = format!(
        "{sender_email} is requesting to verify {description}.\n\n\
         Message from the requester: {}\n\n\
         Please click the link below to verify:\n{open_url}",
        message.unwrap_or("(none)")
    );
    let html = card(&format!(
        "<p>{} is requesting to verify {description}.</p>{}{}",
        escape_html(sender_email),
        message_block(message),
        button(open_url, "Verify Now"),
    ));
    OutboundEmail {
        to: to.to_string(),
        subject: "Verification Request".to_string(),
        text,
        html: Some(html),
    }
}

/// Confirmation mail, sent to the requester right after creation.
pub fn request_submitted(
    to: &str,
    target_email: &str,
    description: &str,
    message: Option<&str>,
    status_url: &str,
) -> OutboundEmail {
    let text = format!(
        "Your verification request has been submitted successfully. \
         {target_email} has been asked to verify {description}. \
         We will notify you once the verification is complete.\n\n\
         Check the status here: {status_url}"
    );
    let html = card(&format!(
        "<p>{} has been requested to verify {description}. \
         You will receive an email once they complete the verification.</p>{}{}",
        escape_html(target_email),
        message_block(message),
        button(status_url, "Check Status"),
    ));
    OutboundEmail {
        to: to.to_string(),
        subject: "Verification Request Submitted".to_string(),
        text,
        html: Some(html),
    }
}

/// Completion mail, sent to the requester with the extracted parameters.
pub fn verification_completed(
    to: &str,
    target_email: &str,
    message: Option<&str>,
    parameters: &BTreeMap<String, String>,
    status_url: &str,
) -> OutboundEmail {
    let mut params_text = String::new();
    for (key, value) in parameters {
        params_text.push_str(&format!("  {key}: {value}\n"));
    }

    let text = format!(
        "{target_email} has completed the verification.\n\n\
         Extracted parameters:\n{params_text}\n\
         Check the result here: {status_url}"
    );

    let params_html = parameters
        .iter()
        .map(|(k, v)| format!("{}: {}", escape_html(k), escape_html(v)))
        .collect::<Vec<_>>()
        .join("<br>");
    let html = card(&format!(
        "<p>{} has completed the verification.</p>{}\
         <div style=\"text-align: center; margin-top: 2rem;\"><pre>{params_html}</pre></div>{}",
        escape_html(target_email),
        message_block(message),
        button(status_url, "View Result"),
    ));

    OutboundEmail {
        to: to.to_string(),
        subject: "Verification Completed".to_string(),
        text,
        html: Some(html),
    }
}

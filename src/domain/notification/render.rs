//! Subject lines and minimal HTML bodies for notification intents.

use crate::domain::assignment::{WorkItemKind, WorkItemSummary};
use crate::domain::compliance::DocumentStatus;
use crate::domain::foundation::Role;

use super::{NotificationIntent, NotificationKind};

/// Sender-side values every message needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub company_name: String,
    pub portal_url: String,
}

/// A rendered message ready for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

/// Escapes text for inclusion in HTML.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn link(portal_url: &str, path: &str) -> String {
    format!("{}{}", portal_url.trim_end_matches('/'), path)
}

fn wrap(title: &str, greeting_name: &str, paragraphs: &[String]) -> String {
    let mut html = format!(
        "<html><body><h2>{}</h2><p>Dear {},</p>",
        escape_html(title),
        escape_html(greeting_name)
    );
    for p in paragraphs {
        html.push_str("<p>");
        html.push_str(p);
        html.push_str("</p>");
    }
    html.push_str("</body></html>");
    html
}

fn button(label: &str, url: &str) -> String {
    format!("<a href=\"{}\">{}</a>", escape_html(url), escape_html(label))
}

fn assignment_subject(item: &WorkItemSummary) -> String {
    match item.kind {
        WorkItemKind::Task => format!("New Task Assignment: {}", item.title),
        WorkItemKind::Project => format!("New Project Assignment: {}", item.title),
        WorkItemKind::WorkOrder => format!("New Work Order Assignment: {}", item.title),
    }
}

/// Renders an intent.
pub fn render(intent: &NotificationIntent, ctx: &RenderContext) -> RenderedEmail {
    let company = &ctx.company_name;
    let name = &intent.recipient_name;

    match &intent.kind {
        NotificationKind::EmployeeInvitation {
            code,
            role,
            invited_by,
            expires_at,
        } => {
            let url = link(&ctx.portal_url, &format!("/register?code={}", code));
            RenderedEmail {
                subject: format!("Employee Invitation - {}", company),
                html: wrap(
                    "Employee Invitation",
                    name,
                    &[
                        format!(
                            "{} has invited you to join {} as {}.",
                            escape_html(invited_by),
                            escape_html(company),
                            role
                        ),
                        format!("Your invitation code: <strong>{}</strong>", code),
                        format!(
                            "This invitation expires on {}.",
                            expires_at.as_datetime().format("%B %-d, %Y")
                        ),
                        button("Create My Account", &url),
                    ],
                ),
            }
        }
        NotificationKind::VendorInvitation {
            code,
            vendor_name,
            expires_at,
        } => {
            let url = link(&ctx.portal_url, &format!("/vendor-onboarding?code={}", code));
            RenderedEmail {
                subject: format!("Vendor Invitation - {}", company),
                html: wrap(
                    "Vendor Invitation",
                    vendor_name,
                    &[
                        format!(
                            "You have been invited to join the {} Vendor Portal.",
                            escape_html(company)
                        ),
                        format!("Your invitation code: <strong>{}</strong>", code),
                        format!(
                            "This invitation expires on {}.",
                            expires_at.as_datetime().format("%B %-d, %Y")
                        ),
                        button("Create My Account", &url),
                    ],
                ),
            }
        }
        NotificationKind::VendorAccountCreated {
            company_name,
            contact_name,
            username,
        } => RenderedEmail {
            subject: format!("Your Vendor Portal Account - {}", company),
            html: wrap(
                "Vendor Account Created",
                contact_name,
                &[
                    format!(
                        "The vendor portal account for {} is ready.",
                        escape_html(company_name)
                    ),
                    format!("Username: <strong>{}</strong>", escape_html(username)),
                    button("Sign In", &link(&ctx.portal_url, "/auth")),
                ],
            ),
        },
        NotificationKind::DocumentReviewed {
            company_name,
            document_type,
            status,
            reason,
        } => {
            let mut paragraphs = vec![format!(
                "Your {} has been {}.",
                escape_html(document_type.label()),
                status
            )];
            if *status == DocumentStatus::Rejected {
                if let Some(reason) = reason {
                    paragraphs.push(format!("Reason: {}", escape_html(reason)));
                }
                paragraphs
                    .push("Please upload a corrected document through the vendor portal.".to_string());
            }
            RenderedEmail {
                subject: format!("Document {}: {}", status.title(), document_type.label()),
                html: wrap(
                    &format!("Document {}", status.title()),
                    company_name,
                    &paragraphs,
                ),
            }
        }
        NotificationKind::Assigned {
            item,
            recipient_role,
            assigned_by,
        } => {
            let audience = if *recipient_role == Role::Vendor {
                "vendor portal"
            } else {
                "employee portal"
            };
            let mut paragraphs = vec![format!(
                "{} assigned you to the {} <strong>{}</strong>.",
                escape_html(assigned_by),
                item.kind.label().to_lowercase(),
                escape_html(&item.title)
            )];
            if let Some(description) = &item.description {
                paragraphs.push(escape_html(description));
            }
            if let Some(due) = item.due_date {
                paragraphs.push(format!("Due: {}", due.format("%B %-d, %Y")));
            }
            if let Some(priority) = &item.priority {
                paragraphs.push(format!("Priority: {}", escape_html(priority)));
            }
            paragraphs.push(button(
                &format!("Open the {}", audience),
                &ctx.portal_url,
            ));
            RenderedEmail {
                subject: assignment_subject(item),
                html: wrap(&format!("New {} Assignment", item.kind.label()), name, &paragraphs),
            }
        }
    }
}

//! Subjects and bodies for outgoing mail.
//!
//! Every message has a plain-text and an HTML rendering. Values that come
//! from customers are HTML-escaped before they reach the HTML part.

use crate::domain::Appointment;

#[derive(Debug, Clone, PartialEq)]
pub struct EmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct MailTemplates {
    pub business_name: String,
    /// Frontend page that accepts `?token=`
    pub password_reset_url: String,
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

/// `(label, value)` rows describing an appointment.
fn appointment_rows(appointment: &Appointment, service_name: &str) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Appointment ID", appointment.id.to_string()),
        ("Customer", appointment.customer_name.clone()),
        ("Email", appointment.customer_email.clone()),
        ("Phone", appointment.customer_phone.clone()),
        ("Service", service_name.to_string()),
        ("Style", appointment.service_description.clone()),
        ("Date", appointment.date.clone()),
        ("Time", appointment.time.clone()),
        ("Status", appointment.status.to_string()),
    ];
    if let Some(staff) = &appointment.staff_name {
        rows.push(("Stylist", staff.clone()));
    }
    if let Some(notes) = &appointment.notes {
        rows.push(("Notes", notes.clone()));
    }
    rows
}

fn rows_text(rows: &[(&str, String)]) -> String {
    rows.iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn rows_html(rows: &[(&str, String)]) -> String {
    let body: String = rows
        .iter()
        .map(|(label, value)| {
            format!(
                "<tr><td style=\"padding:4px 12px 4px 0;color:#666\">{}</td><td><strong>{}</strong></td></tr>",
                label,
                escape_html(value)
            )
        })
        .collect();
    format!("<table>{}</table>", body)
}

impl MailTemplates {
    fn layout(&self, heading: &str, body_html: &str) -> String {
        format!(
            "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"></head>\
             <body style=\"font-family:Arial,sans-serif;line-height:1.6;color:#333\">\
             <div style=\"max-width:600px;margin:0 auto;padding:20px\">\
             <h1 style=\"background:#764ba2;color:#fff;padding:24px;border-radius:8px 8px 0 0;margin:0\">{}</h1>\
             <div style=\"background:#fff;padding:24px\">{}</div>\
             <p style=\"text-align:center;color:#888;font-size:12px\">{}</p>\
             </div></body></html>",
            escape_html(heading),
            body_html,
            escape_html(&self.business_name)
        )
    }

    pub fn password_reset(&self, token: &str) -> EmailContent {
        let link = format!("{}?token={}", self.password_reset_url, token);
        EmailContent {
            subject: format!("Password Reset Request - {}", self.business_name),
            text: format!(
                "A password reset was requested for the admin account.\n\
                 Open this link within the hour to choose a new password:\n{}\n\n\
                 If you did not request this, ignore this email.",
                link
            ),
            html: self.layout(
                "Password Reset",
                &format!(
                    "<p>A password reset was requested for the admin account.</p>\
                     <p><a href=\"{0}\">Reset password</a></p>\
                     <p>Or paste this link into your browser: {0}</p>\
                     <p>The link expires in one hour. If you did not request this, ignore this email.</p>",
                    escape_html(&link)
                ),
            ),
        }
    }

    pub fn password_changed(&self) -> EmailContent {
        EmailContent {
            subject: format!("Password Changed - {}", self.business_name),
            text: "Your admin password was changed. If this was not you, reset it immediately."
                .to_string(),
            html: self.layout(
                "Password Changed",
                "<p>Your admin password was changed.</p>\
                 <p>If this was not you, reset it immediately.</p>",
            ),
        }
    }

    pub fn admin_new_appointment(&self, appointment: &Appointment, service_name: &str) -> EmailContent {
        let rows = appointment_rows(appointment, service_name);
        EmailContent {
            subject: format!("New Appointment Booking - ID: {}", appointment.id),
            text: format!("A new appointment was booked.\n\n{}", rows_text(&rows)),
            html: self.layout(
                "New Appointment",
                &format!("<p>A new appointment was booked.</p>{}", rows_html(&rows)),
            ),
        }
    }

    pub fn customer_confirmed(&self, appointment: &Appointment, service_name: &str) -> EmailContent {
        let rows = appointment_rows(appointment, service_name);
        let greeting = format!("Hi {}, your appointment is confirmed.", appointment.customer_name);
        EmailContent {
            subject: format!("Appointment Confirmed - ID: {}", appointment.id),
            text: format!("{}\n\n{}\n\nWe look forward to seeing you.", greeting, rows_text(&rows)),
            html: self.layout(
                "Appointment Confirmed",
                &format!(
                    "<p>{}</p>{}<p>We look forward to seeing you.</p>",
                    escape_html(&greeting),
                    rows_html(&rows)
                ),
            ),
        }
    }

    pub fn customer_updated(&self, appointment: &Appointment, service_name: &str) -> EmailContent {
        let rows = appointment_rows(appointment, service_name);
        let greeting = format!(
            "Hi {}, your appointment details have changed.",
            appointment.customer_name
        );
        EmailContent {
            subject: format!("Appointment Updated - ID: {}", appointment.id),
            text: format!("{}\n\n{}", greeting, rows_text(&rows)),
            html: self.layout(
                "Appointment Updated",
                &format!("<p>{}</p>{}", escape_html(&greeting), rows_html(&rows)),
            ),
        }
    }

    pub fn customer_cancelled(&self, appointment: &Appointment, service_name: &str) -> EmailContent {
        let what = if service_name.is_empty() {
            "your appointment".to_string()
        } else {
            format!("your {} appointment", service_name)
        };
        let message = format!(
            "Hi {}, unfortunately {} (ID {}) has been cancelled. Please contact us to rebook.",
            appointment.customer_name, what, appointment.id
        );
        EmailContent {
            subject: format!("Appointment Cancelled - ID: {}", appointment.id),
            text: message.clone(),
            html: self.layout(
                "Appointment Cancelled",
                &format!("<p>{}</p>", escape_html(&message)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppointmentStatus, NewAppointment};

    fn templates() -> MailTemplates {
        MailTemplates {
            business_name: "Lucy's Beauty Parlour".into(),
            password_reset_url: "https://example.com/reset-password".into(),
        }
    }

    fn appointment() -> Appointment {
        Appointment::from_new(
            12,
            NewAppointment {
                customer_name: "<b>Eve</b>".into(),
                customer_email: "eve@example.com".into(),
                customer_phone: "555".into(),
                staff_name: Some("Lucy".into()),
                date: "2025-03-15".into(),
                time: "10:00".into(),
                service_id: 1,
                service_description: "Small".into(),
                currency: None,
                price_cents: 100,
                notes: None,
                status: AppointmentStatus::Confirmed,
            },
        )
    }

    #[test]
    fn customer_values_are_escaped_in_html() {
        let mail = templates().customer_confirmed(&appointment(), "Knotless Braids");
        assert_eq!(mail.subject, "Appointment Confirmed - ID: 12");
        assert!(mail.html.contains("&lt;b&gt;Eve&lt;/b&gt;"));
        assert!(!mail.html.contains("<b>Eve</b>"));
        assert!(mail.text.contains("Stylist: Lucy"));
    }

    #[test]
    fn reset_mail_contains_link_with_token() {
        let mail = templates().password_reset("abc123");
        assert!(mail
            .text
            .contains("https://example.com/reset-password?token=abc123"));
        assert!(mail.subject.starts_with("Password Reset Request"));
    }

    #[test]
    fn cancellation_mentions_service_when_known() {
        let t = templates();
        let mail = t.customer_cancelled(&appointment(), "Wig Install");
        assert!(mail.text.contains("your Wig Install appointment"));
        let mail = t.customer_cancelled(&appointment(), "");
        assert!(mail.text.contains("your appointment (ID 12)"));
    }
}

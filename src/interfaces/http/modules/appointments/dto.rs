//! Appointment DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::application::normalization::{first_non_blank, first_non_empty};
use crate::application::{AppointmentChanges, CreateAppointment};
use crate::domain::Appointment;

#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentDto {
    pub id: u64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_name: Option<String>,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, 24-hour
    pub time: String,
    pub service_id: u64,
    pub service_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub price_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// `pending`, `confirmed`, `cancelled` or a caller-supplied value
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Appointment> for AppointmentDto {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id,
            customer_name: a.customer_name,
            customer_email: a.customer_email,
            customer_phone: a.customer_phone,
            staff_name: a.staff_name,
            date: a.date,
            time: a.time,
            service_id: a.service_id,
            service_description: a.service_description,
            currency: a.currency,
            price_cents: a.price_cents,
            notes: a.notes,
            status: a.status.to_string(),
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.to_rfc3339(),
        }
    }
}

/// Public booking request. Date, time and selected options are accepted
/// under several historical spellings; the first non-blank one wins.
/// Field checks run in `BookingService::create`, in order.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateAppointmentRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub staff_name: Option<String>,
    pub date: Option<String>,
    pub appointment_date: Option<String>,
    #[serde(rename = "appointmentDate")]
    pub appointment_date_camel: Option<String>,
    pub time: Option<String>,
    pub appointment_time: Option<String>,
    #[serde(rename = "appointmentTime")]
    pub appointment_time_camel: Option<String>,
    pub service_id: Option<i64>,
    pub service_description: Option<String>,
    pub selected_option_ids: Option<Vec<i64>>,
    #[serde(rename = "selectedOptionIds")]
    pub selected_option_ids_camel: Option<Vec<i64>>,
    pub currency: Option<String>,
    pub price_cents: Option<i64>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

impl From<CreateAppointmentRequest> for CreateAppointment {
    fn from(r: CreateAppointmentRequest) -> Self {
        Self {
            date: first_non_blank([r.date, r.appointment_date, r.appointment_date_camel]),
            time: first_non_blank([r.time, r.appointment_time, r.appointment_time_camel]),
            selected_option_ids: first_non_empty([
                r.selected_option_ids,
                r.selected_option_ids_camel,
            ]),
            customer_name: r.customer_name,
            customer_email: r.customer_email,
            customer_phone: r.customer_phone,
            staff_name: r.staff_name,
            service_id: r.service_id,
            service_description: r.service_description,
            currency: r.currency,
            price_cents: r.price_cents,
            notes: r.notes,
            status: r.status,
        }
    }
}

/// Merge update: absent fields keep their current value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAppointmentRequest {
    pub customer_name: Option<String>,
    #[validate(custom(function = "email_if_present"))]
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub staff_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub service_id: Option<i64>,
    pub service_description: Option<String>,
    /// Accepted and ignored
    pub selected_option_ids: Option<Vec<i64>>,
    #[serde(rename = "selectedOptionIds")]
    pub selected_option_ids_camel: Option<Vec<i64>>,
    pub currency: Option<String>,
    pub price_cents: Option<i64>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

/// Blank passes so the merge reports it as a missing field.
fn email_if_present(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("must be a valid email".into()))
    }
}

impl From<UpdateAppointmentRequest> for AppointmentChanges {
    fn from(r: UpdateAppointmentRequest) -> Self {
        Self {
            customer_name: r.customer_name,
            customer_email: r.customer_email,
            customer_phone: r.customer_phone,
            staff_name: r.staff_name,
            date: r.date,
            time: r.time,
            service_id: r.service_id,
            service_description: r.service_description,
            currency: r.currency,
            price_cents: r.price_cents,
            notes: r.notes,
            status: r.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_in_priority_order() {
        let req: CreateAppointmentRequest = serde_json::from_value(serde_json::json!({
            "date": "  ",
            "appointment_date": "2025-03-15",
            "appointmentDate": "16/03/2025",
            "appointmentTime": "3:04 PM",
            "selectedOptionIds": [4, 5],
        }))
        .unwrap();

        let cmd = CreateAppointment::from(req);
        assert_eq!(cmd.date.as_deref(), Some("2025-03-15"));
        assert_eq!(cmd.time.as_deref(), Some("3:04 PM"));
        assert_eq!(cmd.selected_option_ids, vec![4, 5]);
    }

    #[test]
    fn update_email_is_checked_only_when_present() {
        let request = |email: Option<&str>| UpdateAppointmentRequest {
            customer_email: email.map(String::from),
            ..Default::default()
        };
        assert!(request(None).validate().is_ok());
        assert!(request(Some(" ada@example.com ")).validate().is_ok());
        assert!(request(Some("")).validate().is_ok());

        let errors = request(Some("not-an-email")).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("customer_email"));
    }
}

//! Appointment domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Appointment status.
///
/// The three well-known states are modelled explicitly; anything else the
/// admin types in is kept verbatim in `Other` and never consumes capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Other(String),
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Other(s) => s.as_str(),
        }
    }

    /// Exact, case-sensitive match on the canonical spelling.
    /// A blank value maps to the default `pending`.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "" | "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "cancelled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for AppointmentStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A validated appointment that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub staff_name: Option<String>,
    /// Canonical `YYYY-MM-DD`
    pub date: String,
    /// Canonical 24-hour `HH:MM`
    pub time: String,
    pub service_id: u64,
    pub service_description: String,
    pub currency: Option<String>,
    pub price_cents: i64,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
}

/// Stored appointment
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    /// Assigned by the store, never reused
    pub id: u64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub staff_name: Option<String>,
    pub date: String,
    pub time: String,
    pub service_id: u64,
    pub service_description: String,
    pub currency: Option<String>,
    pub price_cents: i64,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn from_new(id: u64, new: NewAppointment) -> Self {
        let now = Utc::now();
        Self {
            id,
            customer_name: new.customer_name,
            customer_email: new.customer_email,
            customer_phone: new.customer_phone,
            staff_name: new.staff_name,
            date: new.date,
            time: new.time,
            service_id: new.service_id,
            service_description: new.service_description,
            currency: new.currency,
            price_cents: new.price_cents,
            notes: new.notes,
            status: new.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark as cancelled. Calling it again is a no-op.
    pub fn cancel(&mut self) {
        self.status = AppointmentStatus::Cancelled;
        self.updated_at = Utc::now();
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == AppointmentStatus::Confirmed
    }

    pub fn matches(&self, date: &str, status: &AppointmentStatus) -> bool {
        self.date == date && &self.status == status
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_new() -> NewAppointment {
        NewAppointment {
            customer_name: "Ada".into(),
            customer_email: "ada@example.com".into(),
            customer_phone: "+15550100".into(),
            staff_name: None,
            date: "2025-03-15".into(),
            time: "10:30".into(),
            service_id: 1,
            service_description: "Small".into(),
            currency: Some("USD".into()),
            price_cents: 12000,
            notes: None,
            status: AppointmentStatus::Pending,
        }
    }

    #[test]
    fn status_round_trips_known_and_custom_values() {
        assert_eq!(AppointmentStatus::parse("confirmed"), AppointmentStatus::Confirmed);
        assert_eq!(AppointmentStatus::parse("  "), AppointmentStatus::Pending);
        assert_eq!(
            AppointmentStatus::parse("no-show"),
            AppointmentStatus::Other("no-show".into())
        );
        assert_eq!(AppointmentStatus::Other("no-show".into()).as_str(), "no-show");
    }

    #[test]
    fn status_match_is_case_sensitive() {
        assert_eq!(
            AppointmentStatus::parse("Confirmed"),
            AppointmentStatus::Other("Confirmed".into())
        );
    }

    #[test]
    fn status_serializes_as_plain_string() {
        let json = serde_json::to_string(&AppointmentStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
        let back: AppointmentStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(back, AppointmentStatus::Pending);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut appt = Appointment::from_new(1, sample_new());
        appt.cancel();
        appt.cancel();
        assert_eq!(appt.status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn matches_requires_both_date_and_status() {
        let mut new = sample_new();
        new.status = AppointmentStatus::Confirmed;
        let appt = Appointment::from_new(1, new);
        assert!(appt.matches("2025-03-15", &AppointmentStatus::Confirmed));
        assert!(!appt.matches("2025-03-16", &AppointmentStatus::Confirmed));
        assert!(!appt.matches("2025-03-15", &AppointmentStatus::Pending));
    }
}

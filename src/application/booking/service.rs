//! Appointment lifecycle: normalize, validate, admit, commit, notify.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::validation::{
    check_description, check_price, require_text, resolve_service, validate_contact,
};
use crate::application::normalization::{normalize_date, normalize_time, optional_text};
use crate::application::notifications::{Notification, NotificationDispatcher};
use crate::domain::{
    Appointment, AppointmentRepository, AppointmentStatus, DomainError, DomainResult,
    NewAppointment, ServiceRepository,
};
use crate::shared::{Page, PageRequest};

/// Appointment creation input. Alias spellings are already collapsed by the
/// caller; everything else is raw.
#[derive(Debug, Clone, Default)]
pub struct CreateAppointment {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub staff_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub service_id: Option<i64>,
    pub service_description: Option<String>,
    /// Accepted for compatibility; the caller-computed price is what is stored.
    pub selected_option_ids: Vec<i64>,
    pub currency: Option<String>,
    pub price_cents: Option<i64>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

/// Partial update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct AppointmentChanges {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub staff_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub service_id: Option<i64>,
    pub service_description: Option<String>,
    pub currency: Option<String>,
    pub price_cents: Option<i64>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

impl AppointmentChanges {
    fn touches_service(&self) -> bool {
        self.service_id.is_some() || self.service_description.is_some()
    }
}

pub struct BookingService {
    appointments: Arc<dyn AppointmentRepository>,
    services: Arc<dyn ServiceRepository>,
    notifications: NotificationDispatcher,
}

impl BookingService {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        services: Arc<dyn ServiceRepository>,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            appointments,
            services,
            notifications,
        }
    }

    pub async fn create(&self, cmd: CreateAppointment) -> DomainResult<Appointment> {
        let result = self.try_create(cmd).await;
        if let Err(e) = &result {
            metrics::counter!("appointments_rejected_total", "reason" => e.kind()).increment(1);
        }
        result
    }

    async fn try_create(&self, cmd: CreateAppointment) -> DomainResult<Appointment> {
        // Presence of every required field comes before any lookup.
        let contact = validate_contact(
            cmd.customer_name.as_deref(),
            cmd.customer_email.as_deref(),
            cmd.customer_phone.as_deref(),
        )?;
        if cmd.service_id.is_none() {
            return Err(DomainError::validation(
                "service_id is required and must be positive",
            ));
        }
        let description = require_text(cmd.service_description.as_deref(), "service_description")?;
        let price_cents = cmd
            .price_cents
            .ok_or_else(|| DomainError::validation("price_cents is required"))?;

        let date = normalize_date(cmd.date.as_deref().unwrap_or_default())?;
        let time = normalize_time(cmd.time.as_deref().unwrap_or_default())?;

        let service = resolve_service(self.services.as_ref(), cmd.service_id).await?;
        check_description(&service, &description)?;
        let price_cents = check_price(price_cents)?;

        if !cmd.selected_option_ids.is_empty() {
            debug!(options = ?cmd.selected_option_ids, "Ignoring selected option ids");
        }

        let status = AppointmentStatus::parse(cmd.status.as_deref().unwrap_or_default());
        let new = NewAppointment {
            customer_name: contact.name,
            customer_email: contact.email,
            customer_phone: contact.phone,
            staff_name: optional_text(cmd.staff_name),
            date,
            time,
            service_id: service.id,
            service_description: description,
            currency: optional_text(cmd.currency),
            price_cents,
            notes: optional_text(cmd.notes),
            status,
        };

        // Only confirmed bookings consume the day's capacity.
        let created = if new.status == AppointmentStatus::Confirmed {
            self.appointments.create_if_slot_available(new).await?
        } else {
            self.appointments.create(new).await?
        };

        metrics::counter!("appointments_created_total", "status" => created.status.to_string())
            .increment(1);
        info!(
            appointment_id = created.id,
            date = %created.date,
            service_id = created.service_id,
            status = %created.status,
            "Appointment created"
        );

        self.notifications.dispatch(Notification::AdminNewAppointment {
            appointment: created.clone(),
            service_name: service.name,
        });

        Ok(created)
    }

    pub async fn get(&self, id: u64) -> DomainResult<Appointment> {
        self.appointments.get(id).await
    }

    pub async fn list(&self, page: PageRequest) -> DomainResult<Page<Appointment>> {
        self.appointments.list(page).await
    }

    /// Read, merge, validate, write. Not atomic as a whole: a concurrent
    /// update of the same ID may win.
    pub async fn update(&self, id: u64, changes: AppointmentChanges) -> DomainResult<Appointment> {
        let current = self.appointments.get(id).await?;
        let touches_service = changes.touches_service();
        let keeps_service = changes.service_id.is_none();
        let mut merged = current.clone();

        if let Some(v) = changes.customer_name {
            merged.customer_name = require_text(Some(&v), "customer_name")?;
        }
        if let Some(v) = changes.customer_email {
            merged.customer_email = v.trim().to_string();
        }
        if let Some(v) = changes.customer_phone {
            merged.customer_phone = require_text(Some(&v), "customer_phone")?;
        }
        if changes.staff_name.is_some() {
            merged.staff_name = optional_text(changes.staff_name);
        }
        if let Some(v) = changes.date {
            merged.date = normalize_date(&v)?;
        }
        if let Some(v) = changes.time {
            merged.time = normalize_time(&v)?;
        }
        if let Some(v) = changes.service_id {
            if v <= 0 {
                return Err(DomainError::validation(
                    "service_id is required and must be positive",
                ));
            }
            merged.service_id = v as u64;
        }
        if let Some(v) = changes.service_description {
            merged.service_description = v.trim().to_string();
        }
        if changes.currency.is_some() {
            merged.currency = optional_text(changes.currency);
        }
        if let Some(v) = changes.price_cents {
            merged.price_cents = check_price(v)?;
        }
        if changes.notes.is_some() {
            merged.notes = optional_text(changes.notes);
        }
        if let Some(v) = changes.status {
            merged.status = AppointmentStatus::parse(&v);
        }

        let contact = validate_contact(
            Some(&merged.customer_name),
            Some(&merged.customer_email),
            Some(&merged.customer_phone),
        )?;
        merged.customer_email = contact.email;

        // Cross-reference against the merged state, so a new description is
        // checked against the current service when only it changed.
        let service_name = if touches_service {
            let service = if keeps_service {
                self.services.get(merged.service_id).await.map_err(|e| match e {
                    DomainError::NotFound { .. } => {
                        DomainError::validation("invalid current service for validation")
                    }
                    other => other,
                })?
            } else {
                resolve_service(self.services.as_ref(), Some(merged.service_id as i64)).await?
            };
            check_description(&service, &merged.service_description)?;
            Some(service.name)
        } else {
            None
        };

        merged.updated_at = Utc::now();
        let updated = self.appointments.update(id, merged).await?;
        info!(
            appointment_id = updated.id,
            status = %updated.status,
            "Appointment updated"
        );

        let service_name = match service_name {
            Some(name) => name,
            None => self.service_name(updated.service_id).await,
        };
        let notification = if updated.is_confirmed() {
            Notification::CustomerConfirmed {
                appointment: updated.clone(),
                service_name,
            }
        } else {
            Notification::CustomerUpdated {
                appointment: updated.clone(),
                service_name,
            }
        };
        self.notifications.dispatch(notification);

        Ok(updated)
    }

    /// Idempotent: cancelling twice succeeds and notifies twice.
    pub async fn cancel(&self, id: u64) -> DomainResult<Appointment> {
        let cancelled = self.appointments.cancel(id).await?;
        info!(appointment_id = id, "Appointment cancelled");

        let service_name = self.service_name(cancelled.service_id).await;
        self.notifications.dispatch(Notification::CustomerCancelled {
            appointment: cancelled.clone(),
            service_name,
        });
        Ok(cancelled)
    }

    pub async fn delete(&self, id: u64) -> DomainResult<()> {
        self.appointments.delete(id).await?;
        info!(appointment_id = id, "Appointment deleted");
        Ok(())
    }

    /// Best-effort lookup for notification text; empty if the service is gone.
    async fn service_name(&self, service_id: u64) -> String {
        match self.services.get(service_id).await {
            Ok(service) => service.name,
            Err(e) => {
                warn!(service_id, error = %e, "Service lookup for notification failed");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::notifications::dispatcher::test_support::{
        wait_for, RecordingNotifier,
    };
    use crate::domain::ServiceItemDraft;
    use crate::infrastructure::storage::{InMemoryAppointmentRepository, InMemoryServiceRepository};
    use crate::shared::ShutdownSignal;

    struct Fixture {
        booking: BookingService,
        services: Arc<InMemoryServiceRepository>,
        notifier: Arc<RecordingNotifier>,
        braids_id: i64,
        manicure_id: i64,
    }

    async fn fixture() -> Fixture {
        let services = Arc::new(InMemoryServiceRepository::new());
        let braids = services
            .create(ServiceItemDraft {
                service: "Hair Styling & Braiding".into(),
                name: "Knotless Braids".into(),
                descriptions: vec!["Small".into(), "Medium".into(), "Large".into()],
                images: vec![],
                rating: 4.8,
            })
            .await
            .unwrap();
        let manicure = services
            .create(ServiceItemDraft {
                service: "Nails".into(),
                name: "Gel Manicure".into(),
                descriptions: vec!["Short".into(), "Long".into()],
                images: vec![],
                rating: 4.5,
            })
            .await
            .unwrap();

        let notifier = Arc::new(RecordingNotifier::default());
        let dispatcher = NotificationDispatcher::start(notifier.clone(), ShutdownSignal::new());
        let booking = BookingService::new(
            Arc::new(InMemoryAppointmentRepository::new(15)),
            services.clone(),
            dispatcher,
        );

        Fixture {
            booking,
            services,
            notifier,
            braids_id: braids.id as i64,
            manicure_id: manicure.id as i64,
        }
    }

    fn request(service_id: i64) -> CreateAppointment {
        CreateAppointment {
            customer_name: Some("Ada Obi".into()),
            customer_email: Some("ada@example.com".into()),
            customer_phone: Some("+2348000000".into()),
            date: Some("15/03/2025".into()),
            time: Some("3:04 PM".into()),
            service_id: Some(service_id),
            service_description: Some("Medium".into()),
            price_cents: Some(15000),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_normalizes_and_defaults_status() {
        let f = fixture().await;
        let appt = f.booking.create(request(f.braids_id)).await.unwrap();

        assert_eq!(appt.id, 1);
        assert_eq!(appt.date, "2025-03-15");
        assert_eq!(appt.time, "15:04");
        assert_eq!(appt.status, AppointmentStatus::Pending);

        let sent = wait_for(&f.notifier, 1).await;
        assert_eq!(sent, vec!["admin_new:1:Knotless Braids".to_string()]);
    }

    #[tokio::test]
    async fn ids_strictly_increase() {
        let f = fixture().await;
        let mut last = 0;
        for _ in 0..5 {
            let appt = f.booking.create(request(f.braids_id)).await.unwrap();
            assert!(appt.id > last);
            last = appt.id;
        }
    }

    #[tokio::test]
    async fn unknown_service_is_a_validation_error() {
        let f = fixture().await;
        let err = f.booking.create(request(999)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "invalid service_id: service not found");

        let err = f.booking.create(request(0)).await.unwrap_err();
        assert_eq!(err.to_string(), "service_id is required and must be positive");
    }

    #[tokio::test]
    async fn description_must_belong_to_service() {
        let f = fixture().await;
        let mut req = request(f.braids_id);
        req.service_description = Some("Long".into());
        let err = f.booking.create(req).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid service_description for the selected service"
        );
    }

    #[tokio::test]
    async fn missing_and_negative_price() {
        let f = fixture().await;
        let mut req = request(f.braids_id);
        req.price_cents = None;
        assert_eq!(
            f.booking.create(req).await.unwrap_err().to_string(),
            "price_cents is required"
        );

        let mut req = request(f.braids_id);
        req.price_cents = Some(-5);
        assert_eq!(
            f.booking.create(req).await.unwrap_err().to_string(),
            "price_cents must be >= 0"
        );
    }

    #[tokio::test]
    async fn required_fields_are_checked_before_service_lookup() {
        let f = fixture().await;
        let mut req = request(999);
        req.price_cents = None;
        assert_eq!(
            f.booking.create(req).await.unwrap_err().to_string(),
            "price_cents is required"
        );

        let mut req = request(999);
        req.service_description = Some("  ".into());
        assert_eq!(
            f.booking.create(req).await.unwrap_err().to_string(),
            "service_description is required"
        );

        let mut req = request(999);
        req.service_id = None;
        req.price_cents = None;
        assert_eq!(
            f.booking.create(req).await.unwrap_err().to_string(),
            "service_id is required and must be positive"
        );
    }

    #[tokio::test]
    async fn bad_date_is_rejected_before_anything_is_stored() {
        let f = fixture().await;
        let mut req = request(f.braids_id);
        req.date = Some("not-a-date".into());
        assert!(f.booking.create(req).await.is_err());
        assert_eq!(f.booking.list(PageRequest::default()).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn sixteenth_confirmed_conflicts_but_pending_is_admitted() {
        let f = fixture().await;
        for _ in 0..15 {
            let mut req = request(f.braids_id);
            req.status = Some("confirmed".into());
            f.booking.create(req).await.unwrap();
        }

        let mut req = request(f.braids_id);
        req.status = Some("confirmed".into());
        let err = f.booking.create(req).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let pending = f.booking.create(request(f.braids_id)).await.unwrap();
        assert_eq!(pending.status, AppointmentStatus::Pending);

        let mut other_day = request(f.braids_id);
        other_day.date = Some("2025-03-16".into());
        other_day.status = Some("confirmed".into());
        assert!(f.booking.create(other_day).await.is_ok());
    }

    #[tokio::test]
    async fn update_merges_only_supplied_fields() {
        let f = fixture().await;
        let appt = f.booking.create(request(f.braids_id)).await.unwrap();

        let updated = f
            .booking
            .update(
                appt.id,
                AppointmentChanges {
                    time: Some("09:15".into()),
                    notes: Some("  bring photos ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.time, "09:15");
        assert_eq!(updated.notes.as_deref(), Some("bring photos"));
        assert_eq!(updated.customer_name, appt.customer_name);
        assert_eq!(updated.date, appt.date);
        assert_eq!(updated.id, appt.id);
    }

    #[tokio::test]
    async fn update_checks_description_against_merged_service() {
        let f = fixture().await;
        let appt = f.booking.create(request(f.braids_id)).await.unwrap();

        // Description only: validated against the current service.
        let err = f
            .booking
            .update(
                appt.id,
                AppointmentChanges {
                    service_description: Some("Short".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid service_description for the selected service"
        );

        // Service only: the kept description "Medium" is not a manicure option.
        let err = f
            .booking
            .update(
                appt.id,
                AppointmentChanges {
                    service_id: Some(f.manicure_id),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid service_description for the selected service"
        );

        let ok = f
            .booking
            .update(
                appt.id,
                AppointmentChanges {
                    service_id: Some(f.manicure_id),
                    service_description: Some("Long".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(ok.service_description, "Long");
    }

    #[tokio::test]
    async fn description_update_after_service_removal_names_the_current_service() {
        let f = fixture().await;
        let appt = f.booking.create(request(f.braids_id)).await.unwrap();
        f.services.delete(f.braids_id as u64).await.unwrap();

        let err = f
            .booking
            .update(
                appt.id,
                AppointmentChanges {
                    service_description: Some("Small".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid current service for validation");

        let err = f
            .booking
            .update(
                appt.id,
                AppointmentChanges {
                    service_id: Some(f.braids_id),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid service_id: service not found");
    }

    #[tokio::test]
    async fn update_of_missing_appointment_is_not_found() {
        let f = fixture().await;
        let err = f
            .booking
            .update(42, AppointmentChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn confirming_sends_confirmation() {
        let f = fixture().await;
        let appt = f.booking.create(request(f.braids_id)).await.unwrap();
        f.booking
            .update(
                appt.id,
                AppointmentChanges {
                    status: Some("confirmed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let sent = wait_for(&f.notifier, 2).await;
        assert_eq!(sent[1], "confirmed:1:Knotless Braids");
    }

    #[tokio::test]
    async fn cancel_twice_stays_cancelled() {
        let f = fixture().await;
        let appt = f.booking.create(request(f.braids_id)).await.unwrap();
        f.booking.cancel(appt.id).await.unwrap();
        let again = f.booking.cancel(appt.id).await.unwrap();
        assert_eq!(again.status, AppointmentStatus::Cancelled);

        let err = f.booking.cancel(77).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_create() {
        let services = Arc::new(InMemoryServiceRepository::new());
        let svc = services
            .create(ServiceItemDraft {
                service: "Makeup".into(),
                name: "Soft Glam".into(),
                descriptions: vec!["Day".into()],
                images: vec![],
                rating: 4.0,
            })
            .await
            .unwrap();
        let notifier = Arc::new(RecordingNotifier::failing());
        let booking = BookingService::new(
            Arc::new(InMemoryAppointmentRepository::new(15)),
            services,
            NotificationDispatcher::start(notifier.clone(), ShutdownSignal::new()),
        );

        let mut req = request(svc.id as i64);
        req.service_description = Some("Day".into());
        assert!(booking.create(req).await.is_ok());
        assert_eq!(wait_for(&notifier, 1).await.len(), 1);
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let f = fixture().await;
        let appt = f.booking.create(request(f.braids_id)).await.unwrap();
        f.booking.delete(appt.id).await.unwrap();
        assert!(matches!(
            f.booking.delete(appt.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}

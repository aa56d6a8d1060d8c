//! Ordered appointment checks. Each returns the first failure it finds.

use validator::ValidateEmail;

use crate::domain::{DomainError, DomainResult, ServiceItem, ServiceRepository};

/// Trimmed, non-blank customer contact fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

pub fn require_text(value: Option<&str>, field: &str) -> DomainResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(DomainError::validation(format!("{} is required", field))),
    }
}

pub fn validate_contact(
    name: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
) -> DomainResult<CustomerContact> {
    let name = require_text(name, "customer_name")?;
    let email = require_text(email, "customer_email")?;
    if !email.validate_email() {
        return Err(DomainError::validation("customer_email must be a valid email"));
    }
    let phone = require_text(phone, "customer_phone")?;
    Ok(CustomerContact { name, email, phone })
}

/// Resolve a caller-supplied service id against the catalog.
pub async fn resolve_service(
    services: &dyn ServiceRepository,
    service_id: Option<i64>,
) -> DomainResult<ServiceItem> {
    let id = match service_id {
        Some(id) if id > 0 => id as u64,
        _ => {
            return Err(DomainError::validation(
                "service_id is required and must be positive",
            ))
        }
    };

    services.get(id).await.map_err(|e| match e {
        DomainError::NotFound { .. } => {
            DomainError::validation("invalid service_id: service not found")
        }
        other => other,
    })
}

pub fn check_description(service: &ServiceItem, description: &str) -> DomainResult<()> {
    if description.is_empty() {
        return Err(DomainError::validation("service_description is required"));
    }
    if !service.offers(description) {
        return Err(DomainError::validation(
            "invalid service_description for the selected service",
        ));
    }
    Ok(())
}

pub fn check_price(price_cents: i64) -> DomainResult<i64> {
    if price_cents < 0 {
        return Err(DomainError::validation("price_cents must be >= 0"));
    }
    Ok(price_cents)
}

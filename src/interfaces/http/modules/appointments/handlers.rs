//! Appointment handlers: public booking plus the admin lifecycle.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{AppointmentDto, CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::application::BookingService;
use crate::interfaces::http::common::{
    parse_id, ApiResult, ErrorResponse, JsonBody, PageParams, PageResponse, ValidatedJson,
};

#[derive(Clone)]
pub struct AppointmentState {
    pub booking: Arc<BookingService>,
}

#[utoipa::path(
    post,
    path = "/appointments",
    tag = "Appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentDto),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "No slots left for the date", body = ErrorResponse)
    )
)]
pub async fn create_appointment(
    State(state): State<AppointmentState>,
    JsonBody(request): JsonBody<CreateAppointmentRequest>,
) -> ApiResult<(StatusCode, Json<AppointmentDto>)> {
    let created = state.booking.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    get,
    path = "/admin/appointments",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(PageParams),
    responses(
        (status = 200, description = "Appointments in ID order", body = PageResponse<AppointmentDto>),
        (status = 400, description = "Malformed pagination", body = ErrorResponse)
    )
)]
pub async fn list_appointments(
    State(state): State<AppointmentState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<PageResponse<AppointmentDto>>> {
    let page = state.booking.list(params.page_request()?).await?;
    Ok(Json(PageResponse::from_page(page, AppointmentDto::from)))
}

#[utoipa::path(
    get,
    path = "/admin/appointments/{id}",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = u64, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment", body = AppointmentDto),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_appointment(
    State(state): State<AppointmentState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AppointmentDto>> {
    let appointment = state.booking.get(parse_id(&id)?).await?;
    Ok(Json(appointment.into()))
}

#[utoipa::path(
    put,
    path = "/admin/appointments/{id}",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = u64, Path, description = "Appointment ID")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Merged appointment", body = AppointmentDto),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_appointment(
    State(state): State<AppointmentState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateAppointmentRequest>,
) -> ApiResult<Json<AppointmentDto>> {
    let updated = state.booking.update(parse_id(&id)?, request.into()).await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    put,
    path = "/admin/appointments/{id}/cancel",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = u64, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Cancelled appointment", body = AppointmentDto),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn cancel_appointment(
    State(state): State<AppointmentState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AppointmentDto>> {
    let cancelled = state.booking.cancel(parse_id(&id)?).await?;
    Ok(Json(cancelled.into()))
}

#[utoipa::path(
    delete,
    path = "/admin/appointments/{id}",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = u64, Path, description = "Appointment ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_appointment(
    State(state): State<AppointmentState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.booking.delete(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api::rest::validation::{json_body, optional_text, query_params, Validator};
use crate::engine::lifecycle;
use crate::error::AppError;
use crate::models::booking::{Booking, BookingChanges, BookingFilter, NewBooking};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/booking", post(create_booking).get(list_bookings))
        .route(
            "/booking/:id",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
}

const STATUS_VALUES: &str = "must be one of PENDING, ACCEPTED, REJECTED";

// New bookings always start PENDING, so a `status` in the body is ignored.
fn new_booking(body: &Value) -> Result<NewBooking, AppError> {
    let mut v = Validator::new();
    let load_id = v.uuid(body, "loadId");
    let transporter_id = v.text(body, "transporterId");
    let proposed_rate = v.positive(body, "proposedRate");
    let comment = v.optional_text(body, "comment");

    let new = (|| {
        Some(NewBooking {
            load_id: load_id?,
            transporter_id: transporter_id?,
            proposed_rate: proposed_rate?,
            comment,
        })
    })();

    v.finish(new)
}

// A booking never moves between loads, so `loadId` is ignored here.
fn booking_changes(body: &Value) -> Result<BookingChanges, AppError> {
    let mut v = Validator::new();
    let transporter_id = v.text(body, "transporterId");
    let proposed_rate = v.positive(body, "proposedRate");
    let comment = v.optional_text(body, "comment");
    let status = v.optional_variant(body, "status", STATUS_VALUES);

    let changes = transporter_id
        .zip(proposed_rate)
        .map(|(transporter_id, proposed_rate)| BookingChanges {
            transporter_id,
            proposed_rate,
            comment,
            status,
        });

    v.finish(changes)
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    pub load_id: Option<String>,
    pub transporter_id: Option<String>,
    pub status: Option<String>,
}

impl BookingQuery {
    fn into_filter(self) -> Result<BookingFilter, AppError> {
        let mut v = Validator::new();
        let load_id = v.uuid_param("loadId", self.load_id.as_deref());
        let status = v.variant_param("status", self.status.as_deref(), STATUS_VALUES);
        let transporter_id = optional_text(self.transporter_id.as_deref()).map(str::to_string);

        v.finish(Some(BookingFilter {
            load_id,
            transporter_id,
            status,
        }))
    }
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let new = new_booking(&json_body(payload)?)?;
    let booking = lifecycle::create_booking(&state, new)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn list_bookings(
    State(state): State<Arc<AppState>>,
    query: Result<Query<BookingQuery>, QueryRejection>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let filter = query_params(query)?.into_filter()?;
    Ok(Json(state.store.list_bookings(&filter)))
}

async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.store.get_booking(id)?))
}

async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Booking>, AppError> {
    let changes = booking_changes(&json_body(payload)?)?;
    Ok(Json(lifecycle::update_booking(&state, id, changes)?))
}

async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    lifecycle::delete_booking(&state, id)?;
    Ok(StatusCode::NO_CONTENT)
}

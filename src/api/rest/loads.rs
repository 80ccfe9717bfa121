use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::api::rest::validation::{json_body, optional_text, query_params, Validator};
use crate::error::AppError;
use crate::models::load::{Facility, Load, LoadDetails, LoadFilter, LoadStatus};
use crate::models::page::{Page, PageRequest};
use crate::state::AppState;

const STATUS_VALUES: &str = "must be one of POSTED, BOOKED, CANCELLED";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/load", post(create_load).get(list_loads))
        .route("/load/:id", get(get_load).put(update_load).delete(delete_load))
}

// Shared by create and update. `id`, `status` and `datePosted` in the body
// are ignored.
fn load_details(body: &Value) -> Result<LoadDetails, AppError> {
    let mut v = Validator::new();

    let shipper_id = v.text(body, "shipperId");
    let facility = if v.object(body, "facility") {
        let loading_point = v.text(body, "facility.loadingPoint");
        let unloading_point = v.text(body, "facility.unloadingPoint");
        let loading_date = v.date_time(body, "facility.loadingDate");
        let unloading_date = v.date_time(body, "facility.unloadingDate");
        (|| {
            Some(Facility {
                loading_point: loading_point?,
                unloading_point: unloading_point?,
                loading_date: loading_date?,
                unloading_date: unloading_date?,
            })
        })()
    } else {
        None
    };
    let product_type = v.text(body, "productType");
    let truck_type = v.text(body, "truckType");
    let no_of_trucks = v.positive_count(body, "noOfTrucks");
    let weight = v.positive(body, "weight");
    let comment = v.optional_text(body, "comment");

    let details = (|| {
        Some(LoadDetails {
            shipper_id: shipper_id?,
            facility: facility?,
            product_type: product_type?,
            truck_type: truck_type?,
            no_of_trucks: no_of_trucks?,
            weight: weight?,
            comment,
        })
    })();

    v.finish(details)
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoadQuery {
    pub shipper_id: Option<String>,
    pub truck_type: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
}

impl LoadQuery {
    fn into_parts(
        self,
        default_size: usize,
        max_size: usize,
    ) -> Result<(LoadFilter, PageRequest), AppError> {
        let mut v = Validator::new();
        let default_size = u32::try_from(default_size).unwrap_or(u32::MAX);
        let page = v.count_param("page", self.page.as_deref(), 1);
        let size = v.count_param("size", self.size.as_deref(), default_size);
        let status: Option<LoadStatus> =
            v.variant_param("status", self.status.as_deref(), STATUS_VALUES);

        let request = page.zip(size).map(|(page, size)| PageRequest {
            page: page as usize,
            size: (size as usize).min(max_size),
        });
        let request = v.finish(request)?;

        let filter = LoadFilter {
            shipper_id: optional_text(self.shipper_id.as_deref()).map(str::to_string),
            truck_type: optional_text(self.truck_type.as_deref()).map(str::to_string),
            status,
        };

        Ok((filter, request))
    }
}

async fn create_load(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Load>), AppError> {
    let details = load_details(&json_body(payload)?)?;
    let load = state.store.insert_load(Load::posted(details));
    state.metrics.load_added(load.status);

    info!(load_id = %load.id, shipper_id = %load.shipper_id, "load posted");
    Ok((StatusCode::CREATED, Json(load)))
}

async fn list_loads(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LoadQuery>, QueryRejection>,
) -> Result<Json<Page<Load>>, AppError> {
    let (filter, request) =
        query_params(query)?.into_parts(state.default_page_size, state.max_page_size)?;
    Ok(Json(state.store.list_loads(&filter, request)))
}

async fn get_load(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Load>, AppError> {
    Ok(Json(state.store.get_load(id)?))
}

async fn update_load(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Load>, AppError> {
    let details = load_details(&json_body(payload)?)?;
    let load = state.store.update_load(id, details)?;

    info!(load_id = %load.id, "load updated");
    Ok(Json(load))
}

async fn delete_load(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let record = state.store.delete_load(id)?;
    state.metrics.load_removed(record.load.status);

    info!(
        load_id = %id,
        bookings = record.bookings.len(),
        "load deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadStatus {
    Posted,
    Booked,
    Cancelled,
}

impl LoadStatus {
    pub const ALL: [LoadStatus; 3] = [LoadStatus::Posted, LoadStatus::Booked, LoadStatus::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStatus::Posted => "POSTED",
            LoadStatus::Booked => "BOOKED",
            LoadStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub loading_point: String,
    pub unloading_point: String,
    pub loading_date: NaiveDateTime,
    pub unloading_date: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Load {
    pub id: Uuid,
    pub shipper_id: String,
    pub facility: Facility,
    pub product_type: String,
    pub truck_type: String,
    pub no_of_trucks: u32,
    pub weight: f64,
    pub comment: Option<String>,
    pub date_posted: DateTime<Utc>,
    pub status: LoadStatus,
}

#[derive(Debug, Clone)]
pub struct LoadDetails {
    pub shipper_id: String,
    pub facility: Facility,
    pub product_type: String,
    pub truck_type: String,
    pub no_of_trucks: u32,
    pub weight: f64,
    pub comment: Option<String>,
}

impl Load {
    pub fn posted(details: LoadDetails) -> Self {
        Self {
            id: Uuid::new_v4(),
            shipper_id: details.shipper_id,
            facility: details.facility,
            product_type: details.product_type,
            truck_type: details.truck_type,
            no_of_trucks: details.no_of_trucks,
            weight: details.weight,
            comment: details.comment,
            date_posted: Utc::now(),
            status: LoadStatus::Posted,
        }
    }

    pub fn apply(&mut self, details: LoadDetails) {
        self.shipper_id = details.shipper_id;
        self.facility = details.facility;
        self.product_type = details.product_type;
        self.truck_type = details.truck_type;
        self.no_of_trucks = details.no_of_trucks;
        self.weight = details.weight;
        self.comment = details.comment;
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadFilter {
    pub shipper_id: Option<String>,
    pub truck_type: Option<String>,
    pub status: Option<LoadStatus>,
}

impl LoadFilter {
    pub fn matches(&self, load: &Load) -> bool {
        self.shipper_id
            .as_deref()
            .is_none_or(|shipper_id| load.shipper_id == shipper_id)
            && self
                .truck_type
                .as_deref()
                .is_none_or(|truck_type| load.truck_type == truck_type)
            && self.status.is_none_or(|status| load.status == status)
    }
}

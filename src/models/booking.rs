use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub load_id: Uuid,
    pub transporter_id: String,
    pub proposed_rate: f64,
    pub comment: Option<String>,
    pub status: BookingStatus,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub load_id: Uuid,
    pub transporter_id: String,
    pub proposed_rate: f64,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BookingChanges {
    pub transporter_id: String,
    pub proposed_rate: f64,
    pub comment: Option<String>,
    pub status: Option<BookingStatus>,
}

impl Booking {
    pub fn pending(new: NewBooking) -> Self {
        Self {
            id: Uuid::new_v4(),
            load_id: new.load_id,
            transporter_id: new.transporter_id,
            proposed_rate: new.proposed_rate,
            comment: new.comment,
            status: BookingStatus::Pending,
            requested_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, changes: BookingChanges) {
        self.transporter_id = changes.transporter_id;
        self.proposed_rate = changes.proposed_rate;
        self.comment = changes.comment;
        if let Some(status) = changes.status {
            self.status = status;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub load_id: Option<Uuid>,
    pub transporter_id: Option<String>,
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        self.load_id.is_none_or(|load_id| booking.load_id == load_id)
            && self
                .transporter_id
                .as_deref()
                .is_none_or(|transporter_id| booking.transporter_id == transporter_id)
            && self.status.is_none_or(|status| booking.status == status)
    }
}

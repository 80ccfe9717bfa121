use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::booking::{Booking, BookingChanges, BookingStatus, NewBooking};
use crate::models::load::LoadStatus;
use crate::state::AppState;
use crate::store::LoadTx;

/// Status of a load after a booking is placed on it.
///
/// Any new booking promotes the load to `Booked`, including loads that are
/// already booked. Cancelled loads take no bookings.
pub fn on_created(current: LoadStatus) -> Result<LoadStatus, AppError> {
    match current {
        LoadStatus::Cancelled => Err(AppError::BusinessRule(
            "cannot book a cancelled load".to_string(),
        )),
        LoadStatus::Posted | LoadStatus::Booked => Ok(LoadStatus::Booked),
    }
}

pub fn on_updated(current: LoadStatus, previous: BookingStatus, next: BookingStatus) -> LoadStatus {
    match (previous, next) {
        (BookingStatus::Pending | BookingStatus::Rejected, BookingStatus::Accepted) => {
            LoadStatus::Booked
        }
        _ => current,
    }
}

pub fn on_deleted(current: LoadStatus, remaining: &[Booking]) -> LoadStatus {
    if remaining
        .iter()
        .any(|booking| booking.status == BookingStatus::Accepted)
    {
        current
    } else if remaining.is_empty() {
        LoadStatus::Cancelled
    } else {
        LoadStatus::Posted
    }
}

pub fn create_booking(state: &AppState, new: NewBooking) -> Result<Booking, AppError> {
    observe(state, "create", || {
        let mut tx = state.store.begin(new.load_id)?;
        let next = on_created(tx.load().status).inspect_err(|_| {
            warn!(load_id = %new.load_id, "booking rejected: load is cancelled");
        })?;

        let booking = Booking::pending(new);
        tx.insert_booking(booking.clone());
        commit_with_status(state, tx, next);

        info!(
            booking_id = %booking.id,
            load_id = %booking.load_id,
            transporter_id = %booking.transporter_id,
            "booking created"
        );
        Ok(booking)
    })
}

pub fn update_booking(
    state: &AppState,
    id: Uuid,
    changes: BookingChanges,
) -> Result<Booking, AppError> {
    observe(state, "update", || {
        let mut tx = state.store.begin_for_booking(id)?;
        let current = tx.load().status;

        let booking = tx
            .booking_mut(id)
            .ok_or_else(|| crate::store::booking_not_found(id))?;
        let previous = booking.status;
        booking.apply(changes);
        let updated = booking.clone();

        let next = on_updated(current, previous, updated.status);
        commit_with_status(state, tx, next);

        info!(
            booking_id = %updated.id,
            load_id = %updated.load_id,
            from = ?previous,
            to = ?updated.status,
            "booking updated"
        );
        Ok(updated)
    })
}

pub fn delete_booking(state: &AppState, id: Uuid) -> Result<(), AppError> {
    observe(state, "delete", || {
        let mut tx = state.store.begin_for_booking(id)?;
        let removed = tx
            .remove_booking(id)
            .ok_or_else(|| crate::store::booking_not_found(id))?;

        let next = on_deleted(tx.load().status, tx.bookings());
        commit_with_status(state, tx, next);

        info!(booking_id = %removed.id, load_id = %removed.load_id, "booking deleted");
        Ok(())
    })
}

fn commit_with_status(state: &AppState, mut tx: LoadTx<'_>, next: LoadStatus) {
    let previous = tx.load().status;
    tx.set_status(next);
    let load = tx.commit();

    if previous != next {
        state.metrics.record_transition(previous, next);
        info!(
            load_id = %load.id,
            from = previous.as_str(),
            to = next.as_str(),
            "load status changed"
        );
    }
}

fn observe<T>(
    state: &AppState,
    operation: &str,
    run: impl FnOnce() -> Result<T, AppError>,
) -> Result<T, AppError> {
    let start = Instant::now();
    let result = run();
    let outcome = match &result {
        Ok(_) => "success",
        Err(AppError::NotFound(_)) => "not_found",
        Err(AppError::BusinessRule(_)) => "rejected",
        Err(_) => "error",
    };

    state
        .metrics
        .lifecycle_latency_seconds
        .with_label_values(&[operation])
        .observe(start.elapsed().as_secs_f64());
    state
        .metrics
        .booking_operations_total
        .with_label_values(&[operation, outcome])
        .inc();

    result
}

use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use uuid::Uuid;

use super::LoadRecord;
use crate::models::booking::Booking;
use crate::models::load::{Load, LoadStatus};

/// Write transaction on a single load row. Changes are staged on a copy and
/// only become visible on `commit`; dropping the transaction discards them.
pub struct LoadTx<'a> {
    row: RefMut<'a, Uuid, LoadRecord>,
    staged: LoadRecord,
    booking_index: &'a DashMap<Uuid, Uuid>,
}

impl<'a> LoadTx<'a> {
    pub(super) fn new(
        row: RefMut<'a, Uuid, LoadRecord>,
        booking_index: &'a DashMap<Uuid, Uuid>,
    ) -> Self {
        let staged = row.value().clone();
        Self {
            row,
            staged,
            booking_index,
        }
    }

    pub fn load(&self) -> &Load {
        &self.staged.load
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.staged.bookings
    }

    pub fn booking(&self, id: Uuid) -> Option<&Booking> {
        self.staged.bookings.iter().find(|b| b.id == id)
    }

    pub fn booking_mut(&mut self, id: Uuid) -> Option<&mut Booking> {
        self.staged.bookings.iter_mut().find(|b| b.id == id)
    }

    pub fn insert_booking(&mut self, booking: Booking) {
        self.staged.bookings.push(booking);
    }

    pub fn remove_booking(&mut self, id: Uuid) -> Option<Booking> {
        let position = self.staged.bookings.iter().position(|b| b.id == id)?;
        Some(self.staged.bookings.remove(position))
    }

    pub fn set_status(&mut self, status: LoadStatus) {
        self.staged.load.status = status;
    }

    pub fn commit(self) -> Load {
        let LoadTx {
            mut row,
            staged,
            booking_index,
        } = self;

        for booking in &row.bookings {
            if !staged.bookings.iter().any(|b| b.id == booking.id) {
                booking_index.remove(&booking.id);
            }
        }
        for booking in &staged.bookings {
            booking_index.insert(booking.id, staged.load.id);
        }

        let load = staged.load.clone();
        *row = staged;
        load
    }
}

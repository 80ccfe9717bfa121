mod tx;

use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::booking::{Booking, BookingFilter};
use crate::models::load::{Load, LoadDetails, LoadFilter};
use crate::models::page::{Page, PageRequest};

pub use tx::LoadTx;

#[derive(Debug, Clone)]
pub struct LoadRecord {
    pub load: Load,
    pub bookings: Vec<Booking>,
}

#[derive(Default)]
pub struct Store {
    loads: DashMap<Uuid, LoadRecord>,
    booking_index: DashMap<Uuid, Uuid>,
}

pub(crate) fn load_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("load {id} not found"))
}

pub(crate) fn booking_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("booking {id} not found"))
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_count(&self) -> usize {
        self.loads.len()
    }

    pub fn booking_count(&self) -> usize {
        self.booking_index.len()
    }

    pub fn insert_load(&self, load: Load) -> Load {
        self.loads.insert(
            load.id,
            LoadRecord {
                load: load.clone(),
                bookings: Vec::new(),
            },
        );
        load
    }

    pub fn get_load(&self, id: Uuid) -> Result<Load, AppError> {
        self.loads
            .get(&id)
            .map(|row| row.load.clone())
            .ok_or_else(|| load_not_found(id))
    }

    pub fn list_loads(&self, filter: &LoadFilter, request: PageRequest) -> Page<Load> {
        let mut loads: Vec<Load> = self
            .loads
            .iter()
            .filter(|row| filter.matches(&row.load))
            .map(|row| row.load.clone())
            .collect();

        loads.sort_by(|a, b| a.date_posted.cmp(&b.date_posted).then(a.id.cmp(&b.id)));
        Page::from_sorted(loads, request)
    }

    pub fn update_load(&self, id: Uuid, details: LoadDetails) -> Result<Load, AppError> {
        let mut row = self.loads.get_mut(&id).ok_or_else(|| load_not_found(id))?;
        row.load.apply(details);
        Ok(row.load.clone())
    }

    pub fn delete_load(&self, id: Uuid) -> Result<LoadRecord, AppError> {
        let (_, record) = self.loads.remove(&id).ok_or_else(|| load_not_found(id))?;
        for booking in &record.bookings {
            self.booking_index.remove(&booking.id);
        }
        Ok(record)
    }

    pub fn get_booking(&self, id: Uuid) -> Result<Booking, AppError> {
        let load_id = self.owning_load(id)?;
        self.loads
            .get(&load_id)
            .and_then(|row| row.bookings.iter().find(|b| b.id == id).cloned())
            .ok_or_else(|| booking_not_found(id))
    }

    pub fn list_bookings(&self, filter: &BookingFilter) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = match filter.load_id {
            Some(load_id) => self
                .loads
                .get(&load_id)
                .map(|row| row.bookings.clone())
                .unwrap_or_default(),
            None => self
                .loads
                .iter()
                .flat_map(|row| row.bookings.clone())
                .collect(),
        };

        bookings.retain(|booking| filter.matches(booking));
        bookings.sort_by(|a, b| a.requested_at.cmp(&b.requested_at).then(a.id.cmp(&b.id)));
        bookings
    }

    /// Opens a transaction on a load. The row stays write-locked until the
    /// transaction is committed or dropped.
    pub fn begin(&self, load_id: Uuid) -> Result<LoadTx<'_>, AppError> {
        let row = self
            .loads
            .get_mut(&load_id)
            .ok_or_else(|| load_not_found(load_id))?;
        Ok(LoadTx::new(row, &self.booking_index))
    }

    pub fn begin_for_booking(&self, booking_id: Uuid) -> Result<LoadTx<'_>, AppError> {
        let load_id = self.owning_load(booking_id)?;
        let tx = self.begin(load_id).map_err(|_| booking_not_found(booking_id))?;
        if tx.booking(booking_id).is_none() {
            return Err(booking_not_found(booking_id));
        }
        Ok(tx)
    }

    fn owning_load(&self, booking_id: Uuid) -> Result<Uuid, AppError> {
        self.booking_index
            .get(&booking_id)
            .map(|entry| *entry.value())
            .ok_or_else(|| booking_not_found(booking_id))
    }
}

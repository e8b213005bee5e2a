//! # avail-engine
//!
//! Availability resolution engine for a booking system: reconciles recurring
//! weekly hours, one-off date overrides, monthly blocks and published drop
//! events into a consistent open/closed picture of each civil day, subtracts
//! capacity consumed by existing bookings, and slices the remaining open time
//! into bookable slots sized to a service's duration and buffer — converting
//! between the storefront's IANA wall-clock and UTC at every boundary.
//!
//! The engine is a pure function of its inputs. It reads an immutable
//! snapshot through the [`engine::BookingStore`] trait, holds no state
//! between calls, and fails fast: a collaborator error aborts the whole
//! computation rather than returning a partial slot list.
//!
//! ## Modules
//!
//! - [`rules`] — match weekly/daily/monthly rules and drops against a day
//! - [`resolver`] — priority-layered sweep into open/closed blocks
//! - [`occupancy`] — consumed capacity from pending/confirmed appointments
//! - [`slots`] — duration+buffer stepping over open blocks
//! - [`tz`] — civil/UTC conversion with deterministic DST policies
//! - [`engine`] — orchestration, query validation, cancellation
//! - [`store`] — in-memory `BookingStore` over a JSON snapshot
//! - [`types`] — domain model
//! - [`error`] — error types

pub mod engine;
pub mod error;
pub mod occupancy;
pub mod resolver;
pub mod rules;
pub mod slots;
pub mod store;
pub mod types;
pub mod tz;

pub use engine::{
    compute_availability, compute_availability_cancellable, AvailabilityQuery, BookingStore,
    CancelFlag, MAX_RANGE_DAYS,
};
pub use error::AvailabilityError;
pub use resolver::resolve_day;
pub use store::{MemoryStore, Snapshot};
pub use types::{AvailabilityResponse, AvailableSlot, TimeBlock};
pub use tz::TzMapper;

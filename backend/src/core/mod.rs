//! Core utilities: calendar-date keys and integer-cents money.

pub mod dates;
pub mod money;

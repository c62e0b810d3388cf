//! Calendar and date arithmetic shared by every projection step

pub mod calendar;

pub use calendar::ProjectionCalendar;

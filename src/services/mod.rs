//! Derived views over loaded entities.
//!
//! Services operate purely on already-fetched data; nothing here touches the
//! network.

pub mod durations;

pub use durations::DurationTable;

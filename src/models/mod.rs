//! Typed records for the splits.io data model.
//!
//! Entities are deserialized once from a successful fetch and are immutable
//! afterwards, apart from the one-time [`Resource::normalize`] fixup applied
//! right after deserialization.

pub mod category;
pub mod game;
pub mod runner;
pub mod run;

pub use category::Category;
pub use game::{CategoryCounts, Game};
pub use run::{History, Run, Segment};
pub use runner::Runner;

use serde::de::DeserializeOwned;

/// Binding between an entity type and its API endpoints.
pub trait Resource: DeserializeOwned {
    /// Plural collection name: the endpoint path segment and the default JSON
    /// key under which lists of this entity arrive.
    const COLLECTION: &'static str;

    /// Singular JSON key wrapping this entity in a single-entity response.
    const ITEM_KEY: &'static str;

    /// Identifier used to address this entity in endpoint paths.
    fn canonical_id(&self) -> String;

    /// One-time fixup applied right after deserialization.
    fn normalize(&mut self) {}
}

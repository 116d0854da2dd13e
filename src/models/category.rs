use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::models::{Resource, Run, Runner};
use crate::paginator::Collection;

/// A ruleset for a game (Any%, 100%, MST, ...) and an optional container for
/// runs. Its canonical id is a base-10 number, e.g. `"312"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Category {
    const COLLECTION: &'static str = "categories";
    const ITEM_KEY: &'static str = "category";

    fn canonical_id(&self) -> String {
        self.id.clone()
    }
}

impl Category {
    /// Fetch a category by id.
    pub fn from_id(client: &Client, id: &str) -> Result<Self> {
        client.get_by_id(id, &[])
    }

    /// Runs recorded under this category.
    pub fn runs(&self, client: &Client) -> Result<Collection<Run>> {
        client.associated::<_, Run>(self, None)
    }

    /// Runners with at least one run in this category.
    pub fn runners(&self, client: &Client) -> Result<Collection<Runner>> {
        client.associated::<_, Runner>(self, None)
    }
}

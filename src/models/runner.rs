use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::models::{Category, Game, Resource, Run};
use crate::paginator::Collection;

/// A user with at least one run tied to their account. Its canonical id is
/// the all-lowercased username, e.g. `"glacials"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runner {
    pub id: String,
    pub twitch_id: Option<String>,
    pub twitch_name: Option<String>,
    pub display_name: String,
    pub name: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Runner {
    const COLLECTION: &'static str = "runners";
    const ITEM_KEY: &'static str = "runner";

    fn canonical_id(&self) -> String {
        self.name.to_lowercase()
    }
}

impl Runner {
    /// Fetch a runner by username.
    pub fn from_id(client: &Client, id: &str) -> Result<Self> {
        client.get_by_id(id, &[])
    }

    /// The runner's runs.
    pub fn runs(&self, client: &Client) -> Result<Collection<Run>> {
        client.associated::<_, Run>(self, None)
    }

    /// The runner's personal best runs. The response nests them under `pbs`
    /// rather than the runs collection key.
    pub fn pbs(&self, client: &Client) -> Result<Collection<Run>> {
        client.associated::<_, Run>(self, Some("pbs"))
    }

    /// Games for which the runner has at least one run.
    pub fn games(&self, client: &Client) -> Result<Collection<Game>> {
        client.associated::<_, Game>(self, None)
    }

    /// Categories the runner has participated in.
    pub fn categories(&self, client: &Client) -> Result<Collection<Category>> {
        client.associated::<_, Category>(self, None)
    }
}

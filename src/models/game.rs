use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::models::{Category, Resource, Run, Runner};
use crate::paginator::Collection;

/// A game and a container for its categories. Its canonical id is its
/// speedrun.com shortname when one exists, e.g. `"sms"`, `"sm64"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub name: String,
    pub shortname: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
}

/// A category paired with the number of the game's runs recorded in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCounts {
    pub category: Category,
    pub num_runs: usize,
}

impl Resource for Game {
    const COLLECTION: &'static str = "games";
    const ITEM_KEY: &'static str = "game";

    fn canonical_id(&self) -> String {
        self.shortname.clone().unwrap_or_else(|| self.name.clone())
    }
}

impl Game {
    /// Fetch a game by shortname.
    pub fn from_id(client: &Client, id: &str) -> Result<Self> {
        client.get_by_id(id, &[])
    }

    /// The full game list.
    pub fn all(client: &Client) -> Result<Collection<Game>> {
        client.query(Self::COLLECTION, None)
    }

    /// Runs uploaded for this game.
    pub fn runs(&self, client: &Client) -> Result<Collection<Run>> {
        client.associated::<_, Run>(self, None)
    }

    /// Runners with at least one run of this game.
    pub fn runners(&self, client: &Client) -> Result<Collection<Runner>> {
        client.associated::<_, Runner>(self, None)
    }

    /// The game's categories paired with their run counts, most-run first.
    ///
    /// Returns an empty list when the game record arrived without embedded
    /// categories.
    pub fn category_counts(&self, client: &Client) -> Result<Vec<CategoryCounts>> {
        let categories = match &self.categories {
            Some(categories) => categories,
            None => return Ok(Vec::new()),
        };

        let mut per_category: HashMap<String, usize> = HashMap::new();
        for run in self.runs(client)?.iter() {
            if let Some(category) = run?.category {
                *per_category.entry(category.id).or_default() += 1;
            }
        }

        let mut counts: Vec<CategoryCounts> = categories
            .iter()
            .map(|category| CategoryCounts {
                num_runs: per_category.get(&category.id).copied().unwrap_or(0),
                category: category.clone(),
            })
            .collect();
        counts.sort_by(|a, b| b.num_runs.cmp(&a.num_runs));
        Ok(counts)
    }
}

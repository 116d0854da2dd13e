use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::models::{Category, Game, Resource, Runner};

/// One attempt's record at one segment, or at the run level one attempt's
/// overall record. `attempt_number` is the only stable join key across the
/// run's segment histories; it need not be contiguous or zero-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub attempt_number: i64,
    pub realtime_duration_ms: Option<i64>,
    pub gametime_duration_ms: Option<i64>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

impl History {
    /// Resolved duration in milliseconds.
    ///
    /// Resolution rules, in fixed priority order: the stored realtime
    /// duration, then the stored gametime duration, then the wall-clock gap
    /// between `started_at` and `ended_at` in whole seconds. `None` when no
    /// rule applies.
    pub fn duration_ms(&self) -> Option<i64> {
        if let Some(ms) = self.realtime_duration_ms {
            return Some(ms);
        }
        if let Some(ms) = self.gametime_duration_ms {
            return Some(ms);
        }
        match (self.started_at, self.ended_at) {
            (Some(started), Some(ended)) => Some((ended - started).num_seconds() * 1000),
            _ => None,
        }
    }

    /// Whether the attempt carries a stored duration at this point. An
    /// attempt with neither a realtime nor a gametime duration was abandoned
    /// before this point or never reached it.
    pub fn is_complete(&self) -> bool {
        self.realtime_duration_ms.is_some() || self.gametime_duration_ms.is_some()
    }
}

/// A single timed piece of a run, also called a split. `segment_number`
/// defines the temporal order of split boundaries.
///
/// `histories` holds one entry per attempt that reached this segment. The
/// lists of two segments are independently populated and must be correlated
/// by `attempt_number`, not by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub segment_number: i64,
    pub realtime_start_ms: i64,
    pub realtime_duration_ms: i64,
    pub realtime_end_ms: i64,
    pub realtime_shortest_duration_ms: Option<i64>,
    pub realtime_gold: bool,
    pub realtime_skipped: bool,
    pub realtime_reduced: bool,
    pub gametime_start_ms: i64,
    pub gametime_duration_ms: i64,
    pub gametime_end_ms: i64,
    pub gametime_shortest_duration_ms: Option<i64>,
    pub gametime_gold: bool,
    pub gametime_skipped: bool,
    pub gametime_reduced: bool,
    #[serde(default)]
    pub histories: Option<Vec<History>>,
}

impl Resource for Segment {
    const COLLECTION: &'static str = "segments";
    const ITEM_KEY: &'static str = "segment";

    fn canonical_id(&self) -> String {
        self.id.clone()
    }
}

/// An uploaded splits file: the aggregate root of the timing data.
///
/// `segments` is ordered by `segment_number`. `histories` is the run-level
/// per-attempt summary, present only when the run was fetched with historic
/// data, and sorted ascending by attempt number at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub srdc_id: Option<String>,
    pub realtime_duration_ms: i64,
    pub realtime_sum_of_best_ms: Option<i64>,
    pub gametime_duration_ms: i64,
    pub gametime_sum_of_best_ms: Option<i64>,
    pub default_timing: String,
    pub program: String,
    pub attempts: Option<i64>,
    pub image_url: Option<String>,
    pub parsed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub video_url: Option<String>,
    pub game: Option<Game>,
    pub category: Option<Category>,
    pub runners: Vec<Runner>,
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub histories: Option<Vec<History>>,
}

impl Resource for Run {
    const COLLECTION: &'static str = "runs";
    const ITEM_KEY: &'static str = "run";

    fn canonical_id(&self) -> String {
        self.id.clone()
    }

    fn normalize(&mut self) {
        if let Some(histories) = &mut self.histories {
            histories.sort_by_key(|history| history.attempt_number);
        }
    }
}

impl Run {
    /// Fetch a run by its base-36 id, without historic attempt data.
    pub fn from_id(client: &Client, id: &str) -> Result<Self> {
        client.get_by_id(id, &[("historic", "0")])
    }

    /// Fetch a run with its full attempt histories (run-level and
    /// per-segment), as required by the duration derivation methods.
    pub fn from_id_historic(client: &Client, id: &str) -> Result<Self> {
        client.get_by_id(id, &[("historic", "1")])
    }
}

//! Query façade over the remote API.
//!
//! [`Client::query`] is the single decision point between a one-shot result
//! and a paginated one: pagination headers on the response mean the body is
//! the first page of a larger collection, and the returned
//! [`Collection::Paginated`] is primed with it so page 0 is never fetched
//! twice.

use std::sync::Arc;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::models::Resource;
use crate::paginator::{Collection, Paginator, RemotePageLoader};
use crate::transport::{HttpTransport, Transport};

/// Handle on the remote API. Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Client against the default splits.io API.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Client against a custom base URL / user agent.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: Arc::new(HttpTransport::new(config)?),
        })
    }

    /// Client over an arbitrary transport (fixture, cache, ...).
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Query a collection endpoint.
    ///
    /// The JSON key holding the item array defaults to the entity's
    /// collection name; association queries that nest items under a
    /// different key (a runner's `pbs`, for instance) override it while
    /// still deserializing the same entity type.
    pub fn query<T>(&self, endpoint: &str, key: Option<&str>) -> Result<Collection<T>>
    where
        T: Resource + Clone + 'static,
    {
        let key = key.unwrap_or(T::COLLECTION);
        let response = self.transport.get(endpoint)?;
        let items = decode_items::<T>(&response.body, key, endpoint)?;

        match response.meta {
            None => Ok(Collection::Complete(items)),
            Some(meta) => {
                let loader = RemotePageLoader::new(
                    Arc::clone(&self.transport),
                    endpoint.to_string(),
                    key.to_string(),
                );
                let paginator =
                    Paginator::with_first_page(meta.per_page, meta.total, items, loader)?;
                Ok(Collection::Paginated(paginator))
            }
        }
    }

    /// Fetch one entity by id, with optional query parameters.
    pub fn get_by_id<T: Resource>(&self, id: &str, params: &[(&str, &str)]) -> Result<T> {
        let mut endpoint = format!("{}/{}", T::COLLECTION, id);
        if !params.is_empty() {
            let query: Vec<String> = params
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            endpoint.push('?');
            endpoint.push_str(&query.join("&"));
        }
        self.fetch_one(&endpoint)
    }

    /// Fetch the single entity nested under `T::ITEM_KEY` at `endpoint`.
    pub fn fetch_one<T: Resource>(&self, endpoint: &str) -> Result<T> {
        let response = self.transport.get(endpoint)?;
        let item = response.body.get(T::ITEM_KEY).ok_or_else(|| {
            Error::malformed(endpoint, format!("missing `{}` key", T::ITEM_KEY))
        })?;
        decode_entity(item, endpoint)
    }

    /// Query the objects associated with `owner`, e.g. a category's runs.
    ///
    /// The endpoint is `{owner_collection}/{canonical_id}/{key}`, where `key`
    /// defaults to the target entity's collection name.
    pub fn associated<O, T>(&self, owner: &O, key: Option<&str>) -> Result<Collection<T>>
    where
        O: Resource,
        T: Resource + Clone + 'static,
    {
        let key = key.unwrap_or(T::COLLECTION);
        let endpoint = format!("{}/{}/{}", O::COLLECTION, owner.canonical_id(), key);
        self.query(&endpoint, Some(key))
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

fn decode_entity<T: Resource>(value: &Value, endpoint: &str) -> Result<T> {
    let mut entity: T = serde_path_to_error::deserialize(value).map_err(|e| {
        Error::malformed(endpoint, format!("{} (at {})", e.inner(), e.path()))
    })?;
    entity.normalize();
    Ok(entity)
}

/// Decode the item array under `key`, preserving the response's element
/// order, and normalize each entity.
pub(crate) fn decode_items<T: Resource>(body: &Value, key: &str, endpoint: &str) -> Result<Vec<T>> {
    let items = body
        .get(key)
        .ok_or_else(|| Error::malformed(endpoint, format!("missing `{key}` key")))?
        .as_array()
        .ok_or_else(|| Error::malformed(endpoint, format!("`{key}` is not an array")))?;
    items
        .iter()
        .map(|value| decode_entity(value, endpoint))
        .collect()
}

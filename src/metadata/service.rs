//! Cache-then-fetch orchestration.

use dashmap::DashSet;
use tracing::warn;

use super::catalog::CatalogConnector;
use super::error::{FetchError, FetchResult};
use super::introspector::SchemaIntrospector;
use super::types::MetadataSnapshot;
use crate::cache::{CacheResult, SnapshotStore};
use crate::config::{ConnectionParams, Credentials};

/// Pairs an introspector with a snapshot store.
///
/// A snapshot is saved only after a fetch succeeds, so a failed fetch
/// leaves the previously stored snapshot in place. At most one fetch per
/// profile runs at a time.
pub struct MetadataService<C, S> {
    introspector: SchemaIntrospector<C>,
    store: S,
    in_flight: DashSet<String>,
}

/// Marks a profile as fetching until dropped.
struct FlightGuard<'a> {
    set: &'a DashSet<String>,
    profile_id: String,
}

impl<'a> FlightGuard<'a> {
    fn acquire(set: &'a DashSet<String>, profile_id: &str) -> FetchResult<Self> {
        if !set.insert(profile_id.to_string()) {
            return Err(FetchError::AlreadyInProgress(profile_id.to_string()));
        }
        Ok(Self {
            set,
            profile_id: profile_id.to_string(),
        })
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.profile_id);
    }
}

impl<C: CatalogConnector, S: SnapshotStore> MetadataService<C, S> {
    pub fn new(introspector: SchemaIntrospector<C>, store: S) -> Self {
        Self {
            introspector,
            store,
            in_flight: DashSet::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The stored snapshot for a profile, if any.
    pub fn load_cached(&self, profile_id: &str) -> CacheResult<Option<MetadataSnapshot>> {
        self.store.load(profile_id)
    }

    /// Fetch a fresh snapshot and store it.
    pub async fn fetch_and_save(
        &self,
        profile_id: &str,
        params: &ConnectionParams,
        credentials: &Credentials,
    ) -> FetchResult<MetadataSnapshot> {
        let _guard = FlightGuard::acquire(&self.in_flight, profile_id)?;

        let snapshot = match self.introspector.fetch(profile_id, params, credentials).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    profile_id,
                    error = %e,
                    connection_failure = e.is_connection_failure(),
                    "fetch failed, keeping stored snapshot"
                );
                return Err(e);
            }
        };

        self.store.save(&snapshot)?;
        Ok(snapshot)
    }

    /// Recompute blank identifiers, restamp, and store the result.
    pub fn refresh_identifiers(
        &self,
        snapshot: &MetadataSnapshot,
    ) -> CacheResult<MetadataSnapshot> {
        let refreshed = snapshot.refresh_identifiers();
        self.store.save(&refreshed)?;
        Ok(refreshed)
    }

    /// Check that the profile's database is reachable.
    pub async fn test_connection(
        &self,
        params: &ConnectionParams,
        credentials: &Credentials,
    ) -> FetchResult<()> {
        self.introspector.test_connection(params, credentials).await
    }

    /// Whether a fetch for `profile_id` is running.
    pub fn is_fetching(&self, profile_id: &str) -> bool {
        self.in_flight.contains(profile_id)
    }
}

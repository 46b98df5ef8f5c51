//! Restaurant repository: CRUD over one JSON array stored under one key.
//!
//! Every mutation is a full read of the collection followed by a full
//! rewrite. Mutations are serialized through `write_lock`, so concurrent
//! callers on the same repository never lose each other's changes. Reads do
//! not take the lock.

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::store::JsonStore;
use crate::{CoreError, KeyValueStore, Restaurant, RestaurantId};

/// Storage key of the restaurant collection.
pub const RESTAURANTS_KEY: &str = "restaurants";

pub struct RestaurantRepository<S: KeyValueStore> {
    store: JsonStore<S>,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> RestaurantRepository<S> {
    pub fn new(raw: S) -> Self {
        Self {
            store: JsonStore::new(raw),
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &JsonStore<S> {
        &self.store
    }

    /// Current collection, or `None` when it was never initialized or could
    /// not be read.
    pub async fn list(&self) -> Option<Vec<Restaurant>> {
        self.store.get_item(RESTAURANTS_KEY).await
    }

    /// Overwrite the collection with an empty one. Destroys existing data.
    pub async fn initialize(&self) -> Result<(), CoreError> {
        let _guard = self.write_lock.lock().await;
        self.store
            .try_set_item(RESTAURANTS_KEY, &Vec::<Restaurant>::new())
            .await?;
        info!("restaurant collection initialized");
        Ok(())
    }

    /// Initialize only when no collection is stored. Returns whether it wrote.
    /// A stored value that cannot be read is reported, never overwritten.
    pub async fn ensure_initialized(&self) -> Result<bool, CoreError> {
        let _guard = self.write_lock.lock().await;
        if self
            .store
            .try_get_item::<Vec<Restaurant>>(RESTAURANTS_KEY)
            .await?
            .is_some()
        {
            return Ok(false);
        }
        self.store
            .try_set_item(RESTAURANTS_KEY, &Vec::<Restaurant>::new())
            .await?;
        info!("restaurant collection initialized");
        Ok(true)
    }

    /// Append a record. No id collision check is made.
    pub async fn add(&self, restaurant: Restaurant) -> Result<(), CoreError> {
        restaurant.check_storable()?;
        let _guard = self.write_lock.lock().await;
        let mut all = self.load().await?.unwrap_or_default();
        let id = restaurant.id.clone();
        all.push(restaurant);
        self.save(&all).await?;
        info!(id = %id, total = all.len(), "restaurant added");
        Ok(())
    }

    /// First record whose id matches.
    pub async fn find(&self, id: &RestaurantId) -> Option<Restaurant> {
        let found = self
            .list()
            .await
            .and_then(|all| all.into_iter().find(|r| &r.id == id));
        if found.is_none() {
            debug!(id = %id, "restaurant not found");
        }
        found
    }

    /// Replace the record with the same id, keeping its position.
    pub async fn update(&self, restaurant: Restaurant) -> Result<(), CoreError> {
        restaurant.check_storable()?;
        let _guard = self.write_lock.lock().await;
        let mut all = self.load().await?.unwrap_or_default();
        let Some(slot) = all.iter_mut().find(|r| r.id == restaurant.id) else {
            warn!(id = %restaurant.id, "update of unknown restaurant");
            return Err(CoreError::NotFound(restaurant.id.to_string()));
        };
        let id = restaurant.id.clone();
        *slot = restaurant;
        self.save(&all).await?;
        info!(id = %id, "restaurant updated");
        Ok(())
    }

    /// Remove the record with the given id and return it.
    pub async fn delete(&self, id: &RestaurantId) -> Result<Restaurant, CoreError> {
        let _guard = self.write_lock.lock().await;
        let mut all = self.load().await?.unwrap_or_default();
        let Some(index) = all.iter().position(|r| &r.id == id) else {
            warn!(id = %id, "delete of unknown restaurant");
            return Err(CoreError::NotFound(id.to_string()));
        };
        let removed = all.remove(index);
        self.save(&all).await?;
        info!(id = %id, total = all.len(), "restaurant deleted");
        Ok(removed)
    }

    async fn load(&self) -> Result<Option<Vec<Restaurant>>, CoreError> {
        self.store.try_get_item(RESTAURANTS_KEY).await
    }

    async fn save(&self, all: &[Restaurant]) -> Result<(), CoreError> {
        self.store.try_set_item(RESTAURANTS_KEY, all).await
    }
}

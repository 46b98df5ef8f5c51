use tracing::info;

use crate::form::RestaurantForm;
use crate::repository::RestaurantRepository;
use crate::share::ShareLinks;
use crate::{CoreError, IdGenerator, KeyValueStore, Location, Restaurant, RestaurantId};

/// Application service behind the directory front end.
///
/// Validates forms, assigns ids to new records, and routes submissions to
/// add or update. It stays generic over the storage engine and the id
/// strategy so the same flows run against memory in tests and SQLite in the
/// binary.
pub struct DirectoryService<S: KeyValueStore, G: IdGenerator> {
    repo: RestaurantRepository<S>,
    ids: G,
}

impl<S: KeyValueStore, G: IdGenerator> DirectoryService<S, G> {
    pub fn new(store: S, ids: G) -> Self {
        Self {
            repo: RestaurantRepository::new(store),
            ids,
        }
    }

    pub fn repository(&self) -> &RestaurantRepository<S> {
        &self.repo
    }

    /// Create the empty collection on first use.
    pub async fn ensure_initialized(&self) -> Result<bool, CoreError> {
        self.repo.ensure_initialized().await
    }

    /// All records in stored order; empty when nothing is stored yet.
    pub async fn list(&self) -> Vec<Restaurant> {
        self.repo.list().await.unwrap_or_default()
    }

    pub async fn get(&self, id: &RestaurantId) -> Result<Restaurant, CoreError> {
        self.repo
            .find(id)
            .await
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    /// Add a new record from the form, validating it first.
    pub async fn create(
        &self,
        form: RestaurantForm,
        location: Location,
    ) -> Result<Restaurant, CoreError> {
        let id = self.fresh_id().await?;
        let restaurant = form.into_restaurant(id, location)?;
        self.repo.add(restaurant.clone()).await?;
        Ok(restaurant)
    }

    /// Replace an existing record with the form contents.
    pub async fn edit(
        &self,
        id: &RestaurantId,
        form: RestaurantForm,
        location: Location,
    ) -> Result<Restaurant, CoreError> {
        let restaurant = form.into_restaurant(id.clone(), location)?;
        self.repo.update(restaurant.clone()).await?;
        Ok(restaurant)
    }

    /// Add when `existing` is `None`, otherwise update that record.
    pub async fn submit(
        &self,
        form: RestaurantForm,
        location: Location,
        existing: Option<&RestaurantId>,
    ) -> Result<Restaurant, CoreError> {
        match existing {
            Some(id) => self.edit(id, form, location).await,
            None => self.create(form, location).await,
        }
    }

    pub async fn delete(&self, id: &RestaurantId) -> Result<Restaurant, CoreError> {
        self.repo.delete(id).await
    }

    /// Records whose name or any tag contains `query`, ignoring case.
    pub async fn search(&self, query: &str) -> Vec<Restaurant> {
        self.list()
            .await
            .into_iter()
            .filter(|r| r.matches(query))
            .collect()
    }

    pub async fn share_links(
        &self,
        id: &RestaurantId,
        origin: Option<Location>,
    ) -> Result<ShareLinks, CoreError> {
        let restaurant = self.get(id).await?;
        Ok(ShareLinks::for_restaurant(&restaurant, origin))
    }

    async fn fresh_id(&self) -> Result<RestaurantId, CoreError> {
        let taken: Vec<RestaurantId> = self.list().await.into_iter().map(|r| r.id).collect();
        // Hard cap in case a generator keeps handing out taken ids.
        for _ in 0..100 {
            let id = self.ids.next_id();
            if !taken.contains(&id) {
                return Ok(id);
            }
            info!(id = %id, "generated id already taken, retrying");
        }
        Err(CoreError::Storage("failed to generate unique id".into()))
    }
}

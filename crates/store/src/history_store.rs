//! History store: the persistence capability consumed by the lifecycle
//! controller and the API layer.
//!
//! Saving hosts each image through the asset host first (falling back to
//! the provider's original URL when an upload fails), then writes the
//! record. Deleting removes the record and the hosted images
//! best-effort.

use std::sync::Arc;

use async_trait::async_trait;

use rusher_core::error::CoreError;
use rusher_core::history::{GenerationSettings, HistoryRecord};

use crate::assets::{extract_public_id, AssetHost};
use crate::models::history::NewHistoryRecord;
use crate::repositories::HistoryRepo;
use crate::DbPool;

/// Persistence capability for completed generations. User identity is an
/// explicit parameter on every call.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist one completed generation, returning the stored record.
    async fn save(
        &self,
        user_id: &str,
        prompt: &str,
        images: &[String],
        settings: &GenerationSettings,
    ) -> Result<HistoryRecord, CoreError>;

    /// List the user's records, most recent first.
    async fn list(&self, user_id: &str, limit: i64) -> Result<Vec<HistoryRecord>, CoreError>;

    /// Fetch one record.
    async fn get(&self, user_id: &str, id: &str) -> Result<HistoryRecord, CoreError>;

    /// Delete a record and its hosted images (images best-effort).
    async fn delete(&self, user_id: &str, id: &str) -> Result<(), CoreError>;
}

/// Postgres-backed [`HistoryStore`] that hosts images via an
/// [`AssetHost`].
pub struct PgHistoryStore {
    pool: DbPool,
    assets: Arc<dyn AssetHost>,
}

impl PgHistoryStore {
    pub fn new(pool: DbPool, assets: Arc<dyn AssetHost>) -> Self {
        Self { pool, assets }
    }

    /// Host every image, keeping the original URL for any that fail.
    async fn host_images(&self, images: &[String]) -> Vec<String> {
        let mut hosted = Vec::with_capacity(images.len());
        for url in images {
            match self.assets.upload(url).await {
                Ok(hosted_url) => hosted.push(hosted_url),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Image upload failed, keeping original URL");
                    hosted.push(url.clone());
                }
            }
        }
        hosted
    }
}

fn parse_record_id(id: &str) -> Result<uuid::Uuid, CoreError> {
    id.parse().map_err(|_| CoreError::NotFound {
        entity: "HistoryRecord",
        id: id.to_string(),
    })
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn save(
        &self,
        user_id: &str,
        prompt: &str,
        images: &[String],
        settings: &GenerationSettings,
    ) -> Result<HistoryRecord, CoreError> {
        let hosted = self.host_images(images).await;

        let input = NewHistoryRecord {
            prompt: prompt.to_string(),
            images: hosted,
            settings: settings.clone(),
        };

        let row = HistoryRepo::create(&self.pool, user_id, &input)
            .await
            .map_err(|e| CoreError::Persistence(e.to_string()))?;

        tracing::info!(user_id, record_id = %row.id, "Saved generation to history");
        Ok(row.into())
    }

    async fn list(&self, user_id: &str, limit: i64) -> Result<Vec<HistoryRecord>, CoreError> {
        let rows = HistoryRepo::list(&self.pool, user_id, limit)
            .await
            .map_err(|e| CoreError::Persistence(e.to_string()))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, user_id: &str, id: &str) -> Result<HistoryRecord, CoreError> {
        let record_id = parse_record_id(id)?;
        let row = HistoryRepo::find_by_id(&self.pool, user_id, record_id)
            .await
            .map_err(|e| CoreError::Persistence(e.to_string()))?
            .ok_or(CoreError::NotFound {
                entity: "HistoryRecord",
                id: id.to_string(),
            })?;
        Ok(row.into())
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<(), CoreError> {
        let record = self.get(user_id, id).await?;

        for url in &record.images {
            match extract_public_id(url) {
                Some(public_id) => self.assets.delete(&public_id).await,
                None => tracing::warn!(url = %url, "Could not derive public id from image URL"),
            }
        }

        let record_id = parse_record_id(id)?;
        let deleted = HistoryRepo::delete(&self.pool, user_id, record_id)
            .await
            .map_err(|e| CoreError::Persistence(e.to_string()))?;
        if !deleted {
            return Err(CoreError::NotFound {
                entity: "HistoryRecord",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_must_be_a_uuid() {
        assert!(parse_record_id("not-a-uuid").is_err());
        assert!(parse_record_id(&uuid::Uuid::new_v4().to_string()).is_ok());
    }
}

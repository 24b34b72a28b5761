use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::database::is_unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::truck_drivers::dtos::{
    CreateTruckDriverDto, TruckDriverDto, UpdateTruckDriverDto,
};
use crate::features::truck_drivers::models::TruckDriver;
use crate::modules::storage::{MinIOClient, Photo};
use crate::shared::constants::DRIVER_LICENSE_FOLDER;

/// Registry of trucks, their drivers and license photos
pub struct TruckDriverService {
    pool: PgPool,
    storage: Arc<MinIOClient>,
}

/// License photo left behind by a removed row. No row means nothing was deleted.
fn deleted_photo(id: Uuid, deleted: Option<(Option<String>,)>) -> Result<Option<String>> {
    match deleted {
        Some((photo,)) => Ok(photo),
        None => Err(AppError::NotFound(format!("Truck driver {} not found", id))),
    }
}

fn duplicate_plate(number_plate: &str) -> AppError {
    AppError::Conflict(format!(
        "A driver with number plate '{}' already exists.",
        number_plate
    ))
}

impl TruckDriverService {
    pub fn new(pool: PgPool, storage: Arc<MinIOClient>) -> Self {
        Self { pool, storage }
    }

    /// Drivers for the loading form, alphabetical
    pub async fn list_for_form(&self) -> Result<Vec<TruckDriverDto>> {
        let rows = sqlx::query_as::<_, TruckDriver>(
            "SELECT * FROM truck_drivers ORDER BY driver_name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list truck drivers: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Drivers for the super-admin panel, newest first
    pub async fn list_all(&self) -> Result<Vec<TruckDriverDto>> {
        let rows = sqlx::query_as::<_, TruckDriver>(
            "SELECT * FROM truck_drivers ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list truck drivers: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<TruckDriver>> {
        let row = sqlx::query_as::<_, TruckDriver>("SELECT * FROM truck_drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn get(&self, id: Uuid) -> Result<TruckDriver> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Truck driver {} not found", id)))
    }

    pub async fn create(
        &self,
        dto: CreateTruckDriverDto,
        license_photo: Option<Photo>,
    ) -> Result<TruckDriverDto> {
        let photo_url = match license_photo {
            Some(photo) => Some(
                self.storage
                    .upload_photo(DRIVER_LICENSE_FOLDER, photo)
                    .await?,
            ),
            None => None,
        };

        let inserted = sqlx::query_as::<_, TruckDriver>(
            r#"
            INSERT INTO truck_drivers (id, driver_name, number_plate, cubic_meters, contact, license_photo_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(dto.driver_name.trim())
        .bind(dto.number_plate.trim())
        .bind(dto.cubic_meters)
        .bind(dto.contact.trim())
        .bind(photo_url.as_deref())
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(driver) => {
                tracing::info!(
                    "Truck driver registered: id={}, plate={}",
                    driver.id,
                    driver.number_plate
                );
                Ok(driver.into())
            }
            Err(e) => {
                if let Some(url) = &photo_url {
                    self.discard_photo(url).await;
                }
                if is_unique_violation(&e) {
                    return Err(duplicate_plate(dto.number_plate.trim()));
                }
                tracing::error!("Failed to insert truck driver: {:?}", e);
                Err(AppError::Database(e))
            }
        }
    }

    /// Apply an edit. A new license photo replaces the stored one.
    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateTruckDriverDto,
        license_photo: Option<Photo>,
    ) -> Result<TruckDriverDto> {
        let existing = self.get(id).await?;

        let new_photo_url = match license_photo {
            Some(photo) => Some(
                self.storage
                    .upload_photo(DRIVER_LICENSE_FOLDER, photo)
                    .await?,
            ),
            None => None,
        };

        let updated = sqlx::query_as::<_, TruckDriver>(
            r#"
            UPDATE truck_drivers SET
                driver_name = COALESCE($2, driver_name),
                number_plate = COALESCE($3, number_plate),
                cubic_meters = COALESCE($4, cubic_meters),
                contact = COALESCE($5, contact),
                license_photo_url = COALESCE($6, license_photo_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.driver_name.as_deref().map(str::trim))
        .bind(dto.number_plate.as_deref().map(str::trim))
        .bind(dto.cubic_meters)
        .bind(dto.contact.as_deref().map(str::trim))
        .bind(new_photo_url.as_deref())
        .fetch_optional(&self.pool)
        .await;

        let driver = match updated {
            Ok(Some(driver)) => driver,
            Ok(None) => {
                if let Some(url) = &new_photo_url {
                    self.discard_photo(url).await;
                }
                return Err(AppError::NotFound(format!("Truck driver {} not found", id)));
            }
            Err(e) => {
                if let Some(url) = &new_photo_url {
                    self.discard_photo(url).await;
                }
                if is_unique_violation(&e) {
                    let plate = dto.number_plate.as_deref().unwrap_or(&existing.number_plate);
                    return Err(duplicate_plate(plate.trim()));
                }
                tracing::error!("Failed to update truck driver {}: {:?}", id, e);
                return Err(AppError::Database(e));
            }
        };

        if new_photo_url.is_some() {
            if let Some(old_url) = &existing.license_photo_url {
                self.discard_photo(old_url).await;
            }
        }

        tracing::info!("Truck driver updated: id={}", driver.id);
        Ok(driver.into())
    }

    /// Remove the row, then its license photo
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let deleted: Option<(Option<String>,)> = sqlx::query_as(
            "DELETE FROM truck_drivers WHERE id = $1 RETURNING license_photo_url",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete truck driver {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        if let Some(url) = deleted_photo(id, deleted)? {
            self.discard_photo(&url).await;
        }

        tracing::info!("Truck driver deleted: id={}", id);
        Ok(())
    }

    /// Photo removal never fails the surrounding operation
    async fn discard_photo(&self, url: &str) {
        if let Err(e) = self.storage.delete_by_url(url).await {
            tracing::warn!("Failed to delete license photo {}: {}", url, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deleted_photo_only_after_row_removal() {
        let id = Uuid::now_v7();
        assert!(matches!(deleted_photo(id, None), Err(AppError::NotFound(_))));
        assert_eq!(deleted_photo(id, Some((None,))).unwrap(), None);

        let url = "http://localhost:9000/haulage/licenses/a.jpg".to_string();
        assert_eq!(deleted_photo(id, Some((Some(url.clone()),))).unwrap(), Some(url));
    }
}

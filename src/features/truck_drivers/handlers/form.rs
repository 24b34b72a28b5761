use axum::extract::Multipart;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::truck_drivers::dtos::{CreateTruckDriverDto, UpdateTruckDriverDto};
use crate::modules::storage::Photo;

/// Raw fields of the driver registration / edit form
#[derive(Debug, Default)]
pub struct DriverFormFields {
    pub driver_name: Option<String>,
    pub number_plate: Option<String>,
    pub cubic_meters: Option<String>,
    pub contact: Option<String>,
    pub license_photo: Option<Photo>,
}

impl DriverFormFields {
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            debug!("Failed to read multipart field: {}", e);
            AppError::BadRequest(format!("Failed to read multipart data: {}", e))
        })? {
            let name = field.name().unwrap_or("").to_string();

            if name == "license_photo" {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read license photo: {}", e))
                })?;
                // Browsers send an empty part when no file was picked
                if !data.is_empty() {
                    form.license_photo = Some(Photo::new(data.to_vec(), &content_type)?);
                }
                continue;
            }

            let slot = match name.as_str() {
                "driver_name" => &mut form.driver_name,
                "number_plate" => &mut form.number_plate,
                "cubic_meters" => &mut form.cubic_meters,
                "contact" => &mut form.contact,
                _ => {
                    debug!("Ignoring unknown field: {}", name);
                    continue;
                }
            };
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read field '{}': {}", name, e)))?;
            *slot = Some(text.trim().to_string()).filter(|t| !t.is_empty());
        }

        Ok(form)
    }

    /// Registration requires every text field
    pub fn into_create(self) -> Result<(CreateTruckDriverDto, Option<Photo>)> {
        let (Some(driver_name), Some(number_plate), Some(cubic_meters), Some(contact)) = (
            self.driver_name,
            self.number_plate,
            self.cubic_meters,
            self.contact,
        ) else {
            return Err(AppError::Validation(
                "Please fill in all required fields, including contact number.".to_string(),
            ));
        };

        let dto = CreateTruckDriverDto {
            driver_name,
            number_plate,
            cubic_meters: parse_capacity(&cubic_meters)?,
            contact,
        };
        Ok((dto, self.license_photo))
    }

    pub fn into_update(self) -> Result<(UpdateTruckDriverDto, Option<Photo>)> {
        let dto = UpdateTruckDriverDto {
            driver_name: self.driver_name,
            number_plate: self.number_plate,
            cubic_meters: self.cubic_meters.as_deref().map(parse_capacity).transpose()?,
            contact: self.contact,
        };
        Ok((dto, self.license_photo))
    }
}

fn parse_capacity(raw: &str) -> Result<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::Validation("Cubic meters must be a number".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn complete() -> DriverFormFields {
        DriverFormFields {
            driver_name: Some("John Okello".to_string()),
            number_plate: Some("UBA 123X".to_string()),
            cubic_meters: Some("12".to_string()),
            contact: Some("+256 700 123456".to_string()),
            license_photo: None,
        }
    }

    #[test]
    fn test_into_create() {
        let (dto, photo) = complete().into_create().unwrap();
        assert_eq!(dto.cubic_meters, 12.0);
        assert!(dto.validate().is_ok());
        assert!(photo.is_none());
    }

    #[test]
    fn test_into_create_requires_contact() {
        let mut form = complete();
        form.contact = None;
        assert!(matches!(form.into_create(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_capacity_must_be_positive_number() {
        let mut form = complete();
        form.cubic_meters = Some("twelve".to_string());
        assert!(form.into_create().is_err());

        let mut form = complete();
        form.cubic_meters = Some("0".to_string());
        let (dto, _) = form.into_create().unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_invalid_plate_fails_validation() {
        let mut form = complete();
        form.number_plate = Some("UBA_123".to_string());
        let (dto, _) = form.into_create().unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_into_update_keeps_absent_fields_empty() {
        let form = DriverFormFields {
            cubic_meters: Some("8.5".to_string()),
            ..Default::default()
        };
        let (dto, _) = form.into_update().unwrap();
        assert_eq!(dto.cubic_meters, Some(8.5));
        assert!(dto.driver_name.is_none());
        assert!(dto.validate().is_ok());
    }
}

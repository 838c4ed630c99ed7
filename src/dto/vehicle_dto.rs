use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::models::Vehicle;
use crate::utils::validation::{validate_not_blank, validate_photo_data_url};

// Request para registrar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_not_blank")]
    pub name: String,

    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,

    pub color: Option<String>,

    #[validate(range(min = 0))]
    pub mileage: i64,

    pub insurance_expiry: NaiveDate,
    pub tax_expiry: NaiveDate,
    pub road_tax_expiry: NaiveDate,
    pub mot_expiry: NaiveDate,

    #[validate(custom = "validate_photo_data_url")]
    pub photo: Option<String>,
}

impl CreateVehicleRequest {
    pub fn into_vehicle(self) -> Vehicle {
        Vehicle {
            id: String::new(),
            name: self.name.trim().to_string(),
            year: self.year,
            color: normalize_color(self.color),
            mileage: self.mileage,
            insurance_expiry: self.insurance_expiry,
            tax_expiry: self.tax_expiry,
            road_tax_expiry: self.road_tax_expiry,
            mot_expiry: self.mot_expiry,
            photo: self.photo,
        }
    }
}

// Request para actualizar un vehículo: sólo cambian los campos presentes
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(custom = "validate_not_blank")]
    pub name: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,

    pub color: Option<String>,

    #[validate(range(min = 0))]
    pub mileage: Option<i64>,

    pub insurance_expiry: Option<NaiveDate>,
    pub tax_expiry: Option<NaiveDate>,
    pub road_tax_expiry: Option<NaiveDate>,
    pub mot_expiry: Option<NaiveDate>,

    #[validate(custom = "validate_photo_data_url")]
    pub photo: Option<String>,

    /// Quitar la foto actual
    #[serde(default)]
    pub remove_photo: bool,
}

impl UpdateVehicleRequest {
    pub fn apply_to(self, vehicle: &mut Vehicle) {
        if let Some(name) = self.name {
            vehicle.name = name.trim().to_string();
        }
        if let Some(year) = self.year {
            vehicle.year = year;
        }
        if self.color.is_some() {
            vehicle.color = normalize_color(self.color);
        }
        if let Some(mileage) = self.mileage {
            vehicle.mileage = mileage;
        }
        if let Some(date) = self.insurance_expiry {
            vehicle.insurance_expiry = date;
        }
        if let Some(date) = self.tax_expiry {
            vehicle.tax_expiry = date;
        }
        if let Some(date) = self.road_tax_expiry {
            vehicle.road_tax_expiry = date;
        }
        if let Some(date) = self.mot_expiry {
            vehicle.mot_expiry = date;
        }
        if self.remove_photo {
            vehicle.photo = None;
        } else if self.photo.is_some() {
            vehicle.photo = self.photo;
        }
    }
}

fn normalize_color(color: Option<String>) -> Option<String> {
    color
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_request() -> CreateVehicleRequest {
        serde_json::from_value(json!({
            "name": " Honda Civic ",
            "year": 2018,
            "color": "",
            "mileage": 42000,
            "insurance_expiry": "2025-01-01",
            "tax_expiry": "2025-02-01",
            "road_tax_expiry": "2025-03-01",
            "mot_expiry": "2025-04-01"
        }))
        .unwrap()
    }

    #[test]
    fn test_create_request_is_valid_and_normalized() {
        let request = create_request();
        assert!(request.validate().is_ok());

        let vehicle = request.into_vehicle();
        assert_eq!(vehicle.name, "Honda Civic");
        assert_eq!(vehicle.color, None);
        assert_eq!(vehicle.mileage, 42000);
    }

    #[test]
    fn test_create_request_rejects_missing_name_and_bad_year() {
        let mut request = create_request();
        request.name = "  ".to_string();
        request.year = 1800;
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("year"));
    }

    #[test]
    fn test_create_request_requires_expiry_dates() {
        let result: Result<CreateVehicleRequest, _> = serde_json::from_value(json!({
            "name": "Civic",
            "year": 2018,
            "mileage": 0,
            "insurance_expiry": "2025-01-01"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_applies_only_present_fields() {
        let mut vehicle = create_request().into_vehicle();
        vehicle.photo = Some("data:image/png;base64,AAAA".to_string());

        let request = UpdateVehicleRequest {
            color: Some("Blue".to_string()),
            mileage: Some(43000),
            remove_photo: true,
            ..Default::default()
        };
        request.apply_to(&mut vehicle);

        assert_eq!(vehicle.name, "Honda Civic");
        assert_eq!(vehicle.color.as_deref(), Some("Blue"));
        assert_eq!(vehicle.mileage, 43000);
        assert!(vehicle.photo.is_none());
    }
}

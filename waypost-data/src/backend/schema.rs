//! Wire format of the POI backend.
//!
//! The backend speaks Spanish field names; these records translate them to
//! and from the core model.

use serde::{Deserialize, Serialize};
use waypost_core::{Coordinate, NewPointOfInterest, PointOfInterest, ServiceError};

/// A point as returned by `GET /puntos` and `GET /puntos/cercanos`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PointRecord {
    /// Backend identifier.
    pub id: u64,
    /// Display name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Free-form description.
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    /// Category name.
    #[serde(rename = "categoria")]
    pub category: String,
    /// Postal address.
    #[serde(rename = "direccion", default)]
    pub address: Option<String>,
    /// Contact phone.
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    /// Contact e-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Website URL.
    #[serde(default)]
    pub website: Option<String>,
    /// Latitude in degrees.
    #[serde(rename = "latitud")]
    pub latitude: f64,
    /// Longitude in degrees.
    #[serde(rename = "longitud")]
    pub longitude: f64,
}

impl TryFrom<PointRecord> for PointOfInterest {
    type Error = ServiceError;

    fn try_from(record: PointRecord) -> Result<Self, Self::Error> {
        if record.name.trim().is_empty() {
            return Err(ServiceError::parse(format!("point {} has no name", record.id)));
        }
        let location = Coordinate::checked(record.latitude, record.longitude)
            .map_err(|err| ServiceError::parse(format!("point {}: {err}", record.id)))?;
        Ok(Self {
            id: record.id,
            name: record.name,
            description: non_blank(record.description),
            category: record.category,
            address: non_blank(record.address),
            phone: non_blank(record.phone),
            email: non_blank(record.email),
            website: non_blank(record.website),
            location,
        })
    }
}

/// Body of `POST /puntos`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPointRecord<'a> {
    #[serde(rename = "nombre")]
    name: &'a str,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(rename = "categoria")]
    category: &'a str,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    website: Option<&'a str>,
    #[serde(rename = "latitud")]
    latitude: f64,
    #[serde(rename = "longitud")]
    longitude: f64,
}

impl<'a> NewPointRecord<'a> {
    /// Build the request body for a validated form at `location`.
    pub fn new(form: &'a NewPointOfInterest, location: Coordinate) -> Self {
        Self {
            name: form.name.trim(),
            description: non_blank_ref(form.description.as_deref()),
            category: form.category.trim(),
            address: non_blank_ref(form.address.as_deref()),
            phone: non_blank_ref(form.phone.as_deref()),
            email: non_blank_ref(form.email.as_deref()),
            website: non_blank_ref(form.website.as_deref()),
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn non_blank_ref(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn decodes_backend_point() {
        let json = r#"{
            "id": 7,
            "nombre": "Catedral Nueva",
            "descripcion": "",
            "categoria": "Turismo",
            "direccion": "Calle Sucre",
            "telefono": null,
            "latitud": -2.8974,
            "longitud": -79.0050
        }"#;
        let record: PointRecord = serde_json::from_str(json).expect("valid record");
        let poi = PointOfInterest::try_from(record).expect("valid point");
        assert_eq!(poi.id, 7);
        assert_eq!(poi.name, "Catedral Nueva");
        assert_eq!(poi.description, None);
        assert_eq!(poi.address.as_deref(), Some("Calle Sucre"));
        assert_eq!(poi.location, Coordinate::new(-2.8974, -79.0050));
    }

    #[rstest]
    fn rejects_out_of_range_points() {
        let json = r#"{"id": 1, "nombre": "x", "categoria": "Parque", "latitud": 120.0, "longitud": 0.0}"#;
        let record: PointRecord = serde_json::from_str(json).expect("valid record");
        let err = PointOfInterest::try_from(record).expect_err("out of range");
        assert!(matches!(err, ServiceError::Parse { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_unnamed_points(#[case] name: &str) {
        let record = PointRecord {
            id: 3,
            name: name.into(),
            description: None,
            category: "Parque".into(),
            address: None,
            phone: None,
            email: None,
            website: None,
            latitude: -2.9,
            longitude: -79.0,
        };
        let err = PointOfInterest::try_from(record).expect_err("blank name");
        assert!(matches!(err, ServiceError::Parse { .. }));
    }

    #[rstest]
    fn encodes_form_with_backend_names() {
        let form = NewPointOfInterest {
            name: " Mirador de Turi ".into(),
            category: "Parque".into(),
            phone: Some("  ".into()),
            ..NewPointOfInterest::default()
        };
        let body = NewPointRecord::new(&form, Coordinate::new(-2.92, -79.0));
        let value = serde_json::to_value(&body).expect("serialisable");
        assert_eq!(
            value,
            serde_json::json!({
                "nombre": "Mirador de Turi",
                "categoria": "Parque",
                "latitud": -2.92,
                "longitud": -79.0
            })
        );
    }
}

//! Bike (product) entity, its payloads and its wire view.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::validation::{check_name, require, ValidationErrors};

/// Longest accepted bike name, in characters.
pub const BIKE_NAME_MAX: usize = 100;

/// A stored bike with its category's display name resolved.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Bike {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub category_id: i64,
    pub category_name: String,
}

/// Wire representation of a bike.
///
/// The category is surfaced by name, not by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BikeView {
    pub id: i64,
    #[schema(example = "Speedster")]
    pub name: String,
    #[schema(example = 999.5)]
    pub price: f64,
    #[schema(example = 3)]
    pub stock: i64,
    /// Name of the category the bike belongs to.
    #[schema(example = "Road")]
    pub category: String,
}

impl From<Bike> for BikeView {
    fn from(bike: Bike) -> Self {
        Self {
            id: bike.id,
            name: bike.name,
            price: bike.price,
            stock: bike.stock,
            category: bike.category_name,
        }
    }
}

/// Body of `POST /bikes` and `PUT /bikes/{id}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BikePayload {
    /// Display name, 1 to 100 characters.
    #[schema(example = "Speedster")]
    pub name: Option<String>,
    /// Non-negative price.
    #[schema(example = 999.5)]
    pub price: Option<f64>,
    /// Non-negative number of units in stock.
    #[schema(example = 3)]
    pub stock: Option<i64>,
    /// Id of an existing category.
    #[schema(example = 1)]
    pub category_id: Option<i64>,
}

/// A validated bike ready to insert. The category is not yet known to exist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBike {
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub category_id: i64,
}

/// Validated partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BikeChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub category_id: Option<i64>,
}

impl BikeChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.category_id.is_none()
    }
}

fn check_fields(errors: &mut ValidationErrors, payload: &BikePayload) {
    if let Some(name) = &payload.name {
        check_name(errors, "name", name, BIKE_NAME_MAX);
    }
    if let Some(price) = payload.price {
        if !price.is_finite() || price < 0.0 {
            errors.push("price", "must be a non-negative number");
        }
    }
    if let Some(stock) = payload.stock {
        if stock < 0 {
            errors.push("stock", "must not be negative");
        }
    }
}

impl BikePayload {
    /// Validate as a create request: every field is required.
    pub fn into_new(self) -> Result<NewBike, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_fields(&mut errors, &self);

        let name = require(&mut errors, "name", self.name);
        let price = require(&mut errors, "price", self.price);
        let stock = require(&mut errors, "stock", self.stock);
        let category_id = require(&mut errors, "category_id", self.category_id);

        match (name, price, stock, category_id) {
            (Some(name), Some(price), Some(stock), Some(category_id)) => errors.finish(NewBike {
                name,
                price,
                stock,
                category_id,
            }),
            _ => Err(errors),
        }
    }

    /// Validate as a partial update: only supplied fields are checked.
    pub fn into_changes(self) -> Result<BikeChanges, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_fields(&mut errors, &self);
        errors.finish(BikeChanges {
            name: self.name,
            price: self.price,
            stock: self.stock,
            category_id: self.category_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> BikePayload {
        BikePayload {
            name: Some("Speedster".into()),
            price: Some(999.5),
            stock: Some(3),
            category_id: Some(1),
        }
    }

    #[test]
    fn create_accepts_full_payload() {
        let bike = full_payload().into_new().unwrap();
        assert_eq!(bike.name, "Speedster");
        assert_eq!(bike.category_id, 1);
    }

    #[test]
    fn create_lists_every_missing_field() {
        let err = BikePayload {
            name: Some("Speedster".into()),
            ..Default::default()
        }
        .into_new()
        .unwrap_err();

        let fields: Vec<_> = err.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["price", "stock", "category_id"]);
    }

    #[test]
    fn rejects_negative_numbers() {
        let err = BikePayload {
            price: Some(-0.01),
            stock: Some(-1),
            ..full_payload()
        }
        .into_new()
        .unwrap_err();
        assert_eq!(err.errors().len(), 2);

        let err = BikePayload {
            stock: Some(-5),
            ..Default::default()
        }
        .into_changes()
        .unwrap_err();
        assert_eq!(err.errors()[0].field, "stock");
    }

    #[test]
    fn zero_price_and_stock_are_allowed() {
        let bike = BikePayload {
            price: Some(0.0),
            stock: Some(0),
            ..full_payload()
        }
        .into_new();
        assert!(bike.is_ok());
    }

    #[test]
    fn view_uses_category_name() {
        let bike = Bike {
            id: 1,
            name: "Speedster".into(),
            price: 999.5,
            stock: 3,
            category_id: 1,
            category_name: "Road".into(),
        };
        let json = serde_json::to_string(&BikeView::from(bike)).unwrap();
        assert_eq!(
            json,
            r#"{"id":1,"name":"Speedster","price":999.5,"stock":3,"category":"Road"}"#
        );
    }

    #[test]
    fn view_survives_json_round_trip() {
        let view = BikeView {
            id: 42,
            name: "Trail King".into(),
            price: 1249.99,
            stock: 0,
            category: "Mountain".into(),
        };
        let encoded = serde_json::to_value(&view).unwrap();
        let decoded: BikeView = serde_json::from_value(encoded.clone()).unwrap();
        assert_eq!(decoded, view);
        assert_eq!(serde_json::to_value(&decoded).unwrap(), encoded);
    }
}

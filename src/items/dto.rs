use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::items::repo::ItemFields;
use crate::validation::{check_length, FieldError, Validate};

/// Body for both create and full replacement of an item.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ItemRequest {
    #[schema(example = "Widget", min_length = 1, max_length = 100)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Must be greater than zero.
    #[schema(example = 9.99)]
    pub price: f64,
}

impl Validate for ItemRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_length(&mut errors, "title", &self.title, 1, Some(100));
        if !(self.price.is_finite() && self.price > 0.0) {
            errors.push(FieldError::new("price", "must be greater than 0"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<ItemRequest> for ItemFields {
    fn from(r: ItemRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            price: r.price,
        }
    }
}

/// Slice bounds for listing. Negative values count back from the end.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// First index, default 0
    #[serde(default)]
    pub skip: i64,
    /// Page length, default 10
    #[serde(default = "default_limit")]
    pub limit: i64,
}
fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    #[schema(value_type = String, example = "Item deleted successfully")]
    pub message: &'static str,
}

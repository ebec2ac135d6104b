//! Provider response → enrichment fields
//!
//! Only the first product entry is considered: queries carry a single
//! identifier, so entry 0 is taken to be the match. The entry's own
//! identifier is compared with the query for diagnostics only.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::EnrichmentResult;
use crate::services::provider_client::RawResponse;

/// Malformed provider response
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExtractionError {
    #[error("Response contains no product entries")]
    EmptyResponse,

    #[error("Field `{0}` is not an object")]
    NotAnObject(&'static str),

    #[error("Field `{field}` is not {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

/// Maps raw provider responses into `EnrichmentResult`s
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordExtractor;

impl RecordExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract enrichment fields for `identifier`
    ///
    /// Malformed responses are logged and yield `None`.
    pub fn extract(&self, identifier: &str, response: &RawResponse) -> Option<EnrichmentResult> {
        match self.try_extract(identifier, response) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::error!(
                    identifier = %identifier,
                    error = %e,
                    "Failed to extract data from provider response"
                );
                None
            }
        }
    }

    fn try_extract(
        &self,
        identifier: &str,
        response: &RawResponse,
    ) -> Result<EnrichmentResult, ExtractionError> {
        let product = response
            .first()
            .ok_or(ExtractionError::EmptyResponse)?
            .as_object()
            .ok_or(ExtractionError::NotAnObject("product"))?;

        warn_on_identifier_mismatch(identifier, product);

        let sales_ranks = object_field(product, "salesRanks")?;
        let stats = object_field(product, "stats")?;

        let rank = match sales_ranks.and_then(|s| present(s, "current")) {
            None => None,
            Some(value) => Some(as_integer(value).ok_or(ExtractionError::WrongType {
                field: "salesRanks.current",
                expected: "an integer",
            })?),
        };

        let price = match stats.and_then(|s| present(s, "current")) {
            None => None,
            Some(value) => Some(value.as_f64().ok_or(ExtractionError::WrongType {
                field: "stats.current",
                expected: "a number",
            })?),
        };

        let day30 = match sales_ranks.and_then(|s| present(s, "day30")) {
            None => Vec::new(),
            Some(value) => numeric_series(value)?,
        };

        Ok(EnrichmentResult {
            rank,
            price,
            monthly_sales: monthly_sales(&day30),
        })
    }
}

/// Floor of the mean of the last-30-days rank-drop series, 0 when empty
///
/// A proxy for sales velocity, not literal unit sales.
pub fn monthly_sales(series: &[f64]) -> i64 {
    if series.is_empty() {
        return 0;
    }
    let sum: f64 = series.iter().sum();
    (sum / series.len() as f64).floor() as i64
}

/// Field value, treating explicit null as absent
fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

fn object_field<'a>(
    object: &'a Map<String, Value>,
    key: &'static str,
) -> Result<Option<&'a Map<String, Value>>, ExtractionError> {
    match present(object, key) {
        None => Ok(None),
        Some(value) => value
            .as_object()
            .map(Some)
            .ok_or(ExtractionError::NotAnObject(key)),
    }
}

/// Integer value; whole floats such as `12.0` are accepted
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.is_finite())
            .map(|f| f as i64)
    })
}

fn numeric_series(value: &Value) -> Result<Vec<f64>, ExtractionError> {
    let wrong_type = ExtractionError::WrongType {
        field: "salesRanks.day30",
        expected: "a sequence of numbers",
    };

    let items = value.as_array().ok_or_else(|| wrong_type.clone())?;
    items
        .iter()
        .map(|v| v.as_f64().ok_or_else(|| wrong_type.clone()))
        .collect()
}

fn warn_on_identifier_mismatch(identifier: &str, product: &Map<String, Value>) {
    let returned = ["asin", "productId"]
        .iter()
        .find_map(|key| product.get(*key).and_then(Value::as_str));

    if let Some(returned) = returned {
        if returned.trim() != identifier {
            tracing::warn!(
                identifier = %identifier,
                returned = %returned,
                "First provider entry does not match the queried identifier; using it anyway"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract(response: Value) -> Option<EnrichmentResult> {
        let response: RawResponse = response.as_array().cloned().unwrap();
        RecordExtractor::new().extract("B00TEST", &response)
    }

    #[test]
    fn test_monthly_sales_floor_mean() {
        assert_eq!(monthly_sales(&[10.0, 20.0, 30.0]), 20);
        assert_eq!(monthly_sales(&[1.0, 2.0]), 1);
        assert_eq!(monthly_sales(&[]), 0);
    }

    #[test]
    fn test_full_product() {
        let result = extract(json!([{
            "asin": "B00TEST",
            "salesRanks": {"current": 1523, "day30": [10, 20, 30]},
            "stats": {"current": 24.99}
        }]))
        .unwrap();

        assert_eq!(
            result,
            EnrichmentResult {
                rank: Some(1523),
                price: Some(24.99),
                monthly_sales: 20,
            }
        );
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let result = extract(json!([{"title": "Widget"}])).unwrap();

        assert_eq!(result.rank, None);
        assert_eq!(result.price, None);
        assert_eq!(result.monthly_sales, 0);
    }

    #[test]
    fn test_null_fields_are_absent() {
        let result = extract(json!([{
            "salesRanks": {"current": null, "day30": null},
            "stats": null
        }]))
        .unwrap();

        assert_eq!(result.rank, None);
        assert_eq!(result.price, None);
        assert_eq!(result.monthly_sales, 0);
    }

    #[test]
    fn test_only_first_entry_used() {
        let result = extract(json!([
            {"salesRanks": {"current": 1}},
            {"salesRanks": {"current": 2}}
        ]))
        .unwrap();

        assert_eq!(result.rank, Some(1));
    }

    #[test]
    fn test_malformed_shapes_yield_none() {
        assert_eq!(extract(json!([])), None);
        assert_eq!(extract(json!(["not an object"])), None);
        assert_eq!(extract(json!([{"salesRanks": [1, 2]}])), None);
        assert_eq!(extract(json!([{"salesRanks": {"current": "high"}}])), None);
        assert_eq!(extract(json!([{"stats": {"current": "cheap"}}])), None);
        assert_eq!(extract(json!([{"salesRanks": {"day30": [1, "x"]}}])), None);
    }

    #[test]
    fn test_whole_float_rank_accepted() {
        let result = extract(json!([{"salesRanks": {"current": 12.0}}])).unwrap();
        assert_eq!(result.rank, Some(12));
    }

    #[test]
    fn test_identifier_mismatch_still_extracts() {
        let result = extract(json!([{
            "asin": "B00OTHER",
            "salesRanks": {"current": 99}
        }]))
        .unwrap();

        assert_eq!(result.rank, Some(99));
    }
}

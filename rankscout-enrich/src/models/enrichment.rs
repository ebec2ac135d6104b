//! Enrichment fields and merging into input rows

use serde::Serialize;
use serde_json::{Number, Value};

use rankscout_common::Record;

pub const RANK_FIELD: &str = "rank";
pub const PRICE_FIELD: &str = "price";
pub const MONTHLY_SALES_FIELD: &str = "monthly_sales";

/// Analytics for one identifier
///
/// `None` means the provider had no value, not zero. `monthly_sales` always
/// has a value once a response was extracted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentResult {
    pub rank: Option<i64>,
    pub price: Option<f64>,
    pub monthly_sales: i64,
}

impl EnrichmentResult {
    /// Merge into `record`, overriding same-named input fields in place
    ///
    /// Absent fields are omitted, leaving any input value untouched.
    pub fn merge_into(&self, mut record: Record) -> Record {
        if let Some(rank) = self.rank {
            record.insert(RANK_FIELD.to_string(), Value::from(rank));
        }
        if let Some(price) = self.price.and_then(Number::from_f64) {
            record.insert(PRICE_FIELD.to_string(), Value::Number(price));
        }
        record.insert(
            MONTHLY_SALES_FIELD.to_string(),
            Value::from(self.monthly_sales),
        );
        record
    }
}

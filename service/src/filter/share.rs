//! Shareable query-string representation of a [`GenericFilter`].
//!
//! Only the [`GenericFilter`] layer is shared. The representation is an
//! `application/x-www-form-urlencoded` query with the following keys:
//! - `type`: property type ID;
//! - `district`: district ID, repeated per district;
//! - `transaction`: `buy` or `rent`;
//! - `area`: target area;
//! - `budget`: target budget.

use url::form_urlencoded;

use super::{input, GenericFilter};

/// Query key of [`GenericFilter::property_type_id`].
const PROPERTY_TYPE: &str = "type";

/// Query key of [`GenericFilter::district_ids`].
const DISTRICT: &str = "district";

/// Query key of [`GenericFilter::transaction`].
const TRANSACTION: &str = "transaction";

/// Query key of [`GenericFilter::target_area`].
const AREA: &str = "area";

/// Query key of [`GenericFilter::target_budget`].
const BUDGET: &str = "budget";

/// Renders the provided [`GenericFilter`] into a query string (without the
/// leading `?`).
#[must_use]
pub fn to_query(filter: &GenericFilter) -> String {
    let GenericFilter {
        property_type_id,
        district_ids,
        transaction,
        target_area,
        target_budget,
    } = filter;

    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(id) = property_type_id {
        _ = query.append_pair(PROPERTY_TYPE, &id.to_string());
    }
    for id in district_ids {
        _ = query.append_pair(DISTRICT, &id.to_string());
    }
    if let Some(t) = transaction {
        _ = query.append_pair(TRANSACTION, t.as_str());
    }
    if let Some(area) = target_area {
        _ = query.append_pair(AREA, &area.to_string());
    }
    if let Some(budget) = target_budget {
        _ = query.append_pair(BUDGET, &budget.to_string());
    }
    query.finish()
}

/// Reconstructs a [`GenericFilter`] from the provided query string.
///
/// A leading `?` is allowed. Unknown keys and unparsable values are
/// ignored, and the last occurrence of a non-repeatable key wins.
#[must_use]
pub fn from_query(query: &str) -> GenericFilter {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut filter = GenericFilter::default();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            PROPERTY_TYPE => {
                if let Ok(id) = value.trim().parse() {
                    filter.property_type_id = Some(id);
                }
            }
            DISTRICT => {
                if let Ok(id) = value.trim().parse() {
                    _ = filter.district_ids.insert(id);
                }
            }
            TRANSACTION => {
                if let Ok(t) = value.trim().parse() {
                    filter.transaction = Some(t);
                }
            }
            AREA => filter.target_area = input::amount(&value),
            BUDGET => filter.target_budget = input::amount(&value),
            _ => {}
        }
    }
    filter
}

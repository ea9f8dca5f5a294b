//! `GET /get-data` — tabular query.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::server::AppState;

/// Query parameters for `/get-data`. Both optional; filtering only happens
/// when both are present and non-empty.
#[derive(Debug, Deserialize)]
pub struct DataQuery {
    /// Column to filter on (trimmed and lowercased before use).
    pub column: Option<String>,
    /// Value to match exactly (used verbatim).
    pub value: Option<String>,
}

/// Serve the full table, or the exact-match subset when both `column` and
/// `value` are supplied. Unknown columns are a 400 naming the alternatives.
pub async fn get_data(
    State(state): State<AppState>,
    Query(params): Query<DataQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let column = params
        .column
        .as_deref()
        .map(tabscribe_dataset::loader::normalize_header)
        .unwrap_or_default();
    let value = params.value.unwrap_or_default();

    let rows = if column.is_empty() || value.is_empty() {
        state.table.all_rows()
    } else {
        state.table.filter(&column, &value)?
    };

    debug!(rows = rows.len(), column = %column, "get-data served");
    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_deserialize_when_absent() {
        let q: DataQuery = serde_json::from_str("{}").unwrap();
        assert!(q.column.is_none());
        assert!(q.value.is_none());
    }

    #[test]
    fn query_params_deserialize_when_present() {
        let q: DataQuery =
            serde_json::from_str(r#"{"column": " Tier ", "value": "gold"}"#).unwrap();
        assert_eq!(q.column.as_deref(), Some(" Tier "));
        assert_eq!(q.value.as_deref(), Some("gold"));
    }
}

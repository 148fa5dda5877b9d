use serde_json::Value;

use super::error::FilterError;
use super::types::{FieldSet, ParameterizedStatement};

/// Builds `UPDATE <table> SET a=$1, b=$2 WHERE <key>=$3 RETURNING *` from a
/// partial set of column values.
///
/// Column names are taken from the field set's keys and must already have
/// been checked against the resource's allowlist. Values are only ever bound.
pub fn partial_update(
    table: &str,
    fields: &FieldSet,
    key_column: &str,
    key_value: impl Into<Value>,
) -> Result<ParameterizedStatement, FilterError> {
    validate_identifier(table).map_err(|_| FilterError::InvalidTableName(table.to_string()))?;
    validate_identifier(key_column)?;

    if fields.is_empty() {
        return Err(FilterError::EmptyFieldSet);
    }
    if fields.contains(key_column) {
        return Err(FilterError::KeyColumnInFieldSet(key_column.to_string()));
    }

    let mut assignments = Vec::with_capacity(fields.len());
    let mut params = Vec::with_capacity(fields.len() + 1);
    for (column, value) in fields.iter() {
        validate_identifier(column)?;
        if value.is_array() || value.is_object() {
            return Err(FilterError::NonScalarValue(column.clone()));
        }
        params.push(value.clone());
        assignments.push(format!("{}=${}", column, params.len()));
    }

    params.push(key_value.into());
    let query = format!(
        "UPDATE {} SET {} WHERE {}=${} RETURNING *",
        table,
        assignments.join(", "),
        key_column,
        params.len()
    );

    tracing::debug!(%query, params = params.len(), "built partial update");
    Ok(ParameterizedStatement::new(query, params))
}

fn validate_identifier(name: &str) -> Result<(), FilterError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(FilterError::InvalidColumn(name.to_string()))
    }
}

use serde_json::Value;

use super::error::FilterError;
use super::types::FilterOp;

/// Accumulates WHERE conditions and their bound values, numbering
/// placeholders in the order conditions are appended.
pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
    conditions: Vec<String>,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
            conditions: vec![],
        }
    }

    /// Absent-equivalent values never produce a condition.
    pub fn is_omitted(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::String(s) => s.is_empty(),
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::Array(_) | Value::Object(_) => false,
        }
    }

    /// Appends `column <op> $N` unless the value is omitted. Returns whether a
    /// condition was added.
    pub fn condition(&mut self, column: &str, operator: FilterOp, data: &Value) -> Result<bool, FilterError> {
        if Self::is_omitted(data) {
            return Ok(false);
        }

        let bound = match operator {
            FilterOp::Contains => Value::String(format!("%{}%", Self::like_fragment(column, data)?)),
            FilterOp::Gte | FilterOp::Lte => match data {
                Value::Number(_) | Value::String(_) => data.clone(),
                _ => return Err(FilterError::NonScalarValue(column.to_string())),
            },
        };

        let placeholder = self.param(bound);
        self.conditions.push(format!("{} {} {}", column, operator.to_sql(), placeholder));
        Ok(true)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Joined conditions (empty when none were added) and their values.
    pub fn generate(self) -> (String, Vec<Value>) {
        (self.conditions.join(" AND "), self.param_values)
    }

    // LIKE metacharacters in the search term match literally.
    fn like_fragment(column: &str, data: &Value) -> Result<String, FilterError> {
        let raw = match data {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return Err(FilterError::NonScalarValue(column.to_string())),
        };
        let mut escaped = String::with_capacity(raw.len());
        for c in raw.chars() {
            if matches!(c, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        Ok(escaped)
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

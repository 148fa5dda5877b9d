use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// SQL text with `$N` placeholders plus the values bound to them, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizedStatement {
    pub query: String,
    pub params: Vec<Value>,
}

impl ParameterizedStatement {
    pub fn new(query: impl Into<String>, params: Vec<Value>) -> Self {
        Self { query: query.into(), params }
    }

    /// Number of `$N` placeholders appearing in the query text.
    pub fn placeholder_count(&self) -> usize {
        let bytes = self.query.as_bytes();
        bytes
            .iter()
            .enumerate()
            .filter(|(i, b)| **b == b'$' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
            .count()
    }
}

/// Ordered column -> value mapping for partial updates and list filters.
///
/// Iteration follows insertion order, which for request bodies is the order
/// the client sent the keys in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet(Map<String, Value>);

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Inserts or replaces a value. Replacing keeps the field's position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for FieldSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The managed collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Companies,
    Jobs,
    Users,
}

impl Resource {
    pub fn table(&self) -> &'static str {
        match self {
            Resource::Companies => "companies",
            Resource::Jobs => "jobs",
            Resource::Users => "users",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Case-insensitive substring match.
    Contains,
    Gte,
    Lte,
}

impl FilterOp {
    pub fn to_sql(&self) -> &'static str {
        match self {
            FilterOp::Contains => "ILIKE",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
        }
    }
}

/// Binds a request parameter name to the column and comparison it filters on.
#[derive(Debug, Clone, Copy)]
pub struct FilterField {
    pub param: &'static str,
    pub column: &'static str,
    pub operator: FilterOp,
}

impl FilterField {
    pub const fn new(param: &'static str, column: &'static str, operator: FilterOp) -> Self {
        Self { param, column, operator }
    }
}

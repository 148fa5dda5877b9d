//! Request body validation against per-resource field rules.
//!
//! A schema doubles as the allowlist of columns a request may touch: any
//! property without a rule is rejected before it can reach SQL generation.

pub mod schemas;

use serde_json::Value;

use crate::query::FieldSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
}

impl FieldType {
    fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub nullable: bool,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub uri: bool,
}

impl FieldRule {
    const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
            nullable: false,
            minimum: None,
            maximum: None,
            uri: false,
        }
    }

    pub const fn string(name: &'static str) -> Self {
        Self::new(name, FieldType::String)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub const fn number(name: &'static str) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub const fn maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub const fn uri(mut self) -> Self {
        self.uri = true;
        self
    }

    fn check(&self, value: &Value, errors: &mut Vec<String>) {
        if value.is_null() {
            if !self.nullable {
                errors.push(format!("instance.{} is not of a type(s) {}", self.name, self.field_type.name()));
            }
            return;
        }
        if !self.field_type.matches(value) {
            errors.push(format!("instance.{} is not of a type(s) {}", self.name, self.field_type.name()));
            return;
        }
        if let Some(n) = value.as_f64() {
            if let Some(min) = self.minimum.filter(|min| n < *min) {
                errors.push(format!("instance.{} must have a minimum value of {}", self.name, min));
            }
            if let Some(max) = self.maximum.filter(|max| n > *max) {
                errors.push(format!("instance.{} must have a maximum value of {}", self.name, max));
            }
        }
        if self.uri {
            if let Some(s) = value.as_str() {
                if url::Url::parse(s).is_err() {
                    errors.push(format!("instance.{} does not conform to the \"uri\" format", self.name));
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    rules: &'static [FieldRule],
}

impl Schema {
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Checks `body` and returns its properties, in body order, as a
    /// field set. All violations are collected rather than stopping at the
    /// first.
    pub fn validate(&self, body: &Value) -> Result<FieldSet, Vec<String>> {
        let object = match body.as_object() {
            Some(object) => object,
            None => return Err(vec!["instance is not of a type(s) object".to_string()]),
        };

        let mut errors: Vec<String> = self
            .rules
            .iter()
            .filter(|rule| rule.required && !object.contains_key(rule.name))
            .map(|rule| format!("instance requires property \"{}\"", rule.name))
            .collect();

        for (key, value) in object {
            match self.rule(key) {
                Some(rule) => rule.check(value, &mut errors),
                None => errors.push(format!(
                    "instance additionalProperty \"{}\" exists in instance when not allowed",
                    key
                )),
            }
        }

        if errors.is_empty() {
            Ok(FieldSet::from(object.clone()))
        } else {
            Err(errors)
        }
    }

    /// Allowlist check for field sets that did not come through `validate`.
    pub fn check_columns(&self, fields: &FieldSet) -> Result<(), Vec<String>> {
        let errors: Vec<String> = fields
            .keys()
            .filter(|key| self.rule(key).is_none())
            .map(|key| format!("instance additionalProperty \"{}\" exists in instance when not allowed", key))
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

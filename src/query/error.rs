use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("No fields supplied for update")]
    EmptyFieldSet,

    #[error("Key column '{0}' cannot be updated")]
    KeyColumnInFieldSet(String),

    #[error("Value for '{0}' must be a string, number or boolean")]
    NonScalarValue(String),
}

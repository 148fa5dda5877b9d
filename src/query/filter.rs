use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FieldSet, FilterField, FilterOp, ParameterizedStatement, Resource};

const COMPANY_FILTERS: &[FilterField] = &[
    FilterField::new("search", "name", FilterOp::Contains),
    FilterField::new("min_employees", "num_employees", FilterOp::Gte),
    FilterField::new("max_employees", "num_employees", FilterOp::Lte),
];

const JOB_FILTERS: &[FilterField] = &[
    FilterField::new("search", "title", FilterOp::Contains),
    FilterField::new("min_salary", "salary", FilterOp::Gte),
    FilterField::new("min_equity", "equity", FilterOp::Gte),
];

/// Listing query shape for one resource: projected columns, recognized
/// filters in emission order, and the ordering key.
pub struct Filter {
    resource: Resource,
    select_columns: &'static [&'static str],
    filters: &'static [FilterField],
    order: &'static [&'static str],
}

impl Filter {
    pub fn for_resource(resource: Resource) -> Self {
        match resource {
            Resource::Companies => Self {
                resource,
                select_columns: &["handle", "name"],
                filters: COMPANY_FILTERS,
                order: &["handle"],
            },
            Resource::Jobs => Self {
                resource,
                select_columns: &["id", "title", "company_handle"],
                filters: JOB_FILTERS,
                order: &["title"],
            },
            Resource::Users => Self {
                resource,
                select_columns: &["username", "first_name", "last_name", "email"],
                filters: &[],
                order: &["username"],
            },
        }
    }

    /// Builds the listing SELECT for `resource` from whichever recognized
    /// filters are present in `params`. Unrecognized keys are ignored.
    pub fn build(resource: Resource, params: &FieldSet) -> Result<ParameterizedStatement, FilterError> {
        Self::for_resource(resource).to_sql(params)
    }

    pub fn to_sql(&self, params: &FieldSet) -> Result<ParameterizedStatement, FilterError> {
        let mut filter_where = FilterWhere::new(0);
        for field in self.filters {
            if let Some(value) = params.get(field.param) {
                filter_where.condition(field.column, field.operator, value)?;
            }
        }

        let where_clause = if filter_where.is_empty() {
            String::new()
        } else {
            String::from("WHERE ")
        };
        let (conditions, values) = filter_where.generate();

        let query = [
            format!("SELECT {}", self.select_columns.join(", ")),
            format!("FROM {}", self.resource.table()),
            format!("{}{}", where_clause, conditions),
            FilterOrder::generate(self.order),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        tracing::debug!(resource = ?self.resource, %query, params = values.len(), "built listing query");
        Ok(ParameterizedStatement::new(query, values))
    }
}

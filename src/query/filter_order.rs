pub struct FilterOrder;

impl FilterOrder {
    /// `ORDER BY a, b` over the given columns, ascending. Empty input yields
    /// an empty string.
    pub fn generate(columns: &[&str]) -> String {
        if columns.is_empty() {
            return String::new();
        }
        format!("ORDER BY {}", columns.join(", "))
    }
}

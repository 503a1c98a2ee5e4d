use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

/// Row selection: equality filters, optional ordering and limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filters: Vec<(String, String)>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    pub fn order_by(mut self, column: &str, descending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            descending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        self.filters.is_empty()
    }

    /// PostgREST query string pairs (`col=eq.value`, `order=col.desc`, `limit=n`).
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|(column, value)| (column.clone(), format!("eq.{}", value)))
            .collect();

        if let Some(order) = &self.order {
            let direction = if order.descending { "desc" } else { "asc" };
            params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }

    /// Whether `row` satisfies every equality filter.
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|(column, expected)| {
            match row.get(column) {
                Some(Value::String(s)) => s == expected,
                Some(Value::Null) | None => false,
                Some(other) => other.to_string() == *expected,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_params() {
        let query = Query::new()
            .eq("class_id", "c-1")
            .eq("published", true)
            .order_by("due_at", false)
            .limit(20);

        assert_eq!(
            query.to_params(),
            vec![
                ("class_id".to_string(), "eq.c-1".to_string()),
                ("published".to_string(), "eq.true".to_string()),
                ("order".to_string(), "due_at.asc".to_string()),
                ("limit".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_matches() {
        let row = json!({ "id": "a", "grade": 90, "graded": true, "note": null });
        assert!(Query::new().eq("id", "a").matches(&row));
        assert!(Query::new().eq("grade", 90).eq("graded", true).matches(&row));
        assert!(!Query::new().eq("id", "b").matches(&row));
        assert!(!Query::new().eq("note", "x").matches(&row));
        assert!(!Query::new().eq("missing", "x").matches(&row));
        assert!(Query::new().matches(&row));
    }
}

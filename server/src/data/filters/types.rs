//! Filter type definitions
//!
//! A predicate is one (column, operator, bound value) comparison. Values
//! never appear in statement text; they are collected into `SqlParams` and
//! bound positionally.

use serde_json::{Map, Value};

/// Comparison operator of a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
    Like,
}

/// A typed value destined for a positional bind slot
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i64),
    Real(f64),
}

/// One WHERE-clause comparison against an allow-listed column
#[derive(Debug, Clone)]
pub struct Predicate {
    pub column: &'static str,
    pub op: FilterOp,
    pub value: BindValue,
}

/// Collects bind values during query building (maintains insertion order)
#[derive(Debug, Default)]
pub struct SqlParams {
    pub values: Vec<BindValue>,
}

impl SqlParams {
    /// Append a value and return its positional placeholder (`$1`, `$2`, ...)
    pub fn push(&mut self, value: BindValue) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Predicate {
    /// Generate the SQL fragment for this predicate, pushing its value into
    /// `params`.
    pub fn to_sql(&self, params: &mut SqlParams) -> String {
        let placeholder = params.push(self.value.clone());
        match self.op {
            FilterOp::Eq => format!("{} = {}", self.column, placeholder),
            FilterOp::Gte => format!("{} >= {}", self.column, placeholder),
            FilterOp::Lte => format!("{} <= {}", self.column, placeholder),
            FilterOp::Like => format!("{} LIKE {} ESCAPE '\\'", self.column, placeholder),
        }
    }
}

/// The validated, typed filter set derived from one request's query
/// parameters. `applied` echoes the recognized key/value pairs back to the
/// caller in rule order.
#[derive(Debug, Default)]
pub struct FilterSpec {
    pub predicates: Vec<Predicate>,
    pub applied: Map<String, Value>,
}

impl FilterSpec {
    /// Render the shared WHERE clause, or an empty string when unfiltered.
    ///
    /// Fragments are joined with AND; parameter order matches predicate
    /// order, which is fixed by the builder's rule table.
    pub fn where_clause(&self, params: &mut SqlParams) -> String {
        if self.predicates.is_empty() {
            return String::new();
        }
        let fragments: Vec<String> = self
            .predicates
            .iter()
            .map(|p| p.to_sql(params))
            .collect();
        format!(" WHERE {}", fragments.join(" AND "))
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_predicate() {
        let predicate = Predicate {
            column: "city",
            op: FilterOp::Eq,
            value: BindValue::Text("Boston".to_string()),
        };
        let mut params = SqlParams::default();
        let sql = predicate.to_sql(&mut params);

        assert_eq!(sql, "city = $1");
        assert_eq!(params.values, vec![BindValue::Text("Boston".to_string())]);
    }

    #[test]
    fn range_predicates_number_placeholders_in_order() {
        let min = Predicate {
            column: "reviews",
            op: FilterOp::Gte,
            value: BindValue::Int(40),
        };
        let max = Predicate {
            column: "reviews",
            op: FilterOp::Lte,
            value: BindValue::Int(60),
        };
        let mut params = SqlParams::default();

        assert_eq!(min.to_sql(&mut params), "reviews >= $1");
        assert_eq!(max.to_sql(&mut params), "reviews <= $2");
        assert_eq!(params.values, vec![BindValue::Int(40), BindValue::Int(60)]);
    }

    #[test]
    fn like_predicate_uses_escape_clause() {
        let predicate = Predicate {
            column: "name",
            op: FilterOp::Like,
            value: BindValue::Text("%pizza%".to_string()),
        };
        let mut params = SqlParams::default();
        let sql = predicate.to_sql(&mut params);

        assert_eq!(sql, r"name LIKE $1 ESCAPE '\'");
        assert_eq!(params.values, vec![BindValue::Text("%pizza%".to_string())]);
    }

    #[test]
    fn where_clause_joins_with_and() {
        let spec = FilterSpec {
            predicates: vec![
                Predicate {
                    column: "city",
                    op: FilterOp::Eq,
                    value: BindValue::Text("Austin".to_string()),
                },
                Predicate {
                    column: "rating",
                    op: FilterOp::Gte,
                    value: BindValue::Real(4.0),
                },
            ],
            applied: Map::new(),
        };
        let mut params = SqlParams::default();

        assert_eq!(
            spec.where_clause(&mut params),
            " WHERE city = $1 AND rating >= $2"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn empty_spec_renders_no_where_clause() {
        let spec = FilterSpec::default();
        let mut params = SqlParams::default();

        assert_eq!(spec.where_clause(&mut params), "");
        assert!(params.is_empty());
    }
}

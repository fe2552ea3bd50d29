//! FilterSpec builder
//!
//! Translates raw query parameters into typed predicates via a static
//! allow-list table. The table is walked in declaration order, so parameter
//! order is deterministic for a given set of keys. Keys outside the table
//! never reach statement text or bind slots.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use super::types::{BindValue, FilterOp, FilterSpec, Predicate};
use crate::utils::sql::escape_like_pattern;

/// How a raw filter value is parsed before binding
#[derive(Debug, Clone, Copy)]
enum ValueKind {
    Text,
    Int,
    Real,
}

/// One allow-list entry: query key, target column, operator, value kind
struct FilterRule {
    key: &'static str,
    column: &'static str,
    op: FilterOp,
    kind: ValueKind,
}

const fn rule(key: &'static str, column: &'static str, op: FilterOp, kind: ValueKind) -> FilterRule {
    FilterRule {
        key,
        column,
        op,
        kind,
    }
}

/// The filter allow-list, in fixed evaluation order: equality text keys,
/// exact numeric keys, range keys, substring key.
const FILTER_RULES: &[FilterRule] = &[
    rule("city", "city", FilterOp::Eq, ValueKind::Text),
    rule("state", "state", FilterOp::Eq, ValueKind::Text),
    rule("type", "type", FilterOp::Eq, ValueKind::Text),
    rule("county_code", "county_code", FilterOp::Eq, ValueKind::Text),
    rule("county", "county", FilterOp::Eq, ValueKind::Text),
    rule("borough", "borough", FilterOp::Eq, ValueKind::Text),
    rule("place_id", "place_id", FilterOp::Eq, ValueKind::Text),
    rule("country", "country", FilterOp::Eq, ValueKind::Text),
    rule("country_code", "country_code", FilterOp::Eq, ValueKind::Text),
    rule("reviews", "reviews", FilterOp::Eq, ValueKind::Int),
    rule("rating", "rating", FilterOp::Eq, ValueKind::Real),
    rule("reviews_min", "reviews", FilterOp::Gte, ValueKind::Int),
    rule("reviews_max", "reviews", FilterOp::Lte, ValueKind::Int),
    rule("rating_min", "rating", FilterOp::Gte, ValueKind::Real),
    rule("rating_max", "rating", FilterOp::Lte, ValueKind::Real),
    rule("name_contains", "name", FilterOp::Like, ValueKind::Text),
];

/// Rejection of a malformed filter value
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid integer value for {key}: {value:?}")]
    InvalidInt { key: &'static str, value: String },

    #[error("invalid numeric value for {key}: {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

/// Build a FilterSpec from raw query parameters.
///
/// Keys absent from the allow-list are ignored. Present-but-empty values are
/// treated as absent. Malformed numeric values are rejected rather than
/// coerced.
pub fn build_filter_spec(params: &HashMap<String, String>) -> Result<FilterSpec, FilterError> {
    let mut spec = FilterSpec::default();

    for rule in FILTER_RULES {
        let Some(raw) = params.get(rule.key) else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }

        let value = match rule.kind {
            ValueKind::Text => match rule.op {
                FilterOp::Like => BindValue::Text(format!("%{}%", escape_like_pattern(raw))),
                _ => BindValue::Text(raw.clone()),
            },
            ValueKind::Int => {
                let parsed = raw.parse::<i64>().map_err(|_| FilterError::InvalidInt {
                    key: rule.key,
                    value: raw.clone(),
                })?;
                BindValue::Int(parsed)
            }
            ValueKind::Real => {
                let parsed = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| FilterError::InvalidNumber {
                        key: rule.key,
                        value: raw.clone(),
                    })?;
                BindValue::Real(parsed)
            }
        };

        spec.applied
            .insert(rule.key.to_string(), Value::String(raw.clone()));
        spec.predicates.push(Predicate {
            column: rule.column,
            op: rule.op,
            value,
        });
    }

    Ok(spec)
}

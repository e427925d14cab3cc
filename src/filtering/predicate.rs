//! Composition of parsed filters into one predicate, and its translation into
//! a Sea-ORM `Condition`.
//!
//! The predicate is keyed by external field name. Top-level terms live in a
//! map, so a later write for the same key replaces an earlier one: equality
//! terms, then search terms, then ranges in sequence order, then base
//! constraints.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, ColumnType, Condition, Value,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

use super::parser::{FilterParam, FilterValue, ParsedFilters, Scalar};
use crate::core::ListResource;

const MAX_SEARCH_LENGTH: usize = 10_000;

/// How several search terms combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum SearchMode {
    And,
    #[default]
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Equals(Scalar),
    OneOf(Vec<Scalar>),
    /// Case-insensitive substring.
    Contains(String),
    /// Inclusive on both ends.
    Between { start: Scalar, end: Scalar },
}

/// Server-asserted terms, such as ownership scoping.
///
/// Applied after all client input and never shadowed by it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseConstraints(BTreeMap<String, Term>);

impl BaseConstraints {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn equals(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.0.insert(key.into(), Term::Equals(value.into()));
        self
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Not in the resource's allow-list for this kind of filter.
    Unknown,
    /// Set by a base constraint; the client value was discarded.
    Protected,
}

/// A client key the builder refused to turn into a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedKey {
    pub param: FilterParam,
    pub key: String,
    pub reason: DropReason,
}

impl DroppedKey {
    #[must_use]
    pub fn message(&self) -> String {
        match self.reason {
            DropReason::Unknown => format!("'{}' is not a filterable field", self.key),
            DropReason::Protected => format!("'{}' cannot be set by the client", self.key),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    all: BTreeMap<String, Term>,
    any: BTreeMap<String, Term>,
}

impl Predicate {
    /// Top-level term for `key`, if any.
    #[must_use]
    pub fn term(&self, key: &str) -> Option<&Term> {
        self.all.get(key)
    }

    /// The disjunction group built from OR-mode search terms.
    #[must_use]
    pub const fn any_group(&self) -> &BTreeMap<String, Term> {
        &self.any
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty() && self.any.is_empty()
    }

    /// Translate into a `Condition` using the resource's column mapping.
    ///
    /// Keys that do not resolve to a column are skipped; the builder only
    /// admits keys that do, so this only happens for base constraints naming
    /// columns the resource does not declare.
    #[must_use]
    pub fn to_condition<R: ListResource>(&self) -> Condition {
        let mut condition = Condition::all();
        for (key, term) in &self.all {
            if let Some(expr) = term_expr::<R>(key, term) {
                condition = condition.add(expr);
            }
        }
        if !self.any.is_empty() {
            let mut group = Condition::any();
            for (key, term) in &self.any {
                if let Some(expr) = term_expr::<R>(key, term) {
                    group = group.add(expr);
                }
            }
            condition = condition.add(group);
        }
        condition
    }
}

fn allowed<C>(columns: &[(&'static str, C)], key: &str) -> bool {
    columns.iter().any(|(name, _)| *name == key)
}

/// Build the predicate for one request.
///
/// Returns the keys that were refused alongside the predicate, so the caller
/// decides whether a refusal is fatal.
#[must_use]
pub fn build_predicate<R: ListResource>(
    parsed: &ParsedFilters,
    mode: SearchMode,
    base: &BaseConstraints,
) -> (Predicate, Vec<DroppedKey>) {
    let filterable = R::filterable_columns();
    let searchable = R::searchable_columns();
    let rangeable = R::rangeable_columns();

    let mut dropped = Vec::new();
    let mut admit = |param: FilterParam, key: &str, allow: &[(&'static str, R::ColumnType)]| {
        let reason = if base.contains_key(key) {
            Some(DropReason::Protected)
        } else if allowed(allow, key) {
            None
        } else {
            Some(DropReason::Unknown)
        };
        if let Some(reason) = reason {
            dropped.push(DroppedKey {
                param,
                key: key.to_string(),
                reason,
            });
            return false;
        }
        true
    };

    let mut predicate = Predicate::default();

    for (key, value) in &parsed.filters {
        if !admit(FilterParam::Filters, key, &filterable) {
            continue;
        }
        let term = match value {
            FilterValue::One(scalar) => Term::Equals(scalar.clone()),
            FilterValue::Many(values) => Term::OneOf(values.clone()),
        };
        predicate.all.insert(key.clone(), term);
    }

    let mut search_terms = Vec::new();
    for (key, value) in &parsed.search {
        if !admit(FilterParam::SearchFilters, key, &searchable) {
            continue;
        }
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        let bounded: String = trimmed.chars().take(MAX_SEARCH_LENGTH).collect();
        search_terms.push((key.clone(), Term::Contains(bounded)));
    }
    if mode == SearchMode::Or && search_terms.len() > 1 {
        // A searched key leaves the conjunction, as it does in AND mode.
        for (key, _) in &search_terms {
            predicate.all.remove(key);
        }
        predicate.any.extend(search_terms);
    } else {
        predicate.all.extend(search_terms);
    }

    for range in &parsed.ranges {
        if !admit(FilterParam::RangedFilters, &range.key, &rangeable) {
            continue;
        }
        predicate.all.insert(
            range.key.clone(),
            Term::Between {
                start: range.start.clone(),
                end: range.end.clone(),
            },
        );
    }

    for (key, term) in &base.0 {
        predicate.all.insert(key.clone(), term.clone());
    }

    (predicate, dropped)
}

/// Escape LIKE wildcards so client text matches literally.
fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// `UPPER(column) LIKE UPPER('%value%') ESCAPE '\'`
#[must_use]
pub fn build_like_condition(column: impl ColumnTrait, value: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like_wildcards(value).to_uppercase());
    Expr::expr(Func::upper(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Bind a client scalar with the type the column expects, when it converts.
fn coerce(column_type: &ColumnType, scalar: &Scalar) -> Value {
    let converted = match (column_type, scalar) {
        (
            ColumnType::Timestamp | ColumnType::TimestampWithTimeZone | ColumnType::DateTime,
            Scalar::Text(text),
        ) => parse_timestamp(text.trim()).map(Value::from),
        (ColumnType::Date, Scalar::Text(text)) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .ok()
            .map(Value::from),
        (ColumnType::Uuid, Scalar::Text(text)) => Uuid::parse_str(text.trim()).ok().map(Value::from),
        (ColumnType::Boolean, Scalar::Text(text)) => text.trim().parse::<bool>().ok().map(Value::from),
        (
            ColumnType::TinyInteger
            | ColumnType::SmallInteger
            | ColumnType::Integer
            | ColumnType::BigInteger
            | ColumnType::TinyUnsigned
            | ColumnType::SmallUnsigned
            | ColumnType::Unsigned
            | ColumnType::BigUnsigned,
            Scalar::Text(text),
        ) => text.trim().parse::<i64>().ok().map(Value::from),
        (ColumnType::Float | ColumnType::Double, Scalar::Text(text)) => {
            text.trim().parse::<f64>().ok().map(Value::from)
        }
        #[allow(clippy::cast_precision_loss)]
        (ColumnType::Float | ColumnType::Double, Scalar::Integer(i)) => Some(Value::from(*i as f64)),
        _ => None,
    };
    converted.unwrap_or_else(|| raw_value(scalar))
}

fn raw_value(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Bool(b) => Value::from(*b),
        Scalar::Integer(i) => Value::from(*i),
        Scalar::Float(x) => Value::from(*x),
        Scalar::Text(s) => Value::from(s.clone()),
    }
}

fn term_expr<R: ListResource>(key: &str, term: &Term) -> Option<SimpleExpr> {
    let Some(column) = R::column_for(key) else {
        tracing::warn!(
            resource = R::RESOURCE_NAME_PLURAL,
            key,
            "Predicate key has no column mapping; skipping"
        );
        return None;
    };
    let def = column.def();
    let column_type = def.get_column_type();
    let expr = match term {
        Term::Equals(value) => column.eq(coerce(column_type, value)),
        Term::OneOf(values) => column.is_in(values.iter().map(|v| coerce(column_type, v))),
        Term::Contains(fragment) => build_like_condition(column, fragment),
        Term::Between { start, end } => {
            column.between(coerce(column_type, start), coerce(column_type, end))
        }
    };
    Some(expr)
}

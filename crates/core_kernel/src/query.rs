//! Predicate tree and query description
//!
//! Every finder operation is described by a [`Query`]: a [`Predicate`] tree, a
//! lifecycle [`StatusFilter`], an optional sort and an optional row window.
//! The same value is rendered to SQL by the database adapter and evaluated in
//! process by the in-memory adapter, so both agree on what a finder means.
//!
//! # Precedence
//!
//! Compound predicates are explicit `All`/`Any` nodes. The SQL renderer wraps
//! each compound node in parentheses, so
//!
//! ```text
//! All[ Any[name ~ ?1, house_code ~ ?2], record_status = ?3 ]
//! ```
//!
//! renders as `((... OR ...) AND record_status = $3)` regardless of how SQL
//! would have bound a flat `OR`/`AND` chain.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::CoreError;
use crate::lifecycle::{RecordStatus, StatusFilter, STATUS_COLUMN};
use crate::pagination::{PageRequest, SortDirection};

/// Surrogate key column shared by every table
pub const ID_COLUMN: &str = "id";

/// A scalar a record field can hold or a predicate can compare against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Orders two values of the same kind
    ///
    /// Returns `None` when either side is null or the kinds differ, which
    /// mirrors SQL where any comparison with NULL is not true.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Ordering comparisons usable in a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }

    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Comparison::Lt => ordering == Ordering::Less,
            Comparison::Le => ordering != Ordering::Greater,
            Comparison::Gt => ordering == Ordering::Greater,
            Comparison::Ge => ordering != Ordering::Less,
        }
    }
}

/// A many-to-many association stored in a join table
///
/// `owner_column` references the queried table's `id`; `member_column` holds
/// the associated entity's key.
#[derive(Debug, PartialEq, Eq)]
pub struct Relation {
    pub name: &'static str,
    pub join_table: &'static str,
    pub owner_column: &'static str,
    pub member_column: &'static str,
}

/// Boolean filter over a record's columns
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every row
    Always,
    /// `column = value`, or `column IS NULL` when the value is null
    Eq(&'static str, Value),
    /// Case-insensitive equality on a text column
    EqIgnoreCase(&'static str, String),
    /// Case-insensitive substring match on a text column
    Contains(&'static str, String),
    /// `column BETWEEN low AND high`, both bounds inclusive
    Between(&'static str, Value, Value),
    Compare(&'static str, Comparison, Value),
    IsNull(&'static str),
    /// The record's association set contains `id`
    MemberOf {
        relation: &'static Relation,
        id: i64,
    },
    /// Conjunction; an empty list matches every row
    All(Vec<Predicate>),
    /// Disjunction; an empty list matches no row
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Predicate::Eq(column, value.into())
    }

    pub fn eq_ignore_case(column: &'static str, term: impl Into<String>) -> Self {
        Predicate::EqIgnoreCase(column, term.into())
    }

    pub fn contains(column: &'static str, term: impl Into<String>) -> Self {
        Predicate::Contains(column, term.into())
    }

    pub fn between(column: &'static str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Predicate::Between(column, low.into(), high.into())
    }

    pub fn compare(column: &'static str, op: Comparison, value: impl Into<Value>) -> Self {
        Predicate::Compare(column, op, value.into())
    }

    pub fn is_null(column: &'static str) -> Self {
        Predicate::IsNull(column)
    }

    pub fn member_of(relation: &'static Relation, id: impl Into<i64>) -> Self {
        Predicate::MemberOf {
            relation,
            id: id.into(),
        }
    }

    pub fn all(predicates: Vec<Predicate>) -> Self {
        Predicate::All(predicates)
    }

    pub fn any(predicates: Vec<Predicate>) -> Self {
        Predicate::Any(predicates)
    }

    /// Conjoins two predicates, flattening nested conjunctions
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::Always, p) | (p, Predicate::Always) => p,
            (Predicate::All(mut left), Predicate::All(right)) => {
                left.extend(right);
                Predicate::All(left)
            }
            (Predicate::All(mut left), p) => {
                left.push(p);
                Predicate::All(left)
            }
            (p, Predicate::All(mut right)) => {
                right.insert(0, p);
                Predicate::All(right)
            }
            (a, b) => Predicate::All(vec![a, b]),
        }
    }

    /// Evaluates this predicate against an in-memory record
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Eq(column, Value::Null) => field_of(record, column).is_null(),
            Predicate::Eq(column, value) => {
                field_of(record, column).compare(value) == Some(Ordering::Equal)
            }
            Predicate::EqIgnoreCase(column, term) => field_of(record, column)
                .as_text()
                .map_or(false, |s| s.to_lowercase() == term.to_lowercase()),
            Predicate::Contains(column, term) => field_of(record, column)
                .as_text()
                .map_or(false, |s| s.to_lowercase().contains(&term.to_lowercase())),
            Predicate::Between(column, low, high) => {
                let field = field_of(record, column);
                matches!(
                    field.compare(low),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && matches!(field.compare(high), Some(Ordering::Less | Ordering::Equal))
            }
            Predicate::Compare(column, op, value) => field_of(record, column)
                .compare(value)
                .map_or(false, |ordering| op.holds(ordering)),
            Predicate::IsNull(column) => field_of(record, column).is_null(),
            Predicate::MemberOf { relation, id } => record.related(relation.name).contains(id),
            Predicate::All(predicates) => predicates.iter().all(|p| p.matches(record)),
            Predicate::Any(predicates) => predicates.iter().any(|p| p.matches(record)),
        }
    }
}

/// A queryable entity as seen by the predicate evaluator
///
/// Column names used by `field` are the storage column names, so one
/// predicate tree works for both the SQL renderer and the in-memory store.
pub trait Record: Clone + Send + Sync + 'static {
    /// Entity name used in errors and logs
    const ENTITY: &'static str;

    /// Columns a caller may sort by
    const SORTABLE: &'static [&'static str];

    fn id(&self) -> i64;

    fn status(&self) -> RecordStatus;

    /// Returns the value of a storage column, `Value::Null` if absent
    fn field(&self, column: &str) -> Value;

    /// Returns the keys of associated entities for a relation
    fn related(&self, _relation: &str) -> Vec<i64> {
        Vec::new()
    }
}

fn field_of<R: Record>(record: &R, column: &str) -> Value {
    match column {
        ID_COLUMN => Value::Int(record.id()),
        STATUS_COLUMN => record.status().into(),
        other => record.field(other),
    }
}

/// A resolved sort: a whitelisted column and a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: &'static str,
    pub direction: SortDirection,
}

/// Row window applied after ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

/// A complete finder query
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    filter: Predicate,
    status: StatusFilter,
    sort: Option<SortKey>,
    window: Option<Window>,
}

impl Query {
    /// Creates an unpaged query over active records
    pub fn new(filter: Predicate) -> Self {
        Self {
            filter,
            status: StatusFilter::default(),
            sort: None,
            window: None,
        }
    }

    /// Sets the lifecycle states the query sees
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Applies a page request after validating it against `R`
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an out-of-range page or size and
    /// `CoreError::InvalidSort` for a field `R` does not allow sorting by.
    pub fn paged<R: Record>(mut self, page: &PageRequest) -> Result<Self, CoreError> {
        page.check()?;
        if let Some(sort) = &page.sort {
            let column = R::SORTABLE
                .iter()
                .copied()
                .find(|c| c.eq_ignore_ascii_case(sort.field.trim()))
                .ok_or_else(|| CoreError::invalid_sort(R::ENTITY, sort.field.clone()))?;
            self.sort = Some(SortKey {
                column,
                direction: sort.direction,
            });
        }
        self.window = match page.size {
            Some(size) => Some(Window {
                offset: page.offset(),
                limit: u64::from(size),
            }),
            // An unpaged result is a single page; anything after it is empty.
            None if page.page > 1 => Some(Window { offset: 0, limit: 0 }),
            None => None,
        };
        Ok(self)
    }

    /// Caps the number of returned rows, keeping any offset
    pub fn limit(mut self, limit: u64) -> Self {
        let offset = self.window.map_or(0, |w| w.offset);
        self.window = Some(Window { offset, limit });
        self
    }

    /// The full WHERE predicate: the finder's filter plus the lifecycle clause
    ///
    /// List and count operations both read this, so their predicates are
    /// identical by construction.
    pub fn predicate(&self) -> Predicate {
        match self.status.predicate() {
            Some(status) => self.filter.clone().and(status),
            None => self.filter.clone(),
        }
    }

    pub fn filter(&self) -> &Predicate {
        &self.filter
    }

    pub fn status(&self) -> StatusFilter {
        self.status
    }

    pub fn sort(&self) -> Option<SortKey> {
        self.sort
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }

    /// Runs the query over in-memory records
    ///
    /// Rows are ordered by the sort key (nulls last ascending, first
    /// descending, as PostgreSQL does) with `id` ascending as tie-breaker.
    ///
    /// Text compares by bytes, which matches a `COLLATE "C"` column. A
    /// database with a linguistic collation such as `en_US` can order mixed
    /// case values differently ("apple" before "Banana" there, after it here),
    /// so tests asserting text order should use a single case.
    pub fn evaluate<'a, R, I>(&self, records: I) -> Vec<R>
    where
        R: Record,
        I: IntoIterator<Item = &'a R>,
    {
        let predicate = self.predicate();
        let mut rows: Vec<&R> = records.into_iter().filter(|r| predicate.matches(*r)).collect();

        rows.sort_by(|a, b| {
            let by_key = self.sort.map_or(Ordering::Equal, |key| {
                let ordering = nulls_last(&field_of(*a, key.column), &field_of(*b, key.column));
                match key.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
            by_key.then_with(|| a.id().cmp(&b.id()))
        });

        let (offset, limit) = self
            .window
            .map_or((0, usize::MAX), |w| (to_usize(w.offset), to_usize(w.limit)));
        rows.into_iter().skip(offset).take(limit).cloned().collect()
    }

    /// Counts matching in-memory records, ignoring sort and window
    pub fn count<'a, R, I>(&self, records: I) -> u64
    where
        R: Record,
        I: IntoIterator<Item = &'a R>,
    {
        let predicate = self.predicate();
        records.into_iter().filter(|r| predicate.matches(*r)).count() as u64
    }
}

fn nulls_last(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.compare(b).unwrap_or(Ordering::Equal),
    }
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

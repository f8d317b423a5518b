//! Stable top-down merge sort over records

use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::cmp::Ordering;

use crate::records::predicate::compare_values;

/// Default sort key
pub const DEFAULT_SORT_KEY: &str = "priority";

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = std::convert::Infallible;

    /// Anything other than `desc` (any case) sorts ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Ok(SortOrder::Asc)
        }
    }
}

impl SortOrder {
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Stable merge sort returning a new vector; equal elements keep their input order.
pub fn merge_sort_by<T, F>(items: &[T], compare: &mut F) -> Vec<T>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items.to_vec();
    }

    let (left, right) = items.split_at(items.len() / 2);
    let left = merge_sort_by(left, compare);
    let right = merge_sort_by(right, compare);
    merge(left, right, compare)
}

fn merge<T, F>(left: Vec<T>, right: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        // ties go left
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r) != Ordering::Greater,
            _ => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        out.extend(next);
    }
    out.extend(left);
    out.extend(right);
    out
}

/// Sort key of a record; a missing key sorts as `0`
pub fn sort_key<'a>(record: &'a Map<String, Value>, key: &str) -> &'a Value {
    static ZERO: Lazy<Value> = Lazy::new(|| Value::from(0));
    record.get(key).unwrap_or(&ZERO)
}

/// Stable sort of records by `key`; incomparable keys count as equal.
pub fn sort_records(
    records: &[Map<String, Value>],
    key: &str,
    order: SortOrder,
) -> Vec<Map<String, Value>> {
    merge_sort_by(records, &mut |a: &Map<String, Value>, b: &Map<String, Value>| {
        let ordering = compare_values(sort_key(a, key), sort_key(b, key)).unwrap_or(Ordering::Equal);
        order.apply(ordering)
    })
}

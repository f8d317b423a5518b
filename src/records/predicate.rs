//! Filter predicates: `<field><op><value>`
//!
//! `priority>=2`, `status==open`, `owner!="ana maría"`, `done==false`

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Static regex for a single predicate. The field may not contain operator
/// characters or whitespace; the value is everything after the operator.
pub static PREDICATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([^<>=!\s]+)\s*(<=|>=|==|!=|<|>)\s*(.*?)\s*$")
        .expect("Invalid PREDICATE_RE regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredicateError {
    #[error("invalid filter {0:?}: expected <field><op><value> with op one of < <= > >= == !=")]
    Malformed(String),
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }

    fn parse(op: &str) -> Option<Self> {
        match op {
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Le),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Ge),
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            _ => None,
        }
    }

    /// Apply the operator to the outcome of comparing two values.
    /// `None` means the values are of different types.
    fn holds(&self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (CompareOp::Lt, Some(o)) => o == Ordering::Less,
            (CompareOp::Le, Some(o)) => o != Ordering::Greater,
            (CompareOp::Gt, Some(o)) => o == Ordering::Greater,
            (CompareOp::Ge, Some(o)) => o != Ordering::Less,
            (CompareOp::Eq, Some(o)) => o == Ordering::Equal,
            (CompareOp::Ne, Some(o)) => o != Ordering::Equal,
            (CompareOp::Ne, None) => true,
            (_, None) => false,
        }
    }
}

/// Compare two JSON values of the same type.
///
/// Numbers compare numerically, strings lexicographically, booleans with
/// `false < true`, `null` equals `null`. Arrays and objects are only ever
/// equal or unordered. Mixed types are unordered (`None`).
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
            (a == b).then_some(Ordering::Equal)
        }
        _ => None,
    }
}

/// A single `(field, op, value)` filter
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

impl Predicate {
    pub fn new(field: impl Into<String>, op: CompareOp, value: Value) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Whether `record` satisfies this predicate. A missing or `null` field never does.
    pub fn matches(&self, record: &Map<String, Value>) -> bool {
        match record.get(&self.field) {
            Some(actual) if !actual.is_null() => self.op.holds(compare_values(actual, &self.value)),
            _ => false,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.field, self.op.as_str(), self.value)
    }
}

impl FromStr for Predicate {
    type Err = PredicateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = PREDICATE_RE
            .captures(s)
            .ok_or_else(|| PredicateError::Malformed(s.to_string()))?;

        let field = caps[1].to_string();
        let op = CompareOp::parse(&caps[2]).ok_or_else(|| PredicateError::Malformed(s.to_string()))?;
        let raw = &caps[3];

        // `==<` and friends: the value swallowed a second operator
        if raw.starts_with(['<', '>', '=']) {
            return Err(PredicateError::Malformed(s.to_string()));
        }

        Ok(Predicate::new(field, op, parse_literal(raw)))
    }
}

/// Parse a predicate value: a JSON literal when possible, a bare string otherwise
pub fn parse_literal(raw: &str) -> Value {
    serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Whether `record` satisfies every predicate (short-circuits on the first failure)
pub fn matches_all(record: &Map<String, Value>, predicates: &[Predicate]) -> bool {
    predicates.iter().all(|p| p.matches(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_parse_numeric_predicate() {
        let p: Predicate = "priority>=2".parse().unwrap();
        assert_eq!(p.field, "priority");
        assert_eq!(p.op, CompareOp::Ge);
        assert_eq!(p.value, json!(2));
    }

    #[test]
    fn test_parse_with_spaces_and_bare_string() {
        let p: Predicate = "  status == open ".parse().unwrap();
        assert_eq!(p.field, "status");
        assert_eq!(p.op, CompareOp::Eq);
        assert_eq!(p.value, json!("open"));
    }

    #[test]
    fn test_parse_quoted_string_and_literals() {
        let p: Predicate = r#"owner!="ana maría""#.parse().unwrap();
        assert_eq!(p.value, json!("ana maría"));

        let p: Predicate = "done==false".parse().unwrap();
        assert_eq!(p.value, json!(false));

        let p: Predicate = "due==null".parse().unwrap();
        assert_eq!(p.value, Value::Null);
    }

    #[test]
    fn test_parse_prefers_two_char_operators() {
        let p: Predicate = "a<=1".parse().unwrap();
        assert_eq!(p.op, CompareOp::Le);
        let p: Predicate = "a!=1".parse().unwrap();
        assert_eq!(p.op, CompareOp::Ne);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("priority".parse::<Predicate>().is_err());
        assert!(">=2".parse::<Predicate>().is_err());
        assert!("a=1".parse::<Predicate>().is_err());
        assert!("a==<1".parse::<Predicate>().is_err());
        let err = "nope".parse::<Predicate>().unwrap_err();
        assert!(err.to_string().contains("invalid filter"));
    }

    #[test]
    fn test_compare_values() {
        assert_eq!(compare_values(&json!(1), &json!(1.0)), Some(Ordering::Equal));
        assert_eq!(compare_values(&json!(2), &json!(10)), Some(Ordering::Less));
        assert_eq!(compare_values(&json!("b"), &json!("a")), Some(Ordering::Greater));
        assert_eq!(compare_values(&json!(false), &json!(true)), Some(Ordering::Less));
        assert_eq!(compare_values(&json!(null), &json!(null)), Some(Ordering::Equal));
        assert_eq!(compare_values(&json!(1), &json!("1")), None);
        assert_eq!(compare_values(&json!([1]), &json!([2])), None);
    }

    #[test]
    fn test_each_operator() {
        let r = record(json!({"priority": 3}));
        let check = |s: &str| s.parse::<Predicate>().unwrap().matches(&r);
        assert!(check("priority<4"));
        assert!(!check("priority<3"));
        assert!(check("priority<=3"));
        assert!(check("priority>2"));
        assert!(!check("priority>3"));
        assert!(check("priority>=3"));
        assert!(check("priority==3"));
        assert!(check("priority!=4"));
        assert!(!check("priority!=3"));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let r = record(json!({"priority": 3}));
        let p: Predicate = "status!=open".parse().unwrap();
        assert!(!p.matches(&r));
    }

    #[test]
    fn test_mixed_types() {
        let r = record(json!({"priority": "high"}));
        let check = |s: &str| s.parse::<Predicate>().unwrap().matches(&r);
        assert!(!check("priority>1"));
        assert!(!check("priority==1"));
        assert!(check("priority!=1"));
    }

    #[test]
    fn test_matches_all() {
        let r = record(json!({"priority": 3, "status": "open"}));
        let preds: Vec<Predicate> = ["priority>1", "status==open"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        assert!(matches_all(&r, &preds));
        assert!(matches_all(&r, &[]));

        let failing: Predicate = "status==closed".parse().unwrap();
        assert!(!matches_all(&r, &[preds[0].clone(), failing]));
    }

    #[test]
    fn test_display() {
        let p: Predicate = "owner != ana".parse().unwrap();
        assert_eq!(p.to_string(), "owner!=\"ana\"");
        let p: Predicate = "priority>=2".parse().unwrap();
        assert_eq!(p.to_string(), "priority>=2");
    }

    #[test]
    fn test_null_field_never_matches() {
        let r = record(json!({"status": null, "x": null}));
        for filter in ["status==null", "x!=5", "x<5", "status!=null"] {
            let p: Predicate = filter.parse().unwrap();
            assert!(!p.matches(&r), "{filter} matched a null field");
        }
    }
}

// SPDX-License-Identifier: MIT

//! Condition node evaluation
//!
//! Compares two already-resolved values with one of a fixed operator set.
//! The boolean result is recorded in context and the execution log but does
//! not alter the statically computed execution order.

use serde_json::Value;

use super::context::value_to_string;
use super::graph::ConditionOp;

/// Evaluate a comparison between two resolved values.
///
/// Unrecognized operators evaluate to `false`.
pub fn evaluate(left: &Value, op: ConditionOp, right: &Value) -> bool {
    match op {
        ConditionOp::Equals => values_equal(left, right),
        ConditionOp::NotEquals => !values_equal(left, right),
        ConditionOp::GreaterThan => compare(left, right, |ord| ord.is_gt()),
        ConditionOp::LessThan => compare(left, right, |ord| ord.is_lt()),
        ConditionOp::Contains => value_to_string(left).contains(&value_to_string(right)),
        ConditionOp::StartsWith => value_to_string(left).starts_with(&value_to_string(right)),
        ConditionOp::EndsWith => value_to_string(left).ends_with(&value_to_string(right)),
        ConditionOp::Unknown => false,
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left.as_f64(), right.as_f64()) {
        // Numbers compare numerically so 5 == 5.0 regardless of JSON repr.
        (Some(l), Some(r)) => (l - r).abs() < f64::EPSILON,
        _ => left == right,
    }
}

fn compare<F>(left: &Value, right: &Value, check: F) -> bool
where
    F: Fn(std::cmp::Ordering) -> bool,
{
    match (left, right) {
        (Value::String(l), Value::String(r)) => check(l.cmp(r)),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(l), Some(r)) => l.partial_cmp(&r).map(&check).unwrap_or(false),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equals() {
        assert!(evaluate(&json!("a"), ConditionOp::Equals, &json!("a")));
        assert!(!evaluate(&json!("a"), ConditionOp::Equals, &json!("b")));
        assert!(evaluate(&json!(5), ConditionOp::Equals, &json!(5.0)));
        assert!(evaluate(&json!(true), ConditionOp::Equals, &json!(true)));
        // Cross-type comparison is strict.
        assert!(!evaluate(&json!("5"), ConditionOp::Equals, &json!(5)));
    }

    #[test]
    fn test_not_equals() {
        assert!(evaluate(&json!("a"), ConditionOp::NotEquals, &json!("b")));
        assert!(!evaluate(&json!(3), ConditionOp::NotEquals, &json!(3)));
    }

    #[test]
    fn test_greater_than() {
        assert!(evaluate(&json!(5), ConditionOp::GreaterThan, &json!(3)));
        assert!(!evaluate(&json!(3), ConditionOp::GreaterThan, &json!(5)));
        assert!(!evaluate(&json!(3), ConditionOp::GreaterThan, &json!(3)));
    }

    #[test]
    fn test_less_than() {
        assert!(evaluate(&json!(3), ConditionOp::LessThan, &json!(5)));
        assert!(!evaluate(&json!(5), ConditionOp::LessThan, &json!(3)));
    }

    #[test]
    fn test_string_ordering() {
        assert!(evaluate(&json!("b"), ConditionOp::GreaterThan, &json!("a")));
        assert!(evaluate(&json!("apple"), ConditionOp::LessThan, &json!("banana")));
    }

    #[test]
    fn test_ordering_with_incomparable_types() {
        assert!(!evaluate(&json!("a"), ConditionOp::GreaterThan, &json!(1)));
        assert!(!evaluate(&json!(null), ConditionOp::LessThan, &json!(1)));
    }

    #[test]
    fn test_contains() {
        assert!(evaluate(
            &json!("hello world"),
            ConditionOp::Contains,
            &json!("world")
        ));
        assert!(!evaluate(
            &json!("hello world"),
            ConditionOp::Contains,
            &json!("mars")
        ));
        // String-coerced: number 123 contains digit 2.
        assert!(evaluate(&json!(123), ConditionOp::Contains, &json!(2)));
    }

    #[test]
    fn test_starts_with() {
        assert!(evaluate(
            &json!("workflow"),
            ConditionOp::StartsWith,
            &json!("work")
        ));
        assert!(!evaluate(
            &json!("workflow"),
            ConditionOp::StartsWith,
            &json!("flow")
        ));
    }

    #[test]
    fn test_ends_with() {
        assert!(evaluate(
            &json!("workflow"),
            ConditionOp::EndsWith,
            &json!("flow")
        ));
        assert!(!evaluate(
            &json!("workflow"),
            ConditionOp::EndsWith,
            &json!("work")
        ));
    }

    #[test]
    fn test_unknown_operator_is_false() {
        assert!(!evaluate(&json!(5), ConditionOp::Unknown, &json!(3)));
        assert!(!evaluate(&json!("a"), ConditionOp::Unknown, &json!("a")));
    }
}

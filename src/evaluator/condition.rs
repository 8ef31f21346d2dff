use serde_json::{Map, Value};

use crate::domain::model::{ComparisonOperator, NodeCondition};

use super::ConditionEvaluator;

/// Default operator semantics with string/number coercion. Missing fields
/// evaluate as null.
#[derive(Debug, Default, Clone)]
pub struct DefaultConditionEvaluator;

impl ConditionEvaluator for DefaultConditionEvaluator {
    fn evaluate(&self, condition: &NodeCondition, data: &Map<String, Value>) -> bool {
        let actual = lookup(data, &condition.field);
        let expected = &condition.value;

        match condition.comparison_operator {
            ComparisonOperator::Is => value_to_string(actual) == value_to_string(expected),
            ComparisonOperator::IsNot => value_to_string(actual) != value_to_string(expected),
            ComparisonOperator::Contains => eval_contains(actual, expected),
            ComparisonOperator::NotContains => !eval_contains(actual, expected),
            ComparisonOperator::Empty => is_empty(actual),
            ComparisonOperator::NotEmpty => !is_empty(actual),
            ComparisonOperator::In => eval_in(actual, expected),
            ComparisonOperator::NotIn => !eval_in(actual, expected),
            ComparisonOperator::Equal => match (value_to_f64(actual), value_to_f64(expected)) {
                (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
                _ => false,
            },
            ComparisonOperator::NotEqual => match (value_to_f64(actual), value_to_f64(expected)) {
                (Some(a), Some(b)) => (a - b).abs() >= f64::EPSILON,
                _ => true,
            },
            ComparisonOperator::GreaterThan => compare(actual, expected, |a, b| a > b),
            ComparisonOperator::LessThan => compare(actual, expected, |a, b| a < b),
            ComparisonOperator::GreaterOrEqual => compare(actual, expected, |a, b| a >= b),
            ComparisonOperator::LessOrEqual => compare(actual, expected, |a, b| a <= b),
        }
    }
}

static NULL: Value = Value::Null;

/// Resolve a dot-separated field path against the data context.
fn lookup<'a>(data: &'a Map<String, Value>, field: &str) -> &'a Value {
    let mut segments = field.split('.');
    let Some(first) = segments.next() else {
        return &NULL;
    };
    let mut current = data.get(first).unwrap_or(&NULL);
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment).unwrap_or(&NULL),
            _ => &NULL,
        };
    }
    current
}

fn compare(actual: &Value, expected: &Value, op: impl Fn(f64, f64) -> bool) -> bool {
    match (value_to_f64(actual), value_to_f64(expected)) {
        (Some(a), Some(b)) => op(a, b),
        _ => false,
    }
}

fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn value_to_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

fn is_empty(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

fn eval_contains(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::String(s) => s.contains(&value_to_string(expected)),
        Value::Array(items) => items
            .iter()
            .any(|item| value_to_string(item) == value_to_string(expected)),
        _ => false,
    }
}

fn eval_in(actual: &Value, expected: &Value) -> bool {
    match expected {
        Value::Array(items) => items
            .iter()
            .any(|item| value_to_string(item) == value_to_string(actual)),
        Value::String(s) => s.contains(&value_to_string(actual)),
        _ => false,
    }
}

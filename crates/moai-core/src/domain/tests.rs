//! Tests for set, parameter and variable declarations.

use super::*;
use crate::error::CompileError;
use crate::value::{IndexValue, Number};

fn cost() -> Parameter {
    Parameter::indexed(
        "cost",
        ["I"],
        vec![
            IndexElement::new([1], 5.0),
            IndexElement::new([2], 10.0),
            IndexElement::new([3], 15.0),
        ],
    )
    .unwrap()
}

#[test]
fn test_set_preserves_order() {
    let set = Set::new("I", [3, 1, 2]);
    let elements: Vec<_> = set.iter().filter_map(IndexValue::as_i64).collect();
    assert_eq!(elements, vec![3, 1, 2]);
    assert_eq!(set.len(), 3);
    assert!(set.contains(&IndexValue::Int(1)));
}

#[test]
fn test_set_rejects_mixed_elements() {
    let set = Set::new(
        "Mixed",
        vec![IndexValue::Int(1), IndexValue::from("a")],
    );
    assert!(matches!(
        set.validate(),
        Err(CompileError::HeterogeneousSet { name }) if name == "Mixed"
    ));
    assert!(Set::new("Empty", Vec::<i64>::new()).validate().is_ok());
}

#[test]
fn test_set_rejects_repeated_elements() {
    let set = Set::new("I", [1, 1, 2]);
    assert!(matches!(
        set.validate(),
        Err(CompileError::DuplicateSetElement { name, element })
            if name == "I" && element == IndexValue::Int(1)
    ));
    assert!(Set::new("P", ["A", "B", "A"]).validate().is_err());
    assert!(Set::new("T", [1, 2, 3]).validate().is_ok());
}

#[test]
fn test_sparse_lookup() {
    let p = cost();
    assert_eq!(p.value(&[IndexValue::Int(2)]).unwrap(), Number::Float(10.0));
    assert!(p.has_index(&[IndexValue::Int(3)]).unwrap());
    assert!(!p.has_index(&[IndexValue::Int(4)]).unwrap());
}

#[test]
fn test_sparse_lookup_has_no_default() {
    let p = cost();
    let err = p.value(&[IndexValue::Int(4)]).unwrap_err();
    assert!(matches!(err, CompileError::MissingParameterValue { ref name, .. } if name == "cost"));
}

#[test]
fn test_lookup_arity_is_checked() {
    let p = cost();
    let err = p
        .value(&[IndexValue::Int(1), IndexValue::Int(1)])
        .unwrap_err();
    assert!(matches!(
        err,
        CompileError::DimensionMismatch {
            expected: 1,
            found: 2,
            ..
        }
    ));
}

#[test]
fn test_scalar_answers_every_index() {
    let p = Parameter::scalar("alpha", 3);
    assert!(p.is_scalar());
    assert_eq!(p.get(&[]), Some(Number::Int(3)));
    assert_eq!(p.get(&[IndexValue::from("anything")]), Some(Number::Int(3)));
    assert!(p.has_index(&[IndexValue::Int(99)]).unwrap());
}

#[test]
fn test_indexed_rejects_wrong_tuple_length() {
    let result = Parameter::indexed(
        "demand",
        ["P", "T"],
        vec![IndexElement::new(["A"], 1.0)],
    );
    assert!(matches!(
        result,
        Err(CompileError::DimensionMismatch {
            expected: 2,
            found: 1,
            ..
        })
    ));
}

#[test]
fn test_indexed_rejects_duplicates() {
    let result = Parameter::indexed(
        "cost",
        ["I"],
        vec![IndexElement::new([1], 1.0), IndexElement::new([1], 2.0)],
    );
    assert!(matches!(result, Err(CompileError::DuplicateIndex { .. })));
}

#[test]
fn test_parameter_document_forms() {
    let scalar: Parameter =
        serde_json::from_str(r#"{"name": "alpha", "indices": [], "values": 2.5}"#).unwrap();
    assert_eq!(scalar.get(&[]), Some(Number::Float(2.5)));

    let sparse: Parameter = serde_json::from_str(
        r#"{"name": "demand", "indices": ["P", "T"],
            "values": [{"index": ["A", 1], "value": 100}, {"index": ["A", 2], "value": 150.0}]}"#,
    )
    .unwrap();
    let key = [IndexValue::from("A"), IndexValue::Int(1)];
    assert_eq!(sparse.get(&key), Some(Number::Float(100.0)));

    let bad = serde_json::from_str::<Parameter>(
        r#"{"name": "demand", "indices": ["P"], "values": [{"index": ["A", 1], "value": 1}]}"#,
    );
    assert!(bad.is_err());
}

#[test]
fn test_variable_builder() {
    let v = Variable::new("x")
        .with_indices(["I", "J"])
        .with_domain(Domain::Binary)
        .with_bounds(Some(0.0), Some(1.0));
    assert_eq!(v.dimension(), 2);
    assert!(v.is_binary());
    assert!(v.is_integer());
    assert!(!v.is_continuous());
    assert_eq!(v.bounds(), (Some(0.0), Some(1.0)));
}

#[test]
fn test_variable_document_defaults() {
    let v: Variable = serde_json::from_str(r#"{"name": "total"}"#).unwrap();
    assert_eq!(v.domain(), Domain::NonNegativeReal);
    assert_eq!(v.dimension(), 0);

    let v: Variable = serde_json::from_str(
        r#"{"name": "y", "indices": ["I"], "domain": "Integers", "lb": -5}"#,
    )
    .unwrap();
    assert_eq!(v.domain(), Domain::Integer);
    assert_eq!(v.lb(), Some(-5.0));

    let unknown = serde_json::from_str::<Variable>(r#"{"name": "z", "color": "red"}"#);
    assert!(unknown.is_err());
}

#![cfg(feature = "accessor")]
//! Integration tests for the property accessors `get`, `pick` and `omit`.

use rstest::rstest;

use tacit::accessor::{Path, Segment, get, omit, pick};
use tacit::{Error, Eventual, Value, map};

fn ready(result: Eventual<Value>) -> Result<Value, Error> {
    result
        .try_ready()
        .unwrap_or_else(|_| panic!("result is pending"))
}

fn order() -> Value {
    Value::object([
        ("id", Value::from(17)),
        (
            "customer",
            Value::object([
                ("name", Value::from("grace")),
                ("tier", Value::Null),
                ("address", Value::object([("city", "arlington"), ("zip", "22201")])),
            ]),
        ),
        (
            "lines",
            Value::from(vec![
                Value::object([("sku", Value::from("a-1")), ("qty", Value::from(2))]),
                Value::object([("sku", Value::from("b-7")), ("qty", Value::from(1))]),
            ]),
        ),
        ("labels", Value::map([(Value::from("gift"), true)])),
    ])
}

// =============================================================================
// get
// =============================================================================

#[rstest]
#[case::top_level("id", Value::from(17))]
#[case::nested("customer.address.city", Value::from("arlington"))]
#[case::bracket_index("lines[1].sku", Value::from("b-7"))]
#[case::dotted_index("lines.0.qty", Value::from(2))]
#[case::quoted_key("customer['name']", Value::from("grace"))]
#[case::map_key("labels.gift", Value::from(true))]
#[case::string_character("customer.name[0]", Value::from("g"))]
fn get_resolves_paths(#[case] path: &str, #[case] expected: Value) {
    assert_eq!(ready(get(path, Value::Null).apply(order())).unwrap(), expected);
}

#[rstest]
#[case::missing_key("customer.phone")]
#[case::null_value("customer.tier")]
#[case::index_out_of_range("lines[5].sku")]
#[case::through_scalar("id.value")]
fn get_falls_back_to_default(#[case] path: &str) {
    assert_eq!(ready(get(path, "n/a").apply(order())).unwrap(), Value::from("n/a"));
}

#[rstest]
fn get_never_fails_on_scalars() {
    assert_eq!(ready(get("a.b", 0).apply(Value::Null)).unwrap(), Value::from(0));
    assert_eq!(ready(get("a", 0).apply(Value::from(true))).unwrap(), Value::from(0));
}

#[rstest]
fn get_empty_path_returns_operand() {
    assert_eq!(ready(get("", Value::Null).apply(Value::from(5))).unwrap(), Value::from(5));
}

#[rstest]
fn get_composes_with_map() {
    let skus = map(get("sku", Value::Null).into_fn());
    let lines = ready(get("lines", Value::from(Vec::<Value>::new())).apply(order())).unwrap();
    assert_eq!(ready(skus.apply(lines)).unwrap(), Value::from(vec!["a-1", "b-7"]));
}

#[rstest]
fn get_accepts_explicit_segments() {
    let path = Path::from(vec![Segment::Key("lines".to_string()), Segment::Index(0), Segment::Key("sku".to_string())]);
    assert_eq!(ready(get(path, Value::Null).apply(order())).unwrap(), Value::from("a-1"));
}

// =============================================================================
// pick
// =============================================================================

#[rstest]
fn pick_rebuilds_nested_objects() {
    let picked = ready(pick(["id", "customer.address.zip", "customer.name"]).apply(order())).unwrap();
    assert_eq!(
        picked,
        Value::object([
            ("id", Value::from(17)),
            (
                "customer",
                Value::object([
                    ("address", Value::object([("zip", "22201")])),
                    ("name", Value::from("grace")),
                ]),
            ),
        ])
    );
}

#[rstest]
fn pick_turns_indices_into_keys() {
    let picked = ready(pick(["lines[1].qty"]).apply(order())).unwrap();
    assert_eq!(
        picked,
        Value::object([("lines", Value::object([("1", Value::object([("qty", 1)]))]))])
    );
}

#[rstest]
fn pick_keeps_null_values_but_skips_missing() {
    let picked = ready(pick(["customer.tier", "nowhere"]).apply(order())).unwrap();
    assert_eq!(
        picked,
        Value::object([("customer", Value::object([("tier", Value::Null)]))])
    );
}

#[rstest]
fn pick_nothing_yields_empty_object() {
    let picked = ready(pick(Vec::<&str>::new()).apply(order())).unwrap();
    assert_eq!(picked, Value::object(Vec::<(String, Value)>::new()));
}

// =============================================================================
// omit
// =============================================================================

#[rstest]
fn omit_removes_nested_and_indexed_paths() {
    let omitted = ready(omit(["customer.address", "lines[0]", "labels.gift", "id"]).apply(order())).unwrap();
    assert_eq!(
        omitted,
        Value::object([
            (
                "customer",
                Value::object([("name", Value::from("grace")), ("tier", Value::Null)]),
            ),
            (
                "lines",
                Value::from(vec![Value::object([("sku", Value::from("b-7")), ("qty", Value::from(1))])]),
            ),
            ("labels", Value::map(Vec::<(Value, Value)>::new())),
        ])
    );
}

#[rstest]
fn omit_ignores_missing_paths() {
    let omitted = ready(omit(["customer.phone", "lines[9]", "x.y.z"]).apply(order())).unwrap();
    assert_eq!(omitted, order());
}

#[rstest]
fn omit_does_not_touch_the_original() {
    let original = order();
    let _ = ready(omit(["id"]).apply(original.clone())).unwrap();
    assert_eq!(ready(get("id", Value::Null).apply(original)).unwrap(), Value::from(17));
}

#[rstest]
#[case::array(Value::from(vec![1, 2]), "Array")]
#[case::string(Value::from("text"), "String")]
#[case::map(Value::map([(1, 2)]), "Map")]
fn pick_and_omit_require_objects(#[case] operand: Value, #[case] found: &str) {
    match ready(pick(["a"]).apply(operand.clone())) {
        Err(Error::InvalidOperand { operator: "pick", found: reported }) => assert_eq!(reported, found),
        other => panic!("expected InvalidOperand, got {other:?}"),
    }
    match ready(omit(["a"]).apply(operand)) {
        Err(Error::InvalidOperand { operator: "omit", found: reported }) => assert_eq!(reported, found),
        other => panic!("expected InvalidOperand, got {other:?}"),
    }
}

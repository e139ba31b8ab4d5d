use indexmap::IndexMap;
use ndarray::arr2;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use semctx_core::{normalize, to_json, ClosedChoice, FieldValue};

#[derive(Clone, Copy)]
enum RelaxType {
    Positions,
    PositionsCell,
}

impl ClosedChoice for RelaxType {
    fn variant(&self) -> &str {
        match self {
            RelaxType::Positions => "Positions",
            RelaxType::PositionsCell => "PositionsCell",
        }
    }

    fn scalar(&self) -> Value {
        match self {
            RelaxType::Positions => json!("positions"),
            RelaxType::PositionsCell => json!("positions_cell"),
        }
    }
}

#[test]
fn instance_dump() {
    let instance = FieldValue::Map(IndexMap::from([
        ("status".to_string(), FieldValue::choice(&RelaxType::Positions)),
        ("values".to_string(), FieldValue::from(arr2(&[[1i64, 2], [3, 4]]).into_dyn())),
    ]));
    assert_eq!(
        to_json(instance),
        json!({"status": "positions", "values": [[1, 2], [3, 4]]})
    );
}

#[test]
fn float_array_keeps_precision() {
    let forces = arr2(&[[0.1, -0.25], [1e-12, 3.0]]).into_dyn();
    assert_eq!(
        to_json(FieldValue::from(forces)),
        json!([[0.1, -0.25], [1e-12, 3.0]])
    );
}

#[test]
fn normalize_is_idempotent() {
    let instance = FieldValue::Seq(vec![
        FieldValue::choice(&RelaxType::PositionsCell),
        FieldValue::from(json!({"already": "json"})),
    ]);
    let once = normalize(instance);
    let twice = normalize(once.clone());
    assert_eq!(to_json(once), to_json(twice));
}

#[test]
fn serialize_goes_through_normalizer() {
    let instance = FieldValue::Map(IndexMap::from([(
        "relax_type".to_string(),
        FieldValue::choice(&RelaxType::PositionsCell),
    )]));
    assert_eq!(
        serde_json::to_value(&instance).unwrap(),
        json!({"relax_type": "positions_cell"})
    );
}

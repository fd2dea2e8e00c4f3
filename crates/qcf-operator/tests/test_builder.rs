//! Property tests for operator construction.

use proptest::prelude::*;
use qcf_operator::{Coefficients, OperatorError, OperatorSpec, build_operator};

fn finite() -> impl Strategy<Value = f64> {
    -1.0e6..1.0e6_f64
}

fn arb_coefficients() -> impl Strategy<Value = Coefficients> {
    (finite(), finite(), finite(), finite()).prop_map(|(a, b, c, d)| Coefficients::new(a, b, c, d))
}

proptest! {
    #[test]
    fn build_is_bit_identical(coeffs in arb_coefficients(), g in proptest::option::of(finite())) {
        let first = build_operator(&coeffs, g).unwrap();
        let second = build_operator(&coeffs, g).unwrap();
        prop_assert_eq!(first.num_terms(), second.num_terms());
        for (x, y) in first.terms().iter().zip(second.terms()) {
            prop_assert_eq!(&x.label, &y.label);
            prop_assert_eq!(x.coefficient.to_bits(), y.coefficient.to_bits());
        }
    }

    #[test]
    fn fixed_mode_has_four_terms(coeffs in arb_coefficients()) {
        let op = build_operator(&coeffs, None).unwrap();
        prop_assert_eq!(op.num_terms(), 4);
        prop_assert_eq!(op.num_qubits(), 1);
    }

    #[test]
    fn coupled_mode_has_five_terms(coeffs in arb_coefficients(), g in finite()) {
        let op = build_operator(&coeffs, Some(g)).unwrap();
        prop_assert_eq!(op.num_terms(), 5);
        let last = &op.terms()[4];
        prop_assert_eq!(last.label.as_str(), "ZX");
        prop_assert_eq!(last.coefficient.to_bits(), g.to_bits());
    }
}

#[test]
fn non_finite_values_are_rejected_in_every_slot() {
    let bad = [f64::NAN, f64::INFINITY, f64::NEG_INFINITY];
    for value in bad {
        for slot in 0..4 {
            let mut raw = [1.0, 0.5, 0.3, 0.2];
            raw[slot] = value;
            let coeffs = Coefficients::new(raw[0], raw[1], raw[2], raw[3]);
            assert!(matches!(
                build_operator(&coeffs, None),
                Err(OperatorError::InvalidCoefficient { .. })
            ));
        }
        assert!(matches!(
            build_operator(&Coefficients::default(), Some(value)),
            Err(OperatorError::InvalidCoefficient { .. })
        ));
    }
}

#[test]
fn operator_survives_json() {
    let op = build_operator(&Coefficients::default(), Some(0.08)).unwrap();
    let json = serde_json::to_string(&op).unwrap();
    let back: OperatorSpec = serde_json::from_str(&json).unwrap();
    assert_eq!(op, back);
}

#[test]
fn invalid_json_operator_is_rejected() {
    let json = r#"[{"label":"ZX","coefficient":1.0},{"label":"Z","coefficient":1.0}]"#;
    assert!(serde_json::from_str::<OperatorSpec>(json).is_err());
}

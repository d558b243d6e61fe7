//! Property-based tests for los-model.
//!
//! Uses proptest to verify invariants across many random inputs.

use los_model::data::parse_rcount;
use los_model::features::{FEMALE_LABEL, MALE_LABEL, NO_LABEL, YES_LABEL};
use los_model::model_selection::train_test_split;
use los_model::prelude::*;
use los_model::service::{handle_request, Rejection};
use proptest::prelude::*;
use std::cell::Cell;

// ============================================================================
// Input Generation Strategies
// ============================================================================

/// Gender labels: the two known ones plus arbitrary text
fn gender_label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(MALE_LABEL.to_string()),
        Just(FEMALE_LABEL.to_string()),
        "[a-zA-Z -]{0,12}",
    ]
}

/// Yes/no labels: the two known ones plus arbitrary text
fn answer_label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(YES_LABEL.to_string()),
        Just(NO_LABEL.to_string()),
        "[a-zA-Z ]{0,8}",
    ]
}

fn form(rcount: impl Strategy<Value = i64>) -> impl Strategy<Value = PatientForm> {
    (rcount, gender_label(), answer_label(), answer_label(), answer_label()).prop_map(
        |(rcount, gender, asthma, pneum, depress)| PatientForm {
            rcount,
            gender,
            asthma,
            pneum,
            depress,
        },
    )
}

/// Full-rank design used to check coefficient recovery.
fn design() -> Matrix<f64> {
    let multipliers = [3usize, 5, 7, 2, 1];
    let mut data = Vec::with_capacity(40 * 5);
    for i in 0..40usize {
        for (j, m) in multipliers.iter().enumerate() {
            data.push(((i * m + j * j) % 11) as f64);
        }
    }
    Matrix::from_vec(40, 5, data).unwrap()
}

// ============================================================================
// Encoding Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_encoding_is_deterministic(f in form(0i64..=50)) {
        let a = f.encode();
        let b = f.clone().encode();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_encoding_is_binary_for_categories(f in form(0i64..=50)) {
        let FeatureVector(v) = f.encode();
        prop_assert_eq!(v[0], f.rcount as f64);
        for value in &v[1..] {
            prop_assert!(*value == 0.0 || *value == 1.0);
        }
    }

    #[test]
    fn prop_only_male_label_encodes_one(label in gender_label()) {
        let f = PatientForm {
            rcount: 1,
            gender: label.clone(),
            asthma: NO_LABEL.to_string(),
            pneum: NO_LABEL.to_string(),
            depress: NO_LABEL.to_string(),
        };
        let expected = if label.trim() == MALE_LABEL { 1.0 } else { 0.0 };
        prop_assert_eq!(f.encode().0[1], expected);
    }

    #[test]
    fn prop_numeric_rcount_parses(n in any::<u32>()) {
        prop_assert_eq!(parse_rcount(Some(&n.to_string())), Some(n));
    }
}

// ============================================================================
// Validation Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_model_invoked_only_for_plausible_counts(f in form(any::<i64>())) {
        let calls = Cell::new(0);
        let outcome = handle_request(&f, |_| {
            calls.set(calls.get() + 1);
            Ok(2.5)
        })
        .unwrap();

        if (0..=20).contains(&f.rcount) {
            prop_assert_eq!(calls.get(), 1);
            prop_assert!(matches!(outcome, Outcome::Predicted(_)));
        } else {
            prop_assert_eq!(calls.get(), 0);
            prop_assert!(matches!(outcome, Outcome::Rejected(_)));
        }
    }

    #[test]
    fn prop_counts_above_threshold_are_implausible(rcount in 21i64..=50) {
        let f = PatientForm::new(rcount, Gender::Female, Answer::No, Answer::No, Answer::No);
        let outcome = handle_request(&f, |_| Ok(0.0)).unwrap();
        prop_assert_eq!(
            outcome,
            Outcome::Rejected(Rejection::ImplausibleDiagnosisCount { rcount })
        );
    }
}

// ============================================================================
// Split and Fit Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_split_sizes_and_coverage(n in 2usize..200, test_size in 0.05..0.95f64, seed in any::<u64>()) {
        let x = Matrix::from_vec(n, 1, (0..n).map(|i| i as f64).collect()).unwrap();
        let y = Vector::from_vec((0..n).map(|i| i as f64).collect());

        let n_test = (n as f64 * test_size).ceil() as usize;
        match train_test_split(&x, &y, test_size, seed) {
            Ok((train, test)) => {
                prop_assert_eq!(test.len(), n_test);
                prop_assert_eq!(train.len() + test.len(), n);

                let mut all: Vec<f64> = train
                    .y
                    .as_slice()
                    .iter()
                    .chain(test.y.as_slice())
                    .copied()
                    .collect();
                all.sort_by(f64::total_cmp);
                prop_assert_eq!(all, y.as_slice().to_vec());

                let again = train_test_split(&x, &y, test_size, seed).unwrap();
                prop_assert_eq!(again.0, train);
            }
            Err(_) => prop_assert!(n_test == 0 || n_test >= n),
        }
    }

    #[test]
    fn prop_ols_recovers_exact_coefficients(
        coef in prop::collection::vec(-10.0..10.0f64, 5),
        intercept in -10.0..10.0f64
    ) {
        let x = design();
        let y: Vec<f64> = (0..x.n_rows())
            .map(|i| {
                let row = x.row(i);
                intercept + row.as_slice().iter().zip(&coef).map(|(a, b)| a * b).sum::<f64>()
            })
            .collect();

        let mut model = LinearRegression::new();
        model.fit(&x, &Vector::from_vec(y)).unwrap();

        let fitted = model.coefficients().unwrap();
        for (got, want) in fitted.as_slice().iter().zip(&coef) {
            prop_assert!((got - want).abs() < 1e-6, "got {got}, want {want}");
        }
        prop_assert!((model.intercept() - intercept).abs() < 1e-6);
    }
}

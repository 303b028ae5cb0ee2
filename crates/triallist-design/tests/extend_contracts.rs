use triallist_core::{Cell, Table};
use triallist_design::{extend, ExtendOpts};

fn trials(n: usize) -> Table {
    let rows = (0..n)
        .map(|i| vec![Cell::from(i as i64), Cell::from(format!("stim_{i}"))])
        .collect();
    Table::from_rows(vec!["ix".into(), "stim".into()], rows).unwrap()
}

#[test]
fn four_reps_of_ten_rows_is_forty() {
    let out = extend(
        &trials(10),
        &ExtendOpts {
            reps: Some(4),
            ..ExtendOpts::default()
        },
    )
    .unwrap();
    assert_eq!(out.len(), 40);
    assert_eq!(out.columns().len(), 2);
}

#[test]
fn max_length_result_is_never_longer() {
    let out = extend(
        &trials(10),
        &ExtendOpts {
            max_length: Some(390),
            ..ExtendOpts::default()
        },
    )
    .unwrap();
    assert!(out.len() < 390);
    assert_eq!(out.len() % 10, 0);
}

#[test]
fn short_budget_still_yields_one_copy() {
    let out = extend(
        &trials(10),
        &ExtendOpts {
            max_length: Some(4),
            ..ExtendOpts::default()
        },
    )
    .unwrap();
    assert_eq!(out.len(), 10);
}

#[test]
fn row_ix_column_tags_original_rows() {
    let out = extend(
        &trials(10),
        &ExtendOpts {
            reps: Some(4),
            row_ix: Some("id".into()),
            ..ExtendOpts::default()
        },
    )
    .unwrap();
    assert_eq!(out.columns().len(), 3);
    assert_eq!(out.columns()[0], "id");
    for original in 0..10i64 {
        let count = out
            .column_values("id")
            .unwrap()
            .iter()
            .filter(|cell| **cell == Cell::Int(original))
            .count();
        assert_eq!(count, 4);
    }
}

#[test]
fn rep_ix_column_tags_each_copy() {
    let out = extend(
        &trials(3),
        &ExtendOpts {
            reps: Some(2),
            rep_ix: Some("iter".into()),
            row_ix: Some("id".into()),
            ..ExtendOpts::default()
        },
    )
    .unwrap();
    assert_eq!(out.columns()[..2], ["iter".to_string(), "id".to_string()]);
    let reps = out.column_values("iter").unwrap();
    assert_eq!(reps[..3], vec![Cell::Int(0); 3][..]);
    assert_eq!(reps[3..], vec![Cell::Int(1); 3][..]);
}

#[test]
fn missing_length_knobs_are_rejected() {
    let err = extend(&trials(4), &ExtendOpts::default()).unwrap_err();
    assert_eq!(err.info().code, "missing-length");
}

#[test]
fn empty_frame_is_rejected() {
    let empty = Table::new(vec!["stim".into()]).unwrap();
    let err = extend(
        &empty,
        &ExtendOpts {
            reps: Some(2),
            ..ExtendOpts::default()
        },
    )
    .unwrap_err();
    assert_eq!(err.info().code, "empty-frame");
}

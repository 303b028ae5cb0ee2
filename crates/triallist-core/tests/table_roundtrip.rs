use triallist_core::{stable_table_hash, Cell, Table};

fn sample() -> Table {
    Table::from_rows(
        vec!["condition".into(), "stimulus".into(), "valid".into()],
        vec![
            vec![Cell::from("congruent"), Cell::from("red"), Cell::from(true)],
            vec![Cell::from("incongruent"), Cell::from("blue"), Cell::from(false)],
        ],
    )
    .unwrap()
}

#[test]
fn serde_roundtrip_preserves_table() {
    let table = sample();
    let encoded = serde_json::to_string(&table).unwrap();
    let decoded: Table = serde_json::from_str(&encoded).unwrap();
    assert_eq!(table, decoded);
}

#[test]
fn stable_hash_tracks_content_and_order() {
    let table = sample();
    assert_eq!(
        stable_table_hash(&table).unwrap(),
        stable_table_hash(&table.clone()).unwrap()
    );
    let reversed = table.take(&[1, 0]).unwrap();
    assert_ne!(
        stable_table_hash(&table).unwrap(),
        stable_table_hash(&reversed).unwrap()
    );
}

#[test]
fn labels_recover_original_rows_after_reorder() {
    let table = sample();
    let reordered = table.take(&[1, 0]).unwrap();
    assert_eq!(reordered.labels(), &[1, 0]);
    assert_eq!(
        reordered.value(0, "condition").unwrap(),
        table.value(1, "condition").unwrap()
    );
}

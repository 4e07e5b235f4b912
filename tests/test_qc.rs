mod common;
use common::{eeg_value, grid};
use epochframe::{check, validate_schema, EpochsConfig, EpochsError, EpochsTable};

const STREAMS: [&str; 3] = ["MiPf", "MiCe", "MiOc"];

fn good_table() -> EpochsTable {
    grid(&[1, 2, 3, 4], &[-8, -4, 0, 4, 8], &STREAMS, eeg_value)
}

#[test]
fn well_formed_table_passes() {
    let t = good_table();
    let out = check(&t, &STREAMS, &EpochsConfig::default()).unwrap();
    assert_eq!(out, &t);
}

#[test]
fn check_is_idempotent() {
    let t = good_table();
    let cfg = EpochsConfig::default();
    let once = check(&t, &STREAMS, &cfg).unwrap();
    let twice = check(once, &STREAMS, &cfg).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn row_order_does_not_matter() {
    // Time-major order instead of epoch-major.
    let t = EpochsTable::new()
        .with_column("epoch_id", vec![2_i64, 1, 2, 1])
        .unwrap()
        .with_column("time", vec![5_i64, 5, 0, 0])
        .unwrap();
    assert!(check(&t, &[] as &[&str], &EpochsConfig::default()).is_ok());
}

#[test]
fn missing_data_columns_listed() {
    let t = good_table();
    let err = check(&t, &["MiPf", "LLPf", "A2"], &EpochsConfig::default()).unwrap_err();
    assert_eq!(
        err,
        EpochsError::MissingColumns { missing: vec!["A2".into(), "LLPf".into()] }
    );
}

#[test]
fn empty_column_name_rejected() {
    let t = good_table();
    let err = check(&t, &["MiPf", ""], &EpochsConfig::default()).unwrap_err();
    assert!(matches!(err, EpochsError::InvalidArgument(_)));
}

#[test]
fn missing_key_columns() {
    let t = good_table();
    let cfg = EpochsConfig { time: "Time".into(), ..EpochsConfig::default() };
    let err = check(&t, &STREAMS, &cfg).unwrap_err();
    assert_eq!(err, EpochsError::Schema { role: "time", column: "Time".into() });

    let cfg = EpochsConfig { epoch_id: "Epoch_idx".into(), ..EpochsConfig::default() };
    assert_eq!(
        validate_schema(&t, &cfg).unwrap_err(),
        EpochsError::Schema { role: "epoch_id", column: "Epoch_idx".into() }
    );
}

#[test]
fn float_time_column_rejected() {
    let t = EpochsTable::new()
        .with_column("epoch_id", vec![1_i64, 1])
        .unwrap()
        .with_column("time", vec![0.0_f64, 0.5])
        .unwrap();
    let err = check(&t, &[] as &[&str], &EpochsConfig::default()).unwrap_err();
    assert_eq!(
        err,
        EpochsError::ColumnType { role: "time", column: "time".into(), found: "float64" }
    );
}

#[test]
fn duplicate_column_names_rejected() {
    let mut t = good_table();
    t.push_column("MiCe", vec![0.0_f64; t.n_rows()]).unwrap();
    let err = check(&t, &["MiPf"], &EpochsConfig::default()).unwrap_err();
    assert_eq!(err, EpochsError::DuplicateColumn { duplicates: vec!["MiCe".into()] });
}

#[test]
fn data_column_may_not_be_a_key() {
    let t = good_table();
    let err = check(&t, &["MiPf", "time"], &EpochsConfig::default()).unwrap_err();
    assert_eq!(err, EpochsError::DuplicateColumn { duplicates: vec!["time".into()] });
}

#[test]
fn repeated_data_column_rejected() {
    let t = good_table();
    let err = check(&t, &["MiPf", "MiCe", "MiPf"], &EpochsConfig::default()).unwrap_err();
    assert_eq!(err, EpochsError::DuplicateColumn { duplicates: vec!["MiPf".into()] });
}

#[test]
fn epoch_id_and_time_share_a_name() {
    let t = good_table();
    let cfg = EpochsConfig { epoch_id: "time".into(), ..EpochsConfig::default() };
    let err = check(&t, &STREAMS, &cfg).unwrap_err();
    assert_eq!(err, EpochsError::DuplicateColumn { duplicates: vec!["time".into()] });
}

#[test]
fn misaligned_epoch_sets_rejected() {
    // Epoch 2 has no row at time 1.
    let t = EpochsTable::new()
        .with_column("epoch_id", vec![1_i64, 2, 1, 1, 2])
        .unwrap()
        .with_column("time", vec![0_i64, 0, 1, 2, 2])
        .unwrap();
    match check(&t, &[] as &[&str], &EpochsConfig::default()).unwrap_err() {
        EpochsError::Alignment { time, previous_time, current, previous, .. } => {
            assert_eq!(time, 1);
            assert_eq!(previous_time, 0);
            assert_eq!(current, vec![1]);
            assert_eq!(previous, vec![1, 2]);
        }
        other => panic!("expected Alignment, got {other:?}"),
    }
}

#[test]
fn extra_epoch_in_last_slice_rejected() {
    let mut ids = vec![];
    let mut ts = vec![];
    for t in 0..4_i64 {
        for e in 1..=3_i64 {
            ids.push(e);
            ts.push(t);
        }
    }
    ids.push(9);
    ts.push(3);
    let t = EpochsTable::new()
        .with_column("epoch_id", ids)
        .unwrap()
        .with_column("time", ts)
        .unwrap();
    let err = check(&t, &[] as &[&str], &EpochsConfig::default()).unwrap_err();
    assert!(matches!(err, EpochsError::Alignment { time: 3, .. }), "{err}");
}

#[test]
fn duplicate_epoch_in_one_slice_rejected() {
    // Same id set {1, 2} at both times, but epoch 1 twice at time 0.
    let t = EpochsTable::new()
        .with_column("epoch_id", vec![1_i64, 1, 2, 1, 2])
        .unwrap()
        .with_column("time", vec![0_i64, 0, 0, 1, 1])
        .unwrap();
    let err = check(&t, &[] as &[&str], &EpochsConfig::default()).unwrap_err();
    assert_eq!(
        err,
        EpochsError::DuplicateEntity { epoch_id: "epoch_id".into(), time: 0, duplicates: vec![1] }
    );
}

#[test]
fn duplicated_rows_everywhere_rejected() {
    let t = EpochsTable::new()
        .with_column("epoch_id", vec![3_i64, 3, 3, 3])
        .unwrap()
        .with_column("time", vec![0_i64, 0, 1, 1])
        .unwrap();
    assert!(matches!(
        check(&t, &[] as &[&str], &EpochsConfig::default()),
        Err(EpochsError::DuplicateEntity { duplicates, .. }) if duplicates == vec![3]
    ));
}

#[test]
fn custom_key_names() {
    let t = EpochsTable::new()
        .with_column("Epoch_idx", vec![1_i64, 2])
        .unwrap()
        .with_column("Time", vec![0_i64, 0])
        .unwrap()
        .with_column("x", vec![1.0_f64, 2.0])
        .unwrap();
    let cfg = EpochsConfig {
        epoch_id: "Epoch_idx".into(),
        time: "Time".into(),
        ..EpochsConfig::default()
    };
    assert!(check(&t, &["x"], &cfg).is_ok());
    assert!(check(&t, &["x"], &EpochsConfig::default()).is_err());
}

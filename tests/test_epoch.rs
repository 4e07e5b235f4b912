mod common;
use common::{eeg_value, grid};
use epochframe::{check, drop_bad, good_epochs, EpochsConfig, EpochsError, EpochsTable};
use std::collections::BTreeSet;

/// Epochs 1..=6 over times -2..=2 with a `bad` code that is non-zero at
/// time 0 for `flagged` epochs and noise elsewhere.
fn table(flagged: &[i64]) -> EpochsTable {
    let mut t = grid(&[1, 2, 3, 4, 5, 6], &[-2, -1, 0, 1, 2], &["MiPf"], eeg_value);
    let ids = t.int_column("epoch_id").unwrap().clone();
    let ts = t.int_column("time").unwrap().clone();
    let bad: Vec<i64> = ids
        .iter()
        .zip(ts.iter())
        .map(|(e, &time)| match time {
            0 if flagged.contains(e) => 1,
            0 => 0,
            _ => 48,
        })
        .collect();
    t.push_column("bad", bad).unwrap();
    t
}

fn epoch_set(t: &EpochsTable) -> BTreeSet<i64> {
    t.int_column("epoch_id").unwrap().iter().copied().collect()
}

#[test]
fn flagged_epoch_removed_at_every_time() {
    let t = table(&[5]);
    let out = drop_bad(&t, "bad", &EpochsConfig::default()).unwrap();
    assert_eq!(epoch_set(&out), BTreeSet::from([1, 2, 3, 4, 6]));
    assert_eq!(out.n_rows(), 5 * 5);
    assert!(check(&out, &["MiPf", "bad"], &EpochsConfig::default()).is_ok());
}

#[test]
fn kept_rows_are_unchanged() {
    let t = table(&[2, 4]);
    let out = drop_bad(&t, "bad", &EpochsConfig::default()).unwrap();
    let ids = t.int_column("epoch_id").unwrap();
    let keep: Vec<usize> = (0..t.n_rows()).filter(|&r| ids[r] != 2 && ids[r] != 4).collect();
    assert_eq!(out, t.take_rows(&keep));
}

#[test]
fn nothing_flagged_keeps_everything() {
    let t = table(&[]);
    let out = drop_bad(&t, "bad", &EpochsConfig::default()).unwrap();
    assert_eq!(out, t);
}

#[test]
fn everything_flagged_leaves_an_empty_table() {
    let t = table(&[1, 2, 3, 4, 5, 6]);
    let out = drop_bad(&t, "bad", &EpochsConfig::default()).unwrap();
    assert_eq!(out.n_rows(), 0);
    assert_eq!(out.n_columns(), t.n_columns());
}

#[test]
fn good_epochs_at_landing_time() {
    let t = table(&[1, 6]);
    let good = good_epochs(&t, "bad", &EpochsConfig::default()).unwrap();
    assert_eq!(good.into_iter().collect::<BTreeSet<_>>(), BTreeSet::from([2, 3, 4, 5]));

    // Every epoch carries code 48 at time 2.
    let cfg = EpochsConfig { landing_time: 2, ..EpochsConfig::default() };
    assert!(good_epochs(&t, "bad", &cfg).unwrap().is_empty());
}

#[test]
fn absent_landing_time_is_an_error() {
    let t = table(&[1]);
    let cfg = EpochsConfig { landing_time: 3, ..EpochsConfig::default() };
    let err = drop_bad(&t, "bad", &cfg).unwrap_err();
    assert_eq!(err, EpochsError::GroupNotFound { time: "time".into(), value: 3 });
}

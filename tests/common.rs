/// Shared builders for epoch-table tests.
use epochframe::EpochsTable;

#[allow(unused)]
/// Rectangular table: every epoch in `epochs` × every time in `times`,
/// epoch-major row order. Each signal value is `f(column, epoch, time)`.
pub fn grid<F>(epochs: &[i64], times: &[i64], signals: &[&str], f: F) -> EpochsTable
where
    F: Fn(usize, i64, i64) -> f64,
{
    let mut ids = vec![];
    let mut ts = vec![];
    for &e in epochs {
        for &t in times {
            ids.push(e);
            ts.push(t);
        }
    }
    let mut table = EpochsTable::new()
        .with_column("epoch_id", ids.clone())
        .unwrap()
        .with_column("time", ts.clone())
        .unwrap();
    for (c, name) in signals.iter().enumerate() {
        let vals: Vec<f64> = ids.iter().zip(&ts).map(|(&e, &t)| f(c, e, t)).collect();
        table.push_column(*name, vals).unwrap();
    }
    table
}

#[allow(unused)]
/// Deterministic pseudo-EEG: a few sines per channel plus an epoch offset.
pub fn eeg_value(c: usize, e: i64, t: i64) -> f64 {
    let t = t as f64;
    let c = c as f64;
    let e = e as f64;
    30.0 * (0.07 * t + c).sin() + 5.0 * (0.31 * t * (c + 1.0)).cos() + 12.0 * e - 4.0 * c
}

#[allow(unused)]
/// Per-epoch mean of `col` over rows with `start <= time < stop`.
pub fn interval_mean(table: &EpochsTable, col: &str, epoch: i64, start: i64, stop: i64) -> f64 {
    let ids = table.int_column("epoch_id").unwrap();
    let ts = table.int_column("time").unwrap();
    let x = table.float_values(col).unwrap();
    let picked: Vec<f64> = (0..table.n_rows())
        .filter(|&r| ids[r] == epoch && start <= ts[r] && ts[r] < stop)
        .map(|r| x[r])
        .collect();
    picked.iter().sum::<f64>() / picked.len() as f64
}

#[allow(unused)]
/// Values of `col` for one epoch, in row order.
pub fn epoch_values(table: &EpochsTable, col: &str, epoch: i64) -> Vec<f64> {
    let ids = table.int_column("epoch_id").unwrap();
    let x = table.float_values(col).unwrap();
    (0..table.n_rows()).filter(|&r| ids[r] == epoch).map(|r| x[r]).collect()
}

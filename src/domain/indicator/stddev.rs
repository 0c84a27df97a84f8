//! Mean and sample standard deviation over a full window.
//!
//! STDDEV = sqrt(sum((C[i] - mean)^2) / (n - 1))
//! Fewer than 2 values → 0.

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }

    let avg = mean(values);
    let sum_sq: f64 = values
        .iter()
        .map(|v| {
            let diff = v - avg;
            diff * diff
        })
        .sum();

    (sum_sq / (values.len() - 1) as f64).sqrt()
}

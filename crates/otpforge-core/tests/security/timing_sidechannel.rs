//! Timing side-channel validation for token verification.
//!
//! Uses Welch's t-test to check that `verify_totp` timing does not leak
//! whether a token matches. Matching (class A) and non-matching (class B)
//! tokens are timed in interleaved iterations and the t-statistic must stay
//! below 4.5.
//!
//! This is a statistical test; heavy scheduler noise can in rare cases
//! produce a false positive.

use std::time::Instant;

use otpforge_core::{generate_totp, verify_totp, OtpAlgorithm, OtpDigits};

/// Number of timing samples per class.
const SAMPLES: usize = 10_000;

/// Welch's t-test threshold. |t| < 4.5 means no detectable timing difference.
const T_THRESHOLD: f64 = 4.5;

#[inline(never)]
fn black_box_verify(
    secret: &[u8],
    token: &str,
    time: u64,
    digits: OtpDigits,
    algorithm: OtpAlgorithm,
) -> bool {
    let outcome = verify_totp(secret, token, time, 1, digits, 30, algorithm)
        .expect("verify_totp should not error during timing test");
    std::hint::black_box(outcome.matched)
}

/// Welch's t-statistic for two independent samples.
///
/// `t = (mean_a - mean_b) / sqrt(var_a/n_a + var_b/n_b)`
#[allow(clippy::cast_precision_loss)]
fn welch_t_statistic(a: &[f64], b: &[f64]) -> f64 {
    if a.len() < 2 || b.len() < 2 {
        return f64::NAN;
    }

    let n_a = a.len() as f64;
    let n_b = b.len() as f64;

    let mean_a: f64 = a.iter().sum::<f64>() / n_a;
    let mean_b: f64 = b.iter().sum::<f64>() / n_b;

    let var_a: f64 = a.iter().map(|x| (x - mean_a).powi(2)).sum::<f64>() / (n_a - 1.0);
    let var_b: f64 = b.iter().map(|x| (x - mean_b).powi(2)).sum::<f64>() / (n_b - 1.0);

    let denominator = (var_a / n_a + var_b / n_b).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    (mean_a - mean_b) / denominator
}

#[test]
fn verify_totp_constant_time_no_timing_leak() {
    let secret = b"abcdefg";
    let time = 1_234_567_890u64;
    let digits = OtpDigits::Six;
    let algorithm = OtpAlgorithm::Sha512;

    let valid_token =
        generate_totp(secret, time, digits, 30, algorithm).expect("generate valid token");
    let invalid_token = if valid_token == "000000" {
        "111111".to_owned()
    } else {
        "000000".to_owned()
    };

    for _ in 0..100 {
        black_box_verify(secret, &valid_token, time, digits, algorithm);
        black_box_verify(secret, &invalid_token, time, digits, algorithm);
    }

    let mut times_a = Vec::with_capacity(SAMPLES);
    let mut times_b = Vec::with_capacity(SAMPLES);

    for _ in 0..SAMPLES {
        let start = Instant::now();
        let _ = black_box_verify(secret, &valid_token, time, digits, algorithm);
        let elapsed_a = start.elapsed().as_nanos();

        let start = Instant::now();
        let _ = black_box_verify(secret, &invalid_token, time, digits, algorithm);
        let elapsed_b = start.elapsed().as_nanos();

        #[allow(clippy::cast_precision_loss)]
        {
            times_a.push(elapsed_a as f64);
            times_b.push(elapsed_b as f64);
        }
    }

    let abs_t = welch_t_statistic(&times_a, &times_b).abs();

    eprintln!(
        "Timing side-channel test: |t| = {abs_t:.2} (threshold: {T_THRESHOLD}), \
         samples = {SAMPLES} per class"
    );

    assert!(
        abs_t < T_THRESHOLD,
        "Timing side-channel detected: |t| = {abs_t:.2} exceeds threshold {T_THRESHOLD}."
    );
}

#[test]
fn welch_t_test_identical_distributions() {
    let a = vec![1.0; 100];
    let b = vec![1.0; 100];
    let t = welch_t_statistic(&a, &b);
    assert!(t.abs() < 0.001, "identical distributions should yield t ≈ 0, got {t}");
}

#[test]
fn welch_t_test_different_distributions() {
    let a: Vec<f64> = (0..1000).map(|i| 100.0 + f64::from(i % 3)).collect();
    let b: Vec<f64> = (0..1000).map(|i| 200.0 + f64::from(i % 3)).collect();
    let t = welch_t_statistic(&a, &b);
    assert!(t.abs() > 100.0, "clearly different distributions should yield |t| >> 4.5, got {t:.2}");
}

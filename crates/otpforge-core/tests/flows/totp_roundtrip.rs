//! Full OTP lifecycle: generate → verify, cross-algorithm differentiation,
//! and time-window boundary behaviour.

use otpforge_core::{
    FixedClock, OtpAlgorithm, OtpDigits, Secret, SecretEncoding, TotpConfig, TotpOverrides,
    TotpService, VerifyOutcome,
};

const T: u64 = 1_700_000_020;

fn service_at(time: u64) -> TotpService<FixedClock> {
    TotpService::with_clock(TotpConfig::default(), FixedClock(time)).expect("valid config")
}

/// Generate at T, verify at T with the same parameters.
#[test]
fn abcdefg_sha512_same_time() {
    let secret = Secret::from_ascii("abcdefg");
    let overrides = TotpOverrides::none()
        .algorithm(OtpAlgorithm::Sha512)
        .step(30);

    let token = service_at(T).generate_token(&secret, &overrides).unwrap();
    let outcome = service_at(T).verify(&secret, &token, &overrides).unwrap();

    assert_eq!(outcome, VerifyOutcome { matched: true, delta: Some(0) });
}

/// Token from T verified at T+30 is one step old.
#[test]
fn verify_one_step_later_reports_minus_one() {
    let secret = Secret::from_ascii("abcdefg");
    let token = service_at(T)
        .generate_token(&secret, &TotpOverrides::none())
        .unwrap();
    let outcome = service_at(T + 30)
        .verify(&secret, &token, &TotpOverrides::none())
        .unwrap();
    assert_eq!(outcome, VerifyOutcome::at(-1));
}

/// Token from T verified at T+61 is outside a ±1 window.
#[test]
fn verify_beyond_window_fails() {
    let secret = Secret::from_ascii("abcdefg");
    let token = service_at(T)
        .generate_token(&secret, &TotpOverrides::none())
        .unwrap();
    let outcome = service_at(T + 61)
        .verify(&secret, &token, &TotpOverrides::none())
        .unwrap();
    assert_eq!(outcome, VerifyOutcome::NO_MATCH);
}

/// With window 0 only instants on the same step match.
#[test]
fn zero_window_same_step_only() {
    let secret = Secret::from_ascii("abcdefg");
    let strict = TotpOverrides::none().window(0);
    // T is 10s into its step.
    let token = service_at(T).generate_token(&secret, &strict).unwrap();

    for time in [T - 10, T, T + 19] {
        assert!(
            service_at(time).verify(&secret, &token, &strict).unwrap().is_match(),
            "time {time} maps to the same step"
        );
    }
    for time in [T - 11, T + 20] {
        assert!(
            !service_at(time).verify(&secret, &token, &strict).unwrap().is_match(),
            "time {time} maps to a neighbouring step"
        );
    }
}

/// Each algorithm's token verifies only under that algorithm.
#[test]
fn cross_algorithm_differentiation() {
    let svc = service_at(T);
    let secret = Secret::from_ascii(
        "1234567890123456789012345678901234567890123456789012345678901234",
    );
    let algorithms = [OtpAlgorithm::Sha1, OtpAlgorithm::Sha256, OtpAlgorithm::Sha512];

    let tokens: Vec<String> = algorithms
        .iter()
        .map(|&a| {
            svc.generate_token(
                &secret,
                &TotpOverrides::none().algorithm(a).digits(OtpDigits::Eight),
            )
            .unwrap()
        })
        .collect();

    for (algorithm, token) in algorithms.iter().zip(&tokens) {
        let overrides = TotpOverrides::none()
            .algorithm(*algorithm)
            .digits(OtpDigits::Eight);
        assert!(
            svc.check(&secret, token, &overrides),
            "{algorithm} token must verify under {algorithm}"
        );
    }

    let all_same = tokens[0] == tokens[1] && tokens[1] == tokens[2];
    assert!(!all_same, "different algorithms should produce different codes");
}

/// A secret stored as Base32 and decoded later issues the same tokens.
#[test]
fn stored_base32_secret_is_interchangeable() {
    let svc = service_at(T);
    let original = svc.generate_secret(None).unwrap();
    let restored = Secret::decode(&original.to_base32(), SecretEncoding::Base32).unwrap();

    let a = svc.generate_token(&original, &TotpOverrides::none()).unwrap();
    let b = svc.generate_token(&restored, &TotpOverrides::none()).unwrap();
    assert_eq!(a, b);
}

/// 60-second step keeps tokens valid for a full minute plus one window.
#[test]
fn sixty_second_step() {
    let secret = Secret::from_ascii("12345678901234567890");
    let overrides = TotpOverrides::none().step(60);
    let start = 1_700_000_040; // aligned on a 60s boundary
    let token = service_at(start).generate_token(&secret, &overrides).unwrap();

    assert_eq!(
        service_at(start + 59).verify(&secret, &token, &overrides).unwrap(),
        VerifyOutcome::at(0)
    );
    assert_eq!(
        service_at(start + 60).verify(&secret, &token, &overrides).unwrap(),
        VerifyOutcome::at(-1)
    );
}

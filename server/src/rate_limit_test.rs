use super::*;

fn limiter(per_client: usize, global: usize) -> RateLimiter {
    RateLimiter::new(RateLimitConfig {
        per_client_limit: per_client,
        per_client_window: Duration::from_secs(60),
        global_limit: global,
        global_window: Duration::from_secs(60),
    })
}

#[test]
fn per_client_allows_up_to_limit() {
    let rl = limiter(3, 100);
    let now = Instant::now();
    for i in 0..3 {
        assert!(rl.check_and_record_at("10.0.0.1", now).is_ok(), "request {i} should succeed");
    }
    assert_eq!(
        rl.check_and_record_at("10.0.0.1", now),
        Err(RateLimitError::PerClientExceeded { limit: 3, window_secs: 60 })
    );
    assert!(rl.check_and_record_at("10.0.0.2", now).is_ok());
}

#[test]
fn global_allows_up_to_limit() {
    let rl = limiter(100, 4);
    let now = Instant::now();
    for i in 0..4 {
        assert!(rl.check_and_record_at(&format!("client-{i}"), now).is_ok());
    }
    assert!(matches!(rl.check_and_record_at("fresh", now), Err(RateLimitError::GlobalExceeded { limit: 4, .. })));
}

#[test]
fn rejected_requests_are_not_recorded() {
    let rl = limiter(1, 2);
    let now = Instant::now();
    rl.check_and_record_at("a", now).unwrap();
    assert!(rl.check_and_record_at("a", now).is_err());
    assert!(rl.check_and_record_at("b", now).is_ok());
}

#[test]
fn window_expiry_allows_new_requests() {
    let rl = limiter(2, 100);
    let start = Instant::now();
    rl.check_and_record_at("a", start).unwrap();
    rl.check_and_record_at("a", start).unwrap();
    assert!(rl.check_and_record_at("a", start).is_err());

    let later = start + Duration::from_secs(61);
    assert!(rl.check_and_record_at("a", later).is_ok());
}

#[test]
fn idle_clients_are_evicted_after_their_window() {
    let rl = limiter(10, 100);
    let start = Instant::now();
    for i in 0..5 {
        rl.check_and_record_at(&format!("10.0.0.{i}"), start).unwrap();
    }
    assert_eq!(rl.inner.lock().unwrap().client_requests.len(), 5);

    rl.check_and_record_at("10.0.0.99", start + Duration::from_secs(3600)).unwrap();
    let inner = rl.inner.lock().unwrap();
    assert_eq!(inner.client_requests.len(), 1);
    assert!(inner.client_requests.contains_key("10.0.0.99"));
}

#[test]
fn clones_share_state() {
    let rl = limiter(1, 100);
    let clone = rl.clone();
    let now = Instant::now();
    rl.check_and_record_at("a", now).unwrap();
    assert!(clone.check_and_record_at("a", now).is_err());
}

#[test]
fn config_from_env_reads_overrides() {
    unsafe {
        std::env::set_var("RATE_LIMIT_PER_CLIENT", "5");
        std::env::set_var("RATE_LIMIT_GLOBAL_WINDOW_SECS", "30");
    }
    let cfg = RateLimitConfig::from_env();
    assert_eq!(cfg.per_client_limit, 5);
    assert_eq!(cfg.global_window, Duration::from_secs(30));
    assert_eq!(cfg.global_limit, DEFAULT_GLOBAL_LIMIT);
    unsafe {
        std::env::remove_var("RATE_LIMIT_PER_CLIENT");
        std::env::remove_var("RATE_LIMIT_GLOBAL_WINDOW_SECS");
    }
}

// tests/payload.rs

use errchain::{Error, TypeToken};
use errchain_test_utils::builders::ChainBuilder;
use errchain_test_utils::fixtures::{
    ERR_INTERNAL, HttpFailure, LoginRequest, NetworkDetails, TraceId,
};
use errchain_test_utils::init_tracing;

#[test]
fn payload_round_trips_through_the_handle() {
    let err = Error::with_payload("network failure", NetworkDetails::new(503, "192.168.1.1"));

    let details = err.payload::<NetworkDetails>().unwrap();
    assert_eq!(details.status_code, 503);
    assert_eq!(details.remote_ip, "192.168.1.1");
    assert_eq!(err.message(), "network failure");
}

#[test]
fn payload_type_mismatch_is_a_miss() {
    let err = Error::with_payload("network failure", NetworkDetails::new(503, "10.0.0.1"));
    assert!(err.payload::<i32>().is_none());
    assert!(err.payload::<HttpFailure>().is_none());
    assert!(Error::nil().payload::<NetworkDetails>().is_none());
    assert!(ERR_INTERNAL.payload::<NetworkDetails>().is_none());
}

#[test]
fn primitive_payloads() {
    let err = Error::with_payload("retry budget", 3u32);
    assert_eq!(err.payload::<u32>(), Some(&3));
    // Distinct integer types have distinct tokens.
    assert!(err.payload::<u64>().is_none());
    assert_ne!(TypeToken::of::<u32>(), TypeToken::of::<u64>());
}

#[test]
fn payload_is_found_through_wrapping() {
    let err = Error::with_payload("timeout", TraceId("abc-123".to_string()))
        .wrap("calling billing")
        .wrap("checkout");

    assert_eq!(err.payload::<TraceId>().unwrap().0, "abc-123");
    assert!(err.layer_payload::<TraceId>().is_none());
    assert!(err.root_cause().unwrap().layer_payload::<TraceId>().is_some());
}

#[test]
fn outermost_payload_of_a_type_wins() {
    let err = Error::with_payload("inner", TraceId("inner".into()))
        .wrap_with_payload("outer", TraceId("outer".into()));
    assert_eq!(err.payload::<TraceId>().unwrap().0, "outer");
}

#[test]
fn http_failure_survives_two_wraps() {
    let err = Error::with_payload("upstream failed", HttpFailure::new(503, "/v1/users"))
        .wrap("fetching users")
        .wrap("rendering dashboard");

    let failure = err.payload::<HttpFailure>().unwrap();
    assert_eq!(failure, &HttpFailure::new(503, "/v1/users"));
    assert_eq!(
        err.message(),
        "rendering dashboard: fetching users: upstream failed"
    );
}

#[test]
fn payload_mut_is_copy_on_write() {
    init_tracing();
    let original = Error::with_payload("failure", NetworkDetails::new(500, "10.0.0.1"));
    let mut copy = original.clone();

    copy.payload_mut::<NetworkDetails>().unwrap().status_code = 404;

    assert_eq!(copy.payload::<NetworkDetails>().unwrap().status_code, 404);
    assert_eq!(original.payload::<NetworkDetails>().unwrap().status_code, 500);
    assert_ne!(copy, original);
    assert_eq!(original.ref_count(), 1);
    assert_eq!(copy.ref_count(), 1);
}

#[test]
fn payload_mut_on_unique_handle_mutates_in_place() {
    let mut err = Error::with_payload("failure", NetworkDetails::new(500, "10.0.0.1"));
    let before = err.clone();
    drop(before);

    let word_before = format!("{:p}", err.layer_message().as_ptr());
    err.payload_mut::<NetworkDetails>().unwrap().remote_ip = "10.0.0.2".into();
    let word_after = format!("{:p}", err.layer_message().as_ptr());

    assert_eq!(word_before, word_after);
    assert_eq!(err.payload::<NetworkDetails>().unwrap().remote_ip, "10.0.0.2");
}

#[test]
fn payload_mut_through_wraps_leaves_other_copies_alone() {
    let base = Error::with_payload("db", HttpFailure::new(500, "/db"));
    let mut err = ChainBuilder::on(&base).wrap("repo").wrap("service").build();
    let snapshot = err.clone();

    err.payload_mut::<HttpFailure>().unwrap().status = 599;

    assert_eq!(err.payload::<HttpFailure>().unwrap().status, 599);
    assert_eq!(snapshot.payload::<HttpFailure>().unwrap().status, 500);
    assert_eq!(base.payload::<HttpFailure>().unwrap().status, 500);
    assert_eq!(err.message(), snapshot.message());
    assert!(!err.is(&base));
    assert!(snapshot.is(&base));
}

#[test]
fn payload_mut_miss_does_not_clone() {
    let original = Error::with_payload("failure", NetworkDetails::new(500, "10.0.0.1"));
    let mut copy = original.clone();
    assert_eq!(original.ref_count(), 2);

    assert!(copy.payload_mut::<LoginRequest>().is_none());
    assert_eq!(original.ref_count(), 2);
    assert_eq!(copy, original);
}

#[test]
fn payload_mut_on_nil_and_sentinel() {
    assert!(Error::nil().payload_mut::<u32>().is_none());
    let mut sentinel = ERR_INTERNAL.clone();
    assert!(sentinel.payload_mut::<u32>().is_none());
    assert_eq!(sentinel, ERR_INTERNAL);
}

#[test]
fn wire_payloads_are_typed_payloads_too() {
    let login = LoginRequest::new("alice", "10.0.0.1", 8080);
    let err = Error::with_wire_payload("login failed", login.clone()).wrap("auth");
    assert_eq!(err.payload::<LoginRequest>(), Some(&login));
}

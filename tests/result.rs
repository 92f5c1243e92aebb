// tests/result.rs

use errchain::{errorf, fail, Context, Error, Result};
use errchain_test_utils::fixtures::{ERR_CONNECTION_REFUSED, ERR_NOT_FOUND, HttpFailure};

fn query_user(id: u32) -> Result<String> {
    if id == 42 {
        return fail(ERR_CONNECTION_REFUSED.clone());
    }
    Ok(format!("user-{id}"))
}

fn load_profile(id: u32) -> Result<String> {
    let name = query_user(id).with_context(|| format!("query user {id}"))?;
    Ok(name.to_uppercase())
}

fn handler(id: u32) -> Result<String> {
    load_profile(id).context("loading profile")
}

#[test]
fn ok_results_pass_through() {
    let result: Result<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);
    assert_eq!(handler(7).unwrap(), "USER-7");
}

#[test]
fn failures_propagate_with_context() {
    let err = handler(42).unwrap_err();
    assert_eq!(
        err.message(),
        "loading profile: query user 42: connection refused"
    );
    assert!(err.is(&ERR_CONNECTION_REFUSED));
}

#[test]
fn fail_with_dynamic_error() {
    let result: Result<i32> = fail(errorf!("bad input: {}", "x"));
    assert_eq!(result.unwrap_err().message(), "bad input: x");
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "non-nil")]
fn failing_with_nil_panics_in_debug_builds() {
    let _: Result<()> = fail(Error::nil());
}

#[test]
fn unit_result_converts_both_ways() {
    assert!(Error::nil().into_result().is_ok());

    let err = ERR_NOT_FOUND.clone();
    assert_eq!(err.clone().into_result().unwrap_err(), err);

    assert!(Error::from(Ok::<(), Error>(())).is_nil());
    let back = Error::from(fail::<()>(ERR_NOT_FOUND.clone()));
    assert_eq!(back, ERR_NOT_FOUND);
}

#[test]
fn context_on_a_nil_handle_stays_ok() {
    assert!(Error::nil().context("never added").is_ok());
    assert!(Error::nil().with_context(|| unreachable!()).is_ok());
}

#[test]
fn context_on_a_failed_handle_wraps() {
    let result = ERR_NOT_FOUND.clone().context("reading manifest");
    let err = result.unwrap_err();
    assert_eq!(err.message(), "reading manifest: resource not found");
    assert!(err.is(&ERR_NOT_FOUND));
}

#[test]
fn context_keeps_payloads_reachable() {
    fn call() -> Result<()> {
        fail(Error::with_payload("upstream", HttpFailure::new(502, "/v1/orders")))
    }

    let err = call().context("placing order").unwrap_err();
    assert_eq!(err.payload::<HttpFailure>().unwrap().status, 502);
}

#[test]
fn question_mark_into_anyhow() {
    fn outer() -> anyhow::Result<String> {
        let name = load_profile(42)?;
        Ok(name)
    }

    let err = outer().unwrap_err();
    assert_eq!(err.to_string(), "query user 42: connection refused");
}

#[test]
fn results_move_through_threads() {
    let handle = std::thread::spawn(|| handler(42));
    let err = handle.join().unwrap().unwrap_err();
    assert!(err.is(&ERR_CONNECTION_REFUSED));
}

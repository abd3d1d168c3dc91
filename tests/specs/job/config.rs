//! Config round-trip law: a value written via `set_config` is returned by
//! `get_config`; an unset key falls through to its hard-coded default
//! (spec §3.2, §4.5, §8.3).

use crate::prelude::Queue;

#[test]
fn cli_config_set_rejects_an_unrecognized_key() {
    let queue = Queue::new();

    let output = queue
        .cli()
        .args(["config", "set", "bogus-key", "anything"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown config key"));
    assert!(queue.store().get_config_raw("bogus-key").unwrap().is_none());
}

#[test]
fn set_then_get_round_trips() {
    let queue = Queue::new();
    let store = queue.store();

    store.set_config("max_retries", "7").unwrap();
    assert_eq!(store.get_config("max_retries").unwrap(), "7");
    assert_eq!(store.get_config_u32("max_retries").unwrap(), 7);
}

#[test]
fn unset_key_falls_back_to_its_default() {
    let queue = Queue::new();
    let store = queue.store();

    assert_eq!(store.get_config("max_retries").unwrap(), "3");
    assert_eq!(store.get_config("backoff_base").unwrap(), "2");
}

#[test]
fn hyphenated_and_underscored_keys_are_the_same_key() {
    let queue = Queue::new();
    let store = queue.store();

    store.set_config("backoff-base", "9").unwrap();
    assert_eq!(store.get_config("backoff_base").unwrap(), "9");
}

#[test]
fn unrecognized_key_with_no_stored_value_is_an_error() {
    let queue = Queue::new();
    let store = queue.store();
    assert!(store.get_config("not_a_real_key").is_err());
}

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use flowgate_proxy::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
proxy:
  listen: "127.0.0.1:5000"
  reply_timeout_sec: 30 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "PROTOCOL_ERROR");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.proxy.listen, "127.0.0.1:5000");
    assert_eq!(cfg.proxy.reply_timeout_secs, 60);
    assert_eq!(cfg.engine.endpoints, "127.0.0.1:7933");
    assert_eq!(cfg.engine.default_domain, None);
}

#[test]
fn ok_full_config() {
    let ok = r#"
version: 1
proxy:
  listen: "0.0.0.0:5555"
  reply_timeout_secs: 5
  max_message_bytes: 65536
  log_level: "debug"
engine:
  endpoints: "10.0.0.1:7933,10.0.0.2:7933"
  identity: "worker-a"
  default_domain: "orders"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.proxy.reply_timeout_secs, 5);
    assert_eq!(cfg.engine.default_domain.as_deref(), Some("orders"));
}

#[test]
fn version_must_be_supported() {
    let bad = "version: 2\n";
    config::load_from_str(bad).expect_err("must fail");
}

#[test]
fn reply_timeout_range_enforced() {
    let bad = r#"
version: 1
proxy:
  reply_timeout_secs: 0
"#;
    config::load_from_str(bad).expect_err("must fail");

    let bad = r#"
version: 1
proxy:
  reply_timeout_secs: 601
"#;
    config::load_from_str(bad).expect_err("must fail");
}

#[test]
fn log_level_must_be_a_tracing_level() {
    let bad = r#"
version: 1
proxy:
  log_level: "loud"
"#;
    config::load_from_str(bad).expect_err("must fail");
}

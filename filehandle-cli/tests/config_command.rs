//! Integration tests for the config command.

mod common;

use common::TestEnv;
use predicates::prelude::*;
use serde_json::json;

#[test]
fn test_set_then_get() {
    let env = TestEnv::new();

    env.command()
        .args(["config", "--file", "conf/app.json", "set", "server.port", "8080"])
        .assert()
        .success();
    env.command()
        .args(["config", "--file", "conf/app.json", "set", "server.name", "demo box"])
        .assert()
        .success();

    let saved: serde_json::Value = serde_json::from_str(&env.read("conf/app.json")).unwrap();
    assert_eq!(saved, json!({"server": {"port": 8080, "name": "demo box"}}));

    env.command()
        .args(["config", "-f", "conf/app.json", "get", "server.port"])
        .assert()
        .success()
        .stdout("8080\n");
    env.command()
        .args(["config", "-f", "conf/app.json", "get", "server.name"])
        .assert()
        .success()
        .stdout("demo box\n");
}

#[test]
fn test_get_whole_document() {
    let env = TestEnv::new();
    env.create_file("c.json", r#"{"a": {"b": [1, 2]}}"#);

    let output = env
        .command()
        .args(["config", "-f", "c.json", "get"])
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, json!({"a": {"b": [1, 2]}}));
}

#[test]
fn test_get_missing_key() {
    let env = TestEnv::new();
    env.create_file("c.json", "{}");

    env.command()
        .args(["config", "-f", "c.json", "get", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Key not set: nope"));
}

#[test]
fn test_unset() {
    let env = TestEnv::new();
    env.create_file("c.json", r#"{"keep": 1, "drop": {"x": 2}}"#);

    env.command()
        .args(["config", "-f", "c.json", "unset", "drop.x"])
        .assert()
        .success();
    let saved: serde_json::Value = serde_json::from_str(&env.read("c.json")).unwrap();
    assert_eq!(saved, json!({"keep": 1, "drop": {}}));

    env.command()
        .args(["config", "-f", "c.json", "unset", "drop.x"])
        .assert()
        .code(1);
}

#[test]
fn test_env_prefix_overrides() {
    let env = TestEnv::new();
    env.create_file("c.json", r#"{"log": {"level": "info"}}"#);

    env.command()
        .env("FHCLI_LOG__LEVEL", "debug")
        .args(["config", "-f", "c.json", "--env-prefix", "FHCLI", "get", "log.level"])
        .assert()
        .success()
        .stdout("debug\n");
}

#[test]
fn test_malformed_file_is_treated_as_empty() {
    let env = TestEnv::new();
    env.create_file("c.json", "{ not json");

    env.command()
        .args(["config", "-f", "c.json", "set", "fresh", "true"])
        .assert()
        .success();
    let saved: serde_json::Value = serde_json::from_str(&env.read("c.json")).unwrap();
    assert_eq!(saved, json!({"fresh": true}));
}

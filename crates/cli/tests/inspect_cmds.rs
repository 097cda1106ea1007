//! Completion, usage, ambiguity, and explain subcommands.

use std::process::Command;

use assert_cmd::cargo;

fn cmdtree() -> Command {
    Command::new(cargo::cargo_bin!("cmdtree"))
}

fn json_output(args: &[&str]) -> serde_json::Value {
    let output = cmdtree()
        .args(args)
        .args(["--output", "json"])
        .output()
        .expect("run cmdtree");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).expect("valid json output")
}

fn suggestion_texts(json: &serde_json::Value) -> Vec<String> {
    json["suggestions"]
        .as_array()
        .expect("suggestions array")
        .iter()
        .filter_map(|s| s["text"].as_str().map(str::to_owned))
        .collect()
}

#[test]
fn suggest_completes_item_names() {
    let json = json_output(&["suggest", "give steve a"]);
    assert_eq!(suggestion_texts(&json), ["apple", "arrow"]);
    assert_eq!(json["range"]["start"], 11);
    assert_eq!(json["suggestions"][0]["applied"], "give steve apple");
}

#[test]
fn suggest_hides_admin_commands() {
    let json = json_output(&["suggest", "k"]);
    assert!(suggestion_texts(&json).is_empty());

    let json = json_output(&["suggest", "k", "--admin"]);
    assert_eq!(suggestion_texts(&json), ["kill"]);
}

#[test]
fn suggest_at_cursor() {
    let json = json_output(&["suggest", "to true", "--cursor", "2"]);
    assert_eq!(suggestion_texts(&json), ["toggle"]);
}

#[test]
fn usage_lists_paths_under_command() {
    let json = json_output(&["usage", "give"]);
    let usage: Vec<&str> = json["usage"]
        .as_array()
        .expect("usage array")
        .iter()
        .filter_map(|u| u.as_str())
        .collect();
    assert_eq!(
        usage,
        ["give <target> <item>", "give <target> <item> <count>"]
    );
    assert_eq!(json["description"], "Give items to a player");
}

#[test]
fn smart_usage_condenses_optional_arguments() {
    let json = json_output(&["usage", "--smart"]);
    let usage: Vec<&str> = json["usage"]
        .as_array()
        .expect("usage array")
        .iter()
        .filter_map(|u| u.as_str())
        .collect();
    assert!(usage.contains(&"heal [<amount>]"), "usage: {usage:?}");
    assert!(!usage.iter().any(|u| u.starts_with("kill")), "usage: {usage:?}");
}

#[test]
fn usage_unknown_path_fails() {
    let output = cmdtree()
        .args(["usage", "nope", "--output", "json"])
        .output()
        .expect("run cmdtree");
    assert!(!output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).expect("valid json");
    assert_eq!(json["error"], "command_failed");
}

#[test]
fn ambiguities_json_is_an_array() {
    let json = json_output(&["ambiguities"]);
    assert!(json.is_array());
}

#[test]
fn explain_known_code() {
    let json = json_output(&["explain", "CMD3001"]);
    assert_eq!(json["id"], "CMD3001");
    assert!(json["explanation"].is_string());
}

#[test]
fn explain_unknown_code_is_null() {
    let json = json_output(&["explain", "CMD9999"]);
    assert!(json["explanation"].is_null());
}

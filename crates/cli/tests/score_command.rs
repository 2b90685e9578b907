use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

const SEO_TIPS: &str = r#"{"pages":[{"title":"SEO Tips","body_text":"seo seo tips","views":100,"shares":10,"likes":5,"comments":2,"position":2,"age_days":10,"keyword":"seo"}]}"#;

#[allow(deprecated)]
fn run_score(args: &[&str], stdin: Option<&str>) -> (bool, Value) {
    let mut cmd = Command::cargo_bin("page-rank-decoder").expect("binary");
    cmd.arg("score").args(args);
    if let Some(input) = stdin {
        cmd.write_stdin(input);
    }
    let output = cmd.output().expect("command run");
    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    (output.status.success(), body)
}

#[test]
fn score_inline_json() {
    let (ok, body) = run_score(&["--json", SEO_TIPS], None);
    assert!(ok, "{body}");
    assert_eq!(body["status"], "ok");

    let score = &body["results"][0]["score"];
    assert_eq!(body["results"][0]["page"], 1);
    assert_eq!(score["relevance"].as_f64(), Some(504.0));
    assert_eq!(score["freshness"].as_f64(), Some(10.0));
    assert!((score["interaction"].as_f64().unwrap() - 14.3).abs() < 1e-9);
    assert!((score["final_score"].as_f64().unwrap() - 210.33).abs() < 1e-9);
    assert_eq!(score["position"], 2);
    assert_eq!(score["keyword"], "seo");
}

#[test]
fn score_from_file_and_stdin_agree() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("pages.json");
    fs::write(&path, SEO_TIPS).unwrap();

    let (ok_file, from_file) = run_score(&["--file", path.to_str().unwrap()], None);
    let (ok_stdin, from_stdin) = run_score(&[], Some(SEO_TIPS));
    assert!(ok_file && ok_stdin);
    assert_eq!(from_file, from_stdin);
}

#[test]
fn zero_age_is_reported_per_page() {
    let (ok, body) = run_score(
        &["--json", r#"{"pages":[{"age_days":0,"keyword":"seo"},{"age_days":4}]}"#],
        None,
    );
    assert!(ok);
    assert_eq!(body["results"][0]["error"]["code"], "zero_age");
    assert_eq!(body["results"][1]["score"]["freshness"].as_f64(), Some(25.0));
}

#[test]
fn invalid_request_exits_non_zero() {
    let (ok, body) = run_score(&["--json", r#"{"pages":[{"views":"abc"}]}"#], None);
    assert!(!ok);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"]["code"], "invalid_request");
}

use chrono::Duration;
use pr_shepherd::{config::GlobalConfig, AppError};

fn sample_toml() -> &'static str {
    r#"
api_url = "https://github.example.com/api/v3/"
organization = "acme"
team_id = "42"
repository = "widgets"
bot_login = "acme-helper"
assign_after_seconds = 3600
remind_after_seconds = 7200
vacation = "alice:2024-01-01:2024-01-10,bob:2024-02-01:2024-02-02"

[slack]
username = "reviews"
icon_emoji = ":eyes:"
"#
}

fn minimal_toml() -> &'static str {
    r#"
organization = "acme"
bot_login = "acme-helper"
"#
}

#[test]
fn parses_valid_config() {
    let config = GlobalConfig::from_toml_str(sample_toml()).expect("config parses");

    assert_eq!(config.api_url, "https://github.example.com/api/v3");
    assert_eq!(config.organization, "acme");
    assert_eq!(config.team_id.as_deref(), Some("42"));
    assert_eq!(config.repository.as_deref(), Some("widgets"));
    assert_eq!(config.bot_login, "acme-helper");
    assert_eq!(config.slack.username, "reviews");
    assert_eq!(config.slack.icon_emoji, ":eyes:");
    assert!(
        config.slack.webhook_url.is_empty(),
        "webhook_url is not populated from TOML"
    );
}

#[test]
fn minimal_config_uses_defaults() {
    let config = GlobalConfig::from_toml_str(minimal_toml()).expect("config parses");

    assert_eq!(config.api_url, "https://api.github.com");
    assert_eq!(config.team_id, None);
    assert_eq!(config.repository, None);
    assert_eq!(config.assign_after_seconds, 86_400);
    assert_eq!(config.remind_after_seconds, 259_200);
    assert!(config.vacation.is_empty());
    assert_eq!(config.slack.username, "github-pr");
    assert_eq!(config.slack.icon_emoji, ":octocat:");
    assert!(!config.reminders_enabled());
}

#[test]
fn thresholds_follow_configured_seconds() {
    let config = GlobalConfig::from_toml_str(sample_toml()).expect("config parses");
    let thresholds = config.thresholds();

    assert_eq!(thresholds.assign_after, Duration::hours(1));
    assert_eq!(thresholds.remind_after, Duration::hours(2));
}

#[test]
fn vacation_windows_are_parsed() {
    let config = GlobalConfig::from_toml_str(sample_toml()).expect("config parses");
    let windows = config.vacation_windows();

    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].login, "alice");
    assert_eq!(windows[1].login, "bob");
}

#[test]
fn blank_team_and_repository_mean_unset() {
    let toml = r#"
organization = "acme"
bot_login = "acme-helper"
team_id = "  "
repository = ""
"#;
    let config = GlobalConfig::from_toml_str(toml).expect("config parses");

    assert_eq!(config.team_id, None);
    assert_eq!(config.repository, None);
}

#[test]
fn missing_organization_is_rejected() {
    let result = GlobalConfig::from_toml_str(r#"bot_login = "acme-helper""#);
    assert!(matches!(result, Err(AppError::Config(_))));
}

#[test]
fn empty_organization_is_rejected() {
    let toml = r#"
organization = " "
bot_login = "acme-helper"
"#;
    let err = GlobalConfig::from_toml_str(toml).expect_err("empty organization");
    assert!(err.to_string().contains("organization"), "got: {err}");
}

#[test]
fn empty_bot_login_is_rejected() {
    let toml = r#"
organization = "acme"
bot_login = ""
"#;
    let err = GlobalConfig::from_toml_str(toml).expect_err("empty bot_login");
    assert!(err.to_string().contains("bot_login"), "got: {err}");
}

#[test]
fn zero_threshold_is_rejected() {
    let toml = r#"
organization = "acme"
bot_login = "acme-helper"
assign_after_seconds = 0
"#;
    assert!(matches!(
        GlobalConfig::from_toml_str(toml),
        Err(AppError::Config(_))
    ));
}

#[test]
fn absurd_threshold_is_rejected() {
    let toml = r#"
organization = "acme"
bot_login = "acme-helper"
remind_after_seconds = 999999999999
"#;
    let err = GlobalConfig::from_toml_str(toml).expect_err("threshold too large");
    assert!(err.to_string().contains("must not exceed"), "got: {err}");
}

#[test]
fn remind_before_assign_is_allowed() {
    let toml = r#"
organization = "acme"
bot_login = "acme-helper"
assign_after_seconds = 7200
remind_after_seconds = 3600
"#;
    let config = GlobalConfig::from_toml_str(toml).expect("config parses");
    assert_eq!(config.remind_after_seconds, 3600);
}

#[test]
fn invalid_toml_is_a_config_error() {
    let err = GlobalConfig::from_toml_str("organization = [").expect_err("bad toml");
    assert!(err.to_string().starts_with("config:"), "got: {err}");
}

#[test]
fn loads_from_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("config.toml");
    std::fs::write(&path, sample_toml()).expect("write config");

    let config = GlobalConfig::load_from_path(&path).expect("config loads");
    assert_eq!(config.organization, "acme");
}

#[test]
fn missing_file_is_a_config_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let result = GlobalConfig::load_from_path(temp.path().join("absent.toml"));

    let err = result.expect_err("missing file");
    assert!(matches!(err, AppError::Config(_)));
    assert!(err.to_string().contains("failed to read config"));
}

//! Unit tests for reminder and acknowledgement texts.

use chrono::{TimeZone, Utc};
use pr_shepherd::config::SlackConfig;
use pr_shepherd::models::{Item, Member, PullRequestRef};
use pr_shepherd::orchestrator::dispatcher::assignment_comment;
use pr_shepherd::slack::webhook::{reminder_text, SlackWebhook};

fn assigned_item() -> Item {
    let created_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    Item {
        id: 77,
        number: 12,
        created_at,
        updated_at: created_at,
        user: Member::new(2, "bob"),
        assignee: Some(Member::new(1, "alice")),
        url: "https://api.github.com/repos/acme/widgets/issues/12".into(),
        html_url: "https://github.com/acme/widgets/pull/12".into(),
        title: "Speed up widget cache".into(),
        state: "open".into(),
        pull_request: Some(PullRequestRef::default()),
    }
}

#[test]
fn reminder_mentions_assignee_and_links_pull_request() {
    assert_eq!(
        reminder_text(&assigned_item()),
        "@alice, please work on <https://github.com/acme/widgets/pull/12|Pull Request #12> (Speed up widget cache)"
    );
}

#[test]
fn reminder_without_assignee_mentions_nobody() {
    let mut item = assigned_item();
    item.assignee = None;

    let text = reminder_text(&item);
    assert!(!text.contains('@'), "unexpected mention: {text}");
    assert_eq!(
        text,
        "Please work on <https://github.com/acme/widgets/pull/12|Pull Request #12> (Speed up widget cache)"
    );
}

#[test]
fn webhook_message_carries_bot_identity() {
    let webhook = SlackWebhook::new(&SlackConfig::default());
    let message = webhook.message_for(&assigned_item());

    assert_eq!(message.username, "github-pr");
    assert_eq!(message.icon_emoji, ":octocat:");
    assert!(message.text.starts_with("@alice,"));
}

#[test]
fn webhook_without_url_is_not_configured() {
    let webhook = SlackWebhook::new(&SlackConfig::default());
    assert!(!webhook.is_configured());

    let configured = SlackWebhook::new(&SlackConfig {
        webhook_url: "https://hooks.slack.test/x".into(),
        ..SlackConfig::default()
    });
    assert!(configured.is_configured());
}

#[test]
fn assignment_comment_mentions_assignee() {
    assert_eq!(
        assignment_comment(&Member::new(3, "carol")),
        "Pull request seems to be stale, assigning @carol as the responsible developer."
    );
}

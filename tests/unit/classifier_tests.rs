//! Unit tests for staleness classification.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pr_shepherd::classifier::{classify, classify_all, Classification, Thresholds};
use pr_shepherd::models::{Item, Member, PullRequestRef};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

fn thresholds() -> Thresholds {
    Thresholds {
        assign_after: Duration::hours(24),
        remind_after: Duration::days(3),
    }
}

fn item(number: u64, age: Duration, assignee: Option<Member>, is_pr: bool) -> Item {
    let created_at = now() - age;
    Item {
        id: i64::try_from(number).expect("small number"),
        number,
        created_at,
        updated_at: created_at,
        user: Member::new(1, "alice"),
        assignee,
        url: format!("https://api.github.com/repos/acme/widgets/issues/{number}"),
        html_url: format!("https://github.com/acme/widgets/pull/{number}"),
        title: "change".into(),
        state: "open".into(),
        pull_request: is_pr.then(PullRequestRef::default),
    }
}

#[test]
fn unassigned_pull_request_past_threshold_needs_assignment() {
    let pr = item(1, Duration::hours(30), None, true);
    assert_eq!(
        classify(&pr, &thresholds(), now()),
        Classification::NeedsAssignment
    );
}

#[test]
fn unassigned_pull_request_below_threshold_is_skipped() {
    let pr = item(1, Duration::hours(23), None, true);
    assert_eq!(classify(&pr, &thresholds(), now()), Classification::Skip);
}

#[test]
fn assignment_threshold_is_inclusive() {
    let pr = item(1, Duration::hours(24), None, true);
    assert_eq!(
        classify(&pr, &thresholds(), now()),
        Classification::NeedsAssignment
    );
}

#[test]
fn assigned_pull_request_past_threshold_needs_reminder() {
    let pr = item(1, Duration::days(4), Some(Member::new(3, "carol")), true);
    assert_eq!(
        classify(&pr, &thresholds(), now()),
        Classification::NeedsReminder
    );
}

#[test]
fn reminder_threshold_is_inclusive() {
    let pr = item(1, Duration::days(3), Some(Member::new(3, "carol")), true);
    assert_eq!(
        classify(&pr, &thresholds(), now()),
        Classification::NeedsReminder
    );
}

#[test]
fn assigned_pull_request_between_thresholds_is_skipped() {
    let pr = item(1, Duration::days(2), Some(Member::new(3, "carol")), true);
    assert_eq!(classify(&pr, &thresholds(), now()), Classification::Skip);
}

#[test]
fn plain_issues_are_always_skipped() {
    let unassigned = item(1, Duration::days(30), None, false);
    let assigned = item(2, Duration::days(30), Some(Member::new(3, "carol")), false);

    assert_eq!(classify(&unassigned, &thresholds(), now()), Classification::Skip);
    assert_eq!(classify(&assigned, &thresholds(), now()), Classification::Skip);
}

#[test]
fn future_created_at_is_not_stale() {
    let pr = item(1, Duration::hours(-2), None, true);
    assert_eq!(classify(&pr, &thresholds(), now()), Classification::Skip);
}

#[test]
fn classify_all_keeps_stale_items_in_order() {
    let items = vec![
        item(1, Duration::hours(30), None, true),
        item(2, Duration::hours(2), None, true),
        item(3, Duration::days(4), Some(Member::new(3, "carol")), true),
        item(4, Duration::days(9), None, false),
        item(5, Duration::days(2), None, true),
    ];

    let stale = classify_all(items, &thresholds(), now());

    let summary: Vec<(u64, Classification)> =
        stale.iter().map(|(item, class)| (item.number, *class)).collect();
    assert_eq!(
        summary,
        [
            (1, Classification::NeedsAssignment),
            (3, Classification::NeedsReminder),
            (5, Classification::NeedsAssignment),
        ]
    );
}

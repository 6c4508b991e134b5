mod support;

use std::time::Duration;

use intent_locator::{
    ClickOptions, ClickTarget, DriverError, LocatorError, SmartClicker, TableIntent,
    ROW_ACTION_SELECTOR, ROW_SELECTOR,
};
use support::{document_table, el, FakePage};

fn options() -> ClickOptions {
    ClickOptions::default().with_timeout(Duration::from_millis(1_000))
}

#[tokio::test(start_paused = true)]
async fn ordinal_intent_picks_action_in_that_row() {
    let page = FakePage::new([document_table(3)]);
    let clicker = SmartClicker::default();

    let (resolution, table) = clicker.resolve(&page, "2nd edit", &options()).await.unwrap();

    assert_eq!(
        table,
        Some(TableIntent {
            row: 2,
            action: "edit".to_string()
        })
    );
    assert_eq!(resolution.node, page.node("row-2-edit"));
    assert_eq!(resolution.score, 1.0);
    assert_eq!(resolution.source, ROW_ACTION_SELECTOR);
}

#[tokio::test(start_paused = true)]
async fn emoji_action_matches_icon_button() {
    let page = FakePage::new([document_table(3)]);
    let clicker = SmartClicker::default();

    let (resolution, _) = clicker.resolve(&page, "3rd 🗑️", &options()).await.unwrap();
    assert_eq!(resolution.node, page.node("row-3-delete"));
}

#[tokio::test(start_paused = true)]
async fn bare_ordinal_views_the_row() {
    let page = FakePage::new([document_table(2)]);
    let clicker = SmartClicker::default();

    let activation = clicker
        .resolve_and_activate(&page, "1", &options())
        .await
        .unwrap();

    assert_eq!(activation.resolution.node, page.node("row-1-view"));
    assert_eq!(page.clicks(), vec![page.node("row-1-view")]);
}

#[tokio::test(start_paused = true)]
async fn empty_action_clicks_row_itself() {
    let page = FakePage::new([document_table(3)]);
    let clicker = SmartClicker::default();

    let activation = clicker
        .resolve_row(&page, 2, None, &options())
        .await
        .unwrap();

    assert_eq!(activation.resolution.node, page.node("row-2"));
    assert_eq!(activation.resolution.source, ROW_SELECTOR);
    assert_eq!(page.clicks(), vec![page.node("row-2")]);
    assert_eq!(page.releases(), 1);
}

#[tokio::test(start_paused = true)]
async fn unmatched_action_falls_back_to_row() {
    let page = FakePage::new([el("div").attr("role", "grid").children([
        el("div").attr("role", "row").key("first").children([
            el("span").text("Alice"),
            el("a").attr("href", "/alice").text("Open"),
        ]),
        el("div").attr("role", "row").key("second").children([
            el("span").text("Bob"),
        ]),
    ])]);
    let clicker = SmartClicker::default();

    let found = clicker.locate_row(&page, 2, "archive", true).await.unwrap();
    assert_eq!(found.node, page.node("second"));
    assert!(found.is_row);
    assert_eq!(found.score, 0.0);
}

#[tokio::test(start_paused = true)]
async fn hidden_row_actions_are_ignored() {
    let page = FakePage::new([el("table").child(el("tr").key("row").children([
        el("td").child(el("button").text("Edit").hidden()),
        el("td").child(el("span").attr("onclick", "edit()").text("Modify").key("modify")),
    ]))]);
    let clicker = SmartClicker::default();

    let found = clicker.locate_row(&page, 1, "edit", true).await.unwrap();
    assert_eq!(found.node, page.node("modify"));

    let found = clicker.locate_row(&page, 1, "edit", false).await.unwrap();
    assert_ne!(found.node, page.node("modify"));
}

#[tokio::test(start_paused = true)]
async fn row_past_the_end_is_out_of_bounds() {
    let page = FakePage::new([document_table(3)]);
    let clicker = SmartClicker::default();

    let err = clicker.locate_row(&page, 5, "view", true).await.unwrap_err();
    assert!(matches!(
        err,
        LocatorError::RowOutOfBounds {
            row: 5,
            row_count: 3
        }
    ));

    let err = clicker
        .resolve_row(&page, 0, Some("edit"), &options())
        .await
        .unwrap_err();
    assert!(matches!(err, LocatorError::RowOutOfBounds { row: 0, .. }));
    assert!(page.clicks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn out_of_bounds_ordinal_falls_through_to_generic_search() {
    let page = FakePage::new([el("button").text("Save").key("save")]);
    let clicker = SmartClicker::default();

    let (resolution, table) = clicker.resolve(&page, "1st save", &options()).await.unwrap();

    assert!(table.is_none());
    assert_eq!(resolution.node, page.node("save"));
}

#[tokio::test(start_paused = true)]
async fn unlistable_rows_fall_through_to_generic_search() {
    let page = FakePage::new([el("button").text("Save").key("save")])
        .failing_query(ROW_SELECTOR, DriverError::Transport("transient".to_string()));
    let clicker = SmartClicker::default();

    let activation = clicker
        .resolve_and_activate(&page, "1st save", &options())
        .await
        .unwrap();

    assert!(activation.table.is_none());
    assert_eq!(activation.resolution.node, page.node("save"));
    assert_eq!(page.clicks(), vec![page.node("save")]);
}

#[tokio::test(start_paused = true)]
async fn row_lookup_failure_keeps_row_context() {
    let page = FakePage::new([document_table(3)])
        .failing_query(ROW_SELECTOR, DriverError::Transport("transient".to_string()));
    let clicker = SmartClicker::default();

    let err = clicker
        .resolve_row(&page, 2, Some("edit"), &options())
        .await
        .unwrap_err();

    assert_eq!(err.intent(), Some("2 edit"));
    match err {
        LocatorError::RowLookupFailure { target, reason } => {
            assert_eq!(
                target,
                ClickTarget::Row {
                    intent: "2 edit".to_string(),
                    row: 2,
                    action: "edit".to_string(),
                }
            );
            assert_eq!(reason, DriverError::Transport("transient".to_string()));
        }
        other => panic!("expected RowLookupFailure, got {other:?}"),
    }
    assert!(page.clicks().is_empty());
    assert_eq!(page.releases(), 1);
}

#[tokio::test(start_paused = true)]
async fn row_click_failure_names_row_and_action() {
    let page = FakePage::new([document_table(3)])
        .failing_clicks(DriverError::NotClickable("zero-size box".to_string()));
    let clicker = SmartClicker::default();

    let err = clicker
        .resolve_and_activate(&page, "2nd edit", &options())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("row 2 (edit)"));
    match err {
        LocatorError::ActivationFailure { target, .. } => assert_eq!(
            target,
            ClickTarget::Row {
                intent: "2nd edit".to_string(),
                row: 2,
                action: "edit".to_string(),
            }
        ),
        other => panic!("expected ActivationFailure, got {other:?}"),
    }
}

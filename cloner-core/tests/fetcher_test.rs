//! History fetch: ordering, date boundary, progress and error handling.

mod common;

use chrono::NaiveDate;
use cloner_core::{fetch_history, CloneError, MessageRecord};
use common::{conv, day, text_history, FakeClient, RecordingProgress};

fn ids(messages: &[MessageRecord<String>]) -> Vec<i64> {
    messages.iter().map(|m| m.id).collect()
}

#[tokio::test]
async fn test_buffer_is_oldest_first() {
    let client = FakeClient::with_history(text_history(5));
    let progress = RecordingProgress::default();

    let messages = fetch_history(&client, &conv(1, "Src", None), None, &progress)
        .await
        .unwrap();

    assert_eq!(ids(&messages), vec![1, 2, 3, 4, 5]);
    assert!(messages.windows(2).all(|w| w[0].date <= w[1].date));

    let records = progress.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].total, Some(5));
    assert_eq!(records[0].done, 5);
    assert!(records[0].finished);
}

#[tokio::test]
async fn test_start_date_stops_at_first_older_message() {
    let client = FakeClient::with_history(text_history(10));
    let progress = RecordingProgress::default();
    let start = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();

    let messages = fetch_history(&client, &conv(1, "Src", None), Some(start), &progress)
        .await
        .unwrap();

    assert_eq!(ids(&messages), vec![7, 8, 9, 10]);
    assert!(messages.iter().all(|m| m.day().unwrap() >= start));
    assert_eq!(progress.records()[0].done, 4);
}

#[tokio::test]
async fn test_undated_messages_skipped_only_with_start_date() {
    let mut history = text_history(3);
    history.insert(
        1,
        MessageRecord {
            id: 99,
            date: None,
            text: Some("undated".to_string()),
            media: None,
        },
    );
    let client = FakeClient::with_history(history);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    let progress = RecordingProgress::default();
    let filtered = fetch_history(&client, &conv(1, "Src", None), Some(start), &progress)
        .await
        .unwrap();
    assert_eq!(ids(&filtered), vec![1, 2, 3]);
    // skipped message still counts as fetched
    assert_eq!(progress.records()[0].done, 4);

    let unfiltered = fetch_history(
        &client,
        &conv(1, "Src", None),
        None,
        &RecordingProgress::default(),
    )
    .await
    .unwrap();
    assert_eq!(ids(&unfiltered), vec![1, 2, 99, 3]);
}

#[tokio::test]
async fn test_unknown_total_is_tolerated() {
    let mut client = FakeClient::with_history(text_history(3));
    client.total_fails = true;
    let progress = RecordingProgress::default();

    let messages = fetch_history(&client, &conv(1, "Src", None), None, &progress)
        .await
        .unwrap();

    assert_eq!(messages.len(), 3);
    assert_eq!(progress.records()[0].total, None);
}

#[tokio::test]
async fn test_backend_error_aborts_and_finishes_progress() {
    let mut client = FakeClient::with_history(text_history(10));
    client.history_error_after = Some(4);
    let progress = RecordingProgress::default();

    let err = fetch_history(&client, &conv(1, "Src", None), None, &progress)
        .await
        .unwrap_err();

    assert!(matches!(err, CloneError::Fetch(_)));
    let records = progress.records();
    assert_eq!(records[0].done, 4);
    assert!(records[0].finished);
}

#[tokio::test]
async fn test_same_day_as_start_is_kept() {
    let client = FakeClient::with_history(vec![
        MessageRecord::text(2, day(5), "late"),
        MessageRecord::text(1, day(4), "early"),
    ]);
    let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();

    let messages = fetch_history(
        &client,
        &conv(1, "Src", None),
        Some(start),
        &RecordingProgress::default(),
    )
    .await
    .unwrap();

    assert_eq!(ids(&messages), vec![2]);
}

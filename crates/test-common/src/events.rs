//! Event stream processing helpers for async install tests.

use acorn::installer::{EventStream, InstallEvent, InstallResult};

/// Collects all events from a stream for testing verification.
///
/// # Example
/// ```rust
/// let stream = service.install("node").await;
/// let events = collect_events(stream).await;
/// ```
pub async fn collect_events(mut stream: EventStream) -> Vec<InstallEvent> {
    let mut events = Vec::new();
    while let Some(event) = futures::StreamExt::next(&mut stream).await {
        events.push(event);
    }
    events
}

/// The result carried by the `Completed` event, if there was one.
#[must_use]
pub fn get_install_result(events: &[InstallEvent]) -> Option<&Result<InstallResult, String>> {
    events.iter().find_map(|event| match event {
        InstallEvent::Completed { result, .. } => Some(result),
        _ => None,
    })
}

/// Counts events of a specific type for verification.
///
/// # Example
/// ```rust
/// let finished = count_events_of_type(&events, |e| {
///     matches!(e, InstallEvent::ToolFinished { .. })
/// });
/// assert_eq!(finished, 2);
/// ```
pub fn count_events_of_type<F>(events: &[InstallEvent], predicate: F) -> usize
where
    F: Fn(&InstallEvent) -> bool,
{
    events.iter().filter(|e| predicate(e)).count()
}

/// Checks for exactly one started event, exactly one completed event, and
/// that the install ran without tool failures.
///
/// # Panics
/// Panics if the event sequence doesn't match a successful install.
pub fn assert_successful_install(events: &[InstallEvent]) {
    assert!(
        matches!(events.first(), Some(InstallEvent::Started { .. })),
        "First event should be Started"
    );
    assert_eq!(
        count_events_of_type(events, |e| matches!(e, InstallEvent::Completed { .. })),
        1,
        "Should have exactly one completed event"
    );

    match get_install_result(events) {
        Some(Ok(result)) => assert!(
            result.is_success(),
            "Install should be successful, got: {result:?}"
        ),
        other => panic!("Expected a successful result, got: {other:?}"),
    }
}

/// Checks for at least one error event and that the final result, if any,
/// is a failure.
///
/// # Panics
/// Panics if the event sequence doesn't match a failed install.
pub fn assert_failed_install(events: &[InstallEvent]) {
    assert!(
        count_events_of_type(events, |e| matches!(e, InstallEvent::Error { .. })) > 0,
        "Should have at least one error event for failed install"
    );

    if let Some(result) = get_install_result(events) {
        assert!(
            result.as_ref().map_or(true, |r| !r.is_success()),
            "Install result should be failure, got: {result:?}"
        );
    }
}

/// Checks that progress events mention each of `expected_steps`.
pub fn assert_has_progress_steps(events: &[InstallEvent], expected_steps: &[&str]) {
    let progress_messages: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            InstallEvent::Progress { message, .. } => Some(message.as_str()),
            _ => None,
        })
        .collect();

    for expected_step in expected_steps {
        assert!(
            progress_messages.iter().any(|msg| msg.contains(expected_step)),
            "Expected progress step '{expected_step}' not found in messages: {progress_messages:?}"
        );
    }
}

/// All error messages from events.
#[must_use]
pub fn get_error_messages(events: &[InstallEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            InstallEvent::Error { message, .. } => Some(message.clone()),
            _ => None,
        })
        .collect()
}

/// Asserts that no error events occurred.
pub fn assert_no_errors(events: &[InstallEvent]) {
    let errors = get_error_messages(events);
    assert!(
        errors.is_empty(),
        "Expected no error events, but found {}: {errors:?}",
        errors.len()
    );
}

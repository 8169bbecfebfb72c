mod support;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use camino::Utf8Path;

use reqbench_app_core::domains::startup::{StartupEvent, StartupEventKind, StartupStep};
use reqbench_app_core::DomainMediator;

#[test]
fn final_step_publishes_completion_with_elapsed_duration_once() {
    let app = support::test_app();

    let completions = Arc::new(Mutex::new(Vec::new()));
    let completions_in = completions.clone();
    app.startup.subscribe(
        StartupEventKind::Completed,
        Arc::new(move |env| {
            if let StartupEvent::Completed { elapsed } = env.event() {
                completions_in.lock().unwrap().push(*elapsed);
            }
            Ok(())
        }),
    );
    let statuses = Arc::new(Mutex::new(Vec::new()));
    let statuses_in = statuses.clone();
    app.notification.subscribe(
        reqbench_app_core::domains::notification::NotificationEventKind::StatusPosted,
        Arc::new(move |env| {
            if let reqbench_app_core::domains::notification::NotificationEvent::StatusPosted {
                message,
                ..
            } = env.event()
            {
                statuses_in.lock().unwrap().push(message.clone());
            }
            Ok(())
        }),
    );

    app.startup.begin().unwrap();
    app.startup.advance().unwrap();
    assert_eq!(app.startup.current_step(), StartupStep::LoadingWorkspace);

    app.startup.navigate_to_final_step();
    app.startup.navigate_to_final_step();

    let completions = completions.lock().unwrap();
    assert_eq!(completions.len(), 1, "completion must fire exactly once");
    assert!(completions[0] < Duration::from_secs(60));
    assert_eq!(app.startup.current_step(), StartupStep::Ready);
    assert!(!app.startup.can_navigate_forward());

    // The hand-off reached the aggregation surface.
    let statuses = statuses.lock().unwrap();
    assert!(statuses.iter().any(|m| m.starts_with("Ready in")));
}

#[tokio::test]
async fn workspace_arrival_completes_a_waiting_boot() {
    let app = support::test_app();

    app.startup.begin().unwrap();
    app.startup.advance().unwrap();
    assert_eq!(app.startup.current_step(), StartupStep::LoadingWorkspace);

    app.workspace_management
        .load_workspace(Utf8Path::new("/tmp/alpha"))
        .await
        .unwrap();

    assert_eq!(app.startup.current_step(), StartupStep::Ready);
}

#[tokio::test]
async fn workspace_arrival_during_splash_does_not_skip_the_boot() {
    let app = support::test_app();

    app.startup.begin().unwrap();
    assert_eq!(app.startup.current_step(), StartupStep::Splash);

    app.workspace_management
        .load_workspace(Utf8Path::new("/tmp/alpha"))
        .await
        .unwrap();

    // Still on the splash step: only a boot waiting on the workspace
    // completes from this broadcast.
    assert_eq!(app.startup.current_step(), StartupStep::Splash);
}

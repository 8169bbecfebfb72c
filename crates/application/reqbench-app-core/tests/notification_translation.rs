mod support;

use std::sync::{Arc, Mutex};

use reqbench_app_core::domains::notification::{NotificationEvent, NotificationEventKind};
use reqbench_app_core::domains::{project, test_case_creation, workspace_management};
use reqbench_app_core::BroadcastNote;
use reqbench_core::{LlmHealth, RequirementProgress, Severity, WorkspaceSnapshot};

#[test]
fn progress_counters_are_adopted_verbatim() {
    support::init_tracing();
    let app = support::test_app();

    let updates = Arc::new(Mutex::new(Vec::new()));
    let updates_in = updates.clone();
    app.notification.subscribe(
        NotificationEventKind::ProgressUpdated,
        Arc::new(move |env| {
            if let NotificationEvent::ProgressUpdated { progress } = env.event() {
                updates_in.lock().unwrap().push(*progress);
            }
            Ok(())
        }),
    );

    let announced = RequirementProgress {
        total: 10,
        analyzed: 4,
        with_test_cases: 2,
    };
    app.hub().broadcast_from(
        test_case_creation::DOMAIN,
        &BroadcastNote::RequirementsProgressChanged {
            progress: announced,
            source: test_case_creation::DOMAIN,
        },
    );

    // Exactly the announced numbers, not a local recomputation.
    assert_eq!(app.notification.summary().progress, announced);
    assert_eq!(*updates.lock().unwrap(), vec![announced]);
}

#[test]
fn selection_is_translated_into_a_native_event() {
    let app = support::test_app();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in = seen.clone();
    app.notification.subscribe(
        NotificationEventKind::CurrentRequirementChanged,
        Arc::new(move |env| {
            if let NotificationEvent::CurrentRequirementChanged { requirement_id } = env.event() {
                seen_in.lock().unwrap().push(requirement_id.clone());
            }
            Ok(())
        }),
    );

    app.hub().broadcast_from(
        project::DOMAIN,
        &BroadcastNote::RequirementSelected {
            requirement_id: "R-17".into(),
        },
    );

    assert_eq!(*seen.lock().unwrap(), vec!["R-17".to_string()]);
    assert_eq!(
        app.notification.summary().current_requirement.as_deref(),
        Some("R-17")
    );
}

#[test]
fn llm_health_is_adopted_and_republished() {
    let app = support::test_app();

    let warnings = Arc::new(Mutex::new(0usize));
    let warnings_in = warnings.clone();
    app.notification.subscribe(
        NotificationEventKind::StatusPosted,
        Arc::new(move |env| {
            if let NotificationEvent::StatusPosted {
                severity: Severity::Warning,
                ..
            } = env.event()
            {
                *warnings_in.lock().unwrap() += 1;
            }
            Ok(())
        }),
    );

    app.hub().broadcast_from(
        test_case_creation::DOMAIN,
        &BroadcastNote::LlmHealthChanged {
            health: LlmHealth::Degraded("slow responses".into()),
        },
    );
    assert_eq!(
        app.notification.summary().llm,
        LlmHealth::Degraded("slow responses".into())
    );
    // Degraded still counts as usable; no warning status yet.
    assert_eq!(*warnings.lock().unwrap(), 0);

    app.hub().broadcast_from(
        test_case_creation::DOMAIN,
        &BroadcastNote::LlmHealthChanged {
            health: LlmHealth::Offline,
        },
    );
    assert_eq!(app.notification.summary().llm, LlmHealth::Offline);
    assert_eq!(*warnings.lock().unwrap(), 1);
}

#[test]
fn faults_surface_as_error_statuses() {
    let app = support::test_app();

    let statuses = Arc::new(Mutex::new(Vec::new()));
    let statuses_in = statuses.clone();
    app.notification.subscribe(
        NotificationEventKind::StatusPosted,
        Arc::new(move |env| {
            if let NotificationEvent::StatusPosted { severity, message } = env.event() {
                statuses_in.lock().unwrap().push((*severity, message.clone()));
            }
            Ok(())
        }),
    );

    app.hub().broadcast_from(
        workspace_management::DOMAIN,
        &BroadcastNote::DomainFault {
            domain: workspace_management::DOMAIN,
            message: "tracker timed out".into(),
        },
    );

    let statuses = statuses.lock().unwrap();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].0, Severity::Error);
    assert!(statuses[0].1.contains("tracker timed out"));
    assert_eq!(
        app.notification.summary().last_fault,
        Some((
            workspace_management::DOMAIN.to_string(),
            "tracker timed out".to_string()
        ))
    );
}

#[test]
fn unrecognized_notes_are_silently_ignored() {
    let app = support::test_app();

    let statuses = Arc::new(Mutex::new(0usize));
    let statuses_in = statuses.clone();
    app.notification.subscribe(
        NotificationEventKind::StatusPosted,
        Arc::new(move |_| {
            *statuses_in.lock().unwrap() += 1;
            Ok(())
        }),
    );
    let before = app.notification.summary();

    // Notification has no arm for a bare workspace reload.
    app.hub().broadcast_from(
        workspace_management::DOMAIN,
        &BroadcastNote::WorkspaceLoaded {
            snapshot: WorkspaceSnapshot::default(),
        },
    );

    assert_eq!(*statuses.lock().unwrap(), 0);
    assert_eq!(app.notification.summary(), before);
}

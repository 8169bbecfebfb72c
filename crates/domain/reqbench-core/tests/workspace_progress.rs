use reqbench_core::{
    Requirement, RequirementProgress, RequirementStatus, TestCase, WorkspaceSnapshot,
};

fn req(id: &str) -> Requirement {
    Requirement::new(id, format!("Requirement {id}"))
}

fn case(id: &str, requirement_id: &str) -> TestCase {
    TestCase {
        id: id.into(),
        requirement_id: requirement_id.into(),
        name: format!("verify {requirement_id}"),
        steps: vec!["arrange".into(), "act".into()],
        expected: "pass".into(),
    }
}

#[test]
fn merge_upserts_by_id_and_counts_only_new_requirements() {
    let mut ws = WorkspaceSnapshot::default();
    let added = ws.merge_requirements(vec![req("R-1"), req("R-2")]);
    assert_eq!(added, 2);

    let mut updated = req("R-1");
    updated.title = "Renamed".into();
    let added = ws.merge_requirements(vec![updated, req("R-3")]);
    assert_eq!(added, 1);
    assert_eq!(ws.requirements.len(), 3);
    assert_eq!(ws.requirement("R-1").unwrap().title, "Renamed");
    // first-import order preserved for existing ids
    assert_eq!(ws.requirements[0].id, "R-1");
}

#[test]
fn recording_test_cases_replaces_prior_cases_and_marks_covered() {
    let mut ws = WorkspaceSnapshot::default();
    ws.merge_requirements(vec![req("R-1"), req("R-2")]);

    ws.record_test_cases(&"R-1".to_string(), vec![case("T-1", "R-1")]);
    ws.record_test_cases(&"R-1".to_string(), vec![case("T-2", "R-1"), case("T-3", "R-1")]);

    let cases = ws.test_cases_for("R-1");
    assert_eq!(cases.len(), 2);
    assert!(cases.iter().all(|t| t.id != "T-1"));
    assert_eq!(
        ws.requirement("R-1").unwrap().status,
        RequirementStatus::Covered
    );
    assert_eq!(
        ws.requirement("R-2").unwrap().status,
        RequirementStatus::Draft
    );
}

#[test]
fn requirement_tags_default_when_absent_in_json() {
    let json = r#"{ "id": "R-9", "title": "Imported", "text": "", "status": "Draft" }"#;
    let parsed: Requirement = serde_json::from_str(json).unwrap();
    assert!(parsed.tags.is_empty());
    assert_eq!(parsed.status, RequirementStatus::Draft);
}

#[test]
fn progress_counts_follow_requirement_status() {
    let mut ws = WorkspaceSnapshot::default();
    ws.merge_requirements(vec![req("R-1"), req("R-2"), req("R-3")]);
    ws.record_test_cases(&"R-2".to_string(), vec![case("T-1", "R-2")]);

    let progress = ws.progress();
    assert_eq!(
        progress,
        RequirementProgress {
            total: 3,
            analyzed: 1,
            with_test_cases: 1,
        }
    );
    assert!(!progress.is_complete());
    assert!((progress.analyzed_ratio() - 1.0 / 3.0).abs() < f32::EPSILON);
}

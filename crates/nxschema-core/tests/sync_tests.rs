//! Tests for the SyncEngine

use nxschema_convert::{NxSchemaConverter, SchemaOptions};
use nxschema_core::{
    ProjectNode, StaticProjectGraph, SyncEngine, SyncIssue, SyncMode, SyncOptions, SyncSettings,
    render_artifact,
};
use nxschema_test_utils::TestWorkspace;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn name_validator() -> Value {
    json!({
        "type": "object",
        "shape": { "name": { "type": "string" } }
    })
}

fn expected_for(module: &Value, name: &str) -> Value {
    NxSchemaConverter::new()
        .convert(module, &SchemaOptions::new(name))
        .unwrap()
}

/// One project with a schema module and a declaration pointing at it.
fn workspace_with_declaration() -> TestWorkspace {
    let ws = TestWorkspace::new();
    ws.add_project("lib-a", "libs/a");
    ws.write_schema_module("libs/a/src/schema.yaml", &name_validator());
    ws.write_declarations(
        "libs/a",
        &json!({ "schema": "src/schema.yaml", "outPath": "src/schema.json" }),
    );
    ws
}

fn engine(ws: &TestWorkspace) -> SyncEngine {
    SyncEngine::new(ws.normalized_root())
}

#[test]
fn test_manual_generates_missing_artifact() {
    let ws = workspace_with_declaration();
    ws.assert_file_not_exists("libs/a/src/schema.json");

    let outcome = engine(&ws).sync().unwrap();

    assert!(!outcome.has_issues());
    assert_eq!(outcome.actions.len(), 1);
    ws.assert_file_exists("libs/a/src/schema.json");
    assert_eq!(
        ws.read_json("libs/a/src/schema.json"),
        expected_for(&name_validator(), "DefaultSchema")
    );
    ws.assert_file_contains(".out-of-sync.txt", "SYNC OK ");
}

#[test]
fn test_end_to_end_name_string() {
    let ws = workspace_with_declaration();
    let engine = engine(&ws);

    let first = engine.sync().unwrap();
    assert_eq!(first.actions[0].to_string(), format!(
        "Generated {}",
        ws.normalized_root().join("libs/a/src/schema.json")
    ));

    let artifact = ws.read_json("libs/a/src/schema.json");
    assert_eq!(artifact["properties"]["name"]["type"], "string");
    assert!(
        artifact["required"]
            .as_array()
            .unwrap()
            .contains(&json!("name"))
    );

    let second = engine.sync().unwrap();
    assert!(second.actions.is_empty());
    assert!(!second.has_issues());
}

#[test]
fn test_round_trip_is_in_sync_despite_formatting() {
    let ws = workspace_with_declaration();
    let expected = expected_for(&name_validator(), "DefaultSchema");
    // Compact, differently ordered text of the same document
    let compact = serde_json::to_string(&expected).unwrap();
    ws.write_file("libs/a/src/schema.json", &compact);

    let outcome = engine(&ws).check().unwrap();

    assert!(!outcome.has_issues(), "issues: {:?}", outcome.issue_messages());
    assert_eq!(ws.read_file("libs/a/src/schema.json"), compact);
}

#[test]
fn test_check_only_reports_missing_without_writing() {
    let ws = workspace_with_declaration();

    let outcome = engine(&ws).check().unwrap();

    assert_eq!(outcome.issue_count(), 1);
    assert!(outcome.issue_messages()[0].contains("Missing"));
    ws.assert_file_not_exists("libs/a/src/schema.json");
    ws.assert_file_contains(".out-of-sync.txt", "Schemas are out of sync\n- Missing artifact: ");
    assert!(outcome.generator_result().is_some());
}

#[test]
fn test_stale_artifact() {
    let ws = workspace_with_declaration();
    ws.write_json("libs/a/src/schema.json", &json!({ "outdated": true }));

    let check = engine(&ws).check().unwrap();
    assert_eq!(check.issue_count(), 1);
    assert!(matches!(check.issues[0], SyncIssue::Stale { .. }));
    assert_eq!(ws.read_json("libs/a/src/schema.json"), json!({ "outdated": true }));

    let sync = engine(&ws).sync().unwrap();
    assert_eq!(sync.actions.len(), 1);
    assert!(sync.actions[0].to_string().starts_with("Regenerated "));
    assert_eq!(
        ws.read_json("libs/a/src/schema.json"),
        expected_for(&name_validator(), "DefaultSchema")
    );
}

#[test]
fn test_invalid_json_artifact_is_stale() {
    let ws = workspace_with_declaration();
    ws.write_file("libs/a/src/schema.json", "{ truncated");

    let outcome = engine(&ws).check().unwrap();
    assert!(matches!(outcome.issues[..], [SyncIssue::Stale { .. }]));
}

#[test]
fn test_orphan_reported_then_removed() {
    let ws = workspace_with_declaration();
    ws.remove_file("libs/a/src/schema.yaml");
    ws.write_json("libs/a/src/schema.json", &json!({}));

    let check = engine(&ws).check().unwrap();
    assert_eq!(check.issue_count(), 1);
    assert!(check.issue_messages()[0].contains("Extra"));
    ws.assert_file_exists("libs/a/src/schema.json");

    let sync = engine(&ws).sync().unwrap();
    assert!(!sync.has_issues());
    assert!(sync.actions[0].to_string().starts_with("Removed "));
    ws.assert_file_not_exists("libs/a/src/schema.json");
}

#[test]
fn test_neither_source_nor_artifact_is_skipped() {
    let ws = workspace_with_declaration();
    ws.remove_file("libs/a/src/schema.yaml");

    let outcome = engine(&ws).sync().unwrap();
    assert!(outcome.actions.is_empty());
    assert!(!outcome.has_issues());
    assert_eq!(outcome.declarations, 1);
}

#[test]
fn test_empty_workspace_is_in_sync() {
    let ws = TestWorkspace::new();

    let outcome = engine(&ws).check().unwrap();

    assert_eq!(outcome.declaration_files, 0);
    assert_eq!(outcome.declarations, 0);
    assert!(!outcome.has_issues());
    assert!(outcome.generator_result().is_none());
    ws.assert_file_contains(".out-of-sync.txt", "SYNC OK ");
}

#[test]
fn test_manual_abort_preserves_marker() {
    let ws = workspace_with_declaration();
    ws.write_file(".out-of-sync.txt", "previous\n");
    ws.write_file("libs/a/src/schema.yaml", "type: object\nshape:\n  name: 3\n");

    let err = engine(&ws).sync().unwrap_err();

    assert!(err.to_string().contains("schema.json"), "got: {err}");
    assert_eq!(ws.read_file(".out-of-sync.txt"), "previous\n");
    ws.assert_file_not_exists("libs/a/src/schema.json");
}

#[test]
fn test_check_only_downgrades_failures_to_issues() {
    let ws = workspace_with_declaration();
    ws.write_json("libs/a/src/schema.json", &json!({}));
    ws.write_file("libs/a/src/schema.yaml", "type: object\nshape:\n  name: 3\n");
    ws.write_file("libs/b/nxschema.config.json", "[42]");

    let outcome = engine(&ws).check().unwrap();

    let messages = outcome.issue_messages();
    assert_eq!(messages.len(), 2, "issues: {messages:?}");
    assert!(messages[0].starts_with("Invalid declaration file "));
    assert!(messages[0].contains("element 0"));
    assert!(messages[1].starts_with("Error processing "));
    assert!(messages[1].contains("schema.json"));
}

#[test]
fn test_manual_aborts_on_invalid_declaration_file() {
    let ws = workspace_with_declaration();
    ws.write_file("libs/b/nxschema.config.json", "null");

    assert!(engine(&ws).sync().is_err());
    ws.assert_file_not_exists(".out-of-sync.txt");
}

#[test]
fn test_missing_export_is_reported() {
    let ws = workspace_with_declaration();
    ws.write_declarations(
        "libs/a",
        &json!({ "schema": "src/schema.yaml", "exportName": "nope", "outPath": "src/schema.json" }),
    );
    ws.write_json("libs/a/src/schema.json", &json!({}));

    let outcome = engine(&ws).check().unwrap();
    assert!(outcome.issue_messages()[0].contains("Export 'nope' not found"));
}

#[test]
fn test_merge_across_files_later_wins() {
    let ws = TestWorkspace::new();
    ws.write_schema_module("shared/schema.yaml", &name_validator());
    ws.write_declarations(
        "libs/a",
        &json!({ "schema": "../../shared/schema.yaml", "outPath": "../../shared/schema.json", "options": { "title": "From A" } }),
    );
    ws.write_declarations(
        "libs/b",
        &json!({ "schema": "../../shared/schema.yaml", "options": { "name": "Shared" } }),
    );

    let outcome = engine(&ws).sync().unwrap();

    assert_eq!(outcome.declaration_files, 2);
    assert_eq!(outcome.declarations, 1);
    let artifact = ws.read_json("shared/schema.json");
    assert_eq!(artifact["$id"], "Shared");
    assert_eq!(artifact["title"], "From A");
}

#[test]
fn test_duplicate_outputs() {
    let ws = TestWorkspace::new();
    ws.write_schema_module("libs/a/one.yaml", &name_validator());
    ws.write_schema_module("libs/a/two.yaml", &name_validator());
    ws.write_declarations(
        "libs/a",
        &json!([
            { "schema": "one.yaml", "outPath": "out.json" },
            { "schema": "two.yaml", "outPath": "out.json" }
        ]),
    );

    assert!(engine(&ws).sync().is_err());
    let check = engine(&ws).check().unwrap();
    assert!(
        check
            .issue_messages()
            .iter()
            .any(|m| m.contains("outPath must be unique"))
    );
}

#[test]
fn test_artifact_over_its_own_schema_is_rejected() {
    let ws = TestWorkspace::new();
    ws.add_project("lib-a", "libs/a");
    ws.write_json("libs/a/schema.json", &name_validator());
    ws.write_declarations("libs/a", &json!({ "schema": "schema.json" }));
    let source = ws.read_file("libs/a/schema.json");

    assert!(engine(&ws).sync().is_err());
    assert_eq!(ws.read_file("libs/a/schema.json"), source);

    let check = engine(&ws).check().unwrap();
    assert!(
        check
            .issues
            .iter()
            .any(|issue| matches!(issue, SyncIssue::InvalidDeclarations { .. }))
    );
    assert!(
        check
            .issue_messages()
            .iter()
            .any(|m| m.starts_with("Invalid declarations:") && m.contains("overwrite"))
    );
    assert_eq!(ws.read_file("libs/a/schema.json"), source);
}

#[test]
fn test_artifact_over_another_schema_is_rejected() {
    let ws = TestWorkspace::new();
    ws.write_schema_module("libs/a/one.yaml", &name_validator());
    ws.write_schema_module("libs/a/two.yaml", &name_validator());
    ws.write_declarations(
        "libs/a",
        &json!([
            { "schema": "one.yaml", "outPath": "two.yaml" },
            { "schema": "two.yaml" }
        ]),
    );
    let source = ws.read_file("libs/a/two.yaml");

    assert!(engine(&ws).sync().is_err());
    assert_eq!(ws.read_file("libs/a/two.yaml"), source);
    ws.assert_file_not_exists("libs/a/two.json");

    let check = engine(&ws).check().unwrap();
    assert!(
        check
            .issue_messages()
            .iter()
            .any(|m| m.contains("would overwrite a declared schema module"))
    );
    assert_eq!(ws.read_file("libs/a/two.yaml"), source);
}

#[test]
fn test_dry_run_writes_nothing() {
    let ws = workspace_with_declaration();

    let outcome = engine(&ws)
        .run(SyncMode::Manual, &SyncOptions { dry_run: true })
        .unwrap();

    assert!(outcome.dry_run);
    assert!(outcome.actions[0].to_string().starts_with("[dry-run] Would generate "));
    ws.assert_file_not_exists("libs/a/src/schema.json");
    ws.assert_file_not_exists(".out-of-sync.txt");
}

#[test]
fn test_graph_limits_discovery() {
    let ws = workspace_with_declaration();
    ws.write_schema_module("libs/b/schema.yaml", &name_validator());
    ws.write_declarations("libs/b", &json!({ "schema": "schema.yaml" }));

    let outcome = engine(&ws)
        .with_graph(StaticProjectGraph::new(vec![ProjectNode::new("lib-a", "libs/a")]))
        .sync()
        .unwrap();

    assert_eq!(outcome.declaration_files, 1);
    ws.assert_file_exists("libs/a/src/schema.json");
    ws.assert_file_not_exists("libs/b/schema.json");
}

#[test]
fn test_open_reads_settings_and_project_json() {
    let ws = workspace_with_declaration();
    ws.write_file(
        ".nxschema/settings.toml",
        "marker_name = \"schemas.marker\"\nexclude = [\"libs/a\"]\n",
    );

    let engine = SyncEngine::open(ws.normalized_root()).unwrap();
    let outcome = engine.sync().unwrap();

    assert_eq!(outcome.declaration_files, 0);
    ws.assert_file_contains("schemas.marker", "SYNC OK");
    ws.assert_file_not_exists(".out-of-sync.txt");
}

#[test]
fn test_tool_package_is_excluded() {
    let ws = workspace_with_declaration();
    let settings = SyncSettings {
        tool_package: Some("libs/a".into()),
        ..Default::default()
    };

    let outcome = engine(&ws).with_settings(settings).check().unwrap();
    assert_eq!(outcome.declaration_files, 0);
}

#[test]
fn test_root_level_declaration_file_is_ignored() {
    let ws = TestWorkspace::new();
    ws.write_schema_module("schema.yaml", &name_validator());
    ws.write_declarations("", &json!({ "schema": "schema.yaml" }));

    let outcome = engine(&ws).sync().unwrap();
    assert_eq!(outcome.declaration_files, 0);
    ws.assert_file_not_exists("schema.json");
}

#[test]
fn test_written_artifact_is_rendered_stably() {
    let ws = workspace_with_declaration();
    engine(&ws).sync().unwrap();

    let expected = render_artifact(&expected_for(&name_validator(), "DefaultSchema")).unwrap();
    assert_eq!(ws.read_file("libs/a/src/schema.json"), expected);
}

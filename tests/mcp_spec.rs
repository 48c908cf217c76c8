//! MCP server integration tests.
//!
//! Tests are organized into two sections:
//! - Discovery tools: list projects, list tasks, task detail
//! - Update tools: check/uncheck tasks, append raw tasks

use std::path::Path;

use serde_json::{json, Value};
use tasktree::mcp::McpServer;
use tasktree::storage::Store;
use tempfile::TempDir;

/// Helper to create a test MCP server over a fresh storage root.
fn setup() -> (McpServer, TempDir) {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let server = McpServer::new(Store::open(root.path()));
    (server, root)
}

/// Helper to write the project registry.
fn write_registry(root: &Path, projects: Value) {
    std::fs::write(root.join("projects.json"), projects.to_string())
        .expect("Failed to write registry");
}

fn project_entry(name: &str, last_accessed: &str) -> Value {
    json!({
        "name": name,
        "path": format!("/work/{}", name),
        "created": "2024-01-01T00:00:00Z",
        "last_accessed": last_accessed
    })
}

/// Helper to write a project's task document.
fn write_notes(root: &Path, project: &str, tasks: Value) {
    let dir = root.join(project);
    std::fs::create_dir_all(&dir).expect("Failed to create project dir");
    std::fs::write(
        dir.join("notes.json"),
        json!({
            "version": "1",
            "project_path": format!("/work/{}", project),
            "last_modified": "2024-01-01T00:00:00Z",
            "tasks": tasks
        })
        .to_string(),
    )
    .expect("Failed to write notes");
}

fn task(id: &str, text: &str, checked: bool, children: Value) -> Value {
    json!({
        "id": id,
        "text": text,
        "checked": checked,
        "indent": 0,
        "children": children
    })
}

/// A project "app" with one root, a checked child and an unchecked child.
fn create_test_project(root: &Path) {
    write_registry(root, json!([project_entry("app", "2024-03-01T00:00:00Z")]));
    write_notes(
        root,
        "app",
        json!([task(
            "a",
            "Launch",
            false,
            json!([
                task("b", "Design", true, json!([])),
                task("c", "Build", false, json!([]))
            ])
        )]),
    );
}

fn read_notes(root: &Path, project: &str) -> Value {
    let text = std::fs::read_to_string(root.join(project).join("notes.json"))
        .expect("Failed to read notes");
    serde_json::from_str(&text).expect("Notes should be JSON")
}

// ============================================================
// Discovery Tools Tests
// ============================================================

mod discovery_tools {
    use super::*;

    mod list_projects {
        use super::*;

        #[tokio::test]
        async fn reports_no_projects_when_registry_missing() {
            let (server, _root) = setup();

            let text = server.test_list_projects().await.expect("Tool failed");

            assert_eq!(text, "No projects found.");
        }

        #[tokio::test]
        async fn reports_no_projects_when_registry_empty() {
            let (server, root) = setup();
            write_registry(root.path(), json!([]));

            let text = server.test_list_projects().await.expect("Tool failed");

            assert_eq!(text, "No projects found.");
        }

        #[tokio::test]
        async fn sorts_by_last_accessed_descending() {
            let (server, root) = setup();
            write_registry(
                root.path(),
                json!([
                    project_entry("old", "2024-01-01T00:00:00Z"),
                    project_entry("newest", "2024-03-01T00:00:00Z"),
                    project_entry("middle", "2024-02-01T00:00:00Z")
                ]),
            );

            let text = server.test_list_projects().await.expect("Tool failed");

            let names: Vec<&str> = text
                .lines()
                .skip(1)
                .map(|l| l.trim_start_matches("- ").split(' ').next().unwrap())
                .collect();
            assert_eq!(names, vec!["newest", "middle", "old"]);
        }

        #[tokio::test]
        async fn accepts_epoch_millisecond_timestamps() {
            let (server, root) = setup();
            write_registry(
                root.path(),
                json!([
                    {
                        "name": "old",
                        "path": "/work/old",
                        "created": 1704067200000i64,
                        "last_accessed": 1704067200000i64
                    },
                    project_entry("middle", "2024-01-15T00:00:00Z"),
                    {
                        "name": "newest",
                        "path": "/work/newest",
                        "created": 1704067200000i64,
                        "last_accessed": 1706745600000i64
                    }
                ]),
            );

            let text = server.test_list_projects().await.expect("Tool failed");

            assert_eq!(
                text,
                "Projects (3):\n\
                 - newest (/work/newest) last accessed 2024-02-01T00:00:00+00:00\n\
                 - middle (/work/middle) last accessed 2024-01-15T00:00:00+00:00\n\
                 - old (/work/old) last accessed 2024-01-01T00:00:00+00:00\n"
            );
        }

        #[tokio::test]
        async fn reflects_registry_changes_between_calls() {
            let (server, root) = setup();
            write_registry(
                root.path(),
                json!([
                    project_entry("one", "2024-02-01T00:00:00Z"),
                    project_entry("two", "2024-01-01T00:00:00Z")
                ]),
            );
            let first = server.test_list_projects().await.expect("Tool failed");
            assert!(first.find("one").unwrap() < first.find("two").unwrap());

            // The companion app touches "two"
            write_registry(
                root.path(),
                json!([
                    project_entry("one", "2024-02-01T00:00:00Z"),
                    project_entry("two", "2024-04-01T00:00:00Z")
                ]),
            );
            let second = server.test_list_projects().await.expect("Tool failed");
            assert!(second.find("two").unwrap() < second.find("one").unwrap());
        }

        #[tokio::test]
        async fn returns_error_for_malformed_registry() {
            let (server, root) = setup();
            std::fs::write(root.path().join("projects.json"), "{not json").unwrap();

            let result = server.test_list_projects().await;

            assert!(result.is_err());
        }
    }

    mod list_tasks {
        use super::*;

        #[tokio::test]
        async fn renders_full_tree_by_default() {
            let (server, root) = setup();
            create_test_project(root.path());

            let text = server.test_list_tasks("app", None).await.expect("Tool failed");

            assert_eq!(
                text,
                "Tasks for app (all): 1/3 complete\n[ ] Launch (id: a)\n├── [x] Design (id: b)\n└── [ ] Build (id: c)\n"
            );
        }

        #[tokio::test]
        async fn keeps_ancestors_of_checked_tasks() {
            let (server, root) = setup();
            create_test_project(root.path());

            let text = server
                .test_list_tasks("app", Some("checked"))
                .await
                .expect("Tool failed");

            assert_eq!(
                text,
                "Tasks for app (checked): 1/3 complete\n[ ] Launch (id: a)\n└── [x] Design (id: b)\n"
            );
        }

        #[tokio::test]
        async fn unchecked_filter() {
            let (server, root) = setup();
            create_test_project(root.path());

            let text = server
                .test_list_tasks("app", Some("unchecked"))
                .await
                .expect("Tool failed");

            assert!(text.contains("Launch"));
            assert!(text.contains("Build"));
            assert!(!text.contains("Design"));
        }

        #[tokio::test]
        async fn reports_when_nothing_matches() {
            let (server, root) = setup();
            write_registry(root.path(), json!([project_entry("app", "2024-01-01T00:00:00Z")]));
            write_notes(root.path(), "app", json!([task("a", "Open", false, json!([]))]));

            let text = server
                .test_list_tasks("app", Some("checked"))
                .await
                .expect("Tool failed");

            assert!(text.ends_with("No tasks match filter 'checked'."));
        }

        #[tokio::test]
        async fn returns_error_for_invalid_status() {
            let (server, root) = setup();
            create_test_project(root.path());

            let result = server.test_list_tasks("app", Some("done")).await;

            assert!(result.is_err());
        }

        #[tokio::test]
        async fn returns_error_for_unknown_project() {
            let (server, root) = setup();
            create_test_project(root.path());

            assert!(server.test_list_tasks("App", None).await.is_err());
            assert!(server.test_list_tasks("missing", None).await.is_err());
        }

        #[tokio::test]
        async fn returns_error_when_notes_missing() {
            let (server, root) = setup();
            write_registry(root.path(), json!([project_entry("app", "2024-01-01T00:00:00Z")]));

            assert!(server.test_list_tasks("app", None).await.is_err());
        }

        #[tokio::test]
        async fn malformed_project_does_not_affect_others() {
            let (server, root) = setup();
            write_registry(
                root.path(),
                json!([
                    project_entry("good", "2024-01-01T00:00:00Z"),
                    project_entry("bad", "2024-01-02T00:00:00Z")
                ]),
            );
            write_notes(root.path(), "good", json!([task("g", "Fine", false, json!([]))]));
            std::fs::create_dir_all(root.path().join("bad")).unwrap();
            std::fs::write(root.path().join("bad").join("notes.json"), "[1, 2").unwrap();

            assert!(server.test_list_tasks("bad", None).await.is_err());
            let text = server.test_list_tasks("good", None).await.expect("Tool failed");
            assert!(text.contains("Fine"));
        }
    }

    mod get_task_detail {
        use super::*;

        #[tokio::test]
        async fn renders_metadata_and_children() {
            let (server, root) = setup();
            write_registry(root.path(), json!([project_entry("app", "2024-01-01T00:00:00Z")]));
            write_notes(
                root.path(),
                "app",
                json!([{
                    "id": "a",
                    "text": "Launch",
                    "checked": false,
                    "indent": 0,
                    "children": [task("b", "Design", true, json!([]))],
                    "metadata": {
                        "priority": "high",
                        "deadline": "2024-06-01",
                        "blocked_by": ["x", "y"]
                    }
                }]),
            );

            let text = server
                .test_get_task_detail("app", "a")
                .await
                .expect("Tool failed");

            assert!(text.contains("Task: Launch"));
            assert!(text.contains("  priority: high\n  deadline: 2024-06-01\n  blocked_by: x, y\n"));
            assert!(text.contains("Children (1):\n  [x] Design (id: b)"));
        }

        #[tokio::test]
        async fn finds_nested_task() {
            let (server, root) = setup();
            create_test_project(root.path());

            let text = server
                .test_get_task_detail("app", "c")
                .await
                .expect("Tool failed");

            assert!(text.starts_with("Task: Build\nID: c\nStatus: unchecked\n"));
            assert!(text.ends_with("Children: none\n"));
        }

        #[tokio::test]
        async fn returns_error_for_unknown_task() {
            let (server, root) = setup();
            create_test_project(root.path());

            assert!(server.test_get_task_detail("app", "zzz").await.is_err());
        }

        #[tokio::test]
        async fn returns_error_for_blank_task_id() {
            let (server, root) = setup();
            create_test_project(root.path());

            assert!(server.test_get_task_detail("app", "  ").await.is_err());
        }
    }
}

// ============================================================
// Update Tools Tests
// ============================================================

mod update_tools {
    use super::*;

    mod set_task_checked {
        use super::*;

        #[tokio::test]
        async fn checks_nested_task_and_persists() {
            let (server, root) = setup();
            create_test_project(root.path());

            let text = server
                .test_set_task_checked("app", "c", true)
                .await
                .expect("Tool failed");

            assert_eq!(text, "Task \"Build\" marked as checked.");
            let notes = read_notes(root.path(), "app");
            assert_eq!(notes["tasks"][0]["children"][1]["checked"], json!(true));
            assert_ne!(notes["last_modified"], json!("2024-01-01T00:00:00Z"));
        }

        #[tokio::test]
        async fn unchecks_task() {
            let (server, root) = setup();
            create_test_project(root.path());

            let text = server
                .test_set_task_checked("app", "b", false)
                .await
                .expect("Tool failed");

            assert_eq!(text, "Task \"Design\" marked as unchecked.");
            let notes = read_notes(root.path(), "app");
            assert_eq!(notes["tasks"][0]["children"][0]["checked"], json!(false));
        }

        #[tokio::test]
        async fn unknown_task_is_not_found_and_does_not_write() {
            let (server, root) = setup();
            create_test_project(root.path());
            let notes_path = root.path().join("app").join("notes.json");
            let before = std::fs::read(&notes_path).unwrap();

            let result = server.test_set_task_checked("app", "zzz", true).await;

            let err = result.expect_err("Expected error for unknown task");
            assert!(err.message.contains("Not found"), "unexpected: {}", err.message);
            assert_eq!(std::fs::read(&notes_path).unwrap(), before);
        }

        #[tokio::test]
        async fn preserves_fields_it_does_not_understand() {
            let (server, root) = setup();
            write_registry(root.path(), json!([project_entry("app", "2024-01-01T00:00:00Z")]));
            let dir = root.path().join("app");
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(
                dir.join("notes.json"),
                json!({
                    "version": "2",
                    "project_path": "/work/app",
                    "last_modified": "2024-01-01T00:00:00Z",
                    "last_formatted_raw": "- [ ] Launch",
                    "formatter": {"model": "x"},
                    "tasks": [{
                        "id": "a",
                        "text": "Launch",
                        "checked": false,
                        "indent": 0,
                        "children": [],
                        "collapsed": true,
                        "metadata": {"attempts": [{"at": "2024-01-01", "ok": false}]}
                    }]
                })
                .to_string(),
            )
            .unwrap();

            server
                .test_set_task_checked("app", "a", true)
                .await
                .expect("Tool failed");

            let notes = read_notes(root.path(), "app");
            assert_eq!(notes["version"], json!("2"));
            assert_eq!(notes["last_formatted_raw"], json!("- [ ] Launch"));
            assert_eq!(notes["formatter"], json!({"model": "x"}));
            assert_eq!(notes["tasks"][0]["collapsed"], json!(true));
            assert_eq!(
                notes["tasks"][0]["metadata"],
                json!({"attempts": [{"at": "2024-01-01", "ok": false}]})
            );
        }

        #[tokio::test]
        async fn keeps_epoch_millisecond_last_modified_numeric() {
            let (server, root) = setup();
            write_registry(
                root.path(),
                json!([{
                    "name": "app",
                    "path": "/work/app",
                    "created": 1704067200000i64,
                    "last_accessed": 1706745600000i64
                }]),
            );
            let dir = root.path().join("app");
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(
                dir.join("notes.json"),
                json!({
                    "version": "1",
                    "project_path": "/work/app",
                    "last_modified": 1704067200000i64,
                    "tasks": [task("a", "Launch", false, json!([]))]
                })
                .to_string(),
            )
            .unwrap();

            let listed = server
                .test_list_tasks("app", None)
                .await
                .expect("Tool failed");
            assert!(listed.contains("[ ] Launch (id: a)"), "unexpected: {}", listed);

            server
                .test_set_task_checked("app", "a", true)
                .await
                .expect("Tool failed");

            let notes = read_notes(root.path(), "app");
            assert_eq!(notes["tasks"][0]["checked"], json!(true));
            let modified = notes["last_modified"]
                .as_i64()
                .expect("last_modified should stay a number");
            assert!(modified > 1704067200000, "not refreshed: {}", modified);
        }

        #[tokio::test]
        async fn rejects_path_like_project_names() {
            let (server, root) = setup();
            create_test_project(root.path());

            assert!(server.test_set_task_checked("../app", "a", true).await.is_err());
            assert!(server.test_set_task_checked("", "a", true).await.is_err());
        }
    }

    mod append_raw_task {
        use super::*;

        #[tokio::test]
        async fn appends_lines_to_raw_log() {
            let (server, root) = setup();
            create_test_project(root.path());
            let raw_path = root.path().join("app").join("raw.txt");
            std::fs::write(&raw_path, "first\n").unwrap();

            server
                .test_append_raw_task("app", "buy milk")
                .await
                .expect("Tool failed");
            assert_eq!(std::fs::read_to_string(&raw_path).unwrap(), "first\nbuy milk\n");

            server
                .test_append_raw_task("app", "buy milk")
                .await
                .expect("Tool failed");
            assert_eq!(
                std::fs::read_to_string(&raw_path).unwrap(),
                "first\nbuy milk\nbuy milk\n"
            );
        }

        #[tokio::test]
        async fn does_not_touch_task_document() {
            let (server, root) = setup();
            create_test_project(root.path());
            let notes_path = root.path().join("app").join("notes.json");
            let before = std::fs::read(&notes_path).unwrap();

            server
                .test_append_raw_task("app", "new idea")
                .await
                .expect("Tool failed");

            assert_eq!(std::fs::read(&notes_path).unwrap(), before);
        }

        #[tokio::test]
        async fn returns_error_for_blank_text() {
            let (server, root) = setup();
            create_test_project(root.path());

            assert!(server.test_append_raw_task("app", "   ").await.is_err());
            assert!(!root.path().join("app").join("raw.txt").exists());
        }

        #[tokio::test]
        async fn returns_error_for_unknown_project() {
            let (server, root) = setup();
            create_test_project(root.path());

            assert!(server.test_append_raw_task("ghost", "text").await.is_err());
            assert!(!root.path().join("ghost").exists());
        }
    }
}

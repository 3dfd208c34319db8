// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{fast_settings, free_port, html_files, FakeBehaviour, FakeLauncher};
use serde_json::json;
use spa_prerender::application::use_cases::generate_site::GenerateSiteUseCase;
use spa_prerender::application::use_cases::jsonjsdb_site::generate_jsonjsdb_static_site;
use spa_prerender::utils::errors::AdapterError;
use std::path::Path;
use std::sync::Arc;

const JSONJSDB_INDEX: &str = r#"<!DOCTYPE html>
<html>
<head><base href="" /><meta name="robots" content="noindex" />
<script id="jsonjsdb-config" data-path="data/db"></script>
<script src="data/db/v1/user.json.js"></script>
<script src="assets/app.js"></script>
</head>
<body><div id="app"></div></body>
</html>
"#;

/// 创建一个 jsonjsdb 工程：`project/config.json` 与 `project/app/...`
fn jsonjsdb_project(port: u16) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let app = dir.path().join("app");
    let db = app.join("data/db/v1");
    std::fs::create_dir_all(&db).unwrap();
    std::fs::write(app.join("index.html"), JSONJSDB_INDEX).unwrap();
    std::fs::write(
        db.join("user.json.js"),
        r#"jsonjs.data['user'] = [["id","name"],[1,"Ann"],[2,"Bob"]]"#,
    )
    .unwrap();

    // Stale output from a previous run
    std::fs::create_dir_all(app.join("dist")).unwrap();
    std::fs::write(app.join("dist/stale.html"), "stale").unwrap();

    let config = json!({
        "domain": "https://example.com",
        "indexSeo": true,
        "appPath": "app",
        "outDir": "dist",
        "dbMetaPath": "data/db",
        "port": port,
        "entities": ["user"],
        "routes": ["", "about"]
    });
    std::fs::write(dir.path().join("config.json"), config.to_string()).unwrap();
    dir
}

#[tokio::test]
async fn test_generates_configured_and_entity_routes() {
    let project = jsonjsdb_project(free_port());
    let launcher = Arc::new(FakeLauncher::new(FakeBehaviour::default()));
    let use_case = GenerateSiteUseCase::new(launcher.clone(), fast_settings());

    let report = generate_jsonjsdb_static_site(
        &use_case,
        Path::new("config.json"),
        Some(project.path()),
    )
    .await
    .unwrap();

    let out = project.path().join("app/dist");
    assert_eq!(report.pages, 4);
    assert_eq!(
        html_files(&out),
        vec!["about.html", "index.html", "user/1.html", "user/2.html"]
    );

    let user = std::fs::read_to_string(out.join("user/1.html")).unwrap();
    assert!(!user.contains("user.json.js"));
    assert!(user.contains("assets/app.js"));
    assert!(user.contains("page-loaded-route-user___1"));
    assert!(!user.contains("noindex"));

    let sitemap = std::fs::read_to_string(project.path().join("app/sitemap.xml")).unwrap();
    assert!(sitemap.contains("<loc>https://example.com/user/2</loc>"));
    assert!(launcher.is_closed());
}

#[tokio::test]
async fn test_missing_config_is_reported() {
    let project = tempfile::tempdir().unwrap();
    let launcher = Arc::new(FakeLauncher::new(FakeBehaviour::default()));
    let use_case = GenerateSiteUseCase::new(launcher.clone(), fast_settings());

    let result = generate_jsonjsdb_static_site(
        &use_case,
        Path::new("config.json"),
        Some(project.path()),
    )
    .await;

    assert!(matches!(result, Err(AdapterError::ConfigUnavailable)));
    assert!(!launcher.is_launched());
}

#[tokio::test]
async fn test_missing_entity_export_is_an_error() {
    let project = jsonjsdb_project(free_port());
    std::fs::remove_file(project.path().join("app/data/db/v1/user.json.js")).unwrap();
    let launcher = Arc::new(FakeLauncher::new(FakeBehaviour::default()));
    let use_case = GenerateSiteUseCase::new(launcher.clone(), fast_settings());

    let result = generate_jsonjsdb_static_site(
        &use_case,
        Path::new("config.json"),
        Some(project.path()),
    )
    .await;

    assert!(matches!(result, Err(AdapterError::Io { .. })));
    assert!(!launcher.is_launched());
}

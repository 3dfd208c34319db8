// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    fast_settings, free_port, html_files, site_with_index, FakeBehaviour, FakeLauncher, APP_INDEX,
};
use spa_prerender::application::use_cases::generate_site::GenerateSiteUseCase;
use spa_prerender::domain::models::capture::Cleanup;
use spa_prerender::domain::models::route::Route;
use spa_prerender::domain::models::site_config::SsgConfig;
use spa_prerender::domain::services::capture_service::CaptureOptions;
use spa_prerender::utils::errors::SsgError;
use spa_prerender::utils::port_sniffer::PortSniffer;
use std::collections::HashSet;
use std::sync::Arc;

fn routes(paths: &[&str]) -> Vec<Route> {
    paths.iter().map(|path| Route::from(*path)).collect()
}

#[tokio::test]
async fn test_each_route_yields_one_named_file() {
    let site = site_with_index(APP_INDEX);
    let port = free_port();
    let config = SsgConfig::new("https://example.com", port, site.path()).with_out_dir("dist");
    let launcher = Arc::new(FakeLauncher::new(FakeBehaviour::default()));
    let use_case = GenerateSiteUseCase::new(launcher.clone(), fast_settings());

    let report = use_case
        .execute(&routes(&["", "about", "user/42"]), &config, CaptureOptions::default())
        .await
        .unwrap();

    assert_eq!(report.pages, 3);
    assert_eq!(report.written, 3);
    assert!(report.failed.is_empty());
    assert_eq!(
        html_files(&site.path().join("dist")),
        vec!["about.html", "index.html", "user/42.html"]
    );

    let about = std::fs::read_to_string(site.path().join("dist/about.html")).unwrap();
    assert!(about.contains(r#"<meta app-mode="static" />"#));
    assert!(about.contains(r#"<base href="/" />"#));
    assert!(about.contains(r#"<h1 id="page-loaded-route-about">about</h1>"#));

    let nested = std::fs::read_to_string(site.path().join("dist/user/42.html")).unwrap();
    assert!(nested.contains("page-loaded-route-user___42"));

    assert_eq!(report.entry_point_cleanup, Cleanup::Removed);
    assert!(!config.entry_point_path().exists());
    assert!(report.sitemap.is_none());
    assert!(launcher.is_closed());
    assert!(!PortSniffer::is_port_in_use("127.0.0.1", port));
}

#[tokio::test]
async fn test_entry_point_removal_failure_is_not_fatal() {
    let site = site_with_index(APP_INDEX);
    let port = free_port();
    let config = SsgConfig::new("https://example.com", port, site.path()).with_out_dir("dist");
    let launcher = Arc::new(FakeLauncher::new(FakeBehaviour {
        pin_entry_point: Some(config.entry_point_path()),
        ..Default::default()
    }));
    let use_case = GenerateSiteUseCase::new(launcher.clone(), fast_settings());

    let report = use_case
        .execute(&routes(&["", "about"]), &config, CaptureOptions::default())
        .await
        .unwrap();

    assert_eq!(report.written, 2);
    assert!(matches!(report.entry_point_cleanup, Cleanup::Ignored(_)));
    assert!(config.entry_point_path().is_dir());
    assert!(launcher.is_closed());
    assert!(!PortSniffer::is_port_in_use("127.0.0.1", port));
}

#[tokio::test]
async fn test_missing_marker_does_not_block_other_routes() {
    let site = site_with_index(APP_INDEX);
    let port = free_port();
    let config = SsgConfig::new("https://example.com", port, site.path()).with_out_dir("dist");
    let launcher = Arc::new(FakeLauncher::new(FakeBehaviour {
        broken: HashSet::from(["about".to_string()]),
        ..Default::default()
    }));
    let use_case = GenerateSiteUseCase::new(launcher.clone(), fast_settings());

    let report = use_case
        .execute(&routes(&["", "about", "contact"]), &config, CaptureOptions::default())
        .await
        .unwrap();

    assert_eq!(report.written, 2);
    assert_eq!(report.failed, vec![Route::from("about")]);
    assert_eq!(
        html_files(&site.path().join("dist")),
        vec!["contact.html", "index.html"]
    );
    assert!(launcher.is_closed());
    assert!(!PortSniffer::is_port_in_use("127.0.0.1", port));
}

#[tokio::test]
async fn test_retry_pass_recovers_flaky_route() {
    let site = site_with_index(APP_INDEX);
    let config = SsgConfig::new("https://example.com", free_port(), site.path()).with_out_dir("dist");
    let launcher = Arc::new(FakeLauncher::new(FakeBehaviour {
        flaky: HashSet::from(["about".to_string()]),
        ..Default::default()
    }));

    let mut settings = fast_settings();
    settings.capture.retries = 1;
    let use_case = GenerateSiteUseCase::new(launcher, settings);

    let report = use_case
        .execute(&routes(&["", "about"]), &config, CaptureOptions::default())
        .await
        .unwrap();

    assert_eq!(report.written, 2);
    assert!(report.failed.is_empty());
    assert!(site.path().join("dist/about.html").exists());
}

#[tokio::test]
async fn test_without_retries_flaky_route_fails() {
    let site = site_with_index(APP_INDEX);
    let config = SsgConfig::new("https://example.com", free_port(), site.path()).with_out_dir("dist");
    let launcher = Arc::new(FakeLauncher::new(FakeBehaviour {
        flaky: HashSet::from(["about".to_string()]),
        ..Default::default()
    }));
    let use_case = GenerateSiteUseCase::new(launcher, fast_settings());

    let report = use_case
        .execute(&routes(&["about"]), &config, CaptureOptions::default())
        .await
        .unwrap();

    assert_eq!(report.written, 0);
    assert_eq!(report.failed, vec![Route::from("about")]);
}

#[tokio::test]
async fn test_launch_failure_still_tears_down() {
    let site = site_with_index(APP_INDEX);
    let port = free_port();
    let mut config = SsgConfig::new("https://example.com", port, site.path()).with_out_dir("dist");
    config.index_seo = true;
    let launcher = Arc::new(FakeLauncher::new(FakeBehaviour {
        fail_launch: true,
        ..Default::default()
    }));
    let use_case = GenerateSiteUseCase::new(launcher.clone(), fast_settings());

    let result = use_case
        .execute(&routes(&["", "about"]), &config, CaptureOptions::default())
        .await;

    assert!(matches!(result, Err(SsgError::Engine(_))));
    assert!(!launcher.is_launched());
    assert!(!PortSniffer::is_port_in_use("127.0.0.1", port));
    assert!(!config.entry_point_path().exists());
    // The sitemap is still emitted after a failed run
    assert!(config.sitemap_path().exists());
}

#[tokio::test]
async fn test_missing_index_file_is_fatal() {
    let site = tempfile::tempdir().unwrap();
    let port = free_port();
    let config = SsgConfig::new("https://example.com", port, site.path()).with_out_dir("dist");
    let launcher = Arc::new(FakeLauncher::new(FakeBehaviour::default()));
    let use_case = GenerateSiteUseCase::new(launcher.clone(), fast_settings());

    let result = use_case
        .execute(&routes(&[""]), &config, CaptureOptions::default())
        .await;

    assert!(matches!(result, Err(SsgError::IndexFile { .. })));
    assert!(!launcher.is_launched());
    assert!(!config.entry_point_path().exists());
}

#[tokio::test]
async fn test_busy_port_fails_fast() {
    let site = site_with_index(APP_INDEX);
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupied.local_addr().unwrap().port();
    let config = SsgConfig::new("https://example.com", port, site.path()).with_out_dir("dist");
    let launcher = Arc::new(FakeLauncher::new(FakeBehaviour::default()));
    let use_case = GenerateSiteUseCase::new(launcher.clone(), fast_settings());

    let result = use_case
        .execute(&routes(&[""]), &config, CaptureOptions::default())
        .await;

    assert!(matches!(result, Err(SsgError::PortInUse(p)) if p == port));
    assert!(!launcher.is_launched());
    assert!(!config.entry_point_path().exists());
}

#[tokio::test]
async fn test_auto_port_moves_to_next_free_port() {
    let site = site_with_index(APP_INDEX);
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupied.local_addr().unwrap().port();
    let config = SsgConfig::new("https://example.com", port, site.path()).with_out_dir("dist");
    let launcher = Arc::new(FakeLauncher::new(FakeBehaviour::default()));

    let mut settings = fast_settings();
    settings.server.auto_port = true;
    let use_case = GenerateSiteUseCase::new(launcher, settings);

    let report = use_case
        .execute(&routes(&[""]), &config, CaptureOptions::default())
        .await
        .unwrap();

    assert_eq!(report.written, 1);
}

#[tokio::test]
async fn test_sitemap_in_site_root() {
    let site = site_with_index(APP_INDEX);
    let mut config = SsgConfig::new("https://example.com", free_port(), site.path()).with_out_dir("dist");
    config.generate_sitemap = true;
    let launcher = Arc::new(FakeLauncher::new(FakeBehaviour::default()));
    let use_case = GenerateSiteUseCase::new(launcher, fast_settings());

    let report = use_case
        .execute(&routes(&["", "docs/intro"]), &config, CaptureOptions::default())
        .await
        .unwrap();

    let sitemap_path = site.path().join("sitemap.xml");
    assert_eq!(report.sitemap, Some(sitemap_path.clone()));

    let sitemap = std::fs::read_to_string(sitemap_path).unwrap();
    assert!(sitemap.contains("<loc>https://example.com/</loc>"));
    assert!(sitemap.contains("<loc>https://example.com/docs/intro</loc>"));
    assert!(sitemap.contains("<priority>0.6</priority>"));
}

#[tokio::test]
async fn test_index_seo_relaxes_robots_in_output() {
    let site = site_with_index(APP_INDEX);
    let mut config = SsgConfig::new("https://example.com", free_port(), site.path()).with_out_dir("dist");
    config.index_seo = true;
    let launcher = Arc::new(FakeLauncher::new(FakeBehaviour::default()));
    let use_case = GenerateSiteUseCase::new(launcher, fast_settings());

    let report = use_case
        .execute(&routes(&[""]), &config, CaptureOptions::default())
        .await
        .unwrap();

    let index = std::fs::read_to_string(site.path().join("dist/index.html")).unwrap();
    assert!(!index.contains("noindex"));
    assert!(report.sitemap.is_some());
}

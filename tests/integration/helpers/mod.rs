// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use spa_prerender::config::settings::Settings;
use spa_prerender::domain::models::route::Route;
use spa_prerender::engines::traits::{BrowserLauncher, EngineError, RenderBrowser, RenderPage};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 假浏览器的渲染行为
#[derive(Default)]
pub struct FakeBehaviour {
    /// 就绪标记永远不会出现的路由
    pub broken: HashSet<String>,
    /// 第一次尝试失败、之后成功的路由
    pub flaky: HashSet<String>,
    /// 启动浏览器时直接失败
    pub fail_launch: bool,
    /// 关闭浏览器时把该文件替换为同名目录，使其无法被删除
    pub pin_entry_point: Option<PathBuf>,
}

/// 启动器与其浏览器共享的观测状态
#[derive(Default)]
pub struct FakeState {
    pub launched: AtomicBool,
    pub closed: AtomicBool,
    pub pages_opened: AtomicUsize,
}

/// 假浏览器启动器
///
/// 页面内容取自真实的临时服务器，再在 `</body>` 前追加当前路由的就绪标记，
/// 模拟客户端路由渲染完成的效果
pub struct FakeLauncher {
    pub behaviour: Arc<FakeBehaviour>,
    pub state: Arc<FakeState>,
}

impl FakeLauncher {
    pub fn new(behaviour: FakeBehaviour) -> Self {
        Self {
            behaviour: Arc::new(behaviour),
            state: Arc::new(FakeState::default()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }

    pub fn is_launched(&self) -> bool {
        self.state.launched.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn RenderBrowser>, EngineError> {
        if self.behaviour.fail_launch {
            return Err(EngineError::Launch("injected launch failure".to_string()));
        }
        self.state.launched.store(true, Ordering::SeqCst);
        Ok(Box::new(FakeBrowser {
            behaviour: self.behaviour.clone(),
            state: self.state.clone(),
        }))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub struct FakeBrowser {
    behaviour: Arc<FakeBehaviour>,
    state: Arc<FakeState>,
}

#[async_trait]
impl RenderBrowser for FakeBrowser {
    async fn new_page(&mut self) -> Result<Box<dyn RenderPage>, EngineError> {
        self.state.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePage {
            behaviour: self.behaviour.clone(),
            base_url: Mutex::new(String::new()),
            route: Mutex::new(String::new()),
            attempts: Mutex::new(HashMap::new()),
        }))
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        if let Some(path) = &self.behaviour.pin_entry_point {
            std::fs::remove_file(path).unwrap();
            std::fs::create_dir(path).unwrap();
        }
        self.state.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakePage {
    behaviour: Arc<FakeBehaviour>,
    base_url: Mutex<String>,
    route: Mutex<String>,
    attempts: Mutex<HashMap<String, u32>>,
}

impl FakePage {
    fn current_route(&self) -> String {
        self.route.lock().unwrap().clone()
    }
}

#[async_trait]
impl RenderPage for FakePage {
    async fn goto(&self, url: &str) -> Result<(), EngineError> {
        let response = reqwest::get(url)
            .await
            .map_err(|e| EngineError::Navigation(e.to_string()))?;
        if !response.status().is_success() {
            return Err(EngineError::Navigation(format!("status {}", response.status())));
        }
        *self.base_url.lock().unwrap() = url.trim_end_matches('/').to_string();
        Ok(())
    }

    async fn push_route(&self, route: &str) -> Result<(), EngineError> {
        *self.route.lock().unwrap() = route.to_string();
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<(), EngineError> {
        if selector == "#db-loaded" {
            return Ok(());
        }

        let route = self.current_route();
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let counter = attempts.entry(route.clone()).or_insert(0);
            *counter += 1;
            *counter
        };

        let rendered = selector == Route::from(route.as_str()).readiness_selector()
            && !self.behaviour.broken.contains(&route)
            && !(self.behaviour.flaky.contains(&route) && attempt == 1);

        if rendered {
            Ok(())
        } else {
            Err(EngineError::SelectorTimeout {
                selector: selector.to_string(),
                timeout,
            })
        }
    }

    async fn content(&self) -> Result<String, EngineError> {
        let base_url = self.base_url.lock().unwrap().clone();
        let route = Route::from(self.current_route());

        let document = reqwest::get(format!("{}/{}", base_url, route))
            .await
            .map_err(|e| EngineError::Evaluation(e.to_string()))?
            .text()
            .await
            .map_err(|e| EngineError::Evaluation(e.to_string()))?;

        let marker = format!(
            r#"<h1 id="{}">{}</h1></body>"#,
            route.readiness_marker_id(),
            route.display_name()
        );
        Ok(document.replacen("</body>", &marker, 1))
    }
}

pub const APP_INDEX: &str = r#"<!DOCTYPE html>
<html>
<head><base href="" /><meta name="robots" content="noindex" /><title>app</title></head>
<body><div id="app"></div></body>
</html>
"#;

/// 在临时目录中创建最小站点
pub fn site_with_index(index: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), index).unwrap();
    dir
}

/// 获取当前空闲的端口
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// 测试用的快速配置
pub fn fast_settings() -> Settings {
    let mut settings = Settings::default();
    settings.readiness.max_attempts = 20;
    settings.readiness.delay_ms = 25;
    settings.capture.route_timeout_ms = 100;
    settings.capture.db_timeout_ms = 100;
    settings.capture.settle_delay_ms = 0;
    settings
}

/// 列出目录下的所有 HTML 文件（相对路径，已排序）
pub fn html_files(root: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, files: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, files);
            } else if path.extension().is_some_and(|ext| ext == "html") {
                let relative = path.strip_prefix(root).unwrap();
                files.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }
    }

    let mut files = Vec::new();
    walk(root, root, &mut files);
    files.sort();
    files
}

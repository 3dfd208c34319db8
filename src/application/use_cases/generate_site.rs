// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::{
    config::settings::{ServerSettings, Settings},
    domain::{
        models::{
            capture::{CaptureJob, Cleanup, RunReport},
            route::Route,
            site_config::SsgConfig,
        },
        services::{
            capture_service::{CaptureEngine, CaptureOptions},
            index_file_service::{create_index_file, IndexFileOptions},
            sitemap_service::generate_sitemap,
        },
    },
    engines::{
        chromium_engine::ChromiumLauncher,
        session::init_page,
        traits::{BrowserLauncher, RenderBrowser, RenderPage},
    },
    infrastructure::static_server::{self, ServerHandle},
    utils::{errors::SsgError, port_sniffer::PortSniffer, readiness::ReadinessPoller},
};

/// 捕获阶段汇总
#[derive(Debug, Default)]
pub struct CaptureSummary {
    /// 成功写出的页面数量
    pub written: usize,
    /// 所有轮次结束后仍然失败的路由
    pub failed: Vec<Route>,
}

/// 准备静态模式入口文件
///
/// 失败时不会创建任何其他资源
pub async fn prepare_entry_point(config: &SsgConfig) -> Result<(), SsgError> {
    let options = IndexFileOptions {
        index_seo: config.index_seo,
        ..Default::default()
    };
    create_index_file(&config.index_file_path(), &config.entry_point_path(), &options).await
}

/// 确定临时服务器端口
///
/// # 参数
///
/// * `server` - 服务器配置
/// * `port` - 请求的端口
///
/// # 返回值
///
/// * `Ok(u16)` - 可以使用的端口
/// * `Err(SsgError::PortInUse)` - 端口被占用且未开启自动嗅探
pub fn resolve_port(server: &ServerSettings, port: u16) -> Result<u16, SsgError> {
    if !PortSniffer::is_port_in_use(&server.host, port) {
        return Ok(port);
    }
    if server.auto_port {
        Ok(PortSniffer::find_available_port(&server.host, port)?)
    } else {
        Err(SsgError::PortInUse(port))
    }
}

/// 依次捕获所有路由，并对失败的路由进行额外轮次的重试
///
/// 单个路由的失败只会被记录，不会中断后续路由
///
/// # 参数
///
/// * `engine` - 捕获引擎
/// * `page` - 复用的浏览器页面
/// * `job` - 有序的捕获任务
/// * `out_dir` - 输出目录
/// * `retries` - 额外重试轮数
pub async fn capture_routes(
    engine: &CaptureEngine,
    page: &dyn RenderPage,
    job: &CaptureJob,
    out_dir: &Path,
    retries: u32,
) -> CaptureSummary {
    let mut summary = CaptureSummary::default();
    let head = job.routes().first();

    for (route, is_first_page) in job.iter() {
        if engine
            .capture(page, route, out_dir, 1, is_first_page)
            .await
            .is_written()
        {
            summary.written += 1;
        } else {
            summary.failed.push(route.clone());
        }
    }

    for level in 2..=retries.saturating_add(1) {
        if summary.failed.is_empty() {
            break;
        }
        let pending = std::mem::take(&mut summary.failed);
        for route in pending {
            let is_first_page = head == Some(&route);
            if engine
                .capture(page, &route, out_dir, level, is_first_page)
                .await
                .is_written()
            {
                summary.written += 1;
            } else {
                summary.failed.push(route);
            }
        }
    }

    summary
}

/// 删除临时入口文件（尽力而为）
pub async fn remove_entry_point(path: &Path) -> Cleanup {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Cleanup::Removed,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Cleanup::Skipped,
        Err(e) => {
            warn!("Failed to remove {}: {}", path.display(), e);
            Cleanup::Ignored(e.to_string())
        }
    }
}

/// 释放所有运行期资源
///
/// 浏览器关闭与服务器停止并行执行，两者都结束后再删除临时入口文件。
/// 返回清理结果以及关闭过程中遇到的第一个错误。
pub async fn teardown(
    browser: Option<Box<dyn RenderBrowser>>,
    server: Option<ServerHandle>,
    entry_point: &Path,
) -> (Cleanup, Option<SsgError>) {
    let close_browser = async move {
        match browser {
            Some(mut browser) => browser.close().await.map_err(SsgError::from),
            None => Ok(()),
        }
    };
    let stop_server = async move {
        match server {
            Some(handle) => static_server::stop_server(handle)
                .await
                .map_err(SsgError::from),
            None => Ok(()),
        }
    };

    let (browser_closed, server_stopped) = tokio::join!(close_browser, stop_server);
    let cleanup = remove_entry_point(entry_point).await;

    (cleanup, browser_closed.err().or(server_stopped.err()))
}

/// 静态站点生成用例
///
/// 按固定顺序执行：准备入口文件、启动临时服务器、打开浏览器会话、
/// 逐路由捕获、释放资源、生成站点地图。
pub struct GenerateSiteUseCase<L> {
    launcher: Arc<L>,
    settings: Settings,
}

impl<L> GenerateSiteUseCase<L>
where
    L: BrowserLauncher + 'static,
{
    pub fn new(launcher: Arc<L>, settings: Settings) -> Self {
        Self { launcher, settings }
    }

    /// 执行一次完整的生成
    ///
    /// # 参数
    ///
    /// * `routes` - 要捕获的路由，按顺序执行
    /// * `config` - 流水线配置
    /// * `options` - 页面捕获选项
    ///
    /// # 返回值
    ///
    /// * `Ok(RunReport)` - 运行报告（可能包含失败的路由）
    /// * `Err(SsgError)` - 致命错误，此时所有资源都已释放
    pub async fn execute(
        &self,
        routes: &[Route],
        config: &SsgConfig,
        options: CaptureOptions,
    ) -> Result<RunReport, SsgError> {
        let start = Instant::now();

        prepare_entry_point(config).await?;

        let mut server = None;
        let mut browser = None;
        let rendered = self
            .render(routes, config, options, &mut server, &mut browser)
            .await;
        if let Err(e) = &rendered {
            error!("Static site generation failed: {}", e);
        }

        let (entry_point_cleanup, teardown_error) =
            teardown(browser, server, &config.entry_point_path()).await;

        let elapsed = start.elapsed();
        info!(
            "Static site created {} pages in {:.2} seconds",
            routes.len(),
            elapsed.as_secs_f64()
        );

        let mut sitemap = None;
        let mut sitemap_error = None;
        if config.wants_sitemap() {
            let path = config.sitemap_path();
            match generate_sitemap(
                routes,
                &config.domain,
                self.settings.sitemap.change_frequency,
                &path,
            )
            .await
            {
                Ok(()) => sitemap = Some(path),
                Err(e) => {
                    error!("Failed to generate sitemap: {}", e);
                    sitemap_error = Some(SsgError::from(e));
                }
            }
        }

        let summary = rendered?;
        if let Some(e) = teardown_error.or(sitemap_error) {
            return Err(e);
        }

        Ok(RunReport {
            pages: routes.len(),
            written: summary.written,
            failed: summary.failed,
            elapsed,
            entry_point_cleanup,
            sitemap,
        })
    }

    /// 运行期阶段：服务器、会话与捕获
    ///
    /// 已获取的资源会放入调用方持有的槽位，出错时由调用方统一释放
    async fn render(
        &self,
        routes: &[Route],
        config: &SsgConfig,
        options: CaptureOptions,
        server: &mut Option<ServerHandle>,
        browser: &mut Option<Box<dyn RenderBrowser>>,
    ) -> Result<CaptureSummary, SsgError> {
        let out_dir = config.out_dir_path();
        tokio::fs::create_dir_all(&out_dir)
            .await
            .map_err(|source| SsgError::OutDir {
                path: out_dir.clone(),
                source,
            })?;

        let port = resolve_port(&self.settings.server, config.port)?;
        let handle = static_server::start_server(
            config.root(),
            &config.entry_point_path(),
            &self.settings.server.host,
            port,
        )
        .await?;
        let base_url = handle.base_url();
        *server = Some(handle);

        let poller = ReadinessPoller::from_settings(&self.settings.readiness)?;
        info!("Launching {} browser", self.launcher.name());
        let browser = browser.insert(self.launcher.launch().await?);
        let page = init_page(&mut **browser, &base_url, &poller).await?;

        let engine = CaptureEngine::new(self.settings.capture.clone(), options);
        let job = CaptureJob::new(routes.to_vec());
        let summary = capture_routes(
            &engine,
            page.as_ref(),
            &job,
            &out_dir,
            self.settings.capture.retries,
        )
        .await;

        if !summary.failed.is_empty() {
            warn!("{} page(s) could not be captured", summary.failed.len());
        }
        Ok(summary)
    }
}

/// 使用 Chromium 和默认配置生成静态站点
///
/// # 参数
///
/// * `routes` - 要捕获的路由
/// * `config` - 流水线配置
/// * `options` - 页面捕获选项
pub async fn generate_static_site(
    routes: &[Route],
    config: &SsgConfig,
    options: CaptureOptions,
) -> Result<RunReport, SsgError> {
    let settings = Settings::new()?;
    let launcher = Arc::new(ChromiumLauncher::new(settings.browser.clone()));
    GenerateSiteUseCase::new(launcher, settings)
        .execute(routes, config, options)
        .await
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::traits::{BrowserLauncher, EngineError, RenderBrowser, RenderPage};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// 轮询选择器的间隔
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Chromium 浏览器启动器
///
/// 基于 chromiumoxide 启动本地无头 Chrome，或连接到远程调试实例
pub struct ChromiumLauncher {
    settings: BrowserSettings,
}

impl ChromiumLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    fn browser_config(&self) -> Result<BrowserConfig, EngineError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.settings.request_timeout());

        if let Some(executable) = &self.settings.executable {
            builder = builder.chrome_executable(executable);
        }

        for arg in &self.settings.args {
            builder = builder.arg(arg.as_str());
        }

        builder.build().map_err(EngineError::Launch)
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    /// 启动浏览器
    ///
    /// # 返回值
    ///
    /// * `Ok(Box<dyn RenderBrowser>)` - 已就绪的浏览器
    /// * `Err(EngineError)` - 启动或连接失败
    async fn launch(&self) -> Result<Box<dyn RenderBrowser>, EngineError> {
        let remote = self.settings.remote_debugging_url.is_some();

        let (browser, mut handler) = if let Some(url) = &self.settings.remote_debugging_url {
            tracing::info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url.as_str()).await.map_err(|e| {
                EngineError::Launch(format!("Failed to connect to remote Chrome: {}", e))
            })?
        } else {
            Browser::launch(self.browser_config()?)
                .await
                .map_err(|e| EngineError::Launch(e.to_string()))?
        };

        // Spawn a handler to process browser events
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler event error: {}", e);
                }
            }
        });

        Ok(Box::new(ChromiumBrowser {
            browser,
            handler,
            pages: Vec::new(),
            remote,
        }))
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

/// Chromium 浏览器实例
///
/// 由流水线独占持有，关闭后不再被任何组件引用
pub struct ChromiumBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
    pages: Vec<Page>,
    remote: bool,
}

#[async_trait]
impl RenderBrowser for ChromiumBrowser {
    async fn new_page(&mut self) -> Result<Box<dyn RenderPage>, EngineError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| EngineError::Other(e.to_string()))?;
        self.pages.push(page.clone());
        Ok(Box::new(ChromiumPage { page }))
    }

    /// 关闭浏览器
    ///
    /// 本地启动的浏览器会被关闭并等待进程退出；
    /// 远程实例只关闭本次运行打开的页面
    async fn close(&mut self) -> Result<(), EngineError> {
        let result = if self.remote {
            let mut first_error = None;
            for page in self.pages.drain(..) {
                if let Err(e) = page.close().await {
                    first_error.get_or_insert(EngineError::Close(e.to_string()));
                }
            }
            first_error.map_or(Ok(()), Err)
        } else {
            self.pages.clear();
            match self.browser.close().await {
                Ok(_) => {
                    if let Err(e) = self.browser.wait().await {
                        tracing::warn!("Failed to wait for browser process: {}", e);
                    }
                    Ok(())
                }
                Err(e) => Err(EngineError::Close(e.to_string())),
            }
        };

        self.handler.abort();
        result
    }
}

/// Chromium 页面
pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    /// 生成在页面内模拟客户端导航的脚本
    ///
    /// 路由以 JSON 字符串字面量嵌入，保证任意字符都能安全地出现在脚本中
    pub fn navigation_script(route: &str) -> Result<String, EngineError> {
        let literal = serde_json::to_string(route).map_err(|e| EngineError::Other(e.to_string()))?;
        Ok(format!(
            "(() => {{ window.history.pushState({{ path: {literal} }}, '', {literal}); \
             window.dispatchEvent(new PopStateEvent('popstate')); }})()"
        ))
    }
}

#[async_trait]
impl RenderPage for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<(), EngineError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| EngineError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn push_route(&self, route: &str) -> Result<(), EngineError> {
        let script = Self::navigation_script(route)?;
        self.page
            .evaluate(script)
            .await
            .map_err(|e| EngineError::Evaluation(e.to_string()))?;
        Ok(())
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), EngineError> {
        let poll = async {
            loop {
                if self.page.find_element(selector).await.is_ok() {
                    return;
                }
                tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| EngineError::SelectorTimeout {
                selector: selector.to_string(),
                timeout,
            })
    }

    async fn content(&self) -> Result<String, EngineError> {
        self.page
            .content()
            .await
            .map_err(|e| EngineError::Other(e.to_string()))
    }
}

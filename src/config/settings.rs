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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::models::site_config::ChangeFrequency;

/// 运行时配置设置
///
/// 包含临时服务器、就绪轮询、浏览器、页面捕获和站点地图等所有配置项
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    /// 临时服务器配置
    pub server: ServerSettings,
    /// 就绪轮询配置
    pub readiness: ReadinessSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 页面捕获配置
    pub capture: CaptureSettings,
    /// 站点地图配置
    pub sitemap: SitemapSettings,
}

/// 临时服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 配置端口被占用时是否自动嗅探后续可用端口
    pub auto_port: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            auto_port: false,
        }
    }
}

/// 就绪轮询配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ReadinessSettings {
    /// 最大尝试次数
    pub max_attempts: u32,
    /// 两次尝试之间的间隔（毫秒）
    pub delay_ms: u64,
}

impl Default for ReadinessSettings {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            delay_ms: 200,
        }
    }
}

impl ReadinessSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 远程 Chrome 调试地址，设置后连接已有实例而不是启动新浏览器
    pub remote_debugging_url: Option<String>,
    /// Chrome 可执行文件路径
    pub executable: Option<String>,
    /// 浏览器操作的默认超时时间（毫秒）
    pub request_timeout_ms: u64,
    /// 额外的启动参数
    pub args: Vec<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            remote_debugging_url: None,
            executable: None,
            request_timeout_ms: 10_000,
            args: vec![
                "--disable-dev-shm-usage".to_string(),
                "--disable-gpu".to_string(),
            ],
        }
    }
}

impl BrowserSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// 页面捕获配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureSettings {
    /// 等待路由就绪标记的超时时间（毫秒）
    pub route_timeout_ms: u64,
    /// 首页等待数据层就绪的超时时间（毫秒）
    pub db_timeout_ms: u64,
    /// 数据层就绪后的固定稳定等待（毫秒）
    pub settle_delay_ms: u64,
    /// 失败路由的重试轮数（0 表示不重试）
    pub retries: u32,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            route_timeout_ms: 10_000,
            db_timeout_ms: 30_000,
            settle_delay_ms: 500,
            retries: 0,
        }
    }
}

impl CaptureSettings {
    pub fn route_timeout(&self) -> Duration {
        Duration::from_millis(self.route_timeout_ms)
    }

    pub fn db_timeout(&self) -> Duration {
        Duration::from_millis(self.db_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// 站点地图配置设置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SitemapSettings {
    /// 更新频率
    pub change_frequency: ChangeFrequency,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载内置默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 以及 `SPA_PRERENDER__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let defaults = Settings::default();

        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", defaults.server.host)?
            .set_default("server.auto_port", defaults.server.auto_port)?
            // Readiness polling
            .set_default("readiness.max_attempts", defaults.readiness.max_attempts)?
            .set_default("readiness.delay_ms", defaults.readiness.delay_ms)?
            // Browser
            .set_default(
                "browser.request_timeout_ms",
                defaults.browser.request_timeout_ms,
            )?
            .set_default("browser.args", defaults.browser.args)?
            // Capture
            .set_default("capture.route_timeout_ms", defaults.capture.route_timeout_ms)?
            .set_default("capture.db_timeout_ms", defaults.capture.db_timeout_ms)?
            .set_default("capture.settle_delay_ms", defaults.capture.settle_delay_ms)?
            .set_default("capture.retries", defaults.capture.retries)?
            // Sitemap
            .set_default(
                "sitemap.change_frequency",
                defaults.sitemap.change_frequency.as_str(),
            )?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("SPA_PRERENDER")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("browser.args"),
            );

        let mut settings: Settings = builder.build()?.try_deserialize()?;

        // Plain env var for connecting to an existing Chrome
        if settings.browser.remote_debugging_url.is_none() {
            settings.browser.remote_debugging_url =
                std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok();
        }

        Ok(settings)
    }
}

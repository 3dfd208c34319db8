// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;
use tracing::debug;

use crate::config::settings::ReadinessSettings;
use crate::utils::errors::ReadinessError;

/// 单次探测请求的超时时间
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// 就绪轮询器
///
/// 以固定间隔轮询URL，直到其返回成功状态或达到最大尝试次数
#[derive(Debug, Clone)]
pub struct ReadinessPoller {
    client: reqwest::Client,
    max_attempts: u32,
    delay: Duration,
}

impl ReadinessPoller {
    pub fn new(max_attempts: u32, delay: Duration) -> Result<Self, ReadinessError> {
        let client = reqwest::Client::builder().timeout(PROBE_TIMEOUT).build()?;
        Ok(Self {
            client,
            max_attempts,
            delay,
        })
    }

    pub fn from_settings(settings: &ReadinessSettings) -> Result<Self, ReadinessError> {
        Self::new(settings.max_attempts, settings.delay())
    }

    /// 阻塞直到URL就绪
    ///
    /// 单次请求错误（服务尚未启动）和非成功状态码都会被忽略并在间隔后重试
    ///
    /// # 参数
    ///
    /// * `url` - 要轮询的地址
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - URL 返回了成功状态
    /// * `Err(ReadinessError::Timeout)` - 超过最大尝试次数
    pub async fn wait_until_ready(&self, url: &str) -> Result<(), ReadinessError> {
        for attempt in 1..=self.max_attempts {
            match self.client.get(url).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!("{} ready after {} attempt(s)", url, attempt);
                    return Ok(());
                }
                Ok(response) => {
                    debug!("{} answered {} (attempt {})", url, response.status(), attempt);
                }
                Err(e) => {
                    debug!("{} not reachable yet (attempt {}): {}", url, attempt, e);
                }
            }
            tokio::time::sleep(self.delay).await;
        }

        Err(ReadinessError::Timeout {
            url: url.to_string(),
            attempts: self.max_attempts,
        })
    }
}

/// 使用默认参数（30 次，200 毫秒间隔）等待URL就绪
pub async fn wait_until_ready(url: &str) -> Result<(), ReadinessError> {
    ReadinessPoller::from_settings(&ReadinessSettings::default())?
        .wait_until_ready(url)
        .await
}

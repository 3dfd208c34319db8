// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing::info;

use crate::engines::traits::{RenderBrowser, RenderPage};
use crate::utils::errors::SsgError;
use crate::utils::readiness::ReadinessPoller;

/// 初始化浏览器页面会话
///
/// 等待临时服务器就绪，打开唯一的页面并导航到服务器根路径。
/// 返回的页面在整个运行期间被所有路由捕获复用。
///
/// # 参数
///
/// * `browser` - 已启动的浏览器
/// * `base_url` - 临时服务器根地址
/// * `poller` - 就绪轮询器
///
/// # 返回值
///
/// * `Ok(Box<dyn RenderPage>)` - 已加载应用的页面
/// * `Err(SsgError)` - 服务器未就绪、打开页面或初始导航失败
pub async fn init_page(
    browser: &mut dyn RenderBrowser,
    base_url: &str,
    poller: &ReadinessPoller,
) -> Result<Box<dyn RenderPage>, SsgError> {
    poller.wait_until_ready(base_url).await?;

    let page = browser.new_page().await?;
    page.goto(base_url).await?;
    info!("Browser session opened at {}", base_url);

    Ok(page)
}

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

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 浏览器启动或连接失败
    #[error("Browser launch failed: {0}")]
    Launch(String),
    /// 页面导航失败
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// 页面脚本执行失败
    #[error("Script evaluation failed: {0}")]
    Evaluation(String),
    /// 等待选择器超时
    #[error("Timeout waiting for selector {selector} after {timeout:?}")]
    SelectorTimeout { selector: String, timeout: Duration },
    /// 浏览器关闭失败
    #[error("Browser close failed: {0}")]
    Close(String),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

/// 浏览器页面特质
///
/// 一个持续存在的客户端应用实例。路由切换通过页面内的历史记录操作模拟，
/// 而不是完整的页面导航，以便水合后的应用状态在多次捕获之间保留。
#[async_trait]
pub trait RenderPage: Send + Sync {
    /// 完整导航到指定URL（仅用于会话初始化）
    async fn goto(&self, url: &str) -> Result<(), EngineError>;

    /// 在页面内推入路由并派发 `popstate` 事件
    async fn push_route(&self, route: &str) -> Result<(), EngineError>;

    /// 等待选择器对应的元素挂载到 DOM
    async fn wait_for_selector(&self, selector: &str, timeout: Duration)
        -> Result<(), EngineError>;

    /// 获取完整的渲染后HTML
    async fn content(&self) -> Result<String, EngineError>;
}

/// 浏览器特质
#[async_trait]
pub trait RenderBrowser: Send {
    /// 打开一个新的空白页面
    async fn new_page(&mut self) -> Result<Box<dyn RenderPage>, EngineError>;

    /// 关闭浏览器并释放进程
    async fn close(&mut self) -> Result<(), EngineError>;
}

/// 浏览器启动器特质
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// 启动（或连接）浏览器
    async fn launch(&self) -> Result<Box<dyn RenderBrowser>, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}

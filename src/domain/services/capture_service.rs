// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::config::settings::CaptureSettings;
use crate::domain::models::capture::CaptureOutcome;
use crate::domain::models::route::Route;
use crate::engines::traits::{EngineError, RenderPage};

/// 从渲染内容中提取数据目录路径的函数
pub type DbPathExtractor = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// 页面捕获选项
#[derive(Clone, Default)]
pub struct CaptureOptions {
    /// 首页需要等待的数据层就绪选择器
    pub wait_for_db_selector: Option<String>,
    /// 数据目录路径提取器，配置后会剥离加载期的 JSON 数据脚本
    pub db_path_extractor: Option<DbPathExtractor>,
}

impl fmt::Debug for CaptureOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureOptions")
            .field("wait_for_db_selector", &self.wait_for_db_selector)
            .field("db_path_extractor", &self.db_path_extractor.is_some())
            .finish()
    }
}

/// 单页捕获错误（仅在捕获引擎内部记录，不向上传播）
#[derive(Error, Debug)]
enum CaptureError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid data path pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// 剥离引用数据目录下 `*.json.js` 文件的 `<script>` 标签
///
/// 这些脚本只在加载期使用，不能固化到静态快照中
pub fn strip_data_scripts(content: &str, db_path: &str) -> Result<String, regex::Error> {
    let pattern = format!(
        r#"<script src="{}/[^"]+\.json\.js[^"]*"></script>"#,
        regex::escape(db_path)
    );
    let re = Regex::new(&pattern)?;
    Ok(re.replace_all(content, "").into_owned())
}

/// 页面捕获引擎
///
/// 对单个路由执行：客户端导航、就绪等待、HTML 提取、后处理与写盘。
/// 任何一步失败都只会被记录，保证每个路由最多产生一个文件，
/// 且不会中断剩余路由的捕获。
pub struct CaptureEngine {
    settings: CaptureSettings,
    options: CaptureOptions,
}

impl CaptureEngine {
    pub fn new(settings: CaptureSettings, options: CaptureOptions) -> Self {
        Self { settings, options }
    }

    /// 捕获单个路由
    ///
    /// # 参数
    ///
    /// * `page` - 复用的浏览器页面
    /// * `route` - 要捕获的路由
    /// * `out_dir` - 输出目录
    /// * `level` - 尝试轮次（1 为首轮，大于 1 为重试）
    /// * `is_first_page` - 是否为本次运行的第一个路由
    ///
    /// # 返回值
    ///
    /// * `CaptureOutcome` - 写出的文件或失败标记
    pub async fn capture(
        &self,
        page: &dyn RenderPage,
        route: &Route,
        out_dir: &Path,
        level: u32,
        is_first_page: bool,
    ) -> CaptureOutcome {
        let file_name = route.output_file_name();

        match self
            .try_capture(page, route, &out_dir.join(&file_name), is_first_page)
            .await
        {
            Ok(path) => {
                info!("create page: {}", route.display_name());
                CaptureOutcome::Written(path)
            }
            Err(e) => {
                let mut message = format!("Failed to capture page : {}", file_name);
                if level > 1 {
                    message.push_str(&format!(" (retry {})", level));
                }
                error!(route = %route, level, "{} {}", message, e);
                CaptureOutcome::Failed
            }
        }
    }

    async fn try_capture(
        &self,
        page: &dyn RenderPage,
        route: &Route,
        output_path: &Path,
        is_first_page: bool,
    ) -> Result<PathBuf, CaptureError> {
        page.push_route(route.as_str()).await?;

        if is_first_page {
            if let Some(selector) = &self.options.wait_for_db_selector {
                page.wait_for_selector(selector, self.settings.db_timeout())
                    .await?;
                tokio::time::sleep(self.settings.settle_delay()).await;
            }
        }

        page.wait_for_selector(&route.readiness_selector(), self.settings.route_timeout())
            .await?;

        let mut content = page.content().await?;

        if let Some(extractor) = &self.options.db_path_extractor {
            let db_path = extractor(&content);
            content = strip_data_scripts(&content, &db_path)?;
        }

        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| CaptureError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(output_path, content)
            .await
            .map_err(|source| CaptureError::Write {
                path: output_path.to_path_buf(),
                source,
            })?;

        Ok(output_path.to_path_buf())
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use std::time::Duration;

use super::route::Route;

/// 捕获任务
///
/// 有序的路由序列，路由顺序即执行顺序。
/// 只有序列头部的路由被标记为首页（需要额外等待数据层就绪）。
#[derive(Debug, Clone, Default)]
pub struct CaptureJob {
    routes: Vec<Route>,
}

impl CaptureJob {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// 按执行顺序迭代 `(路由, 是否首页)`
    pub fn iter(&self) -> impl Iterator<Item = (&Route, bool)> {
        self.routes
            .iter()
            .enumerate()
            .map(|(index, route)| (route, index == 0))
    }
}

impl<R: Into<Route>> FromIterator<R> for CaptureJob {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// 单个路由的捕获结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// 页面已写入指定文件
    Written(PathBuf),
    /// 捕获失败（错误已记录日志，不向上传播）
    Failed,
}

impl CaptureOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, CaptureOutcome::Written(_))
    }
}

/// 尽力而为的清理结果
///
/// 与致命错误类型分开建模：清理失败只会被记录，不会影响已写出的页面
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cleanup {
    /// 临时文件已删除
    Removed,
    /// 删除失败，已忽略
    Ignored(String),
    /// 没有需要清理的内容
    Skipped,
}

/// 一次流水线运行的汇总报告
#[derive(Debug, Clone)]
pub struct RunReport {
    /// 请求捕获的页面数量
    pub pages: usize,
    /// 成功写出的页面数量
    pub written: usize,
    /// 最终仍然失败的路由
    pub failed: Vec<Route>,
    /// 总耗时
    pub elapsed: Duration,
    /// 临时入口文件的清理结果
    pub entry_point_cleanup: Cleanup,
    /// 站点地图文件（如已生成）
    pub sitemap: Option<PathBuf>,
}

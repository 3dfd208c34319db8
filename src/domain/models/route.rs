// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 页面就绪标记 ID 前缀
pub const READINESS_MARKER_PREFIX: &str = "page-loaded-route-";

/// 嵌套路由中路径分隔符在标记 ID 中的替换记号
pub const PATH_SEPARATOR_TOKEN: &str = "___";

/// 路由实体
///
/// 一个需要被静态捕获的逻辑页面路径，例如 `""`、`"about"`、`"user/42"`。
/// 不包含协议，也不带前导斜杠；字符串本身即是其标识。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Route(String);

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 是否为站点根路由（空字符串）
    pub fn is_index(&self) -> bool {
        self.0.is_empty()
    }

    /// 输出文件名（相对于输出目录）
    ///
    /// 空路由映射为 `index.html`，其余路由映射为 `<route>.html`。
    /// 文件名只由非空路径段拼成，`.` 与 `..` 段被丢弃，结果始终是相对路径
    pub fn output_file_name(&self) -> String {
        let segments: Vec<&str> = self
            .0
            .split('/')
            .filter(|segment| !matches!(*segment, "" | "." | ".."))
            .collect();

        if segments.is_empty() {
            "index.html".to_string()
        } else {
            format!("{}.html", segments.join("/"))
        }
    }

    /// 页面就绪标记的元素 ID
    ///
    /// 每个 `/` 被替换为 `___`，使嵌套路由也能得到单一记号的合法 ID
    pub fn readiness_marker_id(&self) -> String {
        format!(
            "{}{}",
            READINESS_MARKER_PREFIX,
            self.0.replace('/', PATH_SEPARATOR_TOKEN)
        )
    }

    /// 页面就绪标记的 CSS 选择器
    pub fn readiness_selector(&self) -> String {
        format!("#{}", self.readiness_marker_id())
    }

    /// 路径深度（非空路径段的数量）
    pub fn depth(&self) -> usize {
        self.0.split('/').filter(|segment| !segment.is_empty()).count()
    }

    /// 日志中使用的名称
    pub fn display_name(&self) -> &str {
        if self.is_index() {
            "index"
        } else {
            &self.0
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Route {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for Route {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl AsRef<str> for Route {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

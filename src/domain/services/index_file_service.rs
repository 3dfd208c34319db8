// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::Path;
use tracing::error;

use crate::utils::errors::SsgError;

/// 静态模式标记，注入在 `<head>` 之后
pub const STATIC_MODE_META: &str = r#"<meta app-mode="static" />"#;

const EMPTY_BASE_HREF: &str = r#"<base href="""#;
const NOINDEX_ROBOTS: &str = r#"<meta name="robots" content="noindex""#;
const PLAIN_ROBOTS: &str = r#"<meta name="robots" "#;

/// 入口文件准备选项
#[derive(Debug, Clone)]
pub struct IndexFileOptions {
    /// 是否放开搜索引擎索引
    pub index_seo: bool,
    /// 替换空 base-href 的值
    pub base_href: String,
}

impl Default for IndexFileOptions {
    fn default() -> Self {
        Self {
            index_seo: false,
            base_href: "/".to_string(),
        }
    }
}

/// 将普通入口文档转换为静态模式入口文档
///
/// 每条规则只替换第一次出现
pub fn transform_index(html: &str, options: &IndexFileOptions) -> String {
    let html = html
        .replacen(
            EMPTY_BASE_HREF,
            &format!(r#"<base href="{}""#, options.base_href),
            1,
        )
        .replacen("<head>", &format!("<head>{}", STATIC_MODE_META), 1);

    if options.index_seo {
        html.replacen(NOINDEX_ROBOTS, PLAIN_ROBOTS, 1)
    } else {
        html
    }
}

/// 创建静态模式入口文件
///
/// # 参数
///
/// * `source_file` - 源入口文件
/// * `target_file` - 目标入口文件
/// * `options` - 准备选项
///
/// # 返回值
///
/// * `Ok(())` - 写入成功
/// * `Err(SsgError::IndexFile)` - 读取或写入失败（致命错误）
pub async fn create_index_file(
    source_file: &Path,
    target_file: &Path,
    options: &IndexFileOptions,
) -> Result<(), SsgError> {
    let result = async {
        let source = tokio::fs::read_to_string(source_file)
            .await
            .map_err(|source| SsgError::IndexFile {
                path: source_file.to_path_buf(),
                source,
            })?;

        tokio::fs::write(target_file, transform_index(&source, options))
            .await
            .map_err(|source| SsgError::IndexFile {
                path: target_file.to_path_buf(),
                source,
            })
    }
    .await;

    if let Err(e) = &result {
        error!("Failed to create index file: {}", e);
    }
    result
}

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

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    application::use_cases::generate_site::GenerateSiteUseCase,
    domain::{
        models::{
            capture::RunReport,
            route::Route,
            site_config::{JsonjsdbSsgConfig, SsgConfig},
        },
        services::capture_service::CaptureOptions,
    },
    engines::traits::BrowserLauncher,
    utils::errors::AdapterError,
};

/// jsonjsdb 数据层加载完成后挂载的选择器
pub const DB_LOADED_SELECTOR: &str = "#db-loaded";

/// 页面中未声明数据目录时使用的默认值
pub const DEFAULT_DB_PATH: &str = "data/db";

const ROW_EXPORT_SUFFIX: &str = ".json.js";

static DB_CONFIG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"id="jsonjsdb-config"[^>]+data-path="([^"]+)""#).unwrap());

/// 行对象
pub type Row = Map<String, Value>;

/// 将表头加数据行形式的导出转换为行对象
///
/// 第一行为表头，其余每行按位置映射到表头键。
/// 超出表头长度的单元格会被丢弃，非数组行会被跳过。
pub fn array_to_object(data: &[Value]) -> Vec<Row> {
    let Some((headers, rows)) = data.split_first() else {
        return Vec::new();
    };
    let headers: Vec<String> = headers
        .as_array()
        .map(|cells| {
            cells
                .iter()
                .map(|cell| match cell {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    rows.iter()
        .filter_map(Value::as_array)
        .map(|row| {
            headers
                .iter()
                .zip(row.iter())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .collect()
}

/// 从渲染后的页面中读取 jsonjsdb 数据目录
pub fn get_db_path_from_content(content: &str) -> String {
    DB_CONFIG_PATTERN
        .captures(content)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
}

/// 定位元数据目录
///
/// 目录下有 `*.json.js` 文件时直接使用；否则若恰好只有一个子目录，
/// 则下降一层；其余情况保持不变
pub async fn get_db_meta_path(output_db: &Path) -> Result<PathBuf, AdapterError> {
    let io_error = |source| AdapterError::Io {
        path: output_db.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(output_db).await.map_err(io_error)?;
    let mut has_row_exports = false;
    let mut folders = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
        let file_type = entry.file_type().await.map_err(io_error)?;
        if file_type.is_file() && entry.file_name().to_string_lossy().ends_with(ROW_EXPORT_SUFFIX)
        {
            has_row_exports = true;
        } else if file_type.is_dir() {
            folders.push(entry.path());
        }
    }

    if has_row_exports || folders.len() != 1 {
        return Ok(output_db.to_path_buf());
    }
    Ok(folders.remove(0))
}

/// 解析行导出文件内容
///
/// 内容形如 `<标识符> = <json>`；没有 `=` 时整体按 JSON 解析
fn parse_row_export(raw: &str, path: &Path) -> Result<Vec<Row>, AdapterError> {
    let json = match raw.find('=') {
        Some(index) => &raw[index + 1..],
        None => raw,
    };
    let value: Value = serde_json::from_str(json.trim()).map_err(|source| {
        AdapterError::RowExport {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let Value::Array(items) = value else {
        return Err(AdapterError::NotAnArray(path.to_path_buf()));
    };

    if items.first().is_some_and(Value::is_array) {
        return Ok(array_to_object(&items));
    }
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(row) => Some(row),
            _ => None,
        })
        .collect())
}

fn row_id(row: &Row) -> Option<String> {
    match row.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// 根据实体行导出生成 `entity/<id>` 路由
///
/// # 参数
///
/// * `db_meta_path` - 元数据目录
/// * `entities` - 实体名称列表
///
/// # 返回值
///
/// * `Ok(Vec<Route>)` - 按实体顺序、行顺序排列的路由
/// * `Err(AdapterError)` - 读取或解析失败
pub async fn get_entities_routes(
    db_meta_path: &Path,
    entities: &[String],
) -> Result<Vec<Route>, AdapterError> {
    let mut routes = Vec::new();

    for entity in entities {
        let path = db_meta_path.join(format!("{}{}", entity, ROW_EXPORT_SUFFIX));
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| AdapterError::Io {
                path: path.clone(),
                source,
            })?;

        for row in parse_row_export(&raw, &path)? {
            match row_id(&row) {
                Some(id) => routes.push(Route::new(format!("{}/{}", entity, id))),
                None => warn!("Skipping {} row without id in {}", entity, path.display()),
            }
        }
    }

    Ok(routes)
}

/// 为每个实体在输出目录下创建子目录
pub async fn create_entity_dirs(out_dir: &Path, entities: &[String]) -> Result<(), AdapterError> {
    for entity in entities {
        let dir = out_dir.join(entity);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| AdapterError::Io { path: dir, source })?;
    }
    Ok(())
}

/// 加载 jsonjsdb 站点配置
///
/// 读取或解析失败时记录错误并返回 `None`
pub async fn load_ssg_config(config_path: &Path) -> Option<JsonjsdbSsgConfig> {
    let raw = match tokio::fs::read_to_string(config_path).await {
        Ok(raw) => raw,
        Err(e) => {
            error!("Failed to read or parse {}: {}", config_path.display(), e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(config) => Some(config),
        Err(e) => {
            error!("Failed to read or parse {}: {}", config_path.display(), e);
            None
        }
    }
}

/// jsonjsdb 页面使用的捕获选项
pub fn jsonjsdb_capture_options() -> CaptureOptions {
    CaptureOptions {
        wait_for_db_selector: Some(DB_LOADED_SELECTOR.to_string()),
        db_path_extractor: Some(Arc::new(|content: &str| get_db_path_from_content(content))),
    }
}

/// 清空并重建输出目录
async fn reset_out_dir(out_dir: &Path) -> Result<(), AdapterError> {
    match tokio::fs::remove_dir_all(out_dir).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            return Err(AdapterError::Io {
                path: out_dir.to_path_buf(),
                source: e,
            });
        }
        _ => {}
    }
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|source| AdapterError::Io {
            path: out_dir.to_path_buf(),
            source,
        })
}

/// 生成 jsonjsdb 站点
///
/// 所有相对路径以 `working_dir`（默认当前目录）为基准，
/// 配置中的 `outDir` 与 `dbMetaPath` 再以 `appPath` 为基准
///
/// # 参数
///
/// * `use_case` - 静态站点生成用例
/// * `config_path` - JSON 配置文件路径
/// * `working_dir` - 可选的工作目录
///
/// # 返回值
///
/// * `Ok(RunReport)` - 运行报告
/// * `Err(AdapterError::ConfigUnavailable)` - 配置无法加载
/// * `Err(AdapterError)` - 目录准备、路由发现或生成失败
pub async fn generate_jsonjsdb_static_site<L>(
    use_case: &GenerateSiteUseCase<L>,
    config_path: &Path,
    working_dir: Option<&Path>,
) -> Result<RunReport, AdapterError>
where
    L: BrowserLauncher + 'static,
{
    let base = working_dir.unwrap_or_else(|| Path::new("."));

    let Some(config) = load_ssg_config(&base.join(config_path)).await else {
        error!("Failed to load configuration");
        return Err(AdapterError::ConfigUnavailable);
    };

    let app_root = base.join(&config.app_path);
    let site = SsgConfig {
        domain: config.domain.clone(),
        port: config.port,
        app_path: app_root.clone(),
        out_dir: config.out_dir.clone(),
        index_file: None,
        entry_point: None,
        generate_sitemap: config.index_seo,
        index_seo: config.index_seo,
    };

    let out_dir = site.out_dir_path();
    reset_out_dir(&out_dir).await?;
    create_entity_dirs(&out_dir, &config.entities).await?;

    let db_meta_path = get_db_meta_path(&app_root.join(&config.db_meta_path)).await?;
    let entity_routes = get_entities_routes(&db_meta_path, &config.entities).await?;
    info!(
        "Discovered {} entity routes in {}",
        entity_routes.len(),
        db_meta_path.display()
    );

    let routes: Vec<Route> = config
        .routes
        .iter()
        .map(|route| Route::new(route.as_str()))
        .chain(entity_routes)
        .collect();

    Ok(use_case
        .execute(&routes, &site, jsonjsdb_capture_options())
        .await?)
}

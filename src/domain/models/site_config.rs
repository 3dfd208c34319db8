// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// 默认的源入口文件
pub const DEFAULT_INDEX_FILE: &str = "index.html";

/// 默认的静态模式临时入口文件
pub const DEFAULT_ENTRY_POINT: &str = "index-static-make.html";

/// 站点地图文件名
pub const SITEMAP_FILE: &str = "sitemap.xml";

/// 静态站点生成流水线配置
///
/// 所有相对路径都以 `app_path`（站点根目录）为基准解析，
/// 流水线从不修改进程的工作目录。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsgConfig {
    /// 站点域名，用于站点地图
    pub domain: String,
    /// 临时服务器监听端口
    pub port: u16,
    /// 站点根目录（构建产物所在目录）
    pub app_path: PathBuf,
    /// 输出目录，相对于站点根目录
    pub out_dir: PathBuf,
    /// 源入口文件，默认 `index.html`
    #[serde(default)]
    pub index_file: Option<PathBuf>,
    /// 静态模式临时入口文件，默认 `index-static-make.html`
    #[serde(default)]
    pub entry_point: Option<PathBuf>,
    /// 是否生成站点地图
    #[serde(default)]
    pub generate_sitemap: bool,
    /// 是否允许搜索引擎索引
    #[serde(default)]
    pub index_seo: bool,
}

impl SsgConfig {
    pub fn new(domain: impl Into<String>, port: u16, app_path: impl Into<PathBuf>) -> Self {
        Self {
            domain: domain.into(),
            port,
            app_path: app_path.into(),
            out_dir: PathBuf::from("."),
            index_file: None,
            entry_point: None,
            generate_sitemap: false,
            index_seo: false,
        }
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.app_path
    }

    pub fn index_file_path(&self) -> PathBuf {
        self.app_path.join(
            self.index_file
                .as_deref()
                .unwrap_or_else(|| Path::new(DEFAULT_INDEX_FILE)),
        )
    }

    pub fn entry_point_path(&self) -> PathBuf {
        self.app_path.join(
            self.entry_point
                .as_deref()
                .unwrap_or_else(|| Path::new(DEFAULT_ENTRY_POINT)),
        )
    }

    pub fn out_dir_path(&self) -> PathBuf {
        self.app_path.join(&self.out_dir)
    }

    pub fn sitemap_path(&self) -> PathBuf {
        self.app_path.join(SITEMAP_FILE)
    }

    /// 是否在清理之后生成站点地图
    pub fn wants_sitemap(&self) -> bool {
        self.generate_sitemap || self.index_seo
    }
}

/// jsonjsdb 站点配置（JSON 文件格式）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JsonjsdbSsgConfig {
    pub domain: String,
    pub index_seo: bool,
    pub app_path: PathBuf,
    pub out_dir: PathBuf,
    pub db_meta_path: PathBuf,
    pub port: u16,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub routes: Vec<String>,
}

/// 站点地图更新频率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChangeFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "always" => Ok(ChangeFrequency::Always),
            "hourly" => Ok(ChangeFrequency::Hourly),
            "daily" => Ok(ChangeFrequency::Daily),
            "weekly" => Ok(ChangeFrequency::Weekly),
            "monthly" => Ok(ChangeFrequency::Monthly),
            "yearly" => Ok(ChangeFrequency::Yearly),
            "never" => Ok(ChangeFrequency::Never),
            other => Err(format!("Invalid change frequency: {}", other)),
        }
    }
}

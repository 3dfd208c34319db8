// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use thiserror::Error;

use crate::engines::traits::EngineError;

/// 就绪轮询错误类型
#[derive(Error, Debug)]
pub enum ReadinessError {
    /// 在最大尝试次数内服务未就绪
    #[error("Timeout: server not ready at {url} after {attempts} attempts")]
    Timeout { url: String, attempts: u32 },

    /// HTTP 客户端构建失败
    #[error("Failed to build readiness client: {0}")]
    Client(#[from] reqwest::Error),
}

/// 静态服务器错误类型
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind static server on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Static server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("Static server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Static server did not shut down within {0:?}")]
    ShutdownTimeout(std::time::Duration),
}

/// 站点地图错误类型
#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("Failed to write sitemap: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode sitemap: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// 流水线致命错误类型
///
/// 这些错误会中止整个生成过程（资源清理之后仍会向调用方传播）
#[derive(Error, Debug)]
pub enum SsgError {
    /// 入口文件准备失败
    #[error("Failed to create index file {path}: {source}")]
    IndexFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 输出目录不可用
    #[error("Output directory {path} is not usable: {source}")]
    OutDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 端口已被占用
    #[error("Port {0} is already in use")]
    PortInUse(u16),

    #[error(transparent)]
    PortSniffer(#[from] crate::utils::port_sniffer::PortSnifferError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error(transparent)]
    Readiness(#[from] ReadinessError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Sitemap(#[from] SitemapError),

    #[error("Failed to load settings: {0}")]
    Settings(#[from] config::ConfigError),
}

/// jsonjsdb 适配器错误类型
#[derive(Error, Debug)]
pub enum AdapterError {
    /// 配置文件无法读取或解析
    #[error("Failed to load configuration")]
    ConfigUnavailable,

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 行导出文件不是合法 JSON
    #[error("Invalid row export {path}: {source}")]
    RowExport {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// 行导出文件的 JSON 不是数组
    #[error("Row export {0} is not a JSON array")]
    NotAnArray(PathBuf),

    #[error(transparent)]
    Ssg(#[from] SsgError),
}

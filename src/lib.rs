// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含静态站点生成流程的用例：流水线编排与 jsonjsdb 路由适配
pub mod application;

/// 配置模块
///
/// 处理运行时配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含路由、站点配置等核心实体以及页面捕获、站点地图等服务
pub mod domain;

/// 引擎模块
///
/// 实现无头浏览器驱动与页面会话
pub mod engines;

/// 基础设施模块
///
/// 提供临时静态文件服务器
pub mod infrastructure;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了静态站点生成的核心实体，包括：
/// - 路由（route）：一个需要被预渲染的逻辑页面路径
/// - 捕获任务（capture）：有序的路由序列、单页捕获结果与运行报告
/// - 站点配置（site_config）：流水线配置与 jsonjsdb 站点配置
pub mod capture;
pub mod route;
pub mod site_config;

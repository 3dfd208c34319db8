// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含静态站点生成的核心逻辑，包括：
/// - 领域模型（models）：路由、捕获任务、站点配置等实体
/// - 服务（services）：入口文件准备、页面捕获、站点地图生成
///
/// 领域层只依赖于引擎层定义的浏览器页面抽象，
/// 不直接依赖具体的浏览器实现。
pub mod models;
pub mod services;

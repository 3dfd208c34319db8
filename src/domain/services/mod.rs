// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含静态站点生成的核心业务逻辑：
/// - 入口文件服务（index_file_service）：生成静态模式入口文档
/// - 捕获服务（capture_service）：逐路由导航、等待、提取并写出HTML
/// - 站点地图服务（sitemap_service）：按路由深度计算优先级并生成 sitemap.xml
pub mod capture_service;
pub mod index_file_service;
pub mod sitemap_service;

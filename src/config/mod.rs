// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理运行时配置设置，包括临时服务器、浏览器、页面捕获和站点地图等配置
pub mod settings;

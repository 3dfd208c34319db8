// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施模块
///
/// 提供外部服务集成：为浏览器提供构建产物的临时静态服务器
pub mod static_server;

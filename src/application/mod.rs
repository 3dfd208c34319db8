// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 编排领域服务、浏览器引擎与基础设施，完成一次完整的静态站点生成
pub mod use_cases;

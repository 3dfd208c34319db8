// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 用例模块
///
/// - 站点生成（generate_site）：流水线编排，保证资源在任何情况下都被释放
/// - jsonjsdb 站点（jsonjsdb_site）：从实体行导出发现路由并委托给站点生成
pub mod generate_site;
pub mod jsonjsdb_site;

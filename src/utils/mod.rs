// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
/// 包括错误类型、端口嗅探、就绪轮询和日志初始化
pub mod errors;
pub mod port_sniffer;
pub mod readiness;
pub mod telemetry;

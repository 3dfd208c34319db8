// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::net::TcpListener;
use thiserror::Error;
use tracing::{info, warn};

/// 向后嗅探的最大端口数量
const MAX_PORT_SPAN: u16 = 100;

/// 端口嗅探错误类型
#[derive(Error, Debug)]
pub enum PortSnifferError {
    #[error("Port {0} is out of range")]
    PortOutOfRange(u16),
    #[error("No available port in range {start}-{end}")]
    NoAvailablePort { start: u16, end: u16 },
}

/// 端口嗅探器
///
/// 临时服务器在运行期间独占其端口，启动前先确认端口可用
pub struct PortSniffer;

impl PortSniffer {
    /// 检查指定端口是否已被占用
    ///
    /// # 参数
    ///
    /// * `host` - 要检查的监听地址
    /// * `port` - 要检查的端口号
    ///
    /// # 返回值
    ///
    /// * `bool` - 如果端口已被占用返回 true，否则返回 false
    pub fn is_port_in_use(host: &str, port: u16) -> bool {
        TcpListener::bind((host, port)).is_err()
    }

    /// 查找可用端口
    ///
    /// 如果指定端口被占用，则依次尝试后续端口，最多尝试 100 个
    ///
    /// # 参数
    ///
    /// * `host` - 监听地址
    /// * `start_port` - 起始端口号
    ///
    /// # 返回值
    ///
    /// * `Result<u16, PortSnifferError>` - 可用端口或错误
    pub fn find_available_port(host: &str, start_port: u16) -> Result<u16, PortSnifferError> {
        let end_port = start_port.saturating_add(MAX_PORT_SPAN);
        let mut current_port = start_port;

        loop {
            if !Self::is_port_in_use(host, current_port) {
                if current_port != start_port {
                    info!("Port {} busy, using {} instead", start_port, current_port);
                }
                return Ok(current_port);
            }

            warn!("Port {} is already in use, trying next port...", current_port);

            if current_port == u16::MAX {
                return Err(PortSnifferError::PortOutOfRange(current_port));
            }
            if current_port >= end_port {
                return Err(PortSnifferError::NoAvailablePort {
                    start: start_port,
                    end: end_port,
                });
            }
            current_port += 1;
        }
    }
}

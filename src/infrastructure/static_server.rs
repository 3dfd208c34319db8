// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::utils::errors::ServerError;

/// 等待服务器优雅关闭的最长时间
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// 临时静态服务器句柄
///
/// 由流水线独占持有，`stop_server` 消费该句柄后端口即被释放
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// 服务器根地址，例如 `http://127.0.0.1:3000`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// 构建单页应用路由
///
/// 存在的静态文件按原样返回；其余任何路径（包括 `/`）都返回入口文件，
/// 客户端路由完全在浏览器中解析
pub fn spa_router(root: &Path, entry_file: &Path) -> Router {
    let static_files = ServeDir::new(root)
        .append_index_html_on_directories(false)
        .fallback(ServeFile::new(entry_file));

    Router::new()
        .route_service("/", ServeFile::new(entry_file))
        .fallback_service(static_files)
}

/// 启动临时静态服务器
///
/// # 参数
///
/// * `root` - 静态文件根目录
/// * `entry_file` - 入口HTML文件
/// * `host` - 监听地址
/// * `port` - 监听端口
///
/// # 返回值
///
/// * `Ok(ServerHandle)` - 已在监听的服务器
/// * `Err(ServerError)` - 绑定失败
pub async fn start_server(
    root: &Path,
    entry_file: &Path,
    host: &str,
    port: u16,
) -> Result<ServerHandle, ServerError> {
    let bind_addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: bind_addr.clone(),
            source,
        })?;
    let addr = listener.local_addr()?;

    let app = spa_router(root, entry_file);
    let (shutdown, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    info!("⚡ Static server on http://{}", addr);

    Ok(ServerHandle {
        addr,
        shutdown,
        task,
    })
}

/// 停止临时静态服务器
///
/// 关闭监听并等待服务任务结束
pub async fn stop_server(handle: ServerHandle) -> Result<(), ServerError> {
    let ServerHandle {
        shutdown, mut task, ..
    } = handle;

    // The receiver only disappears if the server task already ended
    let _ = shutdown.send(());

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut task).await {
        Ok(joined) => {
            joined??;
            Ok(())
        }
        Err(_) => {
            task.abort();
            Err(ServerError::ShutdownTimeout(SHUTDOWN_TIMEOUT))
        }
    }
}

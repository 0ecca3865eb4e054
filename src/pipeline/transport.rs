//! Transport 定义与默认实现
//!
//! Transport 是管道的终端能力：把请求真正发送到网络并换回响应。
//! 默认实现委托给 reqwest，可整体替换（注入 mock 或自定义客户端）

use async_trait::async_trait;

use crate::error::Error;
use crate::request::Request;

/// 管道响应类型，直接采用 reqwest 的响应
pub type Response = reqwest::Response;

/// 终端能力：执行真正的网络调用
///
/// Transport 层的错误原样透传，不在核心内重试
#[async_trait]
pub trait Transport: Send + Sync {
    /// 发送请求并返回响应
    async fn send(&self, request: &mut Request) -> Result<Response, Error>;
}

/// 默认 Transport，委托给 `reqwest::Client`
///
/// Client 内部可安全共享，同一 Transport 可被并发的管道执行复用。
/// 需要共享连接池时由调用方显式传入 Client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// 使用调用方提供的 Client 构造
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &mut Request) -> Result<Response, Error> {
        let raw = request.assemble()?;
        tracing::debug!(method = %raw.method(), url = %raw.url(), "sending request");
        self.client.execute(raw).await.map_err(Error::Transport)
    }
}

//! 请求处理管道
//!
//! 把请求依次交给有序的步骤列表处理，最终由 Transport 发出：
//!
//! ```text
//! Request ──> [Step 1] ──> [Step 2] ──> ... ──> [Transport] ──> 网络
//!               │             │                      │
//!               └──── 响应沿原路逐层回卷（洋葱模型）───┘
//! ```
//!
//! 管道构造后不可变，可在并发的 `execute` 调用间复用；
//! 执行帧逐调用重建，调用之间不共享可变状态

pub mod step;
pub mod transport;

pub use step::{step_fn, Next, PipelineStep, StepFn, StepResult};
pub use transport::{HttpTransport, Response, Transport};

use std::sync::Arc;

use crate::error::Error;
use crate::request::Request;

/// 请求处理管道
///
/// 由有序步骤列表与一个 Transport 组成。`Default` 构造的管道没有
/// Transport，执行时报错；常规入口是 [`Pipeline::builder`]
#[derive(Default, Clone)]
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    transport: Option<Arc<dyn Transport>>,
}

impl Pipeline {
    /// 创建管道构造器
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// 执行管道
    ///
    /// 步骤按配置顺序进入、按逆序退出；任何步骤短路（返回响应或
    /// 错误）后，其后的步骤不再执行。步骤既未转发也未产生结果时
    /// 立即以协议违规失败，不让空响应向下游扩散
    pub async fn execute(&self, request: &mut Request) -> Result<Response, Error> {
        let transport = self.transport.as_deref().ok_or(Error::TransportNotSet)?;
        let next = Next::new(&self.steps, transport);
        match next.run(request).await {
            Ok(Some(response)) => Ok(response),
            Ok(None) => Err(Error::StepContract),
            Err(e) => Err(e),
        }
    }
}

/// 管道构造器
#[derive(Default)]
pub struct PipelineBuilder {
    steps: Vec<Arc<dyn PipelineStep>>,
    transport: Option<Arc<dyn Transport>>,
}

impl PipelineBuilder {
    /// 追加一个步骤
    ///
    /// 步骤按追加顺序执行，没有优先级或重排序
    pub fn step(mut self, step: impl PipelineStep + 'static) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    /// 追加一组步骤
    pub fn steps(mut self, steps: impl IntoIterator<Item = Arc<dyn PipelineStep>>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// 设置自定义 Transport
    ///
    /// 注入 mock、或需要共享 `reqwest::Client` 连接池时使用
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// 构造管道
    ///
    /// 未显式设置 Transport 时，构造一个包装新 `reqwest::Client` 的
    /// 默认 [`HttpTransport`]；Client 构造失败按配置错误处理
    pub fn build(self) -> Result<Pipeline, Error> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let client = reqwest::Client::builder()
                    .build()
                    .map_err(|e| Error::Config(format!("默认 HTTP 客户端构造失败: {e}")))?;
                Arc::new(HttpTransport::new(client)) as Arc<dyn Transport>
            }
        };
        Ok(Pipeline {
            steps: self.steps,
            transport: Some(transport),
        })
    }
}

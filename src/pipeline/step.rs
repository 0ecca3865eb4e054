//! 管道步骤 trait 定义
//!
//! 步骤是管道中的一个中间件单元：可以检查或修改请求、决定是否转发、
//! 并在响应回卷时做后处理

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::Error;
use crate::pipeline::transport::{Response, Transport};
use crate::request::Request;

/// 步骤执行结果
///
/// - `Ok(Some(response))`：转发得到的结果，或短路响应
/// - `Ok(None)`：步骤既未转发也未产生响应，管道按协议违规处理
/// - `Err(e)`：短路错误，立即沿管道向外传播
pub type StepResult = Result<Option<Response>, Error>;

/// 管道步骤 trait
///
/// 步骤必须二选一：
/// - 调用 `next.run(request)` 恰好一次并返回其结果（转发前后均可
///   检查或修改请求/响应）
/// - 不调用 next，直接返回响应或错误完成短路
///
/// 重试是唯一的例外：`Next` 实现了 `Copy`，允许步骤刻意再次转发，
/// 请求体会在每次 assemble 时回卷重放
#[async_trait]
pub trait PipelineStep: Send + Sync {
    /// 执行步骤
    async fn handle(&self, request: &mut Request, next: Next<'_>) -> StepResult;

    /// 步骤名称（用于日志）
    fn name(&self) -> &str {
        "step"
    }
}

/// 指向管道剩余部分的游标
///
/// 每次 `execute` 都重新构造，调用间不共享任何可变状态
#[derive(Clone, Copy)]
pub struct Next<'a> {
    steps: &'a [Arc<dyn PipelineStep>],
    transport: &'a dyn Transport,
}

impl<'a> Next<'a> {
    pub(crate) fn new(steps: &'a [Arc<dyn PipelineStep>], transport: &'a dyn Transport) -> Self {
        Self { steps, transport }
    }

    /// 继续执行管道的剩余部分
    ///
    /// 步骤严格按配置顺序执行，走完所有步骤后到达 Transport。
    /// 首个配置的步骤最先进入、最后退出（洋葱模型）
    pub async fn run(mut self, request: &mut Request) -> StepResult {
        match self.steps.split_first() {
            Some((step, rest)) => {
                self.steps = rest;
                tracing::trace!(step = step.name(), "entering pipeline step");
                step.handle(request, self).await
            }
            None => self.transport.send(request).await.map(Some),
        }
    }
}

/// 函数形式的步骤适配器
///
/// 允许普通函数充当 PipelineStep：
///
/// ```ignore
/// fn logging<'a>(req: &'a mut Request, next: Next<'a>) -> BoxFuture<'a, StepResult> {
///     Box::pin(async move {
///         tracing::debug!(url = %req.url(), "request entering");
///         next.run(req).await
///     })
/// }
///
/// let pipeline = Pipeline::builder().step(step_fn(logging)).build()?;
/// ```
pub fn step_fn<F>(f: F) -> StepFn<F>
where
    F: for<'a> Fn(&'a mut Request, Next<'a>) -> BoxFuture<'a, StepResult> + Send + Sync,
{
    StepFn { f }
}

/// `step_fn` 的返回类型
pub struct StepFn<F> {
    f: F,
}

#[async_trait]
impl<F> PipelineStep for StepFn<F>
where
    F: for<'a> Fn(&'a mut Request, Next<'a>) -> BoxFuture<'a, StepResult> + Send + Sync,
{
    async fn handle(&self, request: &mut Request, next: Next<'_>) -> StepResult {
        (self.f)(request, next).await
    }

    fn name(&self) -> &str {
        "step_fn"
    }
}

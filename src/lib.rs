//! HTTP 请求管道与 SSE 流式事件解码核心库
//!
//! # 架构设计
//!
//! ```text
//! 请求方向：
//! Request ──> [Step 1] ──> [Step 2] ──> ... ──> [Transport] ──> 网络
//!               └────────── 洋葱模型，响应逐层回卷 ──────────┘
//!
//! 流方向：
//! 响应字节流 ──> [有界行读取] ──> [字段累积] ──> 事件记录 ──> range() ──> Stream<T>
//! ```
//!
//! # 模块结构
//!
//! - `request`: 请求构造、可回卷请求体与 Header 管理
//! - `pipeline`: 步骤组合与执行，Transport 收尾
//! - `seq`: 拉取式、可取消的惰性序列抽象
//! - `sse`: SSE 事件流解码
//!
//! # 使用示例
//!
//! ```ignore
//! use pipecast::{Pipeline, Request, SseRecord, SseField};
//! use tokio_util::sync::CancellationToken;
//! use futures::StreamExt;
//!
//! let pipeline = Pipeline::builder().build()?;
//! let mut req = Request::new(reqwest::Method::GET, "https://api.example.com/stream")?;
//! let resp = pipeline.execute(&mut req).await?;
//!
//! let decoder = pipecast::decode_response::<ChatEvent>(resp, Some("[DONE]"));
//! let mut events = std::pin::pin!(pipecast::range(CancellationToken::new(), decoder));
//! while let Some(event) = events.next().await {
//!     // 逐条消费事件记录
//! }
//! ```

pub mod error;
pub mod pipeline;
pub mod request;
pub mod seq;
pub mod sse;

pub use error::{Error, StreamError};
pub use pipeline::{
    step_fn, HttpTransport, Next, Pipeline, PipelineBuilder, PipelineStep, Response, StepFn,
    StepResult, Transport,
};
pub use request::json::marshal_as_json;
pub use request::{AuthScheme, Body, BodySource, Request};
pub use seq::{lines, range, select, LineIter, SeqIter};
pub use sse::{decode_response, SseDecoder, SseField, SseRecord};

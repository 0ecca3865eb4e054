//! 错误类型定义
//!
//! 定义请求构造、管道执行与流式解码过程中可能发生的错误

use thiserror::Error;

/// 管道错误
///
/// 覆盖请求构造、管道配置与执行过程中的所有失败场景。
/// 所有错误直接传播给调用方，核心内部不做任何重试
#[derive(Error, Debug)]
pub enum Error {
    /// 管道配置失败
    #[error("管道配置失败: {0}")]
    Config(String),

    /// 未设置 Transport
    #[error("管道未设置 Transport")]
    TransportNotSet,

    /// 步骤违反转发协议
    #[error("步骤违反转发协议: 既未调用 next 也未返回响应或错误")]
    StepContract,

    /// 请求体错误（测量或回卷失败）
    #[error("请求体错误: {0}")]
    Body(String),

    /// 请求 URL 无效
    #[error("请求 URL 无效: {0}")]
    InvalidUrl(String),

    /// Header 值无效
    #[error("Header 值无效: {0}")]
    Header(String),

    /// JSON 序列化失败
    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport 层错误（原样透传）
    #[error("Transport 错误: {0}")]
    Transport(#[from] reqwest::Error),
}

/// 流式解码错误
///
/// 解码器一旦遇到此类错误即终止，不会在流中间尝试重新同步。
/// 正常耗尽（流结束或命中终止哨兵）不是错误，
/// 通过迭代器的 `err()` 返回 `None` 与真实失败区分
#[derive(Error, Debug)]
pub enum StreamError {
    /// 单行读取尝试次数超限
    #[error("读取单行尝试次数过多")]
    LineTooLong,

    /// 底层流读取失败
    #[error("流读取失败: {0}")]
    Read(#[from] std::io::Error),
}

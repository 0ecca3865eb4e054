//! 前向迭代器契约与行迭代器
//!
//! 三操作协议：
//! - `advance`：尝试产生下一个元素，耗尽或出错时返回 false
//! - `current`：仅在 `advance` 返回 true 之后有效
//! - `err`：`advance` 返回 false 后查询；`None` 表示正常耗尽，
//!   `Some` 表示序列因失败而停止

use async_trait::async_trait;
use tokio::io::AsyncBufRead;

use crate::error::StreamError;
use crate::sse::line::read_line;

/// 前向迭代器契约
///
/// 拉取式消费流式或解码数据，一次一个元素，不做任何预读缓冲
#[async_trait]
pub trait SeqIter: Send {
    type Item: Send;

    /// 推进到下一个元素
    async fn advance(&mut self) -> bool;

    /// 当前元素，仅在 `advance` 成功后有效
    fn current(&self) -> Option<&Self::Item>;

    /// 导致迭代停止的错误；正常耗尽时为 `None`
    fn err(&self) -> Option<&StreamError>;
}

/// 按行迭代文本流
///
/// [`SeqIter`] 的独立实现之一，与 SSE 解码器平级，互不继承。
/// 底层使用同一套有界行读取：缺失终止符的流不会无限累积，
/// 超限以 [`StreamError::LineTooLong`] 终止迭代
pub struct LineIter<R> {
    reader: R,
    current: Option<String>,
    err: Option<StreamError>,
}

impl<R: AsyncBufRead + Unpin + Send> LineIter<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            current: None,
            err: None,
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> SeqIter for LineIter<R> {
    type Item = String;

    async fn advance(&mut self) -> bool {
        if self.err.is_some() {
            return false;
        }
        match read_line(&mut self.reader).await {
            Ok(Some(line)) => {
                self.current = Some(String::from_utf8_lossy(&line).into_owned());
                true
            }
            Ok(None) => {
                self.current = None;
                false
            }
            Err(e) => {
                self.current = None;
                self.err = Some(e);
                false
            }
        }
    }

    fn current(&self) -> Option<&String> {
        self.current.as_ref()
    }

    fn err(&self) -> Option<&StreamError> {
        self.err.as_ref()
    }
}

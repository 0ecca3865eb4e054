//! 惰性序列适配
//!
//! 将 [`SeqIter`] 转换为可取消的 `futures::Stream`：拉取式、
//! 逐元素、除当前元素外不做任何缓冲

use futures::{Stream, StreamExt};
use tokio::io::AsyncBufRead;
use tokio_util::sync::CancellationToken;

use crate::seq::iter::{LineIter, SeqIter};

/// 将迭代器转换为惰性序列
///
/// 每拉取一个元素之前先检查取消令牌（协作式取消，在元素之间检查，
/// 已阻塞在底层读取上的 advance 不会被此机制打断，需要底层源自身
/// 支持取消）。`advance` 返回 false 时查询 `err()`：正常耗尽静默
/// 结束，真实错误记录日志后结束。消费方提前放弃拉取时序列直接
/// 结束，不再触碰迭代器。元素严格按到达顺序产出
pub fn range<I>(cancel: CancellationToken, mut iter: I) -> impl Stream<Item = I::Item>
where
    I: SeqIter,
    I::Item: Clone,
{
    async_stream::stream! {
        loop {
            if cancel.is_cancelled() {
                return;
            }
            if !iter.advance().await {
                if let Some(err) = iter.err() {
                    tracing::warn!(error = %err, "sequence stopped on iteration error");
                }
                return;
            }
            if let Some(item) = iter.current() {
                yield item.clone();
            } else {
                return;
            }
        }
    }
}

/// 对序列逐元素应用纯函数变换
///
/// 惰性执行，保持源序列的有限性与取消行为
pub fn select<S, T, V>(seq: S, apply: impl FnMut(T) -> V) -> impl Stream<Item = V>
where
    S: Stream<Item = T>,
{
    seq.map(apply)
}

/// 按行读取的惰性序列便捷入口
pub fn lines<R>(cancel: CancellationToken, reader: R) -> impl Stream<Item = String>
where
    R: AsyncBufRead + Unpin + Send,
{
    range(cancel, LineIter::new(reader))
}

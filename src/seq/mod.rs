//! 惰性序列抽象
//!
//! 拉取式、可取消的流式消费：[`SeqIter`] 定义三操作迭代契约，
//! [`range`] 把它适配为 `futures::Stream`，[`select`] 做惰性变换

pub mod iter;
pub mod range;

pub use iter::{LineIter, SeqIter};
pub use range::{lines, range, select};

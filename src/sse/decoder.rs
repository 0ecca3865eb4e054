//! SSE 事件解码器
//!
//! 从字节流中按行累积命名字段，在空行边界物化为一条事件记录：
//!
//! ```text
//! 字节流 ──> [有界行读取] ──> name: value 累积 ──> 空行 ──> 记录
//! ```
//!
//! 字段表在解码器构造时物化一次，对整条流复用；表中的名字即识别
//! 白名单，表外字段被静默跳过。可配置的终止哨兵值（如 `[DONE]`）
//! 命中后解码器立即耗尽，与哪个字段携带它无关

use std::collections::HashMap;
use std::io;

use async_trait::async_trait;
use futures::TryStreamExt;
use tokio::io::{AsyncBufRead, BufReader};
use tokio_util::io::StreamReader;

use crate::error::StreamError;
use crate::pipeline::Response;
use crate::seq::SeqIter;
use crate::sse::line::{read_line, LINE_BUFFER_SIZE};

/// 记录字段的写入方式
enum FieldSlot<T> {
    /// 文本字段
    Text(fn(&mut T, String)),
    /// 原始字节字段
    Bytes(fn(&mut T, Vec<u8>)),
    /// 已识别但不支持的字段种类，物化时跳过并记录日志
    Unsupported,
}

/// 单个字段绑定：线上字段名到记录槽位
///
/// 需要别名时直接在表里写线上用的名字（等价于字段名覆盖）
pub struct SseField<T> {
    name: &'static str,
    slot: FieldSlot<T>,
}

impl<T> SseField<T> {
    /// 文本字段绑定
    pub fn text(name: &'static str, set: fn(&mut T, String)) -> Self {
        Self {
            name,
            slot: FieldSlot::Text(set),
        }
    }

    /// 原始字节字段绑定
    pub fn bytes(name: &'static str, set: fn(&mut T, Vec<u8>)) -> Self {
        Self {
            name,
            slot: FieldSlot::Bytes(set),
        }
    }

    /// 已识别但无法映射的字段
    ///
    /// 物化时不是硬错误：记一条日志后跳过（刻意的宽容策略）
    pub fn unsupported(name: &'static str) -> Self {
        Self {
            name,
            slot: FieldSlot::Unsupported,
        }
    }

    /// 线上字段名
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, record: &mut T, value: Vec<u8>) {
        match self.slot {
            FieldSlot::Text(set) => set(record, String::from_utf8_lossy(&value).into_owned()),
            FieldSlot::Bytes(set) => set(record, value),
            FieldSlot::Unsupported => {
                tracing::warn!(field = self.name, "unsupported field kind, skipping");
            }
        }
    }
}

/// 事件记录绑定
///
/// 实现方声明一张线上字段名到槽位的静态映射表：
///
/// ```ignore
/// #[derive(Debug, Default, Clone)]
/// struct ChatEvent {
///     event: String,
///     data: Vec<u8>,
/// }
///
/// impl SseRecord for ChatEvent {
///     fn fields() -> Vec<SseField<Self>> {
///         vec![
///             SseField::text("event", |r, v| r.event = v),
///             SseField::bytes("data", |r, v| r.data = v),
///         ]
///     }
/// }
/// ```
pub trait SseRecord: Default + Clone + Send + 'static {
    /// 字段绑定表，解码器构造时调用一次
    fn fields() -> Vec<SseField<Self>>;
}

/// SSE 解码器
///
/// [`SeqIter`] 的实现之一，每次 `advance` 产出一条事件记录。
/// 读错误与行超长都是终端性的：解码器不会在流中间重新同步
pub struct SseDecoder<T, R> {
    reader: R,
    fields: Vec<SseField<T>>,
    end_token: Option<String>,
    done: bool,
    current: Option<T>,
    err: Option<StreamError>,
}

impl<T, R> SseDecoder<T, R>
where
    T: SseRecord,
    R: AsyncBufRead + Unpin + Send,
{
    /// 用缓冲字节流构造解码器
    ///
    /// `end_token` 是流级终止哨兵：任何白名单字段的值与之完全相等
    /// 时，解码器立即耗尽，不再产生任何记录
    pub fn new(reader: R, end_token: Option<&str>) -> Self {
        Self {
            reader,
            fields: T::fields(),
            end_token: end_token.map(str::to_owned),
            done: false,
            current: None,
            err: None,
        }
    }

    /// 按白名单（大小写不敏感）查找字段槽位
    fn lookup(&self, name: &[u8]) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name.as_bytes().eq_ignore_ascii_case(name))
    }
}

/// 将 HTTP 响应体包装为 SSE 解码器
///
/// 桥接 `Response::bytes_stream()` 到缓冲读取
pub fn decode_response<T: SseRecord>(
    response: Response,
    end_token: Option<&str>,
) -> SseDecoder<T, impl AsyncBufRead + Unpin + Send> {
    let stream = Box::pin(
        response
            .bytes_stream()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e)),
    );
    let reader = BufReader::with_capacity(LINE_BUFFER_SIZE, StreamReader::new(stream));
    SseDecoder::new(reader, end_token)
}

#[async_trait]
impl<T, R> SeqIter for SseDecoder<T, R>
where
    T: SseRecord,
    R: AsyncBufRead + Unpin + Send,
{
    type Item = T;

    async fn advance(&mut self) -> bool {
        if self.done || self.err.is_some() {
            return false;
        }
        self.current = None;

        // 槽位下标 -> 按到达顺序拼接的原始字节
        let mut raw: HashMap<usize, Vec<u8>> = HashMap::new();

        loop {
            let line = match read_line(&mut self.reader).await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    // 流结束：残留字段物化为最后一条记录
                    self.done = true;
                    break;
                }
                Err(e) => {
                    self.err = Some(e);
                    return false;
                }
            };

            if line.is_empty() {
                // 空行是记录边界；尚未累积到字段时跳过，继续读下一条记录
                if raw.is_empty() {
                    continue;
                }
                break;
            }

            let (name, value) = split_field(&line);
            let Some(index) = self.lookup(name) else {
                // 白名单之外的字段直接跳过
                continue;
            };

            if let Some(token) = &self.end_token {
                if value == token.as_bytes() {
                    // 命中终止哨兵：立即耗尽，丢弃未完成的累积
                    self.done = true;
                    return false;
                }
            }

            raw.entry(index).or_default().extend_from_slice(value);
        }

        if raw.is_empty() {
            return false;
        }

        let mut record = T::default();
        for (index, value) in raw {
            self.fields[index].apply(&mut record, value);
        }
        self.current = Some(record);
        true
    }

    fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    fn err(&self) -> Option<&StreamError> {
        self.err.as_ref()
    }
}

/// 在首个冒号处拆分字段名与值
///
/// 值的单个前导空格按行格式约定剥除；没有冒号时整行作为字段名
fn split_field(line: &[u8]) -> (&[u8], &[u8]) {
    let (name, value) = match line.iter().position(|&b| b == b':') {
        Some(pos) => (&line[..pos], &line[pos + 1..]),
        None => (line, &[][..]),
    };
    let value = match value.first() {
        Some(b' ') => &value[1..],
        _ => value,
    };
    (name, value)
}

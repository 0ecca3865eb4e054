//! SSE 事件流解码
//!
//! # 模块结构
//!
//! - `line`: 有界逻辑行读取（分片重组 + 超长保护）
//! - `decoder`: 字段累积与记录物化

pub(crate) mod line;

pub mod decoder;

pub use decoder::{decode_response, SseDecoder, SseField, SseRecord};

//! 有界逻辑行读取
//!
//! 从缓冲字节流中读取一个逻辑行，透明地重组超过缓冲区长度的物理
//! 分片。失败保护：尝试次数超限即判定行超长并终止，避免对抗性或
//! 损坏的流造成无界内存增长

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::StreamError;

/// 默认读缓冲区大小
pub(crate) const LINE_BUFFER_SIZE: usize = 4096;

/// 单行读取的尝试次数上限
const MAX_LINE_ATTEMPTS: usize = 100;

/// 未找到行终止符的尝试按 5 次计
const NO_TERMINATOR_COST: usize = 5;

/// 读取一个逻辑行（不含终止符）
///
/// 终止符为 `\n`，一个紧邻的 `\r` 被一并剥除（容忍 CRLF）。
/// 返回 `Ok(None)` 表示流干净结束；流在无尾部换行的情况下结束时，
/// 残留的累积内容作为最后一行返回
pub(crate) async fn read_line<R>(reader: &mut R) -> Result<Option<Vec<u8>>, StreamError>
where
    R: AsyncBufRead + Unpin + Send,
{
    let mut overflow: Vec<u8> = Vec::new();
    let mut attempts = 0;

    while attempts < MAX_LINE_ATTEMPTS {
        let (found, consumed) = {
            let chunk = reader.fill_buf().await?;
            if chunk.is_empty() {
                // 底层流结束
                if overflow.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(strip_cr(overflow)));
            }
            match chunk.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    overflow.extend_from_slice(&chunk[..pos]);
                    (true, pos + 1)
                }
                None => {
                    overflow.extend_from_slice(chunk);
                    (false, chunk.len())
                }
            }
        };
        reader.consume(consumed);
        if found {
            return Ok(Some(strip_cr(overflow)));
        }
        attempts += NO_TERMINATOR_COST;
    }

    Err(StreamError::LineTooLong)
}

fn strip_cr(mut line: Vec<u8>) -> Vec<u8> {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_read_line_simple() {
        let mut reader: &[u8] = b"hello\nworld\n";
        assert_eq!(read_line(&mut reader).await.unwrap().unwrap(), b"hello");
        assert_eq!(read_line(&mut reader).await.unwrap().unwrap(), b"world");
        assert!(read_line(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_line_strips_crlf() {
        let mut reader: &[u8] = b"hello\r\nworld\r\n";
        assert_eq!(read_line(&mut reader).await.unwrap().unwrap(), b"hello");
        assert_eq!(read_line(&mut reader).await.unwrap().unwrap(), b"world");
    }

    #[tokio::test]
    async fn test_read_line_final_unterminated() {
        let mut reader: &[u8] = b"no newline";
        assert_eq!(read_line(&mut reader).await.unwrap().unwrap(), b"no newline");
        assert!(read_line(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_line_reassembles_fragments() {
        // 缓冲区远小于行长，需要多次重组
        let line = "x".repeat(50);
        let input = format!("{line}\nrest\n");
        let mut reader = BufReader::with_capacity(8, input.as_bytes());

        assert_eq!(
            read_line(&mut reader).await.unwrap().unwrap(),
            line.as_bytes()
        );
        assert_eq!(read_line(&mut reader).await.unwrap().unwrap(), b"rest");
    }

    #[tokio::test]
    async fn test_read_line_too_long() {
        // 每次未找到终止符计 5 次，8 字节缓冲下 20 次未命中即超限
        let input = "y".repeat(4096);
        let mut reader = BufReader::with_capacity(8, input.as_bytes());

        let err = read_line(&mut reader).await.unwrap_err();
        assert!(matches!(err, StreamError::LineTooLong));
    }

    proptest! {
        #[test]
        fn prop_read_line_reassembles(lines in proptest::collection::vec("[a-z0-9 ]{0,100}", 0..20)) {
            let input = lines.join("\n");
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            rt.block_on(async {
                let mut reader = BufReader::with_capacity(16, input.as_bytes());
                let mut got = Vec::new();
                while let Some(line) = read_line(&mut reader).await.unwrap() {
                    got.push(String::from_utf8(line).unwrap());
                }
                // 结尾的空行没有终止符，不会作为一行返回
                let mut expected = lines.clone();
                if expected.last().map_or(false, String::is_empty) {
                    expected.pop();
                }
                assert_eq!(got, expected);
            });
        }
    }
}

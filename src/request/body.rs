//! 请求体抽象
//!
//! 请求体必须支持 Seek：Seek 到末尾测量大小，Seek 回起点支持重放。
//! 重试步骤与重定向跟随依赖重放能力

use std::io::{Read, Seek, SeekFrom};

use crate::error::Error;

/// 可回卷的请求体数据源
///
/// 任何 `Read + Seek + Send + Sync` 的类型自动满足该 trait，
/// 例如 `std::io::Cursor<Vec<u8>>` 或 `std::fs::File`
pub trait BodySource: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> BodySource for T {}

/// 请求体
///
/// 持有数据源及测量出的字节大小。请求独占请求体的生命周期，
/// 请求被 Drop 时请求体随之释放
pub struct Body {
    source: Box<dyn BodySource>,
    size: u64,
}

impl Body {
    /// 测量数据源大小并构造请求体
    ///
    /// 返回 `Ok(None)` 表示数据源为空；空请求体等价于无请求体
    pub(crate) fn measure(mut source: Box<dyn BodySource>) -> Result<Option<Self>, Error> {
        let size = source
            .seek(SeekFrom::End(0))
            .map_err(|e| Error::Body(format!("无法测量请求体大小: {e}")))?;
        if size == 0 {
            return Ok(None);
        }
        source
            .seek(SeekFrom::Start(0))
            .map_err(|e| Error::Body(format!("请求体回卷失败: {e}")))?;
        Ok(Some(Self { source, size }))
    }

    /// 请求体字节大小
    pub fn size(&self) -> u64 {
        self.size
    }

    /// 回卷到起点并读出全部内容
    ///
    /// 每次调用都从头重新读取，这正是重试步骤依赖的重放能力
    pub(crate) fn rewind_and_read(&mut self) -> Result<Vec<u8>, Error> {
        self.source
            .seek(SeekFrom::Start(0))
            .map_err(|e| Error::Body(format!("请求体回卷失败: {e}")))?;
        let mut buf = Vec::with_capacity(self.size as usize);
        self.source
            .read_to_end(&mut buf)
            .map_err(|e| Error::Body(format!("请求体读取失败: {e}")))?;
        Ok(buf)
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Body").field("size", &self.size).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_measure_sizes_and_rewinds() {
        let body = Body::measure(Box::new(Cursor::new(b"hello".to_vec())))
            .unwrap()
            .unwrap();
        assert_eq!(body.size(), 5);
    }

    #[test]
    fn test_measure_empty_is_none() {
        let body = Body::measure(Box::new(Cursor::new(Vec::new()))).unwrap();
        assert!(body.is_none());
    }

    #[test]
    fn test_rewind_and_read_is_replayable() {
        let mut body = Body::measure(Box::new(Cursor::new(b"payload".to_vec())))
            .unwrap()
            .unwrap();
        assert_eq!(body.rewind_and_read().unwrap(), b"payload");
        // 第二次读取依旧从头开始
        assert_eq!(body.rewind_and_read().unwrap(), b"payload");
    }
}

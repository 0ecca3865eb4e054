//! 请求构造与 Header 管理
//!
//! `Request` 持有方法、目标 URL、Header 与可选的可回卷请求体，
//! 并在 `assemble` 时生成可供 Transport 消费的底层请求。
//! Content-Length 与 Content-Type 跟随请求体的设置同步维护

mod body;
pub mod json;

pub use body::{Body, BodySource};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE,
};
use reqwest::Method;
use url::Url;

use crate::error::Error;

/// `application/json`
pub const CONTENT_TYPE_APP_JSON: &str = "application/json";
/// `application/xml`
pub const CONTENT_TYPE_APP_XML: &str = "application/xml";
/// `text/plain`
pub const CONTENT_TYPE_TEXT_PLAIN: &str = "text/plain";

/// 认证方案
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    Basic,
    Bearer,
    Digest,
    OAuth,
    Jwt,
}

impl AuthScheme {
    /// Authorization Header 中使用的方案名
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Basic => "Basic",
            AuthScheme::Bearer => "Bearer",
            AuthScheme::Digest => "Digest",
            AuthScheme::OAuth => "OAuth",
            AuthScheme::Jwt => "JWT",
        }
    }
}

/// HTTP 请求
///
/// URL 必须携带非空 Host 且协议为 http/https，违反即构造失败，
/// 不会拖到执行阶段才暴露
#[derive(Debug)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Body>,
}

impl Request {
    /// 构造请求并校验目标 URL
    pub fn new(method: Method, endpoint: &str) -> Result<Self, Error> {
        let url = Url::parse(endpoint).map_err(|e| Error::InvalidUrl(format!("{endpoint}: {e}")))?;
        if url.host_str().map_or(true, str::is_empty) {
            return Err(Error::InvalidUrl(format!("{endpoint}: 缺少 Host")));
        }
        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(Error::InvalidUrl(format!("不支持的协议 {scheme}")));
            }
        }
        Ok(Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    /// 请求方法
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// 目标 URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Header 多值映射
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// 当前请求体
    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// 设置请求体并同步 Content-Length / Content-Type
    ///
    /// - 数据源为空时等价于清除请求体，Content-Length 被删除
    /// - 数据源非空时回卷到起点保存，后续可反复重放
    /// - `content_type` 为空串时删除 Content-Type，否则设置之
    pub fn set_body(
        &mut self,
        source: impl BodySource + 'static,
        content_type: &str,
    ) -> Result<(), Error> {
        match Body::measure(Box::new(source))? {
            Some(body) => {
                self.headers
                    .insert(CONTENT_LENGTH, HeaderValue::from(body.size()));
                self.body = Some(body);
            }
            None => {
                self.body = None;
                self.headers.remove(CONTENT_LENGTH);
            }
        }
        if content_type.is_empty() {
            self.headers.remove(CONTENT_TYPE);
        } else {
            self.headers.insert(CONTENT_TYPE, parse_value(content_type)?);
        }
        Ok(())
    }

    /// 清除请求体及其关联 Header
    pub fn clear_body(&mut self) {
        self.body = None;
        self.headers.remove(CONTENT_LENGTH);
        self.headers.remove(CONTENT_TYPE);
    }

    /// 生成底层 reqwest 请求
    ///
    /// 请求体每次都从起点重新读取，因此同一请求可被重试步骤
    /// 反复 assemble
    pub fn assemble(&mut self) -> Result<reqwest::Request, Error> {
        let mut raw = reqwest::Request::new(self.method.clone(), self.url.clone());
        *raw.headers_mut() = self.headers.clone();
        if let Some(body) = self.body.as_mut() {
            *raw.body_mut() = Some(reqwest::Body::from(body.rewind_and_read()?));
        }
        Ok(raw)
    }

    /// 设置 Header（覆盖同名值）
    pub fn set_header(&mut self, key: HeaderName, value: &str) -> Result<(), Error> {
        let value = parse_value(value)?;
        self.headers.insert(key, value);
        Ok(())
    }

    /// 追加 Header（保留同名已有值）
    pub fn add_header(&mut self, key: HeaderName, value: &str) -> Result<(), Error> {
        let value = parse_value(value)?;
        self.headers.append(key, value);
        Ok(())
    }

    /// 删除 Header
    pub fn del_header(&mut self, key: HeaderName) {
        self.headers.remove(key);
    }

    /// 按认证方案设置 Authorization Header
    ///
    /// 例如 `set_authorization(AuthScheme::Bearer, "abc123")`
    /// 产生 `Authorization: Bearer abc123`
    pub fn set_authorization(&mut self, scheme: AuthScheme, token: &str) -> Result<(), Error> {
        self.set_header(AUTHORIZATION, &format!("{} {token}", scheme.as_str()))
    }

    /// 以 HTTP Basic Auth 设置 Authorization Header
    pub fn set_basic_auth(&mut self, username: &str, password: &str) -> Result<(), Error> {
        let credentials = BASE64.encode(format!("{username}:{password}"));
        self.set_authorization(AuthScheme::Basic, &credentials)
    }

    /// 设置 Content-Type Header
    pub fn set_content_type(&mut self, value: &str) -> Result<(), Error> {
        self.set_header(CONTENT_TYPE, value)
    }

    /// 设置 Accept Header
    pub fn set_accept(&mut self, value: &str) -> Result<(), Error> {
        self.set_header(ACCEPT, value)
    }
}

fn parse_value(value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value).map_err(|e| Error::Header(format!("{value}: {e}")))
}

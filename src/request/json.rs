//! JSON 请求体序列化

use std::io::Cursor;

use serde::Serialize;

use crate::error::Error;
use crate::request::{Request, CONTENT_TYPE_APP_JSON};

/// 将 `value` 序列化为 JSON 并安装为请求体
///
/// Content-Type 设为 `application/json`，Content-Length 跟随请求体大小
pub fn marshal_as_json<T: Serialize>(request: &mut Request, value: &T) -> Result<(), Error> {
    let bytes = serde_json::to_vec(value)?;
    request.set_body(Cursor::new(bytes), CONTENT_TYPE_APP_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
    use reqwest::Method;

    #[derive(serde::Serialize)]
    struct Payload {
        name: String,
        count: u32,
    }

    #[test]
    fn test_marshal_as_json_sets_body_and_headers() {
        let mut req = Request::new(Method::POST, "http://example.com/api").unwrap();
        let payload = Payload {
            name: "demo".to_string(),
            count: 3,
        };
        marshal_as_json(&mut req, &payload).unwrap();

        assert_eq!(
            req.headers().get(CONTENT_TYPE).unwrap(),
            CONTENT_TYPE_APP_JSON
        );
        let expected = serde_json::to_vec(&serde_json::json!({"name": "demo", "count": 3})).unwrap();
        assert_eq!(
            req.headers().get(CONTENT_LENGTH).unwrap(),
            expected.len().to_string().as_str()
        );
    }
}

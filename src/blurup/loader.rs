//! # 网络请求模块
//!
//! ## 设计思路
//!
//! 负责向图片服务发出请求、校验响应状态并读取响应体。
//! 两种读取方式：
//! - 小缩略图：完整缓冲，供 Data URL 使用
//! - 原尺寸图片：按块流式读取，交给 `DimensionProbe`，拿到宽高立即停止
//!
//! ## 实现思路
//!
//! - 每个请求都带 `Accept: image/{type}`。
//! - 403 根据 URL 是否带 `token` 区分提示；其他 `>= 400` 统一带上状态码与状态文本。
//! - 不重试、不设超时，任一失败直接向上返回。
//! - 日志中的 URL 一律去掉查询串，避免 token 泄露。

use reqwest::StatusCode;
use url::Url;

use super::dimensions::DimensionProbe;
use super::source::ThumbnailPayload;
use super::url_builder::{has_token, redact_url_for_log};
use super::{BlurUpError, BlurUpHandler, ImageDimensions};

impl BlurUpHandler {
    /// 下载小缩略图并完整缓冲。
    pub(super) async fn fetch_thumbnail(
        &self,
        url: &Url,
        image_type: &str,
    ) -> Result<ThumbnailPayload, BlurUpError> {
        let response = self.send(url, image_type).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BlurUpError::Network(format!("读取缩略图失败：{}", e.without_url())))?
            .to_vec();

        let content_type =
            content_type.unwrap_or_else(|| Self::sniff_content_type(&bytes, image_type));

        log::debug!(
            "🖼️ 缩略图下载完成 - {} bytes, content-type: {}",
            bytes.len(),
            content_type
        );

        Ok(ThumbnailPayload {
            bytes,
            content_type,
        })
    }

    /// 流式读取原尺寸图片，仅解析到宽高为止。
    pub(super) async fn fetch_source_dimensions(
        &self,
        url: &Url,
        image_type: &str,
    ) -> Result<ImageDimensions, BlurUpError> {
        let mut response = self.send(url, image_type).await?;
        let mut probe = DimensionProbe::new();

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| BlurUpError::Network(format!("读取原图数据失败：{}", e.without_url())))?
        {
            if let Some(dimensions) = probe.push(&chunk)? {
                log::debug!(
                    "📐 已解析原图尺寸 {}x{}（读取 {} bytes）",
                    dimensions.width,
                    dimensions.height,
                    probe.bytes_read()
                );
                return Ok(dimensions);
            }
        }

        probe.finish()
    }

    async fn send(&self, url: &Url, image_type: &str) -> Result<reqwest::Response, BlurUpError> {
        log::debug!("📡 请求 {}", redact_url_for_log(url));

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, format!("image/{}", image_type))
            .send()
            .await
            .map_err(Self::map_reqwest_error)?;

        // hyper 仅在服务端状态文本与标准文本不同时才保留原文
        let reason = response
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
            .map(str::to_string);

        Self::validate_response(url, response.status(), reason.as_deref())?;
        Ok(response)
    }

    /// 按状态码分类错误。
    ///
    /// `reason` 为服务端返回的状态文本，缺省时使用标准文本。
    pub(super) fn validate_response(
        url: &Url,
        status: StatusCode,
        reason: Option<&str>,
    ) -> Result<(), BlurUpError> {
        if status == StatusCode::FORBIDDEN {
            return Err(BlurUpError::Forbidden {
                token_supplied: has_token(url),
            });
        }

        if status.as_u16() >= 400 {
            return Err(BlurUpError::Http {
                status: status.as_u16(),
                status_text: reason
                    .or_else(|| status.canonical_reason())
                    .unwrap_or("Unknown")
                    .to_string(),
            });
        }

        Ok(())
    }

    /// 响应缺少 `content-type` 时按文件签名推断，再不行就用请求的类型。
    fn sniff_content_type(bytes: &[u8], image_type: &str) -> String {
        infer::get(bytes)
            .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| format!("image/{}", image_type))
    }

    fn map_reqwest_error(e: reqwest::Error) -> BlurUpError {
        let e = e.without_url();

        if e.is_connect() {
            BlurUpError::Network(format!("无法连接：{}", e))
        } else {
            BlurUpError::Network(format!("请求失败：{}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blurup::ServiceConfig;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn serve_once(
        status_line: &'static str,
        headers: &'static str,
        body: Vec<u8>,
    ) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
        let addr = listener.local_addr().expect("read local addr failed");

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept failed");

            let mut req_buf = [0u8; 2048];
            let n = stream.read(&mut req_buf).unwrap_or(0);
            let request = String::from_utf8_lossy(&req_buf[..n]).into_owned();

            let head = format!(
                "HTTP/1.1 {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n",
                status_line,
                headers,
                body.len()
            );
            stream.write_all(head.as_bytes()).expect("write headers failed");
            let _ = stream.write_all(&body);
            let _ = stream.flush();

            request
        });

        (format!("http://127.0.0.1:{}", addr.port()), server)
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
        let mut cursor = std::io::Cursor::new(Vec::new());
        img.write_to(&mut cursor, image::ImageFormat::Png)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    #[test]
    fn forbidden_with_token_blames_token() {
        let url =
            Url::parse("https://image.mux.com/abc/thumbnail.webp?token=t").expect("valid url");

        assert!(matches!(
            BlurUpHandler::validate_response(&url, StatusCode::FORBIDDEN, None),
            Err(BlurUpError::Forbidden { token_supplied: true })
        ));
    }

    #[test]
    fn forbidden_without_token_asks_for_token() {
        let url = Url::parse("https://image.mux.com/abc/thumbnail.webp").expect("valid url");
        let err = BlurUpHandler::validate_response(&url, StatusCode::FORBIDDEN, None)
            .expect_err("403 must fail");

        assert!(err.to_string().contains("may require a thumbnail token"));
    }

    #[test]
    fn other_client_and_server_errors_carry_status() {
        let url = Url::parse("https://image.mux.com/abc/thumbnail.webp").expect("valid url");

        for status in [StatusCode::NOT_FOUND, StatusCode::INTERNAL_SERVER_ERROR] {
            let err =
                BlurUpHandler::validate_response(&url, status, None).expect_err("must fail");
            assert!(err.to_string().contains(&status.as_u16().to_string()));
            assert_eq!(err.code(), "http_status");
        }

        assert!(BlurUpHandler::validate_response(&url, StatusCode::OK, None).is_ok());
        assert!(BlurUpHandler::validate_response(&url, StatusCode::NOT_MODIFIED, None).is_ok());
    }

    #[test]
    fn status_text_prefers_server_reason() {
        let url = Url::parse("https://image.mux.com/abc/thumbnail.webp").expect("valid url");
        let status = StatusCode::INTERNAL_SERVER_ERROR;

        let custom = BlurUpHandler::validate_response(&url, status, Some("Boom"))
            .expect_err("500 must fail");
        let canonical =
            BlurUpHandler::validate_response(&url, status, None).expect_err("500 must fail");
        let unregistered = StatusCode::from_u16(599).expect("valid status code");
        let unknown =
            BlurUpHandler::validate_response(&url, unregistered, None).expect_err("599 must fail");

        assert_eq!(custom.to_string(), "Error fetching thumbnail. 500: Boom");
        assert_eq!(
            canonical.to_string(),
            "Error fetching thumbnail. 500: Internal Server Error"
        );
        assert_eq!(unknown.to_string(), "Error fetching thumbnail. 599: Unknown");
    }

    #[test]
    fn sniffed_content_type_falls_back_to_requested_type() {
        assert_eq!(
            BlurUpHandler::sniff_content_type(&png_bytes(2, 2), "webp"),
            "image/png"
        );
        assert_eq!(BlurUpHandler::sniff_content_type(b"????", "webp"), "image/webp");
    }

    #[tokio::test]
    async fn custom_reason_phrase_reaches_error_message() {
        let (base, server) = serve_once("500 Boom", "", Vec::new());

        let handler = BlurUpHandler::new(ServiceConfig::with_base_url(base.clone()))
            .expect("handler init failed");
        let url = Url::parse(&format!("{}/abc/thumbnail.webp", base)).expect("valid url");

        let result = handler.fetch_thumbnail(&url, "webp").await;
        server.join().expect("server thread failed");

        match result {
            Err(BlurUpError::Http { status, status_text }) => {
                assert_eq!(status, 500);
                assert_eq!(status_text, "Boom");
            }
            other => panic!("expected http error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn thumbnail_request_sends_accept_header_and_keeps_content_type() {
        let body = png_bytes(16, 16);
        let (base, server) = serve_once("200 OK", "Content-Type: image/png\r\n", body.clone());

        let handler = BlurUpHandler::new(ServiceConfig::with_base_url(base.clone()))
            .expect("handler init failed");
        let url = Url::parse(&format!("{}/abc/thumbnail.png?width=16&height=16", base))
            .expect("valid url");

        let payload = handler.fetch_thumbnail(&url, "png").await.expect("fetch should succeed");
        let request = server.join().expect("server thread failed");

        assert_eq!(payload.bytes, body);
        assert_eq!(payload.content_type, "image/png");
        assert!(request.to_ascii_lowercase().contains("accept: image/png"));
        assert!(request.starts_with("GET /abc/thumbnail.png?width=16&height=16 "));
    }

    #[tokio::test]
    async fn source_dimensions_come_from_streamed_body() {
        let (base, server) =
            serve_once("200 OK", "Content-Type: image/png\r\n", png_bytes(320, 180));

        let handler = BlurUpHandler::new(ServiceConfig::with_base_url(base.clone()))
            .expect("handler init failed");
        let url = Url::parse(&format!("{}/abc/thumbnail.png", base)).expect("valid url");

        let dims = handler
            .fetch_source_dimensions(&url, "png")
            .await
            .expect("dimensions should resolve");
        server.join().expect("server thread failed");

        assert_eq!(dims, ImageDimensions { width: 320, height: 180 });
    }

    #[tokio::test]
    async fn source_body_without_header_is_exhaustion() {
        let (base, server) = serve_once("200 OK", "Content-Type: image/png\r\n", vec![0u8; 64]);

        let handler = BlurUpHandler::new(ServiceConfig::with_base_url(base.clone()))
            .expect("handler init failed");
        let url = Url::parse(&format!("{}/abc/thumbnail.png", base)).expect("valid url");

        let result = handler.fetch_source_dimensions(&url, "png").await;
        server.join().expect("server thread failed");

        assert!(matches!(
            result,
            Err(BlurUpError::DimensionsUnavailable { bytes_read: 64 })
        ));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind failed");
        let port = listener.local_addr().expect("read local addr failed").port();
        drop(listener);

        let handler = BlurUpHandler::with_defaults().expect("handler init failed");
        let url = Url::parse(&format!("http://127.0.0.1:{}/abc/thumbnail.webp", port))
            .expect("valid url");

        let result = handler.fetch_thumbnail(&url, "webp").await;

        assert!(matches!(result, Err(BlurUpError::Network(_))));
    }
}

//! # 请求地址构造模块
//!
//! ## 设计思路
//!
//! 把“选项 → 缩略图 URL”的映射集中在一处，并在这里完成所有前置校验，
//! 保证清晰度非法时不会产生任何网络请求。
//!
//! ## 实现思路
//!
//! - 查询参数顺序固定为 `width` / `height` / `time` / `token`。
//! - 数值按最短十进制表示输出（`16`、`24`、`17.6`），与图片服务期望的格式一致。
//! - 原尺寸请求通过克隆并删除 `width` / `height` 得到，原 URL 保持不变。

use url::Url;

use super::{BlurUpError, BlurUpOptions};

/// 构造小缩略图请求地址。
///
/// # 示例
/// ```rust
/// use blurup::{build_thumbnail_url, BlurUpOptions};
///
/// let url = build_thumbnail_url("https://image.mux.com", "abc123", &BlurUpOptions::default())?;
/// assert_eq!(
///     url.as_str(),
///     "https://image.mux.com/abc123/thumbnail.webp?width=16&height=16"
/// );
/// # Ok::<(), blurup::BlurUpError>(())
/// ```
pub fn build_thumbnail_url(
    base_url: &str,
    playback_id: &str,
    options: &BlurUpOptions,
) -> Result<Url, BlurUpError> {
    let size = options.thumbnail_size()?;

    let raw = format!(
        "{}/{}/thumbnail.{}",
        base_url.trim_end_matches('/'),
        playback_id,
        options.image_type
    );
    let mut url =
        Url::parse(&raw).map_err(|e| BlurUpError::InvalidUrl(format!("{}: {}", raw, e)))?;

    if options.time.is_some() && options.thumbnail_token.is_some() {
        log::warn!(
            "⚠️ 已设置 thumbnail token，time 参数不会生效，请将时间点编码进 token。参见 {}",
            super::error::SECURE_PLAYBACK_DOCS
        );
    }

    {
        let mut query = url.query_pairs_mut();
        let size = format_number(size);
        query.append_pair("width", &size);
        query.append_pair("height", &size);

        if let Some(time) = options.effective_time() {
            query.append_pair("time", &format_number(time));
        }

        if let Some(token) = &options.thumbnail_token {
            query.append_pair("token", token);
        }
    }

    Ok(url)
}

/// 构造原尺寸请求地址：去掉 `width` / `height`，其余参数保持原顺序。
pub fn source_url(thumbnail_url: &Url) -> Url {
    let mut source = thumbnail_url.clone();
    let retained: Vec<(String, String)> = thumbnail_url
        .query_pairs()
        .filter(|(key, _)| key != "width" && key != "height")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if retained.is_empty() {
        source.set_query(None);
    } else {
        source.query_pairs_mut().clear().extend_pairs(retained);
    }

    source
}

/// 请求地址是否携带 token，用于区分 403 的两种原因。
pub(crate) fn has_token(url: &Url) -> bool {
    url.query_pairs().any(|(key, _)| key == "token")
}

/// 日志用地址：去掉查询串与片段，避免 token 泄露到日志。
pub(crate) fn redact_url_for_log(url: &Url) -> String {
    let host = url.host_str().unwrap_or("<unknown-host>");
    let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();

    format!("{}://{}{}{}", url.scheme(), host, port, url.path())
}

/// `f64` 的 `Display` 会输出 `-0`，加 `0.0` 把负零折叠为正零。
fn format_number(value: f64) -> String {
    format!("{}", value + 0.0)
}

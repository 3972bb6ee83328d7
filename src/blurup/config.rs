//! # 配置模块
//!
//! ## 设计思路
//!
//! 配置分为两层：
//! - `ServiceConfig`：处理器级别，决定图片服务地址与请求策略，创建后不再变化。
//! - `BlurUpOptions`：单次调用级别，对应缩略图类型、模糊强度、清晰度倍数等。
//!
//! ## 实现思路
//!
//! - `Default` 提供与线上图片服务一致的默认值。
//! - “显式值覆盖默认值”通过 `with_*` 链式方法或 serde 反序列化（缺省字段走默认）完成，
//!   不做动态字段合并。
//! - `SvgLength` 兼容字符串（`"100%"`）和数字（`320`）两种尺寸写法。

use std::fmt;

use serde::Deserialize;

use super::BlurUpError;

/// 线上图片服务地址。
pub const DEFAULT_BASE_URL: &str = "https://image.mux.com";

/// 缩略图边长基数：最终宽高 = `THUMBNAIL_BASE_SIZE × quality`。
pub const THUMBNAIL_BASE_SIZE: f64 = 16.0;

/// 网络请求编排策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStrategy {
    /// 只请求小缩略图，同一份字节既用于 Data URL 也用于解析宽高。
    Single,
    /// 并发请求小缩略图与原尺寸图片，原尺寸图片仅用于测量真实宽高。
    #[default]
    Dual,
}

/// 处理器级配置。
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// 图片服务根地址，请求形如 `{base_url}/{playback_id}/thumbnail.{type}`。
    ///
    /// 在构造请求 URL 时才解析，格式错误会以 `InvalidUrl` 报出。
    pub base_url: String,
    /// 请求编排策略。
    pub strategy: FetchStrategy,
    /// 发送请求时使用的 User-Agent。
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            strategy: FetchStrategy::default(),
            user_agent: format!("blurup/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ServiceConfig {
    /// 使用自定义服务地址（主要用于测试与私有部署）。
    ///
    /// # 示例
    /// ```rust
    /// use blurup::{FetchStrategy, ServiceConfig};
    ///
    /// let config = ServiceConfig::with_base_url("http://127.0.0.1:8080")
    ///     .strategy(FetchStrategy::Single);
    /// assert_eq!(config.base_url, "http://127.0.0.1:8080");
    /// ```
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn strategy(mut self, strategy: FetchStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// SVG 容器尺寸：字符串或数字。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SvgLength {
    Number(f64),
    Text(String),
}

impl SvgLength {
    /// 与模板语义一致的“假值”判断：空字符串、0 与 NaN 都不输出属性。
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Number(n) => *n == 0.0 || n.is_nan(),
            Self::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for SvgLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for SvgLength {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SvgLength {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u32> for SvgLength {
    fn from(value: u32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<f64> for SvgLength {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// 单次调用选项。
///
/// 字段名在 JSON 中使用 camelCase（`type` / `thumbnailToken`），缺省字段取默认值。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlurUpOptions {
    /// 缩略图编码类型，如 `webp` / `png` / `jpg`。
    #[serde(rename = "type")]
    pub image_type: String,
    /// 高斯模糊标准差；为 0 时不包裹 SVG。
    pub blur: f64,
    /// 清晰度倍数，必须为有限数且 `>= 1`。
    pub quality: f64,
    /// 视频帧时间点（秒）。
    pub time: Option<f64>,
    /// 受保护资源的签名 token。
    pub thumbnail_token: Option<String>,
    /// SVG 容器宽度。
    pub width: Option<SvgLength>,
    /// SVG 容器高度。
    pub height: Option<SvgLength>,
}

impl Default for BlurUpOptions {
    fn default() -> Self {
        Self {
            image_type: "webp".to_string(),
            blur: 20.0,
            quality: 1.0,
            time: None,
            thumbnail_token: None,
            width: Some(SvgLength::from("100%")),
            height: Some(SvgLength::from("100%")),
        }
    }
}

impl BlurUpOptions {
    pub fn with_type(mut self, image_type: impl Into<String>) -> Self {
        self.image_type = image_type.into();
        self
    }

    pub fn with_blur(mut self, blur: f64) -> Self {
        self.blur = blur;
        self
    }

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_time(mut self, time: f64) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_thumbnail_token(mut self, token: impl Into<String>) -> Self {
        self.thumbnail_token = Some(token.into());
        self
    }

    pub fn with_width(mut self, width: Option<SvgLength>) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: Option<SvgLength>) -> Self {
        self.height = height;
        self
    }

    /// 校验清晰度倍数并返回缩略图边长。
    ///
    /// 在发出任何网络请求之前调用。
    pub(crate) fn thumbnail_size(&self) -> Result<f64, BlurUpError> {
        if !self.quality.is_finite() || self.quality < 1.0 {
            return Err(BlurUpError::InvalidQuality(self.quality));
        }

        Ok(THUMBNAIL_BASE_SIZE * self.quality)
    }

    /// 仅当时间点为有限非负数时才生效；`-0` 归一为 `0`。
    pub(crate) fn effective_time(&self) -> Option<f64> {
        self.time
            .filter(|t| t.is_finite() && *t >= 0.0)
            .map(|t| t + 0.0)
    }
}

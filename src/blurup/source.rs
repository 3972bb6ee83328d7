//! # 中间模型与结果
//!
//! ## 设计思路
//!
//! 将“网络层输出”和“最终结果”解耦：
//! - `ThumbnailPayload` 表示已下载但未编码的缩略图字节
//! - `ImageDimensions` 表示从图片头部解析出的像素尺寸
//! - `BlurUpResult` 表示返回给调用方的不可变结果

use serde::Serialize;
use url::Url;

/// 下载阶段输出：缩略图原始字节与其内容类型。
#[derive(Debug, Clone)]
pub(crate) struct ThumbnailPayload {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 响应的 `content-type`，作为 Data URL 的 MIME 部分。
    pub(crate) content_type: String,
}

/// 图片像素尺寸。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    /// 宽高比 `width / height`。
    ///
    /// 高度为 0 时返回非有限值，不做额外保护。
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// blur-up 占位图结果。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlurUpResult {
    /// 原图宽度（像素）。
    pub width: u32,
    /// 原图高度（像素）。
    pub height: u32,
    #[serde(rename = "aspectRatio")]
    pub aspect_ratio: f64,
    /// 实际请求的小缩略图地址。
    #[serde(rename = "imageURL")]
    pub image_url: Url,
    /// 小缩略图的 base64 Data URL。
    #[serde(rename = "imageDataURL")]
    pub image_data_url: String,
    /// 最终占位图：SVG 模糊包裹，或在 `blur == 0` 时与 `image_data_url` 相同。
    #[serde(rename = "blurDataURL")]
    pub blur_data_url: String,
}

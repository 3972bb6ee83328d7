//! # blurup — 视频缩略图 blur-up 占位图
//!
//! ## 架构总览
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  调用方（页面渲染代码 / CLI）                                │
//! │        ↓ playback_id + BlurUpOptions                        │
//! │  ┌─ url_builder ── 构造 thumbnail URL（width/height/time/token）│
//! │  ├─ loader ─────── 并发请求小缩略图 + 原尺寸图片              │
//! │  ├─ dimensions ─── 流式读取头部，尽早拿到宽高                 │
//! │  └─ placeholder ── base64 Data URL + SVG 高斯模糊            │
//! │        ↓                                                    │
//! │  BlurUpResult { width, height, aspectRatio, ... }           │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`blurup`] | 请求构造、网络编排、尺寸解析、占位图渲染 |
//!
//! 常用类型在 crate 根直接导出：
//!
//! ```rust,no_run
//! use blurup::{BlurUpOptions, create_blur_up};
//!
//! # async fn demo() -> Result<(), blurup::BlurUpError> {
//! let result = create_blur_up("abc123", &BlurUpOptions::default()).await?;
//! assert!(result.blur_data_url.starts_with("data:image/svg+xml"));
//! # Ok(())
//! # }
//! ```

pub mod blurup;

pub use blurup::{
    BlurUpError, BlurUpHandler, BlurUpOptions, BlurUpResult, FetchStrategy, ImageDimensions,
    ServiceConfig, SvgLength, build_thumbnail_url, create_blur_up, dimensions, placeholder,
};

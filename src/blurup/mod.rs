//! # blur-up 占位图模块
//!
//! ## 设计思路
//!
//! 该模块把“选项 → 请求地址 → 网络请求 → 尺寸解析 / 占位图渲染 → 结果”按职责拆分为多个子模块，
//! 避免单文件膨胀与耦合。
//!
//! - `config`：处理器配置与单次调用选项（含默认值）
//! - `url_builder`：缩略图 / 原尺寸请求地址构造与前置校验
//! - `loader`：HTTP 请求、状态码分类、响应体读取
//! - `dimensions`：增量解析图片头部宽高
//! - `placeholder`：Data URL 与模糊 SVG 生成
//! - `handler`：编排整条链路
//! - `error/source`：错误与中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! create_blur_up(playback_id, options)
//!    ↓
//! url_builder.rs（校验 quality + 构造 URL）
//!    ↓
//! handler.rs（按策略编排 + 阶段耗时日志）
//!    ├─ loader.rs::fetch_thumbnail（小缩略图，完整缓冲）
//!    ├─ loader.rs::fetch_source_dimensions（原图，流式 → dimensions.rs）
//!    └─ placeholder.rs（Data URL + SVG 模糊）
//!    ↓
//! BlurUpResult
//! ```

mod config;
pub mod dimensions;
mod error;
mod handler;
mod loader;
pub mod placeholder;
mod source;
mod url_builder;

pub use config::{
    BlurUpOptions, DEFAULT_BASE_URL, FetchStrategy, ServiceConfig, SvgLength, THUMBNAIL_BASE_SIZE,
};
pub use dimensions::DimensionProbe;
pub use error::{BlurUpError, SECURE_PLAYBACK_DOCS};
pub use handler::{BlurUpHandler, create_blur_up};
pub use placeholder::SVG_DATA_URL_PREFIX;
pub use source::{BlurUpResult, ImageDimensions};
pub use url_builder::{build_thumbnail_url, source_url};

//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载 blur-up 链路中的所有失败来源，任何一个分支都会中止整次调用。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 错误文案保持英文：调用方会按文案匹配，且文案指向的文档为英文。

/// 受保护播放的文档地址，403 错误会附带该链接。
pub const SECURE_PLAYBACK_DOCS: &str =
    "https://docs.mux.com/guides/video/secure-video-playback";

/// blur-up 统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum BlurUpError {
    #[error("Quality must be greater or equal to 1 (got {0})")]
    InvalidQuality(f64),

    #[error("Invalid thumbnail URL: {0}")]
    InvalidUrl(String),

    /// 403：根据请求是否携带 token 给出不同提示。
    #[error("Error fetching thumbnail. 403: Forbidden. {}", forbidden_hint(.token_supplied))]
    Forbidden { token_supplied: bool },

    #[error("Error fetching thumbnail. {status}: {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Response is not an image: {0}")]
    NotAnImage(String),

    /// 数据流读完仍无法从头部解析出宽高。
    #[error("Could not determine image dimensions after reading {bytes_read} bytes")]
    DimensionsUnavailable { bytes_read: usize },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

fn forbidden_hint(token_supplied: &bool) -> String {
    let cause = if *token_supplied {
        "The thumbnail token may be invalid."
    } else {
        "This playback ID may require a thumbnail token."
    };
    format!("{} See {} for more information.", cause, SECURE_PLAYBACK_DOCS)
}

impl BlurUpError {
    /// 稳定的机器可读错误码。
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidQuality(_) => "invalid_quality",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Forbidden { .. } => "forbidden",
            Self::Http { .. } => "http_status",
            Self::Network(_) => "network",
            Self::NotAnImage(_) => "not_an_image",
            Self::DimensionsUnavailable { .. } => "dimensions_unavailable",
            Self::Client(_) => "client",
        }
    }

    /// 出错阶段：`config` / `fetch` / `dimensions`。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidQuality(_) | Self::InvalidUrl(_) | Self::Client(_) => "config",
            Self::Forbidden { .. } | Self::Http { .. } | Self::Network(_) => "fetch",
            Self::NotAnImage(_) | Self::DimensionsUnavailable { .. } => "dimensions",
        }
    }
}

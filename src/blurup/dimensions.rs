//! # 尺寸解析模块
//!
//! ## 设计思路
//!
//! 只为拿到宽高而下载整张原图代价过高，因此按块累积字节，每收到一块就尝试解析一次头部，
//! 一旦得到宽高立即返回，剩余数据不再读取。大多数格式在前几百字节内即可确定尺寸。
//!
//! ## 实现思路
//!
//! - `try_parse_header`：纯函数，按 magic bytes 猜测格式并只读取头部；截断输入视为“尚不可解析”。
//! - `DimensionProbe`：有状态的累积器，`push` 每块后重试解析，`finish` 报告数据耗尽。
//! - 签名探测：前几字节一旦被 `infer` 识别为非图片内容，立即失败，不再继续读取；
//!   累积 `SIGNATURE_PROBE_BYTES` 仍无法识别且解析不出尺寸，同样按非图片处理。

use std::io::Cursor;

use image::ImageReader;

use super::{BlurUpError, ImageDimensions};

/// 未识别签名时最多累积的字节数。
pub const SIGNATURE_PROBE_BYTES: usize = 4096;

/// 从（可能不完整的）字节中读取图片头部尺寸。
///
/// 返回 `None` 表示当前字节不足或格式无法识别。
pub fn try_parse_header(bytes: &[u8]) -> Option<ImageDimensions> {
    if bytes.is_empty() {
        return None;
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?;
    reader.format()?;

    let (width, height) = reader.into_dimensions().ok()?;
    Some(ImageDimensions { width, height })
}

/// 非流式场景：完整字节只做一次解析。
pub fn from_bytes(bytes: &[u8]) -> Result<ImageDimensions, BlurUpError> {
    let mut probe = DimensionProbe::new();
    match probe.push(bytes)? {
        Some(dimensions) => Ok(dimensions),
        None => probe.finish(),
    }
}

/// 同步的逐块解析，供已按块切分的数据使用。
pub fn from_chunks<I, C>(chunks: I) -> Result<ImageDimensions, BlurUpError>
where
    I: IntoIterator<Item = C>,
    C: AsRef<[u8]>,
{
    let mut probe = DimensionProbe::new();
    for chunk in chunks {
        if let Some(dimensions) = probe.push(chunk.as_ref())? {
            return Ok(dimensions);
        }
    }
    probe.finish()
}

/// 增量尺寸探测器。
#[derive(Debug, Default)]
pub struct DimensionProbe {
    buffer: Vec<u8>,
    signature_checked: bool,
}

impl DimensionProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一块数据并尝试解析。
    ///
    /// 返回值：
    /// - `Ok(Some(..))`：已解析出宽高，可停止读取
    /// - `Ok(None)`：当前字节不足，继续读取
    /// - `Err(NotAnImage)`：数据签名已被识别为非图片，或超过探测上限仍无法识别
    pub fn push(&mut self, chunk: &[u8]) -> Result<Option<ImageDimensions>, BlurUpError> {
        self.buffer.extend_from_slice(chunk);

        if !self.signature_checked {
            self.signature_checked = Self::check_signature(&self.buffer)?;
        }

        if let Some(dimensions) = try_parse_header(&self.buffer) {
            return Ok(Some(dimensions));
        }

        if !self.signature_checked && self.buffer.len() >= SIGNATURE_PROBE_BYTES {
            log::debug!(
                "🚫 前 {} 字节内无法识别图片类型，放弃解析",
                SIGNATURE_PROBE_BYTES
            );
            return Err(BlurUpError::NotAnImage(format!(
                "unrecognised data in the first {} bytes",
                SIGNATURE_PROBE_BYTES
            )));
        }

        Ok(None)
    }

    /// 已累积的字节数。
    pub fn bytes_read(&self) -> usize {
        self.buffer.len()
    }

    /// 数据流结束：最后尝试一次，仍失败则报告无法解析。
    pub fn finish(self) -> Result<ImageDimensions, BlurUpError> {
        try_parse_header(&self.buffer).ok_or(BlurUpError::DimensionsUnavailable {
            bytes_read: self.buffer.len(),
        })
    }

    /// `Ok(true)` 表示已识别为图片，后续块无需再探测。
    ///
    /// `infer` 不认识但 `image` 能猜出格式的数据同样视为图片。
    fn check_signature(bytes: &[u8]) -> Result<bool, BlurUpError> {
        let Some(kind) = infer::get(bytes) else {
            return Ok(image::guess_format(bytes).is_ok());
        };

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(BlurUpError::NotAnImage(kind.mime_type().to_string()));
        }

        Ok(true)
    }
}

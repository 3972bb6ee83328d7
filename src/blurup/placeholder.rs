//! # 占位图渲染模块
//!
//! ## 设计思路
//!
//! 渲染分成三个互相独立、可单测的纯函数：
//! 1. `image_data_url`：字节 → base64 Data URL
//! 2. `svg_blur_image`：Data URL → 带高斯模糊滤镜的 SVG 文本
//! 3. `escape_for_data_url`：把 `#` 转义为 `%23`，避免被当作 URL 片段分隔符
//!
//! `blur_data_url` 负责组合：模糊强度为 0 时原样返回 Data URL。

use base64::{Engine as _, engine::general_purpose};

use super::SvgLength;

/// SVG Data URL 前缀。
pub const SVG_DATA_URL_PREFIX: &str = "data:image/svg+xml;charset=utf-8,";

/// 将图片字节编码为 base64 Data URL。
pub fn image_data_url(bytes: &[u8], content_type: &str) -> String {
    format!(
        "data:{};base64,{}",
        content_type,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// 生成模糊 SVG 文本（未转义）。
///
/// `feFuncA type="discrete"` 把透明度强制为 1，防止边缘因抗锯齿出现半透明描边；
/// 内嵌图片使用 `xMidYMid slice` 裁切铺满容器。
pub fn svg_blur_image(
    data_url: &str,
    width: Option<&SvgLength>,
    height: Option<&SvgLength>,
    std_deviation: f64,
) -> String {
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" {} {}>"#,
            r#"<filter id="b" color-interpolation-filters="sRGB">"#,
            r#"<feGaussianBlur stdDeviation="{}"/>"#,
            r#"<feComponentTransfer><feFuncA type="discrete" tableValues="1 1"/></feComponentTransfer>"#,
            r#"</filter>"#,
            r#"<g filter="url(#b)"><image width="100%" height="100%" preserveAspectRatio="xMidYMid slice" href="{}"/></g>"#,
            r#"</svg>"#,
        ),
        length_attribute("width", width),
        length_attribute("height", height),
        std_deviation,
        data_url,
    )
}

/// `#` → `%23`。
pub fn escape_for_data_url(svg: &str) -> String {
    svg.replace('#', "%23")
}

/// 最终占位图地址。
///
/// # 示例
/// ```rust
/// use blurup::placeholder::blur_data_url;
///
/// let url = "data:image/webp;base64,AAAA";
/// assert_eq!(blur_data_url(url, 0.0, None, None), url);
/// assert!(blur_data_url(url, 20.0, None, None).starts_with("data:image/svg+xml;charset=utf-8,"));
/// ```
pub fn blur_data_url(
    data_url: &str,
    blur: f64,
    width: Option<&SvgLength>,
    height: Option<&SvgLength>,
) -> String {
    if blur == 0.0 {
        return data_url.to_string();
    }

    let svg = svg_blur_image(data_url, width, height, blur);
    format!("{}{}", SVG_DATA_URL_PREFIX, escape_for_data_url(&svg))
}

fn length_attribute(name: &str, value: Option<&SvgLength>) -> String {
    match value {
        Some(length) if !length.is_falsy() => format!(r#"{}="{}""#, name, length),
        _ => String::new(),
    }
}

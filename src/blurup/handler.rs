//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `BlurUpHandler` 只负责流程编排，处理链路固定为：
//! 1. 校验选项并构造缩略图 URL（失败时不发任何请求）
//! 2. 按策略发起一个或两个请求（双请求时并发执行）
//! 3. 解析宽高、编码 Data URL、生成模糊 SVG
//!
//! ## 实现思路
//!
//! - 处理器持有不可变的 `ServiceConfig` 与复用型 `reqwest::Client`，调用之间无共享可变状态。
//! - 双请求使用 `tokio::try_join!`：任一失败立即返回，另一请求随之丢弃，不返回部分结果。
//! - 记录 `fetch/render/total` 阶段耗时，便于性能诊断。

use std::time::Instant;

use super::config::FetchStrategy;
use super::url_builder::{build_thumbnail_url, redact_url_for_log, source_url};
use super::{BlurUpError, BlurUpOptions, BlurUpResult, ServiceConfig, dimensions, placeholder};

/// blur-up 处理器。
pub struct BlurUpHandler {
    pub(super) config: ServiceConfig,
    pub(super) client: reqwest::Client,
}

impl BlurUpHandler {
    /// 根据配置创建处理器，同时构建复用型 HTTP 客户端。
    ///
    /// # 示例
    /// ```rust
    /// use blurup::{BlurUpHandler, ServiceConfig};
    ///
    /// let handler = BlurUpHandler::new(ServiceConfig::default())?;
    /// # Ok::<(), blurup::BlurUpError>(())
    /// ```
    pub fn new(config: ServiceConfig) -> Result<Self, BlurUpError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| BlurUpError::Client(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// 使用线上图片服务与默认策略。
    pub fn with_defaults() -> Result<Self, BlurUpError> {
        Self::new(ServiceConfig::default())
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// 主入口：为指定播放 ID 生成 blur-up 占位图。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use blurup::{BlurUpHandler, BlurUpOptions};
    ///
    /// # async fn demo() -> Result<(), blurup::BlurUpError> {
    /// let handler = BlurUpHandler::with_defaults()?;
    /// let result = handler
    ///     .create_blur_up("abc123", &BlurUpOptions::default().with_quality(2.0))
    ///     .await?;
    /// println!("{}x{}", result.width, result.height);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_blur_up(
        &self,
        playback_id: &str,
        options: &BlurUpOptions,
    ) -> Result<BlurUpResult, BlurUpError> {
        let total_start = Instant::now();
        let image_url = build_thumbnail_url(&self.config.base_url, playback_id, options)?;
        let image_type = options.image_type.as_str();

        log::info!(
            "🌐 开始生成 blur-up - {} ({:?})",
            redact_url_for_log(&image_url),
            self.config.strategy
        );

        let fetch_start = Instant::now();
        let (dimensions, thumbnail) = match self.config.strategy {
            FetchStrategy::Dual => {
                let source = source_url(&image_url);
                tokio::try_join!(
                    self.fetch_source_dimensions(&source, image_type),
                    self.fetch_thumbnail(&image_url, image_type),
                )?
            }
            FetchStrategy::Single => {
                let thumbnail = self.fetch_thumbnail(&image_url, image_type).await?;
                (dimensions::from_bytes(&thumbnail.bytes)?, thumbnail)
            }
        };
        let fetch_elapsed = fetch_start.elapsed();

        let render_start = Instant::now();
        let image_data_url = placeholder::image_data_url(&thumbnail.bytes, &thumbnail.content_type);
        let blur_data_url = placeholder::blur_data_url(
            &image_data_url,
            options.blur,
            options.width.as_ref(),
            options.height.as_ref(),
        );
        let render_elapsed = render_start.elapsed();

        log::info!(
            "✅ blur-up 生成完成 - {}x{} fetch={}ms render={}ms total={}ms",
            dimensions.width,
            dimensions.height,
            fetch_elapsed.as_millis(),
            render_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(BlurUpResult {
            width: dimensions.width,
            height: dimensions.height,
            aspect_ratio: dimensions.aspect_ratio(),
            image_url,
            image_data_url,
            blur_data_url,
        })
    }
}

/// 使用默认处理器生成 blur-up 占位图。
pub async fn create_blur_up(
    playback_id: &str,
    options: &BlurUpOptions,
) -> Result<BlurUpResult, BlurUpError> {
    BlurUpHandler::with_defaults()?
        .create_blur_up(playback_id, options)
        .await
}

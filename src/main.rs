//! # blurup — 命令行入口
//!
//! 本文件只负责日志初始化、参数解析与结果输出。
//! 业务逻辑见 `lib.rs` 架构文档。

use blurup::{BlurUpHandler, BlurUpOptions, FetchStrategy, ServiceConfig, SvgLength};
use clap::Parser;

/// 为 Mux 播放 ID 生成 blur-up 占位图，并以 JSON 输出结果
#[derive(Parser, Debug)]
#[command(name = "blurup", version, about)]
struct Args {
    /// 播放 ID
    playback_id: String,

    /// 缩略图编码类型
    #[arg(long = "type", default_value = "webp")]
    image_type: String,

    /// 高斯模糊标准差，0 表示不模糊
    #[arg(long, default_value_t = 20.0)]
    blur: f64,

    /// 清晰度倍数（>= 1）
    #[arg(long, default_value_t = 1.0)]
    quality: f64,

    /// 视频帧时间点（秒）
    #[arg(long)]
    time: Option<f64>,

    /// 受保护资源的签名 token
    #[arg(long)]
    token: Option<String>,

    /// SVG 容器宽度，传空字符串则不输出
    #[arg(long, default_value = "100%")]
    width: String,

    /// SVG 容器高度，传空字符串则不输出
    #[arg(long, default_value = "100%")]
    height: String,

    /// 只请求小缩略图，不额外请求原图测量尺寸
    #[arg(long)]
    single: bool,

    /// 图片服务根地址
    #[arg(long, default_value = blurup::blurup::DEFAULT_BASE_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(err) = run(args).await {
        log::error!("❌ blur-up 生成失败 [{}:{}]: {}", err.stage(), err.code(), err);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), blurup::BlurUpError> {
    let strategy = if args.single {
        FetchStrategy::Single
    } else {
        FetchStrategy::Dual
    };
    let handler =
        BlurUpHandler::new(ServiceConfig::with_base_url(args.base_url).strategy(strategy))?;

    let mut options = BlurUpOptions::default()
        .with_type(args.image_type)
        .with_blur(args.blur)
        .with_quality(args.quality)
        .with_width(Some(SvgLength::from(args.width)))
        .with_height(Some(SvgLength::from(args.height)));
    options.time = args.time;
    options.thumbnail_token = args.token;

    let result = handler.create_blur_up(&args.playback_id, &options).await?;

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("序列化结果失败: {}", e),
    }

    Ok(())
}

//! # 图片缩放工具 — 命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与结果输出，业务逻辑见 `lib.rs` 架构文档。
//!
//! ```bash
//! image-resizer photo.jpg --output-dir ./out
//! image-resizer photo --media-type image/webp --profile quality --json
//! image-resizer "data:image/png;base64,iVBORw0..." --config resizer.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use image_resizer::error::AppError;
use image_resizer::resizer::{self, ImageConfig, ImageResizer, ResizeProfile, SourceImage};
use image_resizer::session::{ResizeSession, SelectOutcome};

/// 将任意图片等比缩放到 100×100 白底 PNG。
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 输入图片路径，或以 `data:` 开头的 Data URL
    input: String,

    /// 文件或纯 Base64 输入的声明类型（缺省时取自扩展名或文件签名）
    #[arg(long)]
    media_type: Option<String>,

    /// 输出目录
    #[arg(short, long, default_value = ".", env = "IMAGE_RESIZER_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// JSON 配置文件
    #[arg(short, long, env = "IMAGE_RESIZER_CONFIG")]
    config: Option<PathBuf>,

    /// 画质档位：quality / balanced / speed
    #[arg(short, long)]
    profile: Option<String>,

    /// 以 JSON 输出结果摘要
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("{}", AppError::Io(err));
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("❌ 处理失败 [{}]: {}", err.code(), err);
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let mut config = match &args.config {
        Some(path) => ImageConfig::from_json_file(path)?,
        None => ImageConfig::default(),
    };
    if let Some(profile) = &args.profile {
        config.apply_profile(ResizeProfile::from_str(profile)?);
    }

    let source = load_source(&args, &config)?;
    let handler = ImageResizer::new(config)?;
    let session = ResizeSession::new(Arc::new(handler));

    let outcome = match session.select(source).await? {
        SelectOutcome::Ready(outcome) => outcome,
        SelectOutcome::Superseded => return Err(AppError::NoResult),
    };
    let path = session.download(&args.output_dir)?;

    if args.json {
        let summary = serde_json::json!({
            "output_path": path.display().to_string(),
            "media_type": resizer::OUTPUT_MEDIA_TYPE,
            "original_dimensions": outcome.original_dimensions,
            "resized_dimensions": outcome.resized_dimensions,
            "original_file_size": outcome.original_file_size,
            "resized_file_size": outcome.resized_file_size,
        });
        println!("{}", summary);
    } else {
        println!(
            "{}x{} ({}) -> {}x{} ({}) 已保存到 {}",
            outcome.original_dimensions.width,
            outcome.original_dimensions.height,
            outcome.original_file_size,
            outcome.resized_dimensions.width,
            outcome.resized_dimensions.height,
            outcome.resized_file_size,
            path.display()
        );
    }

    Ok(())
}

fn load_source(args: &Args, config: &ImageConfig) -> Result<SourceImage, AppError> {
    let declared = args.media_type.as_deref();
    let source = if args.input.trim_start().starts_with("data:") {
        resizer::loader::load_from_base64(&args.input, declared, config)?
    } else {
        resizer::loader::load_from_file(&args.input, declared, config)?
    };

    Ok(source)
}

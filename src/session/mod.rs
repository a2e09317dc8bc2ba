//! # 会话层
//!
//! ## 设计思路
//!
//! 原界面的“选择 → 加载中 → 完成/失败 → 重置”是一个调用方状态机，
//! 这里用普通的状态枚举实现，缩放核心不感知任何状态。
//!
//! ```text
//! Idle ──select──▶ Loading ──ok──▶ Ready ──reset──▶ Idle
//!                     │                         ▲
//!                     └──err──▶ Failed ──reset──┘
//! ```
//!
//! ## 实现思路
//!
//! - 缩放放在 `tokio::task::spawn_blocking` 中执行，不阻塞调用方的异步上下文。
//! - 每次 `select` / `reset` 递增代数（generation），结果返回时若代数已变化则丢弃，
//!   即“后写者胜”；旧请求不会被取消，只是结果被忽略。
//! - 代数检查与状态写入在同一把锁内完成，避免交错覆盖。

mod download;
mod outcome;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

pub use download::save_png;
pub use outcome::{Dimensions, ResizeOutcome, format_file_size};

use crate::error::AppError;
use crate::resizer::{ImageResizer, ResizeResult, SourceImage};

/// 会话状态。
#[derive(Debug, Clone)]
pub enum SessionState {
    Idle,
    Loading { generation: u64 },
    Ready(Box<ReadyState>),
    Failed { code: &'static str, message: String },
}

/// 成功后的结果：可下载的 PNG 与展示视图。
#[derive(Debug, Clone)]
pub struct ReadyState {
    pub result: ResizeResult,
    pub outcome: ResizeOutcome,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Ready(_) => "ready",
            Self::Failed { .. } => "failed",
        }
    }
}

/// `select` 的返回值。
#[derive(Debug, Clone)]
pub enum SelectOutcome {
    /// 本次选择成为当前结果。
    Ready(ResizeOutcome),
    /// 等待期间出现了更新的选择或重置，本次结果已丢弃。
    Superseded,
}

struct Inner {
    state: SessionState,
    generation: u64,
}

/// 单图缩放会话。
pub struct ResizeSession {
    resizer: Arc<ImageResizer>,
    inner: Mutex<Inner>,
}

impl ResizeSession {
    pub fn new(resizer: Arc<ImageResizer>) -> Self {
        Self {
            resizer,
            inner: Mutex::new(Inner {
                state: SessionState::Idle,
                generation: 0,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, AppError> {
        self.inner
            .lock()
            .map_err(|_| AppError::Session("会话状态锁已中毒".to_string()))
    }

    /// 当前状态快照。
    pub fn state(&self) -> Result<SessionState, AppError> {
        Ok(self.lock()?.state.clone())
    }

    /// 选择新图片并执行缩放。
    ///
    /// 缩放失败时状态进入 `Failed` 并返回错误；若结果已过期则返回 `Superseded`。
    pub async fn select(&self, source: SourceImage) -> Result<SelectOutcome, AppError> {
        let generation = {
            let mut inner = self.lock()?;
            inner.generation += 1;
            inner.state = SessionState::Loading {
                generation: inner.generation,
            };
            inner.generation
        };

        log::info!(
            "🖼️ 选择图片 - 来源: {} 类型: {} 大小: {} 第 {} 次",
            source.source_hint,
            source.media_type,
            format_file_size(source.bytes.len() as u64),
            generation
        );

        let resizer = Arc::clone(&self.resizer);
        let joined = tokio::task::spawn_blocking(move || {
            let result = resizer.resize_source(&source);
            (source, result)
        })
        .await;

        let mut inner = self.lock()?;
        if inner.generation != generation {
            log::debug!(
                "丢弃过期结果 - 第 {} 次（当前第 {} 次）",
                generation,
                inner.generation
            );
            return Ok(SelectOutcome::Superseded);
        }

        // 后台任务 panic 或被取消时同样进入 Failed，不能停留在 Loading
        let (source, result) = match joined {
            Ok(joined) => joined,
            Err(e) => {
                let err = AppError::Session(format!("后台缩放任务失败: {}", e));
                return Err(Self::record_failure(&mut inner, err));
            }
        };

        match result {
            Ok(result) => {
                let outcome = ResizeOutcome::new(&source, &result);
                inner.state = SessionState::Ready(Box::new(ReadyState {
                    result,
                    outcome: outcome.clone(),
                }));
                Ok(SelectOutcome::Ready(outcome))
            }
            Err(err) => Err(Self::record_failure(&mut inner, err)),
        }
    }

    fn record_failure(inner: &mut Inner, err: AppError) -> AppError {
        log::error!("❌ 缩放失败: {}", err);
        inner.state = SessionState::Failed {
            code: err.code(),
            message: err.to_string(),
        };
        err
    }

    /// 回到 `Idle`，丢弃当前结果与进行中的请求。
    pub fn reset(&self) -> Result<(), AppError> {
        let mut inner = self.lock()?;
        inner.generation += 1;
        inner.state = SessionState::Idle;
        log::info!("🔄 会话已重置");
        Ok(())
    }

    /// 将当前结果保存到 `dir`，返回写入的文件路径。
    pub fn download(&self, dir: impl AsRef<Path>) -> Result<PathBuf, AppError> {
        let result = match &self.lock()?.state {
            SessionState::Ready(ready) => ready.result.clone(),
            _ => return Err(AppError::NoResult),
        };

        save_png(dir, &result)
    }
}

//! 结果保存
//!
//! 把缩放结果以固定文件名写入目标目录，目录不存在时自动创建。
//! 同名文件直接覆盖，与浏览器“另存为”行为一致。

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::resizer::ResizeResult;

/// 将 PNG 写入 `dir/resized-image-100x100.png` 并返回完整路径。
pub fn save_png(dir: impl AsRef<Path>, result: &ResizeResult) -> Result<PathBuf, AppError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let path = dir.join(result.file_name());
    fs::write(&path, &result.encoded_bytes)?;

    log::info!(
        "💾 已保存缩放结果 - 路径: {} 大小: {} 字节",
        path.display(),
        result.encoded_bytes.len()
    );

    Ok(path)
}

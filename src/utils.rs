use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use tracing::warn;
use walkdir::WalkDir;

use crate::api_constants::document_config::HTML_EXTENSIONS;
use crate::error::{Result, TranslationError};

/// 根据运行开始时间生成日志文件名，例如 `2026-10-19T10:00:00.log`
pub fn log_file_name(started_at: &DateTime<Local>) -> String {
    format!("{}.log", started_at.format("%Y-%m-%dT%H:%M:%S"))
}

/// 初始化日志系统，日志写入本次运行专属的日志文件
///
/// 返回日志文件路径。
pub fn init_logging(log_dir: Option<&Path>, verbose: bool) -> Result<PathBuf> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let dir = log_dir.unwrap_or_else(|| Path::new("."));
    let path = dir.join(log_file_name(&Local::now()));
    let file = File::create(&path).map_err(|e| TranslationError::write(&path, e))?;

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(path)
}

/// 是否为HTML文件 (按扩展名判断)
pub fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| HTML_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// 展开输入参数：目录展开为其中的HTML文件 (按路径排序)，其余参数原样保留
///
/// 不存在的路径也原样保留，由读取步骤报告错误。
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            if input.is_file() && !is_html_file(input) {
                warn!("⚠️  文件扩展名不是HTML: {}", input.display());
            }
            files.push(input.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry.map_err(|e| TranslationError::read(input, e.into()))?;
            if entry.file_type().is_file() && is_html_file(entry.path()) {
                found.push(entry.into_path());
            }
        }
        if found.is_empty() {
            warn!("⚠️  目录中没有HTML文件: {}", input.display());
        }
        files.extend(found);
    }

    Ok(files)
}

/// 输出路径：显式指定时使用指定路径，否则覆盖输入文件
pub fn resolve_output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    output.unwrap_or(input).to_path_buf()
}

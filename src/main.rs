use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{error, info};

use html_translator::config::{Cli, TranslatorConfig};
use html_translator::stats::{format_duration, print_summary, BatchSummary};
use html_translator::utils::{expand_inputs, init_logging};
use html_translator::{FileTranslator, TranslationSession};

fn main() {
    let cli = Cli::parse();

    if cli.files.is_empty() {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("❌ 无法输出帮助信息: {}", e);
            std::process::exit(1);
        }
        println!();
        return;
    }

    let log_path = match init_logging(cli.log_dir.as_deref(), cli.verbose) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("❌ 无法创建日志文件: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli) {
        error!("❌ 发生未预期的错误，批处理中止: {:?}", e);
        eprintln!("❌ 翻译失败: {:#} (详见日志 {})", e, log_path.display());
        std::process::exit(1);
    }
}

/// 按顺序翻译所有文件，遇到第一个错误即中止
fn run(cli: &Cli) -> Result<()> {
    let total_start = Instant::now();

    let config = TranslatorConfig::from_cli(cli).context("配置无效")?;
    let backend = config.backend().context("创建翻译后端失败")?;
    let session = TranslationSession::create(backend.as_ref(), config.from_lang(), config.to_lang())
        .context("创建翻译会话失败")?
        .with_batch_size(config.batch_size());

    let files = expand_inputs(&cli.files).context("展开输入路径失败")?;
    if cli.output.is_some() && files.len() != 1 {
        bail!("--output 只能与单个输入文件一起使用 (实际 {} 个)", files.len());
    }

    let translator = FileTranslator::new(session);
    let mut summary = BatchSummary::default();

    for file in &files {
        info!("📂 正在翻译: '{}'", file.display());
        let report = translator
            .translate_file(file, cli.output.as_deref())
            .with_context(|| format!("翻译文件失败: {}", file.display()))?;
        summary.record(&report);
    }

    let total_duration = total_start.elapsed();
    info!(
        "🎉 全部完成: {} 个文件，总耗时 {}",
        summary.files,
        format_duration(total_duration)
    );

    if cli.stats {
        print_summary(&summary, total_duration);
    }

    Ok(())
}

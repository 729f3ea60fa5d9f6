use std::path::PathBuf;
use std::time::Duration;

/// 单个文件的处理结果
#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub input_size: usize,
    pub output_size: usize,
    pub segments_translated: usize,
    pub scripts_moved: usize,
    pub stylesheets_moved: usize,
    pub comments_removed: usize,
    pub elapsed: Duration,
}

/// 一次批处理的汇总
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub files: usize,
    pub input_size: usize,
    pub output_size: usize,
    pub segments_translated: usize,
    pub scripts_moved: usize,
    pub stylesheets_moved: usize,
    pub comments_removed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, report: &FileReport) {
        self.files += 1;
        self.input_size += report.input_size;
        self.output_size += report.output_size;
        self.segments_translated += report.segments_translated;
        self.scripts_moved += report.scripts_moved;
        self.stylesheets_moved += report.stylesheets_moved;
        self.comments_removed += report.comments_removed;
    }
}

/// 打印批处理统计
pub fn print_summary(summary: &BatchSummary, total_duration: Duration) {
    println!("\n📊 统计报告:");
    println!("═══════════════════════════════════════");

    println!("📏 文件统计:");
    println!("   文件数量: {}", summary.files);
    println!(
        "   输入大小: {} 字节 ({:.1} KB)",
        summary.input_size,
        summary.input_size as f64 / 1024.0
    );
    println!(
        "   输出大小: {} 字节 ({:.1} KB)",
        summary.output_size,
        summary.output_size as f64 / 1024.0
    );

    println!("\n🔤 翻译统计:");
    println!("   翻译文本: {} 项", summary.segments_translated);
    println!("   移动脚本: {} 个", summary.scripts_moved);
    println!("   移动样式表: {} 个", summary.stylesheets_moved);
    println!("   删除注释: {} 个", summary.comments_removed);

    println!("\n⏱️  总耗时: {}", format_duration(total_duration));
}

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}

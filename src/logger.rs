use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

use crate::posture::PostureCategory;

/// 1フレーム分のログ行
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub posture: PostureCategory,
    pub nose_z: Option<f32>,
}

/// セッション中の姿勢ログ。終了時に一度だけCSVへ書き出す。
///
/// 追記は失敗しない。処理したフレームは未検出・抽出失敗も含めて
/// 必ず1行になる。
pub struct SessionLogger {
    records: Vec<LogRecord>,
    started_at: DateTime<Local>,
}

impl SessionLogger {
    pub fn new() -> Self {
        Self::with_start_time(Local::now())
    }

    pub fn with_start_time(started_at: DateTime<Local>) -> Self {
        Self {
            records: Vec::new(),
            started_at,
        }
    }

    /// 1フレーム分を追記する
    pub fn log(&mut self, posture: PostureCategory, nose_z: Option<f32>) {
        self.records.push(LogRecord {
            timestamp: Local::now(),
            posture,
            nose_z,
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// カテゴリ別の件数
    pub fn count(&self, category: PostureCategory) -> usize {
        self.records.iter().filter(|r| r.posture == category).count()
    }

    /// セッション開始時刻から決まる出力ファイル名。実行ごとに一意。
    pub fn file_name(&self) -> String {
        format!("posture_log_{}.csv", self.started_at.format("%Y%m%d_%H%M%S"))
    }

    /// 全レコードを時系列順でCSVに書き出し、パスを返す
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(self.file_name());

        let mut out = String::from("timestamp,posture,nose_z\n");
        for record in &self.records {
            out.push_str(&format_record(record));
            out.push('\n');
        }

        fs::write(&path, out)
            .with_context(|| format!("Failed to write session log to {}", path.display()))?;
        Ok(path)
    }
}

impl Default for SessionLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// CSV1行分。読みが無いフレームは N/A。
fn format_record(record: &LogRecord) -> String {
    let nose_z = match record.nose_z {
        Some(z) => format!("{:.4}", z),
        None => "N/A".to_string(),
    };
    format!(
        "{},{},{}",
        record.timestamp.to_rfc3339(),
        record.posture.label(),
        nose_z
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_frame_is_one_record() {
        let mut logger = SessionLogger::new();
        logger.log(PostureCategory::WellPositioned, Some(-0.5));
        logger.log(PostureCategory::NoPersonDetected, None);
        logger.log(PostureCategory::LandmarkError, None);
        logger.log(PostureCategory::TooClose, Some(-2.0));
        assert_eq!(logger.len(), 4);
    }

    #[test]
    fn test_count_by_category() {
        let mut logger = SessionLogger::new();
        logger.log(PostureCategory::TooClose, Some(-2.0));
        logger.log(PostureCategory::TooClose, Some(-1.9));
        logger.log(PostureCategory::WellPositioned, Some(-0.5));
        assert_eq!(logger.count(PostureCategory::TooClose), 2);
        assert_eq!(logger.count(PostureCategory::WellPositioned), 1);
        assert_eq!(logger.count(PostureCategory::SlightlyLeaning), 0);
    }

    #[test]
    fn test_format_record_with_reading() {
        let record = LogRecord {
            timestamp: Local::now(),
            posture: PostureCategory::TooClose,
            nose_z: Some(-1.2345),
        };
        let line = format_record(&record);
        assert!(line.ends_with(",Bad - Too Close,-1.2345"));
    }

    #[test]
    fn test_format_record_absent_reading_is_na() {
        let record = LogRecord {
            timestamp: Local::now(),
            posture: PostureCategory::NoPersonDetected,
            nose_z: None,
        };
        let line = format_record(&record);
        assert!(line.ends_with(",No Person Detected,N/A"));
    }

    #[test]
    fn test_file_name_includes_start_time() {
        use chrono::TimeZone;
        let start = Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 15).unwrap();
        let logger = SessionLogger::with_start_time(start);
        assert_eq!(logger.file_name(), "posture_log_20240301_093015.csv");
    }

    #[test]
    fn test_save_writes_header_and_all_records() {
        let dir = std::env::temp_dir().join(format!("posture_log_test_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let mut logger = SessionLogger::new();
        logger.log(PostureCategory::WellPositioned, Some(-0.5));
        logger.log(PostureCategory::NoPersonDetected, None);

        let path = logger.save(&dir).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "timestamp,posture,nose_z");
        assert!(lines[2].ends_with("N/A"));

        fs::remove_dir_all(&dir).unwrap();
    }
}

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub posture: PostureConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    /// カメラデバイス番号
    #[serde(default = "default_camera_index")]
    pub index: i32,
    /// キャプチャ解像度（横）
    #[serde(default = "default_camera_width")]
    pub width: u32,
    /// キャプチャ解像度（縦）
    #[serde(default = "default_camera_height")]
    pub height: u32,
    /// キャプチャFPS
    #[serde(default = "default_camera_fps")]
    pub fps: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetectionConfig {
    /// ONNXモデルのパス
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// 人物検出とみなす姿勢スコアの下限
    #[serde(default = "default_confidence")]
    pub min_detection_confidence: f32,
    /// トラッキング信頼度の下限（分類ロジックでは未使用）
    #[serde(default = "default_confidence")]
    pub min_tracking_confidence: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PostureConfig {
    /// 鼻のZがこれより手前（負方向）なら「近すぎ」
    #[serde(default = "default_threshold_close")]
    pub distance_threshold_close: f32,
    /// 鼻のZがこれより奥なら「良い姿勢」
    #[serde(default = "default_threshold_good")]
    pub distance_threshold_good: f32,
    /// 警告を出すまでの悪い姿勢の継続秒数
    #[serde(default = "default_bad_posture_secs")]
    pub bad_posture_threshold_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// セッションログCSVの出力先ディレクトリ
    #[serde(default = "default_log_dir")]
    pub output_dir: String,
}

fn default_camera_index() -> i32 { 0 }
fn default_camera_width() -> u32 { 640 }
fn default_camera_height() -> u32 { 480 }
fn default_camera_fps() -> u32 { 30 }
fn default_model_path() -> String { "models/blazepose_full.onnx".to_string() }
fn default_confidence() -> f32 { 0.5 }
fn default_threshold_close() -> f32 { -1.5 }
fn default_threshold_good() -> f32 { -1.10 }
fn default_bad_posture_secs() -> u64 { 10 }
fn default_log_dir() -> String { ".".to_string() }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: default_camera_index(),
            width: default_camera_width(),
            height: default_camera_height(),
            fps: default_camera_fps(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            min_detection_confidence: default_confidence(),
            min_tracking_confidence: default_confidence(),
        }
    }
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            distance_threshold_close: default_threshold_close(),
            distance_threshold_good: default_threshold_good(),
            bad_posture_threshold_secs: default_bad_posture_secs(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            output_dir: default_log_dir(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// ファイルが無ければデフォルト設定で起動する
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.posture.distance_threshold_close >= self.posture.distance_threshold_good {
            bail!(
                "distance_threshold_close ({}) must be below distance_threshold_good ({})",
                self.posture.distance_threshold_close,
                self.posture.distance_threshold_good
            );
        }
        if self.posture.bad_posture_threshold_secs == 0 {
            bail!("bad_posture_threshold_secs must be positive");
        }
        for (name, value) in [
            ("min_detection_confidence", self.detection.min_detection_confidence),
            ("min_tracking_confidence", self.detection.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{} ({}) must be within 0.0-1.0", name, value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.camera.index, 0);
        assert_eq!(config.posture.distance_threshold_close, -1.5);
        assert_eq!(config.posture.distance_threshold_good, -1.10);
        assert_eq!(config.posture.bad_posture_threshold_secs, 10);
        assert_eq!(config.detection.min_detection_confidence, 0.5);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            [posture]
            bad_posture_threshold_secs = 5

            [camera]
            index = 2
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.camera.index, 2);
        assert_eq!(config.posture.bad_posture_threshold_secs, 5);
        // 未指定のセクションはデフォルトで埋まる
        assert_eq!(config.camera.width, 640);
        assert_eq!(config.detection.min_tracking_confidence, 0.5);
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let mut config = Config::default();
        config.posture.distance_threshold_close = -1.0;
        config.posture.distance_threshold_good = -1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_equal_thresholds() {
        let mut config = Config::default();
        config.posture.distance_threshold_close = -1.2;
        config.posture.distance_threshold_good = -1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_alert_threshold() {
        let mut config = Config::default();
        config.posture.bad_posture_threshold_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_confidence() {
        let mut config = Config::default();
        config.detection.min_detection_confidence = 1.5;
        assert!(config.validate().is_err());
    }
}

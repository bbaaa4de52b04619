use anyhow::{bail, Result};
use std::fmt;

/// 1フレーム分の姿勢カテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostureCategory {
    NoPersonDetected,
    TooClose,
    WellPositioned,
    SlightlyLeaning,
    LandmarkError,
}

impl PostureCategory {
    /// 画面表示とログに使う表示名
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoPersonDetected => "No Person Detected",
            Self::TooClose => "Bad - Too Close",
            Self::WellPositioned => "Good - Well Positioned",
            Self::SlightlyLeaning => "Okay - Slightly Leaning",
            Self::LandmarkError => "Landmark Error",
        }
    }

    /// エピソード追跡の対象となる「悪い姿勢」か
    pub fn is_bad(&self) -> bool {
        matches!(self, Self::TooClose)
    }
}

impl fmt::Display for PostureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 分類しきい値。close < good を常に満たす。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    close: f32,
    good: f32,
}

impl Thresholds {
    /// close >= good の組は設定段階で拒否する
    pub fn new(close: f32, good: f32) -> Result<Self> {
        if close >= good {
            bail!(
                "close threshold ({}) must be below good threshold ({})",
                close,
                good
            );
        }
        Ok(Self { close, good })
    }

    pub fn close(&self) -> f32 {
        self.close
    }

    pub fn good(&self) -> f32 {
        self.good
    }
}

/// 鼻のZ座標から姿勢カテゴリを決める純関数
///
/// Zは負方向がカメラに近い。None は人物未検出。
/// LandmarkError は抽出失敗時に呼び出し側が割り当てるため、ここでは返らない。
pub fn classify(nose_z: Option<f32>, thresholds: &Thresholds) -> PostureCategory {
    match nose_z {
        None => PostureCategory::NoPersonDetected,
        Some(z) if z < thresholds.close => PostureCategory::TooClose,
        Some(z) if z > thresholds.good => PostureCategory::WellPositioned,
        Some(_) => PostureCategory::SlightlyLeaning,
    }
}

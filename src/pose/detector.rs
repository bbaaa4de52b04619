use anyhow::{bail, Context, Result};
use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;

use super::landmark::{Landmark, LandmarkIndex, Landmarks};
use super::preprocess::BLAZEPOSE_INPUT_SIZE;

/// ランドマーク1点あたりの出力値数 (x, y, z, visibility, presence)
const VALUES_PER_LANDMARK: usize = 5;

/// BlazePose を使用したランドマーク検出器
pub struct PoseDetector {
    session: Session,
    min_presence: f32,
}

impl PoseDetector {
    /// ONNXモデルを読み込んで初期化
    pub fn new<P: AsRef<Path>>(model_path: P, min_presence: f32) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())
            .context("Failed to load ONNX model")?;

        Ok(Self {
            session,
            min_presence,
        })
    }

    /// 前処理済みテンソルからランドマークを検出
    ///
    /// 入力: [1, 256, 256, 3] の f32 テンソル
    /// 出力: Ok(None) は人物未検出、Err は出力形状の異常
    pub fn detect(&mut self, input: Array4<f32>) -> Result<Option<Landmarks>> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs!["input_1" => input_tensor])
            .context("Inference failed")?;

        // 姿勢スコア [1, 1]
        let score: ndarray::ArrayViewD<f32> = outputs["Identity_1"]
            .try_extract_array()
            .context("Failed to extract pose score")?;
        let presence = match score.iter().next() {
            Some(&v) => v,
            None => bail!("Malformed pose score tensor: empty"),
        };
        if presence < self.min_presence {
            return Ok(None);
        }

        // ランドマーク [1, 195] (33点 × x, y, z, visibility, presence)
        let raw: ndarray::ArrayViewD<f32> = outputs["Identity"]
            .try_extract_array()
            .context("Failed to extract landmark tensor")?;
        let values: Vec<f32> = raw.iter().copied().collect();

        parse_landmarks(&values).map(Some)
    }
}

/// 生の出力ベクトルを正規化済みランドマークに変換
///
/// x, y, z は入力サイズのピクセルスケールで出力されるため入力辺長で割る。
/// 可視度はロジットなのでシグモイドをかける。
pub(crate) fn parse_landmarks(raw: &[f32]) -> Result<Landmarks> {
    let expected = LandmarkIndex::COUNT * VALUES_PER_LANDMARK;
    if raw.len() != expected {
        bail!(
            "Malformed landmark tensor: expected {} values, got {}",
            expected,
            raw.len()
        );
    }

    let scale = BLAZEPOSE_INPUT_SIZE as f32;
    let mut points = [Landmark::default(); LandmarkIndex::COUNT];
    for (i, chunk) in raw.chunks_exact(VALUES_PER_LANDMARK).enumerate() {
        points[i] = Landmark::new(
            chunk[0] / scale,
            chunk[1] / scale,
            chunk[2] / scale,
            sigmoid(chunk[3]),
        );
    }

    Ok(Landmarks::new(points))
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

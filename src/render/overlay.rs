use anyhow::Result;
use opencv::core::{Mat, Point, Scalar};
use opencv::imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8};
use std::time::Duration;

use crate::posture::PostureCategory;

/// カテゴリごとの表示色 (BGR)
fn category_color(category: PostureCategory) -> Scalar {
    match category {
        PostureCategory::TooClose => Scalar::new(0.0, 0.0, 255.0, 0.0), // 赤
        PostureCategory::WellPositioned => Scalar::new(0.0, 255.0, 0.0, 0.0), // 緑
        PostureCategory::SlightlyLeaning => Scalar::new(0.0, 255.0, 255.0, 0.0), // シアン
        PostureCategory::NoPersonDetected | PostureCategory::LandmarkError => {
            Scalar::new(200.0, 200.0, 200.0, 0.0) // グレー
        }
    }
}

fn info_color() -> Scalar {
    Scalar::new(200.0, 200.0, 200.0, 0.0)
}

fn warn_color() -> Scalar {
    Scalar::new(0.0, 0.0, 255.0, 0.0)
}

/// フレーム左上に現在の状態を描き込む
pub fn draw_status(
    frame: &mut Mat,
    category: PostureCategory,
    nose_z: Option<f32>,
    elapsed: Duration,
    bad_frames: usize,
) -> Result<()> {
    imgproc::put_text(
        frame,
        &format!("Posture: {}", category),
        Point::new(10, 30),
        FONT_HERSHEY_SIMPLEX,
        0.9,
        category_color(category),
        2,
        LINE_8,
        false,
    )?;

    if category == PostureCategory::NoPersonDetected {
        imgproc::put_text(
            frame,
            "No Person Detected - Adjust Position/Lighting",
            Point::new(10, 60),
            FONT_HERSHEY_SIMPLEX,
            0.7,
            warn_color(),
            2,
            LINE_8,
            false,
        )?;
    }

    if let Some(z) = nose_z {
        imgproc::put_text(
            frame,
            &format!("Nose Z: {:.2}", z),
            Point::new(10, 90),
            FONT_HERSHEY_SIMPLEX,
            0.7,
            info_color(),
            1,
            LINE_8,
            false,
        )?;
    }

    imgproc::put_text(
        frame,
        &format!("Bad posture timer: {}s", elapsed.as_secs()),
        Point::new(10, 120),
        FONT_HERSHEY_SIMPLEX,
        0.7,
        info_color(),
        1,
        LINE_8,
        false,
    )?;

    imgproc::put_text(
        frame,
        &format!("Bad posture count: {}", bad_frames),
        Point::new(10, 150),
        FONT_HERSHEY_SIMPLEX,
        0.7,
        info_color(),
        1,
        LINE_8,
        false,
    )?;

    Ok(())
}

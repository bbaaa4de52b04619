use anyhow::Result;
use log::{info, warn};
use std::time::{Duration, Instant};

use posture_monitor::alert::{AlertEvent, AlertSurface};
use posture_monitor::camera::OpenCvCamera;
use posture_monitor::config::Config;
use posture_monitor::logger::SessionLogger;
use posture_monitor::pose::{preprocess_for_blazepose, PoseDetector};
use posture_monitor::posture::{classify, EpisodeTracker, PostureCategory, Thresholds};
use posture_monitor::render::{draw_status, MonitorWindow};

const CONFIG_PATH: &str = "config.toml";

/// ランドマーク描画に使う可視度の閾値
const VISIBILITY_THRESHOLD: f32 = 0.5;

fn main() -> Result<()> {
    env_logger::init();

    println!("Posture Monitor {}", env!("GIT_VERSION"));
    println!("Press Q or ESC to quit");

    let config = Config::load_or_default(CONFIG_PATH)?;
    let thresholds = Thresholds::new(
        config.posture.distance_threshold_close,
        config.posture.distance_threshold_good,
    )?;

    // カメラが開けなければここで終了
    let mut camera = OpenCvCamera::open_with_config(
        config.camera.index,
        Some(config.camera.width),
        Some(config.camera.height),
        Some(config.camera.fps),
    )?;
    let (width, height) = camera.resolution();
    info!("Camera {}: {}x{}", config.camera.index, width, height);

    println!("Loading model from {}...", config.detection.model_path);
    let mut detector = PoseDetector::new(
        &config.detection.model_path,
        config.detection.min_detection_confidence,
    )?;
    println!("Model loaded");

    let mut window = MonitorWindow::new("Posture Monitor", width as usize, height as usize)?;
    let alert_surface = AlertSurface::start();
    let mut logger = SessionLogger::new();
    let mut tracker = EpisodeTracker::new(Duration::from_secs(
        config.posture.bad_posture_threshold_secs,
    ));
    let mut bad_frames = 0usize;

    while window.is_open() {
        let mut frame = match camera.read_frame() {
            Ok(f) => f,
            Err(e) => {
                // フレームが来なくなったらストリーム終端として扱う
                warn!("Frame capture failed, stopping: {}", e);
                break;
            }
        };

        let detection =
            preprocess_for_blazepose(&frame).and_then(|input| detector.detect(input));

        let (category, nose_z, landmarks) = match &detection {
            Ok(Some(landmarks)) => {
                let z = landmarks.nose().z;
                (classify(Some(z), &thresholds), Some(z), Some(landmarks))
            }
            Ok(None) => (PostureCategory::NoPersonDetected, None, None),
            Err(e) => {
                warn!("Landmark extraction failed: {}", e);
                (PostureCategory::LandmarkError, None, None)
            }
        };

        let update = tracker.update(category, Instant::now());
        if update.fire_alert {
            info!(
                "Bad posture for {:.1}s, alerting",
                update.elapsed.as_secs_f32()
            );
            alert_surface.alert(AlertEvent {
                elapsed: update.elapsed,
            });
        }

        // 処理したフレームは結果によらず必ず1行記録する
        logger.log(category, nose_z);
        if category.is_bad() {
            bad_frames += 1;
        }

        draw_status(&mut frame, category, nose_z, update.elapsed, bad_frames)?;
        window.draw_frame(&frame)?;
        if let Some(landmarks) = landmarks {
            window.draw_landmarks(landmarks, VISIBILITY_THRESHOLD);
        }
        window.update()?;
    }

    println!("Shutting down...");
    if let Err(e) = camera.release() {
        warn!("Camera release failed: {}", e);
    }

    let path = logger.save(&config.log.output_dir)?;
    println!("Session log: {} ({} frames)", path.display(), logger.len());
    println!(
        "good: {}  okay: {}  bad: {}",
        logger.count(PostureCategory::WellPositioned),
        logger.count(PostureCategory::SlightlyLeaning),
        logger.count(PostureCategory::TooClose)
    );

    Ok(())
}

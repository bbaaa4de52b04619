use std::time::{Duration, Instant};

use super::classify::PostureCategory;

/// 悪い姿勢エピソードの進行状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EpisodeState {
    Clear,
    Tracking { started_at: Instant },
}

/// 1フレーム分の更新結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeUpdate {
    /// 連続して悪い姿勢だった時間
    pub elapsed: Duration,
    /// このフレームで警告を発するべきか
    pub fire_alert: bool,
}

/// 悪い姿勢の継続時間を追跡し、エピソードごとに一度だけ警告を出すゲート
///
/// 悪い姿勢以外のカテゴリ（未検出・抽出失敗を含む）を観測した時点で
/// エピソードは終了し、ゲートは再武装される。
pub struct EpisodeTracker {
    state: EpisodeState,
    alert_active: bool,
    alert_after: Duration,
}

impl EpisodeTracker {
    pub fn new(alert_after: Duration) -> Self {
        Self {
            state: EpisodeState::Clear,
            alert_active: false,
            alert_after,
        }
    }

    /// 現フレームのカテゴリで状態を進める
    pub fn update(&mut self, category: PostureCategory, now: Instant) -> EpisodeUpdate {
        if !category.is_bad() {
            self.state = EpisodeState::Clear;
            self.alert_active = false;
            return EpisodeUpdate {
                elapsed: Duration::ZERO,
                fire_alert: false,
            };
        }

        let started_at = match self.state {
            EpisodeState::Tracking { started_at } => started_at,
            EpisodeState::Clear => {
                self.state = EpisodeState::Tracking { started_at: now };
                now
            }
        };

        let elapsed = now.duration_since(started_at);
        let fire_alert = elapsed > self.alert_after && !self.alert_active;
        if fire_alert {
            self.alert_active = true;
        }

        EpisodeUpdate { elapsed, fire_alert }
    }

    /// 現エピソードで既に警告済みか
    pub fn alert_active(&self) -> bool {
        self.alert_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALERT_AFTER: Duration = Duration::from_secs(10);

    fn at(t0: Instant, secs: u64) -> Instant {
        t0 + Duration::from_secs(secs)
    }

    #[test]
    fn test_first_bad_frame_starts_episode_with_zero_elapsed() {
        let mut tracker = EpisodeTracker::new(ALERT_AFTER);
        let t0 = Instant::now();
        let update = tracker.update(PostureCategory::TooClose, t0);
        assert_eq!(update.elapsed, Duration::ZERO);
        assert!(!update.fire_alert);
    }

    #[test]
    fn test_elapsed_grows_within_episode() {
        let mut tracker = EpisodeTracker::new(ALERT_AFTER);
        let t0 = Instant::now();
        tracker.update(PostureCategory::TooClose, t0);
        let update = tracker.update(PostureCategory::TooClose, at(t0, 4));
        assert_eq!(update.elapsed, Duration::from_secs(4));
        assert!(!update.fire_alert);
    }

    #[test]
    fn test_no_alert_at_exact_threshold() {
        // 発火条件は「超過」であって「到達」ではない
        let mut tracker = EpisodeTracker::new(ALERT_AFTER);
        let t0 = Instant::now();
        tracker.update(PostureCategory::TooClose, t0);
        let update = tracker.update(PostureCategory::TooClose, at(t0, 10));
        assert!(!update.fire_alert);
    }

    #[test]
    fn test_exactly_one_alert_per_episode() {
        let mut tracker = EpisodeTracker::new(ALERT_AFTER);
        let t0 = Instant::now();
        let mut alerts = 0;
        for secs in 0..60 {
            let update = tracker.update(PostureCategory::TooClose, at(t0, secs));
            if update.fire_alert {
                alerts += 1;
            }
        }
        assert_eq!(alerts, 1);
        assert!(tracker.alert_active());
    }

    #[test]
    fn test_no_alert_if_threshold_never_crossed() {
        let mut tracker = EpisodeTracker::new(ALERT_AFTER);
        let t0 = Instant::now();
        for secs in 0..10 {
            let update = tracker.update(PostureCategory::TooClose, at(t0, secs));
            assert!(!update.fire_alert);
        }
    }

    #[test]
    fn test_good_frame_clears_and_rearms() {
        let mut tracker = EpisodeTracker::new(ALERT_AFTER);
        let t0 = Instant::now();
        tracker.update(PostureCategory::TooClose, t0);
        tracker.update(PostureCategory::TooClose, at(t0, 11));
        assert!(tracker.alert_active());

        let update = tracker.update(PostureCategory::WellPositioned, at(t0, 12));
        assert_eq!(update.elapsed, Duration::ZERO);
        assert!(!update.fire_alert);
        assert!(!tracker.alert_active());
    }

    #[test]
    fn test_two_episodes_two_alerts() {
        // Bad → Good → Bad で各エピソードに1回ずつ
        let mut tracker = EpisodeTracker::new(ALERT_AFTER);
        let t0 = Instant::now();
        let mut alerts = 0;

        for secs in 0..15 {
            if tracker.update(PostureCategory::TooClose, at(t0, secs)).fire_alert {
                alerts += 1;
            }
        }
        tracker.update(PostureCategory::WellPositioned, at(t0, 15));
        for secs in 16..31 {
            if tracker.update(PostureCategory::TooClose, at(t0, secs)).fire_alert {
                alerts += 1;
            }
        }

        assert_eq!(alerts, 2);
    }

    #[test]
    fn test_no_person_clears_episode() {
        let mut tracker = EpisodeTracker::new(ALERT_AFTER);
        let t0 = Instant::now();
        tracker.update(PostureCategory::TooClose, t0);
        tracker.update(PostureCategory::NoPersonDetected, at(t0, 5));

        // 検出が戻ってもエピソードは仕切り直し
        let update = tracker.update(PostureCategory::TooClose, at(t0, 6));
        assert_eq!(update.elapsed, Duration::ZERO);
    }

    #[test]
    fn test_landmark_error_clears_episode() {
        let mut tracker = EpisodeTracker::new(ALERT_AFTER);
        let t0 = Instant::now();
        tracker.update(PostureCategory::TooClose, t0);
        tracker.update(PostureCategory::TooClose, at(t0, 11));
        assert!(tracker.alert_active());

        tracker.update(PostureCategory::LandmarkError, at(t0, 12));
        assert!(!tracker.alert_active());
    }

    #[test]
    fn test_clear_stays_clear_on_good_frames() {
        let mut tracker = EpisodeTracker::new(ALERT_AFTER);
        let t0 = Instant::now();
        for secs in 0..100 {
            let update = tracker.update(PostureCategory::SlightlyLeaning, at(t0, secs));
            assert_eq!(update.elapsed, Duration::ZERO);
            assert!(!update.fire_alert);
        }
    }
}

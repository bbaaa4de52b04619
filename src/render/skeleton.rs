use crate::pose::LandmarkIndex;

/// 骨格の接続定義 (開始ランドマーク, 終了ランドマーク)
pub const SKELETON_CONNECTIONS: [(LandmarkIndex, LandmarkIndex); 24] = [
    // 顔
    (LandmarkIndex::LeftEar, LandmarkIndex::LeftEyeOuter),
    (LandmarkIndex::LeftEyeOuter, LandmarkIndex::LeftEye),
    (LandmarkIndex::LeftEye, LandmarkIndex::LeftEyeInner),
    (LandmarkIndex::LeftEyeInner, LandmarkIndex::Nose),
    (LandmarkIndex::Nose, LandmarkIndex::RightEyeInner),
    (LandmarkIndex::RightEyeInner, LandmarkIndex::RightEye),
    (LandmarkIndex::RightEye, LandmarkIndex::RightEyeOuter),
    (LandmarkIndex::RightEyeOuter, LandmarkIndex::RightEar),
    (LandmarkIndex::MouthLeft, LandmarkIndex::MouthRight),
    // 上半身
    (LandmarkIndex::LeftShoulder, LandmarkIndex::RightShoulder),
    (LandmarkIndex::LeftShoulder, LandmarkIndex::LeftElbow),
    (LandmarkIndex::LeftElbow, LandmarkIndex::LeftWrist),
    (LandmarkIndex::RightShoulder, LandmarkIndex::RightElbow),
    (LandmarkIndex::RightElbow, LandmarkIndex::RightWrist),
    // 胴体
    (LandmarkIndex::LeftShoulder, LandmarkIndex::LeftHip),
    (LandmarkIndex::RightShoulder, LandmarkIndex::RightHip),
    (LandmarkIndex::LeftHip, LandmarkIndex::RightHip),
    // 下半身
    (LandmarkIndex::LeftHip, LandmarkIndex::LeftKnee),
    (LandmarkIndex::LeftKnee, LandmarkIndex::LeftAnkle),
    (LandmarkIndex::LeftAnkle, LandmarkIndex::LeftHeel),
    (LandmarkIndex::LeftHeel, LandmarkIndex::LeftFootIndex),
    (LandmarkIndex::RightHip, LandmarkIndex::RightKnee),
    (LandmarkIndex::RightKnee, LandmarkIndex::RightAnkle),
    (LandmarkIndex::RightAnkle, LandmarkIndex::RightHeel),
];

/// ランドマークの色 (RGB)
pub const LANDMARK_COLOR: u32 = 0x00FF00; // 緑

/// 骨格線の色 (RGB)
pub const SKELETON_COLOR: u32 = 0xFFFF00; // 黄色

/// 可視度が低いランドマークの色 (RGB)
pub const LOW_VISIBILITY_COLOR: u32 = 0xFF0000; // 赤

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connections_within_landmark_range() {
        for (start, end) in SKELETON_CONNECTIONS.iter() {
            assert!((*start as usize) < LandmarkIndex::COUNT);
            assert!((*end as usize) < LandmarkIndex::COUNT);
        }
    }
}

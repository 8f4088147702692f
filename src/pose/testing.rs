//! テスト用の姿勢データ

use crate::pose::{Landmark, LandmarkIndex, LandmarkSet};

/// 640x480 画像上の立ち姿勢
///
/// id 11/13/15 の腕と両膝は一直線、id 12/14/16 の腕は曲げている。
pub(crate) fn standing_pose() -> LandmarkSet {
    use LandmarkIndex as L;

    let placed = [
        (L::Nose, 320, 80),
        (L::LeftEyeInner, 325, 70),
        (L::LeftShoulder, 380, 150),
        (L::RightShoulder, 260, 150),
        (L::LeftElbow, 440, 150),
        (L::RightElbow, 220, 210),
        (L::LeftWrist, 500, 150),
        (L::RightWrist, 220, 270),
        (L::LeftHip, 350, 300),
        (L::RightHip, 290, 300),
        (L::LeftKnee, 350, 400),
        (L::RightKnee, 290, 400),
        (L::LeftAnkle, 350, 470),
        (L::RightAnkle, 290, 470),
        (L::LeftHeel, 350, 475),
    ];

    let landmarks = (0..LandmarkIndex::COUNT)
        .map(|id| {
            placed
                .iter()
                .find(|(index, _, _)| index.id() == id)
                .map(|&(_, x, y)| Landmark::new(id, x, y, 0))
                .unwrap_or_else(|| Landmark::new(id, 320, 240, 0))
        })
        .collect();
    LandmarkSet::new(landmarks)
}

/// 指定ランドマークを動かしたコピー
pub(crate) fn moved(landmarks: &LandmarkSet, index: LandmarkIndex, x: i32, y: i32) -> LandmarkSet {
    LandmarkSet::new(
        landmarks
            .iter()
            .map(|lm| {
                if lm.id == index.id() {
                    Landmark::new(lm.id, x, y, lm.z)
                } else {
                    *lm
                }
            })
            .collect(),
    )
}

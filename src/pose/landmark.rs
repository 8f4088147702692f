use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::{PoseError, PoseResult};

/// MediaPipe Pose の 33 ランドマークインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const COUNT: usize = 33;

    const ALL: [Self; Self::COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn id(self) -> usize {
        self as usize
    }
}

/// 単一ランドマーク（ピクセル座標）
///
/// x, y は画像の幅・高さでスケールした整数ピクセル、z は幅でスケールした深度。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landmark {
    pub id: usize,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Landmark {
    pub fn new(id: usize, x: i32, y: i32, z: i32) -> Self {
        Self { id, x, y, z }
    }

    /// 角度計算用の2D点（z は使わない）
    pub fn point(&self) -> Point2<i32> {
        Point2::new(self.x, self.y)
    }
}

/// 1フレーム分のランドマーク集合
///
/// 次フレームでは置き換えられるだけで、変更はされない。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SerializedLandmarkSet")]
pub struct LandmarkSet {
    landmarks: Vec<Landmark>,
}

/// 読み込み時も id 順に並べ替えるための中間形式
#[derive(Deserialize)]
struct SerializedLandmarkSet {
    landmarks: Vec<Landmark>,
}

impl From<SerializedLandmarkSet> for LandmarkSet {
    fn from(raw: SerializedLandmarkSet) -> Self {
        Self::new(raw.landmarks)
    }
}

impl LandmarkSet {
    /// id 順に並べ替えて保持する
    pub fn new(mut landmarks: Vec<Landmark>) -> Self {
        landmarks.sort_by_key(|lm| lm.id);
        Self { landmarks }
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.iter()
    }

    /// インデックスでランドマークを取得
    ///
    /// 集合が空、または該当 id がなければ NoPoseDetected。
    pub fn get(&self, index: LandmarkIndex) -> PoseResult<&Landmark> {
        if self.landmarks.is_empty() {
            return Err(PoseError::no_pose("empty landmark set"));
        }
        let id = index.id();
        self.landmarks
            .binary_search_by_key(&id, |lm| lm.id)
            .map(|pos| &self.landmarks[pos])
            .map_err(|_| PoseError::no_pose(format!("landmark {id} ({index:?}) missing")))
    }

    pub fn point(&self, index: LandmarkIndex) -> PoseResult<Point2<i32>> {
        self.get(index).map(Landmark::point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_index_count() {
        assert_eq!(LandmarkIndex::COUNT, 33);
    }

    #[test]
    fn test_landmark_index_from_index() {
        assert_eq!(LandmarkIndex::from_index(0), Some(LandmarkIndex::Nose));
        assert_eq!(LandmarkIndex::from_index(11), Some(LandmarkIndex::LeftShoulder));
        assert_eq!(LandmarkIndex::from_index(32), Some(LandmarkIndex::RightFootIndex));
        assert_eq!(LandmarkIndex::from_index(33), None);
    }

    #[test]
    fn test_landmark_index_ids_match_position() {
        for i in 0..LandmarkIndex::COUNT {
            assert_eq!(LandmarkIndex::from_index(i).unwrap().id(), i);
        }
    }

    #[test]
    fn test_set_get_sorted() {
        let set = LandmarkSet::new(vec![
            Landmark::new(12, 260, 150, 0),
            Landmark::new(11, 380, 150, 0),
        ]);
        let ls = set.get(LandmarkIndex::LeftShoulder).unwrap();
        assert_eq!((ls.x, ls.y), (380, 150));
        assert_eq!(set.point(LandmarkIndex::RightShoulder).unwrap(), Point2::new(260, 150));
    }

    #[test]
    fn test_set_missing_landmark() {
        let set = LandmarkSet::new(vec![Landmark::new(11, 380, 150, 0)]);
        let err = set.get(LandmarkIndex::RightShoulder).unwrap_err();
        assert!(matches!(err, PoseError::NoPoseDetected(_)));
    }

    #[test]
    fn test_deserialize_unsorted() {
        let set: LandmarkSet = serde_json::from_str(
            r#"{"landmarks": [
                {"id": 12, "x": 260, "y": 150, "z": 0},
                {"id": 11, "x": 380, "y": 150, "z": 0},
                {"id": 0, "x": 320, "y": 80, "z": 0}
            ]}"#,
        )
        .unwrap();

        assert_eq!(set.point(LandmarkIndex::LeftShoulder).unwrap(), Point2::new(380, 150));
        assert_eq!(set.point(LandmarkIndex::Nose).unwrap(), Point2::new(320, 80));
        let ids: Vec<usize> = set.iter().map(|lm| lm.id).collect();
        assert_eq!(ids, vec![0, 11, 12]);
    }

    #[test]
    fn test_serialize_roundtrip_keeps_shape() {
        let set = LandmarkSet::new(vec![Landmark::new(12, 1, 2, 3), Landmark::new(11, 4, 5, 6)]);
        let json = serde_json::to_string(&set).unwrap();
        assert!(json.starts_with(r#"{"landmarks":"#));
        let back: LandmarkSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_empty_set() {
        let set = LandmarkSet::default();
        assert!(set.is_empty());
        assert!(matches!(
            set.get(LandmarkIndex::Nose),
            Err(PoseError::NoPoseDetected(_))
        ));
    }
}

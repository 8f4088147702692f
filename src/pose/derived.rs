use nalgebra::Point2;

use crate::error::PoseResult;
use crate::pose::{LandmarkIndex, LandmarkSet, PointRef};

/// ランドマーク集合から毎回計算し直す派生点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedPoints {
    /// 左右の肩の中点
    pub shoulder_center: Point2<i32>,
}

impl DerivedPoints {
    pub fn from_landmarks(landmarks: &LandmarkSet) -> PoseResult<Self> {
        Ok(Self {
            shoulder_center: shoulder_center(landmarks)?,
        })
    }

    /// 点の参照を具体的な2D点に解決
    pub fn resolve(&self, landmarks: &LandmarkSet, point: PointRef) -> PoseResult<Point2<i32>> {
        match point {
            PointRef::Landmark(index) => landmarks.point(index),
            PointRef::ShoulderCenter => Ok(self.shoulder_center),
        }
    }
}

/// 肩の中点 = 左右の肩の中点（ピクセル、切り捨て除算）
///
/// 和は i64 で取る。2つの i32 の中点は必ず i32 に収まる。
pub fn shoulder_center(landmarks: &LandmarkSet) -> PoseResult<Point2<i32>> {
    let left = landmarks.get(LandmarkIndex::LeftShoulder)?;
    let right = landmarks.get(LandmarkIndex::RightShoulder)?;

    Ok(Point2::new(
        midpoint(left.x, right.x),
        midpoint(left.y, right.y),
    ))
}

fn midpoint(a: i32, b: i32) -> i32 {
    (a as i64 + b as i64).div_euclid(2) as i32
}

/// i32 の範囲に丸める
fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// BBox（ピクセル座標）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn center(&self) -> Point2<i32> {
        Point2::new(
            saturate(self.x as i64 + (self.width as i64).div_euclid(2)),
            saturate(self.y as i64 + (self.height as i64).div_euclid(2)),
        )
    }
}

/// ランドマークから体のBBoxを推定
///
/// - 肩幅の半分を余白にする
/// - with_hands なら手首、そうでなければ肩を左右端にする
/// - 上端は左目の内側、下端は左かかと
///
/// 計算は i64 で行い、各値を i32 の範囲に丸める。
pub fn bounding_box(landmarks: &LandmarkSet, with_hands: bool) -> PoseResult<BoundingBox> {
    let left_shoulder = landmarks.get(LandmarkIndex::LeftShoulder)?;
    let right_shoulder = landmarks.get(LandmarkIndex::RightShoulder)?;
    let margin = (right_shoulder.x as i64 - left_shoulder.x as i64).abs() / 2;

    let (x1, x2) = if with_hands {
        let right_wrist = landmarks.get(LandmarkIndex::RightWrist)?;
        let left_wrist = landmarks.get(LandmarkIndex::LeftWrist)?;
        (right_wrist.x as i64 - margin, left_wrist.x as i64 + margin)
    } else {
        (right_shoulder.x as i64 - margin, left_shoulder.x as i64 + margin)
    };
    let y1 = landmarks.get(LandmarkIndex::LeftEyeInner)?.y as i64 - margin;
    let y2 = landmarks.get(LandmarkIndex::LeftHeel)?.y as i64 + margin;

    Ok(BoundingBox {
        x: saturate(x1),
        y: saturate(y1),
        width: saturate(x2 - x1),
        height: saturate(y2 - y1),
    })
}

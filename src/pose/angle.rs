//! 関節角度の計算
//!
//! 頂点 B における A と C のなす角（内角）を、内積から求める。
//! cos(θ) = (BA · BC) / (|BA| × |BC|)

use log::debug;
use nalgebra::Point2;

use crate::error::{PoseError, PoseResult};
use crate::pose::{BodyPart, DerivedPoints, LandmarkSet};

/// 丸め誤差として許容する cos の [-1, 1] からのはみ出し
const COSINE_TOLERANCE: f64 = 1e-9;

/// 3点から頂点 b の角度を度数で計算 (0〜180°)
///
/// - 180° = 一直線（腕を伸ばした状態）
/// - 90° = 直角に曲げた状態
///
/// 長さ0の線分はNaNを返さずに DegenerateGeometry。
pub fn joint_angle(
    part: BodyPart,
    a: Point2<i32>,
    b: Point2<i32>,
    c: Point2<i32>,
) -> PoseResult<f64> {
    let (a, b, c) = (a.cast::<f64>(), b.cast::<f64>(), c.cast::<f64>());
    let ba = a - b;
    let bc = c - b;

    let norm_ba = ba.norm();
    let norm_bc = bc.norm();
    if norm_ba == 0.0 || norm_bc == 0.0 {
        return Err(PoseError::degenerate(part, "zero-length segment"));
    }

    let cos_angle = ba.dot(&bc) / (norm_ba * norm_bc);
    if !cos_angle.is_finite() || cos_angle.abs() > 1.0 + COSINE_TOLERANCE {
        return Err(PoseError::degenerate(
            part,
            format!("cosine {cos_angle} outside [-1, 1]"),
        ));
    }

    Ok(cos_angle.clamp(-1.0, 1.0).acos().to_degrees())
}

/// 1部位の角度
pub fn compute_angle(
    landmarks: &LandmarkSet,
    derived: &DerivedPoints,
    part: BodyPart,
) -> PoseResult<f64> {
    let [a, b, c] = part.topology();
    joint_angle(
        part,
        derived.resolve(landmarks, a)?,
        derived.resolve(landmarks, b)?,
        derived.resolve(landmarks, c)?,
    )
}

/// 指定部位の角度を同じ順序で返す
pub fn compute_angles(
    landmarks: &LandmarkSet,
    derived: &DerivedPoints,
    parts: &[BodyPart],
) -> PoseResult<Vec<f64>> {
    if landmarks.is_empty() {
        return Err(PoseError::no_pose("empty landmark set"));
    }

    parts
        .iter()
        .map(|&part| {
            let angle = compute_angle(landmarks, derived, part)?;
            debug!("{part}: {angle:.2}°");
            Ok(angle)
        })
        .collect()
}

/// 派生点の計算も含めて角度を求める
pub fn body_angles(landmarks: &LandmarkSet, parts: &[BodyPart]) -> PoseResult<Vec<f64>> {
    if landmarks.is_empty() {
        return Err(PoseError::no_pose("empty landmark set"));
    }
    let derived = DerivedPoints::from_landmarks(landmarks)?;
    compute_angles(landmarks, &derived, parts)
}

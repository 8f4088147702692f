//! 基準姿勢とライブ姿勢の比較
//!
//! 部位ごとの関節角度を比べ、基準角度に対するずれ(%)が閾値以下の
//! 部位を「正解」と数える。正解数が最小数以上なら一致。

use log::debug;

use crate::config::ComparisonConfig;
use crate::error::{PoseError, PoseResult};
use crate::pose::{body_angles, BodyPart, LandmarkSet};

/// 基準角度0とみなす境界
const ZERO_ANGLE_EPSILON: f64 = 1e-12;

/// 1部位の比較結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointComparison {
    pub part: BodyPart,
    pub reference_angle: f64,
    pub live_angle: f64,
    /// |live - reference| / reference * 100
    pub deviation_percent: f64,
    pub mismatched: bool,
}

/// 比較結果
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonOutcome {
    pub matched: bool,
    /// 不一致だった部位のインデックス（要求順）
    pub mismatched_part_indices: Vec<usize>,
    pub joints: Vec<JointComparison>,
}

impl ComparisonOutcome {
    pub fn correct_count(&self) -> usize {
        self.joints.len() - self.mismatched_part_indices.len()
    }

    pub fn mismatched_parts(&self) -> Vec<BodyPart> {
        self.mismatched_part_indices
            .iter()
            .map(|&i| self.joints[i].part)
            .collect()
    }
}

/// 基準角度に対するずれ(%)
///
/// 基準角度が0だと割り算が定義できないので DegenerateGeometry。
pub fn deviation_percent(part: BodyPart, reference: f64, live: f64) -> PoseResult<f64> {
    if reference.abs() <= ZERO_ANGLE_EPSILON {
        return Err(PoseError::degenerate(part, "reference angle is zero"));
    }
    Ok((live - reference).abs() / reference * 100.0)
}

/// 角度の列同士を比較
///
/// 3つの列は同じ長さ（`body_angles` が部位ごとに1つ返す）。
pub(crate) fn compare_angles(
    parts: &[BodyPart],
    reference_angles: &[f64],
    live_angles: &[f64],
    threshold_percent: f64,
    min_correct_count: usize,
) -> PoseResult<ComparisonOutcome> {
    assert_eq!(parts.len(), reference_angles.len(), "reference angle count");
    assert_eq!(parts.len(), live_angles.len(), "live angle count");

    let mut joints = Vec::with_capacity(parts.len());
    let mut mismatched_part_indices = Vec::new();

    for (i, ((&part, &reference_angle), &live_angle)) in parts
        .iter()
        .zip(reference_angles)
        .zip(live_angles)
        .enumerate()
    {
        let deviation = deviation_percent(part, reference_angle, live_angle)?;
        let mismatched = deviation > threshold_percent;
        if mismatched {
            mismatched_part_indices.push(i);
        }
        debug!(
            "{part}: reference {reference_angle:.2}°, live {live_angle:.2}°, deviation {deviation:.1}%{}",
            if mismatched { " (mismatch)" } else { "" }
        );
        joints.push(JointComparison {
            part,
            reference_angle,
            live_angle,
            deviation_percent: deviation,
            mismatched,
        });
    }

    let correct_count = joints.len() - mismatched_part_indices.len();
    Ok(ComparisonOutcome {
        matched: correct_count >= min_correct_count,
        mismatched_part_indices,
        joints,
    })
}

/// 2つのランドマーク集合を比較
///
/// どちらかが空、または部位の計算に必要なランドマークが欠けていれば
/// NoPoseDetected（どちら側かをメッセージに含める）。
pub fn is_pose_correct(
    reference: &LandmarkSet,
    live: &LandmarkSet,
    parts: &[BodyPart],
    threshold_percent: f64,
    min_correct_count: usize,
) -> PoseResult<ComparisonOutcome> {
    let reference_angles = body_angles(reference, parts).map_err(|e| e.in_subject("reference"))?;
    let live_angles = body_angles(live, parts).map_err(|e| e.in_subject("live"))?;

    compare_angles(
        parts,
        &reference_angles,
        &live_angles,
        threshold_percent,
        min_correct_count,
    )
}

/// 設定済みの比較器
#[derive(Debug, Clone, PartialEq)]
pub struct PoseComparator {
    parts: Vec<BodyPart>,
    threshold_percent: f64,
    min_correct_count: usize,
}

impl PoseComparator {
    pub fn new(parts: Vec<BodyPart>, threshold_percent: f64, min_correct_count: usize) -> Self {
        Self {
            parts,
            threshold_percent,
            min_correct_count,
        }
    }

    /// 設定から作成。未知の部位キーは UnknownBodyPart
    pub fn from_config(config: &ComparisonConfig) -> PoseResult<Self> {
        Ok(Self::new(
            config.parts()?,
            config.threshold_percent,
            config.min_correct_count,
        ))
    }

    pub fn with_threshold(mut self, threshold_percent: f64) -> Self {
        self.threshold_percent = threshold_percent;
        self
    }

    pub fn with_min_correct_count(mut self, min_correct_count: usize) -> Self {
        self.min_correct_count = min_correct_count;
        self
    }

    pub fn parts(&self) -> &[BodyPart] {
        &self.parts
    }

    pub fn threshold_percent(&self) -> f64 {
        self.threshold_percent
    }

    pub fn min_correct_count(&self) -> usize {
        self.min_correct_count
    }

    pub fn compare(&self, reference: &LandmarkSet, live: &LandmarkSet) -> PoseResult<ComparisonOutcome> {
        is_pose_correct(
            reference,
            live,
            &self.parts,
            self.threshold_percent,
            self.min_correct_count,
        )
    }
}

impl Default for PoseComparator {
    fn default() -> Self {
        Self::new(BodyPart::ALL.to_vec(), 10.0, 4)
    }
}

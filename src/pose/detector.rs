use anyhow::Context;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::landmark::{Landmark, LandmarkSet};
use crate::config::DetectorConfig;
use crate::error::{PoseError, PoseResult};

/// 検出器が出力する正規化ランドマーク
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLandmark {
    /// 正規化されたX座標 (0.0〜1.0)
    pub x: f32,
    /// 正規化されたY座標 (0.0〜1.0)
    pub y: f32,
    /// 腰を原点とした相対深度（X と同じスケール）
    pub z: f32,
    /// 可視性スコア (0.0〜1.0)
    #[serde(default = "default_visibility")]
    pub visibility: f32,
}

fn default_visibility() -> f32 { 1.0 }

impl NormalizedLandmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility: default_visibility(),
        }
    }
}

/// 1画像分の検出結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub width: u32,
    pub height: u32,
    /// id 順のランドマーク。空なら人物なし
    #[serde(default)]
    pub landmarks: Vec<NormalizedLandmark>,
}

impl Detection {
    pub fn mean_visibility(&self) -> f32 {
        if self.landmarks.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.landmarks.iter().map(|lm| lm.visibility).sum();
        sum / self.landmarks.len() as f32
    }
}

/// 外部の姿勢推定器
///
/// 画像から正規化ランドマークを得る部分はこのクレートの外にある。
/// 人物が見つからなければ `Ok(None)`。
pub trait PoseEstimator {
    type Image: ?Sized;

    fn estimate(
        &mut self,
        image: &Self::Image,
        config: &DetectorConfig,
    ) -> anyhow::Result<Option<Detection>>;
}

/// 保存済みの検出結果 (JSON) を読み出す推定器
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordedEstimator;

impl PoseEstimator for RecordedEstimator {
    type Image = Path;

    fn estimate(&mut self, path: &Path, _config: &DetectorConfig) -> anyhow::Result<Option<Detection>> {
        let detection = load_detection(path)?;
        if detection.landmarks.is_empty() {
            return Ok(None);
        }
        Ok(Some(detection))
    }
}

/// 検出結果をピクセル座標のランドマーク集合に変換
pub struct LandmarkAdapter {
    config: DetectorConfig,
}

impl LandmarkAdapter {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// 推定器を呼び出して変換まで行う
    pub fn detect<E: PoseEstimator>(
        &self,
        estimator: &mut E,
        image: &E::Image,
    ) -> PoseResult<LandmarkSet> {
        let detection = estimator.estimate(image, &self.config)?;
        self.landmarks(detection.as_ref())
    }

    /// - x, y: 幅・高さを掛けて0方向に切り捨て
    /// - z: 幅を掛けて0方向に切り捨て
    /// - id: 並び順
    pub fn landmarks(&self, detection: Option<&Detection>) -> PoseResult<LandmarkSet> {
        let detection = match detection {
            Some(d) if !d.landmarks.is_empty() => d,
            _ => return Err(PoseError::no_pose("detector found no person")),
        };

        let visibility = detection.mean_visibility();
        if visibility < self.config.min_detection_confidence {
            return Err(PoseError::no_pose(format!(
                "mean visibility {visibility:.2} below {:.2}",
                self.config.min_detection_confidence
            )));
        }

        let w = detection.width as f64;
        let h = detection.height as f64;
        let landmarks = detection
            .landmarks
            .iter()
            .enumerate()
            .map(|(id, lm)| {
                Landmark::new(
                    id,
                    (lm.x as f64 * w) as i32,
                    (lm.y as f64 * h) as i32,
                    (lm.z as f64 * w) as i32,
                )
            })
            .collect();

        debug!(
            "{} landmarks on {}x{} image",
            detection.landmarks.len(),
            detection.width,
            detection.height
        );
        Ok(LandmarkSet::new(landmarks))
    }
}

// --- Save / Load ---

pub fn save_detection<P: AsRef<Path>>(path: P, detection: &Detection) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(detection)?;
    fs::write(path, json).context("Failed to write detection file")?;
    Ok(())
}

pub fn load_detection<P: AsRef<Path>>(path: P) -> anyhow::Result<Detection> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read detection file {}", path.display()))?;
    let detection: Detection = serde_json::from_str(&content)
        .with_context(|| format!("Invalid detection file {}", path.display()))?;
    Ok(detection)
}

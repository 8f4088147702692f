use anyhow::{bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::PoseResult;
use crate::pose::{parse_body_parts, BodyPart};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub comparison: ComparisonConfig,
    #[serde(default)]
    pub annotate: AnnotateConfig,
}

/// 姿勢検出器の設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// 静止画モード（フレームごとに検出し直す）
    #[serde(default)]
    pub static_image_mode: bool,
    /// ランドマークの平滑化
    #[serde(default = "default_true")]
    pub smooth_landmarks: bool,
    /// 検出の最小信頼度
    #[serde(default = "default_confidence")]
    pub min_detection_confidence: f32,
    /// トラッキングの最小信頼度
    #[serde(default = "default_confidence")]
    pub min_tracking_confidence: f32,
}

/// 姿勢比較の設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// 比較する部位（順序は結果のインデックスになる）
    #[serde(default = "default_body_parts")]
    pub body_parts: Vec<String>,
    /// 許容する角度のずれ（基準角度に対する%）
    #[serde(default = "default_threshold_percent")]
    pub threshold_percent: f64,
    /// 一致とみなす最小の正解部位数
    #[serde(default = "default_min_correct_count")]
    pub min_correct_count: usize,
}

/// 判定結果の描画設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotateConfig {
    /// BBoxを描画
    #[serde(default = "default_true")]
    pub bbox: bool,
    /// BBoxの左右端を手首にする
    #[serde(default = "default_true")]
    pub bbox_with_hands: bool,
}

fn default_true() -> bool { true }
fn default_confidence() -> f32 { 0.5 }
fn default_body_parts() -> Vec<String> {
    BodyPart::ALL.iter().map(|part| part.key().to_string()).collect()
}
fn default_threshold_percent() -> f64 { 10.0 }
fn default_min_correct_count() -> usize { 4 }

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            static_image_mode: false,
            smooth_landmarks: default_true(),
            min_detection_confidence: default_confidence(),
            min_tracking_confidence: default_confidence(),
        }
    }
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            body_parts: default_body_parts(),
            threshold_percent: default_threshold_percent(),
            min_correct_count: default_min_correct_count(),
        }
    }
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            bbox: default_true(),
            bbox_with_hands: default_true(),
        }
    }
}

impl ComparisonConfig {
    /// 部位キーを解決。未知のキーは UnknownBodyPart
    pub fn parts(&self) -> PoseResult<Vec<BodyPart>> {
        parse_body_parts(&self.body_parts)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.threshold_percent.is_finite() || self.threshold_percent < 0.0 {
            bail!("threshold_percent must be a non-negative number, got {}", self.threshold_percent);
        }
        let parts = self.parts()?;
        if parts.is_empty() {
            bail!("body_parts must not be empty");
        }
        if self.min_correct_count == 0 || self.min_correct_count > parts.len() {
            warn!(
                "min_correct_count {} is outside 1..={}; every comparison will {}",
                self.min_correct_count,
                parts.len(),
                if self.min_correct_count == 0 { "match" } else { "fail" }
            );
        }
        Ok(())
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("min_detection_confidence", self.min_detection_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{name} must be within 0.0..=1.0, got {value}");
            }
        }
        Ok(())
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// 読み込めなければデフォルト設定
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e:#}; using default config");
                Self::default()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).context("Failed to write config")?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.detector.validate()?;
        self.comparison.validate()?;
        Ok(())
    }
}

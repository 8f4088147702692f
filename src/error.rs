use thiserror::Error;

use crate::pose::BodyPart;

/// 姿勢比較の結果型
pub type PoseResult<T> = Result<T, PoseError>;

/// 姿勢比較で発生するエラー
///
/// いずれも「不一致」とは区別して呼び出し側へ返す。
#[derive(Debug, Error)]
pub enum PoseError {
    /// 画像から人物が検出されなかった、または必要なランドマークが欠けている
    #[error("no pose detected: {0}")]
    NoPoseDetected(String),

    /// 角度トポロジーに存在しない部位キー
    #[error("unknown body part: {0:?}")]
    UnknownBodyPart(String),

    /// 長さ0のベクトルや基準角度0など、計算が定義できない幾何
    #[error("degenerate geometry at {part}: {detail}")]
    DegenerateGeometry { part: BodyPart, detail: String },

    /// 外部の姿勢推定器の失敗
    #[error(transparent)]
    Estimator(#[from] anyhow::Error),
}

impl PoseError {
    pub fn no_pose(detail: impl Into<String>) -> Self {
        Self::NoPoseDetected(detail.into())
    }

    pub fn degenerate(part: BodyPart, detail: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            part,
            detail: detail.into(),
        }
    }

    /// NoPoseDetected に基準/ライブのどちら側かを付け加える
    pub(crate) fn in_subject(self, subject: &str) -> Self {
        match self {
            Self::NoPoseDetected(detail) => Self::NoPoseDetected(format!("{subject}: {detail}")),
            other => other,
        }
    }
}

use std::fmt;
use std::str::FromStr;

use crate::error::{PoseError, PoseResult};
use crate::pose::LandmarkIndex;

/// 角度計算に使う点の参照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRef {
    Landmark(LandmarkIndex),
    /// 左右の肩の中点（派生点）
    ShoulderCenter,
}

/// 角度を計算する部位
///
/// 左右の名前は鏡像（セルフィー）表示を前提にしたもので、
/// 例えば `RightShoulder` は id 11/13 の左側ランドマークを使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Head,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftKnee,
    RightKnee,
}

impl BodyPart {
    /// 比較に使うデフォルトの部位と順序
    pub const ALL: [BodyPart; 7] = [
        BodyPart::Head,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftElbow,
        BodyPart::RightElbow,
        BodyPart::LeftKnee,
        BodyPart::RightKnee,
    ];

    pub fn key(self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::LeftShoulder => "left_shoulder",
            BodyPart::RightShoulder => "right_shoulder",
            BodyPart::LeftElbow => "left_elbow",
            BodyPart::RightElbow => "right_elbow",
            BodyPart::LeftKnee => "left_knee",
            BodyPart::RightKnee => "right_knee",
        }
    }

    /// (A, B, C): B が頂点
    pub fn topology(self) -> [PointRef; 3] {
        use LandmarkIndex as L;
        use PointRef::{Landmark as Lm, ShoulderCenter as Center};

        match self {
            BodyPart::RightShoulder => [Center, Lm(L::LeftShoulder), Lm(L::LeftElbow)],
            BodyPart::LeftShoulder => [Center, Lm(L::RightShoulder), Lm(L::RightElbow)],
            BodyPart::RightElbow => [Lm(L::LeftShoulder), Lm(L::LeftElbow), Lm(L::LeftWrist)],
            BodyPart::LeftElbow => [Lm(L::RightShoulder), Lm(L::RightElbow), Lm(L::RightWrist)],
            BodyPart::RightKnee => [Lm(L::LeftHip), Lm(L::LeftKnee), Lm(L::LeftAnkle)],
            BodyPart::LeftKnee => [Lm(L::RightHip), Lm(L::RightKnee), Lm(L::RightAnkle)],
            BodyPart::Head => [Lm(L::Nose), Center, Lm(L::RightShoulder)],
        }
    }

    /// 頂点 B のランドマーク（派生点ならNone）
    pub fn vertex(self) -> Option<LandmarkIndex> {
        match self.topology()[1] {
            PointRef::Landmark(index) => Some(index),
            PointRef::ShoulderCenter => None,
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BodyPart {
    type Err = PoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BodyPart::ALL
            .into_iter()
            .find(|part| part.key() == s)
            .ok_or_else(|| PoseError::UnknownBodyPart(s.to_string()))
    }
}

/// 文字列キーの列を部位に変換。未知のキーがあれば UnknownBodyPart
pub fn parse_body_parts<S: AsRef<str>>(keys: &[S]) -> PoseResult<Vec<BodyPart>> {
    keys.iter().map(|key| key.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_roundtrip() {
        for part in BodyPart::ALL {
            assert_eq!(part.key().parse::<BodyPart>().unwrap(), part);
        }
    }

    #[test]
    fn test_unknown_key() {
        let err = "left_ankle".parse::<BodyPart>().unwrap_err();
        assert!(matches!(err, PoseError::UnknownBodyPart(ref k) if k == "left_ankle"));
    }

    #[test]
    fn test_parse_body_parts_keeps_order() {
        let parts = parse_body_parts(&["right_knee", "head"]).unwrap();
        assert_eq!(parts, vec![BodyPart::RightKnee, BodyPart::Head]);

        assert!(parse_body_parts(&["head", "Head"]).is_err());
    }

    #[test]
    fn test_topology_ids() {
        // 元の設定どおりの id を使うこと
        let ids = |part: BodyPart| -> Vec<Option<usize>> {
            part.topology()
                .iter()
                .map(|r| match r {
                    PointRef::Landmark(index) => Some(index.id()),
                    PointRef::ShoulderCenter => None,
                })
                .collect()
        };
        assert_eq!(ids(BodyPart::RightShoulder), vec![None, Some(11), Some(13)]);
        assert_eq!(ids(BodyPart::LeftShoulder), vec![None, Some(12), Some(14)]);
        assert_eq!(ids(BodyPart::RightElbow), vec![Some(11), Some(13), Some(15)]);
        assert_eq!(ids(BodyPart::LeftElbow), vec![Some(12), Some(14), Some(16)]);
        assert_eq!(ids(BodyPart::RightKnee), vec![Some(23), Some(25), Some(27)]);
        assert_eq!(ids(BodyPart::LeftKnee), vec![Some(24), Some(26), Some(28)]);
        assert_eq!(ids(BodyPart::Head), vec![Some(0), None, Some(12)]);
    }

    #[test]
    fn test_vertex() {
        assert_eq!(BodyPart::RightElbow.vertex(), Some(LandmarkIndex::LeftElbow));
        assert_eq!(BodyPart::Head.vertex(), None);
    }
}

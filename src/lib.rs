pub mod compare;
pub mod config;
pub mod error;
pub mod pose;
pub mod render;

pub use compare::{is_pose_correct, ComparisonOutcome, JointComparison, PoseComparator};
pub use error::{PoseError, PoseResult};

pub mod angle;
pub mod derived;
pub mod detector;
pub mod landmark;
pub mod topology;
#[cfg(test)]
pub(crate) mod testing;

pub use angle::{body_angles, compute_angle, compute_angles, joint_angle};
pub use derived::{bounding_box, shoulder_center, BoundingBox, DerivedPoints};
pub use detector::{
    load_detection, save_detection, Detection, LandmarkAdapter, NormalizedLandmark, PoseEstimator,
    RecordedEstimator,
};
pub use landmark::{Landmark, LandmarkIndex, LandmarkSet};
pub use topology::{parse_body_parts, BodyPart, PointRef};

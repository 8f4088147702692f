pub mod canvas;
pub mod skeleton;

pub use canvas::Canvas;
pub use skeleton::SKELETON_CONNECTIONS;

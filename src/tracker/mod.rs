pub mod angle;
pub mod exercise;
pub mod session;

pub use angle::joint_angle;
pub use exercise::Exercise;
pub use session::{ExerciseSession, Phase};

mod camera;
mod transform;
mod viewport;

pub use camera::{CameraMatrices, CameraSettings};
pub use transform::{GlobalTransform, Transform};
pub use viewport::{Destination, Viewport};

mod camera;
mod transform;

pub use camera::{
    CameraError, CameraSystem, CameraSystemConfig, DEPTH_BIAS, DestinationSnapshot,
    EvaluationReport, NEAR_PLANE_OFFSET, UnresolvedViewport, camera_matrices,
    orthographic_matrices, perspective_matrices, resolve_destination,
};
pub use transform::UpdateGlobalTransforms;

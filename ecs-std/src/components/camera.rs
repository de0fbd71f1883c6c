use glam::Mat4;

/// Camera configuration authored on a camera entity.
///
/// `size` is interpreted per projection kind: the vertical field of view in
/// radians for perspective cameras, and world units per destination pixel
/// for orthographic cameras.
///
/// The [`CameraSystem`](crate::systems::CameraSystem) reads this every tick
/// and never writes it.
#[derive(Debug, Clone, Copy, PartialEq, vantage_ecs::Component)]
pub struct CameraSettings {
    /// Selects the orthographic projection when set.
    pub orthographic: bool,
    /// Vertical FOV (radians) or world units per pixel.
    pub size: f32,
    /// Near end of the depth range, before the near-plane offset.
    pub depth_min: f32,
    /// Far end of the depth range.
    pub depth_max: f32,
}

impl CameraSettings {
    /// Create perspective settings from a vertical FOV in radians.
    pub fn perspective(yfov: f32, depth_min: f32, depth_max: f32) -> Self {
        Self {
            orthographic: false,
            size: yfov,
            depth_min,
            depth_max,
        }
    }

    /// Create orthographic settings from a world-units-per-pixel scale.
    pub fn orthographic(size: f32, depth_min: f32, depth_max: f32) -> Self {
        Self {
            orthographic: true,
            size,
            depth_min,
            depth_max,
        }
    }

    /// Depth range as `(min, max)`.
    pub fn depth(&self) -> (f32, f32) {
        (self.depth_min, self.depth_max)
    }
}

/// View and projection matrices derived from [`CameraSettings`].
///
/// Added automatically to every entity with settings and overwritten by the
/// camera system each tick. A camera whose destination cannot be resolved
/// keeps the matrices of the last successful update.
#[derive(
    Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, vantage_ecs::Component,
)]
#[repr(C)]
pub struct CameraMatrices {
    /// Computed projection matrix.
    pub projection: Mat4,
    /// Computed view matrix (world-to-camera).
    pub view: Mat4,
}

impl CameraMatrices {
    /// Compute the view-projection matrix (projection * view).
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

impl Default for CameraMatrices {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
        }
    }
}

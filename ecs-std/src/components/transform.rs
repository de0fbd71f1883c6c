use glam::{Mat4, Quat, Vec3};

/// Local transform of an entity.
///
/// Stores translation, rotation, and scale.
///
/// Padding fields (`_pad*`) are required for `bytemuck::Pod` because
/// Quat has 16-byte SIMD alignment on x86_64.
#[derive(
    Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, vantage_ecs::Component,
)]
#[repr(C)]
pub struct Transform {
    /// Translation in world units.
    pub translation: Vec3,
    _pad0: f32,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Non-uniform scale.
    pub scale: Vec3,
    _pad1: f32,
}

impl Transform {
    /// Identity transform: origin position, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        _pad0: 0.0,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
        _pad1: 0.0,
    };

    /// Create from translation, rotation, and scale.
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            _pad0: 0.0,
            rotation,
            scale,
            _pad1: 0.0,
        }
    }

    /// Create from translation only (identity rotation and scale).
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Create from rotation only (origin position and unit scale).
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Create from a position and a point to face, keeping `up` as the
    /// vertical reference.
    pub fn looking_at(translation: Vec3, target: Vec3, up: Vec3) -> Self {
        // look_at_rh yields world-to-view; the entity needs view-to-world.
        let view = Mat4::look_at_rh(translation, target, up);
        let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Compute the local 4x4 transform matrix (T * R * S).
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// World-space transform as a 4x4 matrix.
///
/// Computed by the [`UpdateGlobalTransforms`](crate::systems::UpdateGlobalTransforms)
/// system from the local [`Transform`]. Cameras read their position and
/// orientation from here; an entity without one is treated as sitting at
/// the origin with identity orientation.
#[derive(
    Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, vantage_ecs::Component,
)]
#[repr(C)]
pub struct GlobalTransform(pub Mat4);

impl GlobalTransform {
    /// Identity global transform.
    pub const IDENTITY: Self = Self(Mat4::IDENTITY);

    /// Extract the world-space translation.
    pub fn translation(&self) -> Vec3 {
        self.0.w_axis.truncate()
    }

    /// Get the forward direction vector (-Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        -self.0.z_axis.truncate().normalize()
    }

    /// Get the right direction vector (+X).
    pub fn right(&self) -> Vec3 {
        self.0.x_axis.truncate().normalize()
    }

    /// Get the up direction vector (+Y).
    pub fn up(&self) -> Vec3 {
        self.0.y_axis.truncate().normalize()
    }
}

impl Default for GlobalTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn identity_transform() {
        let t = Transform::IDENTITY;
        assert_eq!(t.translation, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn identity_matrix() {
        let t = Transform::IDENTITY;
        assert_eq!(t.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn from_translation() {
        let t = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn to_matrix_translation() {
        let t = Transform::from_translation(Vec3::new(5.0, 10.0, 15.0));
        let mat = t.to_matrix();
        let gt = GlobalTransform(mat);
        assert!((gt.translation() - Vec3::new(5.0, 10.0, 15.0)).length() < 1e-6);
    }

    #[test]
    fn global_transform_directions() {
        let gt = GlobalTransform::IDENTITY;
        assert!((gt.forward() - Vec3::NEG_Z).length() < 1e-6);
        assert!((gt.right() - Vec3::X).length() < 1e-6);
        assert!((gt.up() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn rotated_forward() {
        let t = Transform::from_rotation(Quat::from_rotation_y(FRAC_PI_2));
        let gt = GlobalTransform(t.to_matrix());
        // 90 degrees around Y turns -Z into -X
        assert!((gt.forward() - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn looking_at_faces_target() {
        let t = Transform::looking_at(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(5.0, 0.0, 5.0),
            Vec3::Y,
        );
        let gt = GlobalTransform(t.to_matrix());
        assert!((gt.forward() - Vec3::X).length() < 1e-5);
        assert!((gt.up() - Vec3::Y).length() < 1e-5);
        assert!((gt.translation() - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-6);
    }
}

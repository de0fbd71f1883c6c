//! Math type aliases and helper functions.
//!
//! All rendering math is f32 and backed by glam. Projection helpers use the
//! right-handed convention with a `[0, 1]` depth range (wgpu/Vulkan).
//!
//! Matrices are column-major with column vectors. The element a row-vector
//! library would call `M43` (row 4, column 3) lives at `w_axis.z` here, and
//! `M11` at `x_axis.x`.

pub use glam;

/// 2D vector (f32).
pub type Vec2 = glam::Vec2;

/// 3D vector (f32).
pub type Vec3 = glam::Vec3;

/// 4D vector (f32).
pub type Vec4 = glam::Vec4;

/// 4x4 matrix (f32).
pub type Mat4 = glam::Mat4;

/// Quaternion (f32).
pub type Quat = glam::Quat;

/// Build a right-handed perspective projection with depth range [0, 1].
///
/// `yfov` is the vertical field of view in radians.
pub fn perspective_rh(yfov: f32, aspect: f32, znear: f32, zfar: f32) -> Mat4 {
    Mat4::perspective_rh(yfov, aspect, znear, zfar)
}

/// Build a right-handed off-center orthographic projection with depth range [0, 1].
pub fn orthographic_rh(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    Mat4::orthographic_rh(left, right, bottom, top, near, far)
}

/// Right-handed look-at view matrix.
pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(eye, target, up)
}

/// Build a translation-only 4x4 matrix.
pub fn mat4_from_translation(t: Vec3) -> Mat4 {
    Mat4::from_translation(t)
}

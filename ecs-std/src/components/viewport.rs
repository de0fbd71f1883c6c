use vantage_ecs::RefSlot;

/// Links a camera to the entity it renders into.
///
/// `destination` is a slot in the camera entity's own reference table (see
/// [`World::add_reference`](vantage_ecs::World::add_reference)). The link is
/// weak: the destination may be despawned at any time, in which case the
/// camera is simply not updated. [`RefSlot::NULL`] means "no destination".
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    vantage_ecs::Component,
)]
#[repr(C)]
pub struct Viewport {
    /// Reference slot of the destination entity.
    pub destination: RefSlot,
}

impl Viewport {
    pub fn new(destination: RefSlot) -> Self {
        Self { destination }
    }
}

/// Pixel dimensions of a render destination.
///
/// Sizes are decided elsewhere; cameras only read a per-tick copy.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    vantage_ecs::Component,
)]
#[repr(C)]
pub struct Destination {
    pub width: u32,
    pub height: u32,
}

impl Destination {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

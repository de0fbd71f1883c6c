//! Camera matrix provisioning and evaluation.
//!
//! [`CameraSystem`] runs three phases every tick:
//!
//! 1. **Snapshot**: copy every [`Destination`] into a dense table indexed by
//!    entity index ([`DestinationSnapshot`]).
//! 2. **Provision**: give every entity with [`CameraSettings`] but no
//!    [`CameraMatrices`] a default one, applied as a single [`Operation`].
//! 3. **Evaluate**: for every camera with settings, matrices and a
//!    [`Viewport`], resolve the destination and recompute the view and
//!    projection matrices from the camera's [`GlobalTransform`].
//!
//! Projections use the right-handed `[0, 1]` depth convention from
//! [`vantage_core::math`], with two fixed adjustments applied afterwards: a
//! [`DEPTH_BIAS`] added to the depth translation term, and (perspective only)
//! a negated X scale.

use std::collections::TryReserveError;

use thiserror::Error;
use vantage_core::math::{look_at_rh, mat4_from_translation, orthographic_rh, perspective_rh};
use vantage_ecs::{
    ComponentMask, EcsError, Entity, Operation, ResolveReference, System, SystemError,
    SystemResult, World,
};

use crate::components::{CameraMatrices, CameraSettings, Destination, GlobalTransform, Viewport};

/// Added to the authored minimum depth to get the near plane distance.
pub const NEAR_PLANE_OFFSET: f32 = 0.1;

/// Added to the projection's depth translation term (`w_axis.z`).
pub const DEPTH_BIAS: f32 = 0.1;

/// Errors raised by the camera system.
#[derive(Error, Debug)]
pub enum CameraError {
    /// The destination snapshot could not grow to the required size.
    #[error("failed to grow destination snapshot to {capacity} entries")]
    SnapshotCapacity {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },

    #[error(transparent)]
    Ecs(#[from] EcsError),
}

/// What to do when a camera's viewport does not resolve to a destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnresolvedViewport {
    /// Stop evaluating for this tick. Cameras later in the pass keep their
    /// previous matrices.
    #[default]
    AbortPass,
    /// Leave only the failing camera untouched and continue with the rest.
    SkipCamera,
}

/// Configuration for [`CameraSystem`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CameraSystemConfig {
    pub unresolved: UnresolvedViewport,
}

impl CameraSystemConfig {
    pub fn with_unresolved(mut self, unresolved: UnresolvedViewport) -> Self {
        self.unresolved = unresolved;
        self
    }
}

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationReport {
    /// Cameras whose matrices were rewritten.
    pub updated: usize,
    /// Cameras whose viewport did not resolve.
    pub unresolved: usize,
    /// Whether the pass stopped early on an unresolved viewport.
    pub aborted: bool,
}

// ---------------------------------------------------------------------------
// Destination snapshot
// ---------------------------------------------------------------------------

/// Dense per-tick copy of every [`Destination`], indexed by entity index.
///
/// The table only grows, always to a power of two, and is cleared before
/// each rebuild so entries of despawned destinations never survive a tick.
/// Entities that are not destinations read as [`Destination::default`].
#[derive(Debug, Default)]
pub struct DestinationSnapshot {
    entries: Vec<Destination>,
}

impl DestinationSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the table from the current world.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::SnapshotCapacity`] if the table cannot grow.
    pub fn rebuild(&mut self, world: &World) -> Result<(), CameraError> {
        vantage_core::profile_scope!("destination_snapshot");

        let required = world
            .max_entity_index()
            .map_or(0, |max| (max as usize + 1).next_power_of_two());
        if required > self.entries.len() {
            self.entries
                .try_reserve_exact(required - self.entries.len())
                .map_err(|source| CameraError::SnapshotCapacity {
                    capacity: required,
                    source,
                })?;
            self.entries.resize(required, Destination::default());
        }
        self.entries.fill(Destination::default());

        // Nothing to copy until some destination has been registered.
        let Ok(destinations) = world.read::<Destination>() else {
            return Ok(());
        };
        for (index, destination) in destinations.iter() {
            if let Some(entry) = self.entries.get_mut(index as usize) {
                *entry = *destination;
            }
        }
        log::trace!(
            "destination snapshot: {} destination(s), capacity {}",
            destinations.len(),
            self.entries.len()
        );
        Ok(())
    }

    /// Destination stored for an entity index, or the zero default.
    pub fn get(&self, index: u32) -> Destination {
        self.entries
            .get(index as usize)
            .copied()
            .unwrap_or_default()
    }

    /// Number of entries in the table.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }
}

// ---------------------------------------------------------------------------
// Reference resolution
// ---------------------------------------------------------------------------

/// Resolves a camera's viewport to its live destination entity.
///
/// Returns `None` for a null slot, a slot the owner never filled, or a
/// target that has been despawned.
pub fn resolve_destination(
    resolver: &impl ResolveReference,
    owner: Entity,
    viewport: &Viewport,
) -> Option<Entity> {
    if viewport.destination.is_null() {
        return None;
    }
    let target = resolver.resolve_reference(owner, viewport.destination)?;
    resolver.contains_entity(target).then_some(target)
}

// ---------------------------------------------------------------------------
// Matrix math
// ---------------------------------------------------------------------------

/// Perspective camera matrices.
///
/// The view looks from the camera position along its forward axis. The
/// projection is a standard right-handed perspective with the depth bias
/// added and the X scale negated.
pub fn perspective_matrices(
    settings: &CameraSettings,
    global: &GlobalTransform,
    destination: &Destination,
) -> CameraMatrices {
    let (depth_min, depth_max) = settings.depth();
    let position = global.translation();
    let view = look_at_rh(position, position + global.forward(), global.up());

    let mut projection = perspective_rh(
        settings.size,
        destination.aspect_ratio(),
        depth_min + NEAR_PLANE_OFFSET,
        depth_max,
    );
    projection.w_axis.z += DEPTH_BIAS;
    projection.x_axis.x = -projection.x_axis.x;

    CameraMatrices { projection, view }
}

/// Orthographic camera matrices.
///
/// The projection covers `size * width` by `size * height` world units from
/// the origin. Orientation is ignored: the view is a translation by the
/// negated camera position.
pub fn orthographic_matrices(
    settings: &CameraSettings,
    global: &GlobalTransform,
    destination: &Destination,
) -> CameraMatrices {
    let (depth_min, depth_max) = settings.depth();
    let extent_x = settings.size * destination.width as f32;
    let extent_y = settings.size * destination.height as f32;

    let mut projection = orthographic_rh(
        0.0,
        extent_x,
        0.0,
        extent_y,
        depth_min + NEAR_PLANE_OFFSET,
        depth_max,
    );
    projection.w_axis.z += DEPTH_BIAS;

    CameraMatrices {
        projection,
        view: mat4_from_translation(-global.translation()),
    }
}

/// Matrices for a camera, picking the branch from its settings.
pub fn camera_matrices(
    settings: &CameraSettings,
    global: &GlobalTransform,
    destination: &Destination,
) -> CameraMatrices {
    if settings.orthographic {
        orthographic_matrices(settings, global, destination)
    } else {
        perspective_matrices(settings, global, destination)
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// System that provisions and updates [`CameraMatrices`].
///
/// Keeps its destination snapshot and pending operation between ticks.
/// Must run after [`UpdateGlobalTransforms`](super::UpdateGlobalTransforms).
///
/// # Access
///
/// - Reads: `CameraSettings`, `Viewport`, `Destination`, `GlobalTransform`
/// - Writes: `CameraMatrices` (and adds it where missing)
#[derive(Default)]
pub struct CameraSystem {
    config: CameraSystemConfig,
    snapshot: DestinationSnapshot,
    provision: Operation,
    last_report: EvaluationReport,
}

impl CameraSystem {
    /// Creates a camera system with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CameraSystemConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &CameraSystemConfig {
        &self.config
    }

    /// Destination table built by the most recent tick.
    pub fn snapshot(&self) -> &DestinationSnapshot {
        &self.snapshot
    }

    /// Report of the most recent evaluation pass.
    pub fn last_report(&self) -> EvaluationReport {
        self.last_report
    }

    /// Runs one full tick: snapshot, provision, evaluate.
    ///
    /// # Errors
    ///
    /// Fails if the snapshot cannot grow or a storage operation fails.
    /// Unresolved viewports are not errors; they show up in the report.
    pub fn update(&mut self, world: &mut World) -> Result<EvaluationReport, CameraError> {
        vantage_core::profile_scope!("camera_system");

        world.register_component::<CameraSettings>();
        world.register_component::<CameraMatrices>();
        world.register_component::<Viewport>();
        world.register_component::<Destination>();

        self.snapshot.rebuild(world)?;
        self.provision(world)?;
        let report = self.evaluate(world)?;

        log::trace!(
            "camera tick: {} updated, {} unresolved{}",
            report.updated,
            report.unresolved,
            if report.aborted { ", aborted" } else { "" }
        );
        vantage_core::profile_plot!("cameras_updated", report.updated);
        self.last_report = report;
        Ok(report)
    }

    /// Adds default [`CameraMatrices`] to every entity that has
    /// [`CameraSettings`] without them. Returns how many entities changed.
    pub fn provision(&mut self, world: &mut World) -> Result<usize, CameraError> {
        vantage_core::profile_scope!("camera_provision");

        let settings = world.register_component::<CameraSettings>();
        let matrices = world.register_component::<CameraMatrices>();

        for group in world.groups() {
            if group.contains(settings) && !group.contains(matrices) {
                self.provision.select_many(group.entities());
            }
        }
        if self.provision.is_empty() {
            return Ok(0);
        }

        self.provision.add_component::<CameraMatrices>();
        let result = self.provision.perform(world);
        self.provision.reset();
        let added = result?;

        log::debug!("provisioned CameraMatrices for {added} camera(s)");
        Ok(added)
    }

    /// Recomputes matrices for every camera, using the current snapshot.
    ///
    /// Never changes which components an entity has.
    pub fn evaluate(&self, world: &World) -> Result<EvaluationReport, CameraError> {
        vantage_core::profile_scope!("camera_evaluate");

        let mut report = EvaluationReport::default();
        let (Some(settings_id), Some(matrices_id), Some(viewport_id)) = (
            world.component_id::<CameraSettings>(),
            world.component_id::<CameraMatrices>(),
            world.component_id::<Viewport>(),
        ) else {
            return Ok(report);
        };
        let required = ComponentMask::from_ids([settings_id, matrices_id, viewport_id]);

        let settings = world.read::<CameraSettings>()?;
        let viewports = world.read::<Viewport>()?;
        let mut matrices = world.write::<CameraMatrices>()?;

        let groups = world.groups();
        'pass: for group in groups.iter().filter(|g| g.contains_all(&required)) {
            for &camera in group.entities() {
                let index = camera.index();
                let (Some(settings), Some(viewport)) = (settings.get(index), viewports.get(index))
                else {
                    continue;
                };

                let Some(destination) = self.destination(world, camera, viewport) else {
                    report.unresolved += 1;
                    log::debug!(
                        "camera {camera}: viewport {} has no destination",
                        viewport.destination
                    );
                    match self.config.unresolved {
                        UnresolvedViewport::AbortPass => {
                            report.aborted = true;
                            break 'pass;
                        }
                        UnresolvedViewport::SkipCamera => continue,
                    }
                };

                let global = world.get_or(camera, GlobalTransform::IDENTITY);
                if let Some(slot) = matrices.get_mut(index) {
                    *slot = camera_matrices(settings, &global, &destination);
                    report.updated += 1;
                }
            }
        }

        if report.aborted {
            log::warn!(
                "camera pass aborted on unresolved viewport after {} update(s)",
                report.updated
            );
        }
        Ok(report)
    }

    /// Snapshot entry of the camera's destination, if the viewport resolves
    /// to a live entity. Targets that are not destinations read as the zero
    /// default.
    fn destination(
        &self,
        world: &World,
        camera: Entity,
        viewport: &Viewport,
    ) -> Option<Destination> {
        resolve_destination(world, camera, viewport)
            .map(|target| self.snapshot.get(target.index()))
    }

    fn system_error(&self, err: CameraError) -> SystemError {
        SystemError::new(self.name(), err)
    }
}

impl System for CameraSystem {
    fn name(&self) -> &'static str {
        "CameraSystem"
    }

    fn run(&mut self, world: &mut World) -> SystemResult {
        self.update(world)
            .map(|_| ())
            .map_err(|err| self.system_error(err))
    }
}

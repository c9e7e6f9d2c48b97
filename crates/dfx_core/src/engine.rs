//! Host-engine surface consumed by the effect core
//!
//! The real renderer is an external collaborator; everything this core
//! needs from it is captured by [`GfxEngine`]. Resources come back as
//! opaque owning handles: a handle that is neither `Copy` nor `Clone`
//! cannot alias across records, which is exactly the ownership contract
//! the lifecycle manager relies on.

use glam::{Vec2, Vec3};

/// Slot index of a named texture resource group
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupSlot(pub u32);

/// Transform node in the engine scene graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// Rotation axis for frame transforms
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// How a frame transform combines with the existing one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombineOp {
    Replace,
    PreConcat,
    PostConcat,
}

/// Owning handle to an engine texture
///
/// The name is the only state shared read-only with callers; everything
/// else about the texture stays inside the engine.
#[derive(Debug, PartialEq, Eq)]
pub struct TextureHandle {
    id: u64,
    name: String,
}

impl TextureHandle {
    /// Engine implementations construct handles; the core never does.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Owning handle to an engine scene-graph renderable
///
/// Carries the transform frame it is parented to, so teardown can run
/// the detach-frame-then-destroy sequence without asking the engine.
#[derive(Debug, PartialEq, Eq)]
pub struct AtomicHandle {
    id: u64,
    frame: Option<FrameId>,
}

impl AtomicHandle {
    pub fn new(id: u64) -> Self {
        Self { id, frame: None }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn frame(&self) -> Option<FrameId> {
        self.frame
    }

    /// Parent the atomic under a transform frame
    pub fn attach_frame(&mut self, frame: FrameId) {
        self.frame = Some(frame);
    }

    /// Detach and return the frame, leaving the atomic frameless
    pub fn take_frame(&mut self) -> Option<FrameId> {
        self.frame.take()
    }
}

/// Operations the effect core requires from the host engine
///
/// Every resource-returning call may fail; `None` means the resource is
/// absent and callers degrade rather than abort.
pub trait GfxEngine {
    // =========================================================================
    // Texture resource groups
    // =========================================================================

    /// Save the current resource-group selection
    fn push_current_group(&mut self);

    /// Find the slot of a named resource group
    fn find_group_slot(&mut self, name: &str) -> Option<GroupSlot>;

    /// Make a resource group the current one
    fn select_group(&mut self, slot: GroupSlot);

    /// Restore the previously saved selection
    fn pop_current_group(&mut self);

    // =========================================================================
    // Textures
    // =========================================================================

    /// Load a texture by name from the currently selected group
    fn read_texture(&mut self, name: &str) -> Option<TextureHandle>;

    /// Release a texture
    fn destroy_texture(&mut self, texture: TextureHandle);

    // =========================================================================
    // Frames
    // =========================================================================

    /// Create a transform frame
    fn create_frame(&mut self) -> Option<FrameId>;

    /// Destroy a transform frame
    fn destroy_frame(&mut self, frame: FrameId);

    /// Reset a frame transform to identity
    fn frame_set_identity(&mut self, frame: FrameId);

    /// Rotate a frame around an axis, angle in degrees
    fn frame_rotate(&mut self, frame: FrameId, axis: Axis, angle_deg: f32, op: CombineOp);

    /// Translate a frame
    fn frame_translate(&mut self, frame: FrameId, translation: Vec3, op: CombineOp);

    // =========================================================================
    // Atomics
    // =========================================================================

    /// Build a roadsign atomic from its layout and text lines
    fn create_roadsign_atomic(
        &mut self,
        size: Vec2,
        lines: &[&str],
        letters_per_line: u32,
        palette: u32,
    ) -> Option<AtomicHandle>;

    /// Destroy an atomic (frame must already be detached)
    fn destroy_atomic(&mut self, atomic: AtomicHandle);
}

/// Resource group used for corona and shadow textures
pub const PARTICLE_GROUP: &str = "particle";

/// Scoped resource-group selection
///
/// Selecting a group is a process-wide engine state in the host; this
/// guard makes the select/restore pairing explicit. The previous
/// selection is restored on drop, on every exit path, whether or not
/// the loads in between succeeded.
pub struct TxdScope<'a> {
    engine: &'a mut dyn GfxEngine,
}

impl<'a> TxdScope<'a> {
    /// Save the current selection and select `group`
    ///
    /// If the group does not exist the previous selection stays active,
    /// and lookups inside the scope simply fail.
    pub fn select(engine: &'a mut dyn GfxEngine, group: &str) -> Self {
        engine.push_current_group();
        match engine.find_group_slot(group) {
            Some(slot) => engine.select_group(slot),
            None => log::warn!("texture group {group:?} not found"),
        }
        Self { engine }
    }

    /// Load a texture by name from the selected group
    pub fn read_texture(&mut self, name: &str) -> Option<TextureHandle> {
        self.engine.read_texture(name)
    }

    /// Release a texture while the scope is held
    pub fn destroy_texture(&mut self, texture: TextureHandle) {
        self.engine.destroy_texture(texture);
    }
}

impl Drop for TxdScope<'_> {
    fn drop(&mut self) {
        self.engine.pop_current_group();
    }
}

//! Mock host engine
//!
//! Stands in for the renderer so lifecycle and marshaling code can be
//! tested without one. Tracks every live resource and the resource-group
//! selection stack, records frame transforms, and counts misuse
//! (double destroys, loads outside a selected group) instead of crashing.

use std::collections::{HashMap, HashSet};

use glam::{Vec2, Vec3};

use crate::engine::{
    AtomicHandle, Axis, CombineOp, FrameId, GfxEngine, GroupSlot, TextureHandle,
};

/// A frame transform recorded by the mock
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOp {
    SetIdentity,
    Rotate {
        axis: Axis,
        angle_deg: f32,
        op: CombineOp,
    },
    Translate {
        translation: Vec3,
        op: CombineOp,
    },
}

/// Parameters the mock saw when an atomic was built
#[derive(Clone, Debug, PartialEq)]
pub struct AtomicBuild {
    pub size: Vec2,
    pub lines: Vec<String>,
    pub letters_per_line: u32,
    pub palette: u32,
}

/// In-memory [`GfxEngine`] double
#[derive(Default)]
pub struct MockEngine {
    next_id: u64,
    groups: HashMap<String, GroupSlot>,
    group_textures: HashMap<GroupSlot, HashSet<String>>,
    current_group: Option<GroupSlot>,
    group_stack: Vec<Option<GroupSlot>>,
    live_textures: HashMap<u64, String>,
    live_frames: HashMap<u64, Vec<FrameOp>>,
    live_atomics: HashMap<u64, AtomicBuild>,
    /// Misuse counter: destroys of already-dead resources
    pub double_destroys: u32,
    /// Force the next frame/atomic allocations to fail
    pub deny_allocations: bool,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource group and make its textures loadable
    pub fn register_group<'a>(&mut self, name: &str, textures: impl IntoIterator<Item = &'a str>) {
        let slot = GroupSlot(self.groups.len() as u32);
        self.groups.insert(name.to_string(), slot);
        self.group_textures
            .insert(slot, textures.into_iter().map(str::to_string).collect());
    }

    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn live_texture_count(&self) -> usize {
        self.live_textures.len()
    }

    pub fn live_frame_count(&self) -> usize {
        self.live_frames.len()
    }

    pub fn live_atomic_count(&self) -> usize {
        self.live_atomics.len()
    }

    pub fn is_texture_live(&self, id: u64) -> bool {
        self.live_textures.contains_key(&id)
    }

    pub fn selection_depth(&self) -> usize {
        self.group_stack.len()
    }

    pub fn current_group(&self) -> Option<GroupSlot> {
        self.current_group
    }

    /// Transforms applied to a frame, in order
    pub fn frame_ops(&self, frame: FrameId) -> &[FrameOp] {
        self.live_frames
            .get(&frame.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Build parameters of a live atomic
    pub fn atomic_build(&self, id: u64) -> Option<&AtomicBuild> {
        self.live_atomics.get(&id)
    }
}

impl GfxEngine for MockEngine {
    fn push_current_group(&mut self) {
        self.group_stack.push(self.current_group);
    }

    fn find_group_slot(&mut self, name: &str) -> Option<GroupSlot> {
        self.groups.get(name).copied()
    }

    fn select_group(&mut self, slot: GroupSlot) {
        self.current_group = Some(slot);
    }

    fn pop_current_group(&mut self) {
        match self.group_stack.pop() {
            Some(previous) => self.current_group = previous,
            None => {
                log::warn!("pop_current_group with empty stack");
                self.current_group = None;
            }
        }
    }

    fn read_texture(&mut self, name: &str) -> Option<TextureHandle> {
        let group = self.current_group?;
        if !self.group_textures.get(&group)?.contains(name) {
            return None;
        }
        let id = self.alloc_id();
        self.live_textures.insert(id, name.to_string());
        Some(TextureHandle::new(id, name))
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        if self.live_textures.remove(&texture.id()).is_none() {
            self.double_destroys += 1;
        }
    }

    fn create_frame(&mut self) -> Option<FrameId> {
        if self.deny_allocations {
            return None;
        }
        let id = self.alloc_id();
        self.live_frames.insert(id, Vec::new());
        Some(FrameId(id))
    }

    fn destroy_frame(&mut self, frame: FrameId) {
        if self.live_frames.remove(&frame.0).is_none() {
            self.double_destroys += 1;
        }
    }

    fn frame_set_identity(&mut self, frame: FrameId) {
        if let Some(ops) = self.live_frames.get_mut(&frame.0) {
            ops.push(FrameOp::SetIdentity);
        }
    }

    fn frame_rotate(&mut self, frame: FrameId, axis: Axis, angle_deg: f32, op: CombineOp) {
        if let Some(ops) = self.live_frames.get_mut(&frame.0) {
            ops.push(FrameOp::Rotate {
                axis,
                angle_deg,
                op,
            });
        }
    }

    fn frame_translate(&mut self, frame: FrameId, translation: Vec3, op: CombineOp) {
        if let Some(ops) = self.live_frames.get_mut(&frame.0) {
            ops.push(FrameOp::Translate { translation, op });
        }
    }

    fn create_roadsign_atomic(
        &mut self,
        size: Vec2,
        lines: &[&str],
        letters_per_line: u32,
        palette: u32,
    ) -> Option<AtomicHandle> {
        if self.deny_allocations {
            return None;
        }
        let id = self.alloc_id();
        self.live_atomics.insert(
            id,
            AtomicBuild {
                size,
                lines: lines.iter().map(|s| s.to_string()).collect(),
                letters_per_line,
                palette,
            },
        );
        Some(AtomicHandle::new(id))
    }

    fn destroy_atomic(&mut self, atomic: AtomicHandle) {
        debug_assert!(
            atomic.frame().is_none(),
            "atomic destroyed with frame still attached"
        );
        if self.live_atomics.remove(&atomic.id()).is_none() {
            self.double_destroys += 1;
        }
    }
}

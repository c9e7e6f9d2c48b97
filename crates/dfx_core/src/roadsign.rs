//! Roadsign geometry: flag decoding and visual construction
//!
//! Roadsign layout is packed into one flag byte: bits 0-1 line count,
//! bits 2-3 letters-per-line code, bits 4-5 palette id.

use glam::{Vec2, Vec3};

use crate::engine::{AtomicHandle, Axis, CombineOp, GfxEngine};
use crate::record::{Roadsign, RoadsignText};

/// Layout parameters decoded from a roadsign flag byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignLayout {
    pub lines: u32,
    pub letters_per_line: u32,
    pub palette: u32,
}

/// Decode the packed flag byte
///
/// Line count 0 (and anything above 3) means all four lines; an
/// out-of-range palette falls back to palette 0.
pub fn decode_flags(flags: u8) -> SignLayout {
    let lines = match flags & 0x03 {
        n @ 1..=3 => n as u32,
        _ => 4,
    };
    let letters_per_line = match (flags >> 2) & 0x03 {
        1 => 2,
        2 => 4,
        3 => 8,
        _ => 16,
    };
    let palette = match (flags >> 4) & 0x03 {
        p @ 0..=3 => p as u32,
        _ => 0,
    };
    SignLayout {
        lines,
        letters_per_line,
        palette,
    }
}

/// Build the scene-graph visual for a roadsign
///
/// The atomic is parented to a fresh frame whose transform is composed
/// as: Z rotation replacing any prior transform, then X and Y rotations,
/// then the translation to `position`, each applied after the previous.
/// Returns `None` (leaving no half-built resources behind) if the engine
/// refuses the atomic or the frame.
pub fn build_visual(
    engine: &mut dyn GfxEngine,
    position: Vec3,
    rotation: Vec3,
    size: Vec2,
    flags: u8,
    text: &RoadsignText,
) -> Option<AtomicHandle> {
    let layout = decode_flags(flags);
    let lines = text.lines(layout.lines as usize);

    let mut atomic =
        engine.create_roadsign_atomic(size, &lines, layout.letters_per_line, layout.palette)?;

    let Some(frame) = engine.create_frame() else {
        log::debug!("roadsign frame allocation failed, dropping atomic");
        engine.destroy_atomic(atomic);
        return None;
    };

    engine.frame_rotate(frame, Axis::Z, rotation.z, CombineOp::Replace);
    engine.frame_rotate(frame, Axis::X, rotation.x, CombineOp::PostConcat);
    engine.frame_rotate(frame, Axis::Y, rotation.y, CombineOp::PostConcat);
    engine.frame_translate(frame, position, CombineOp::PostConcat);

    atomic.attach_frame(frame);
    Some(atomic)
}

/// Destroy a roadsign visual, frame first
///
/// The stock engine teardown destroys the atomic while its frame is
/// still attached, which is the known crash; detaching before either
/// destroy avoids it. No-op when the sign has no visual.
pub fn destroy_visual(engine: &mut dyn GfxEngine, roadsign: &mut Roadsign) {
    let Some(mut atomic) = roadsign.atomic.take() else {
        return;
    };
    if let Some(frame) = atomic.take_frame() {
        engine.destroy_frame(frame);
    }
    engine.destroy_atomic(atomic);
}

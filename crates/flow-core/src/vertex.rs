//! GPU-ready vertex packing for the line and signal arenas.

use crate::lines::LineField;
use crate::signals::SignalField;
use glam::Vec3;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub pos: [f32; 3],
    pub color: [f32; 4],
}

/// Background lanes: line color with each lane's fade-in opacity as alpha.
/// Output is lane-major, `segment_count` vertices per lane.
pub fn pack_lines(lines: &LineField, color: Vec3, out: &mut Vec<LineVertex>) {
    out.clear();
    out.reserve(lines.lane_count() * lines.segment_count());
    let rgb = color.to_array();
    for (lane, fade) in lines.fades().iter().enumerate() {
        for xyz in lines.lane_positions(lane).chunks_exact(3) {
            out.push(LineVertex {
                pos: [xyz[0], xyz[1], xyz[2]],
                color: [rgb[0], rgb[1], rgb[2], fade.opacity],
            });
        }
    }
}

/// Signal trails: premultiplied colors for additive blending.
/// Output is signal-major, `draw_count` vertices per signal.
pub fn pack_signals(signals: &SignalField, out: &mut Vec<LineVertex>) {
    out.clear();
    out.reserve(signals.positions().len() / 3);
    for (xyz, rgb) in signals
        .positions()
        .chunks_exact(3)
        .zip(signals.colors().chunks_exact(3))
    {
        out.push(LineVertex {
            pos: [xyz[0], xyz[1], xyz[2]],
            color: [rgb[0], rgb[1], rgb[2], 1.0],
        });
    }
}

use crate::foundation::ids::Bindpoint;
use crate::gl::enums::*;

/// Buffer binding kinds. Indexed targets occupy `kind + BUFFER_KINDS * index`.
pub mod buffer_kind {
    pub const ARRAY: u32 = 1;
    pub const ATOMIC_COUNTER: u32 = 2;
    pub const COPY_READ: u32 = 3;
    pub const COPY_WRITE: u32 = 4;
    pub const DISPATCH_INDIRECT: u32 = 5;
    pub const DRAW_INDIRECT: u32 = 6;
    pub const ELEMENT_ARRAY: u32 = 7;
    pub const PIXEL_PACK: u32 = 8;
    pub const PIXEL_UNPACK: u32 = 9;
    pub const QUERY: u32 = 10;
    pub const SHADER_STORAGE: u32 = 11;
    pub const TEXTURE: u32 = 12;
    pub const TRANSFORM_FEEDBACK: u32 = 13;
    pub const UNIFORM: u32 = 14;
    pub const PARAMETER: u32 = 15;
}

pub const BUFFER_KINDS: u32 = 16;

/// Texture binding kinds per unit. A unit occupies `TEXTURE_KINDS` consecutive bindpoints.
pub const TEXTURE_KINDS: u32 = 11;

const QUERY_KINDS: u32 = 7;

/// Bindpoint of buffer `target` at binding `index` (0 for non-indexed targets).
///
/// `None` for unknown targets and for indices whose bindpoint does not fit in a `u32`.
pub fn buffer_bindpoint(target: u32, index: u32) -> Option<Bindpoint> {
    use buffer_kind::*;
    let indexed = |kind: u32| BUFFER_KINDS.checked_mul(index)?.checked_add(kind);
    match target {
        GL_ARRAY_BUFFER => Some(ARRAY),
        GL_ATOMIC_COUNTER_BUFFER => indexed(ATOMIC_COUNTER),
        GL_COPY_READ_BUFFER => Some(COPY_READ),
        GL_COPY_WRITE_BUFFER => Some(COPY_WRITE),
        GL_DISPATCH_INDIRECT_BUFFER => Some(DISPATCH_INDIRECT),
        GL_DRAW_INDIRECT_BUFFER => Some(DRAW_INDIRECT),
        GL_ELEMENT_ARRAY_BUFFER => Some(ELEMENT_ARRAY),
        GL_PIXEL_PACK_BUFFER => Some(PIXEL_PACK),
        GL_PIXEL_UNPACK_BUFFER => Some(PIXEL_UNPACK),
        GL_QUERY_BUFFER => Some(QUERY),
        GL_SHADER_STORAGE_BUFFER => indexed(SHADER_STORAGE),
        GL_TEXTURE_BUFFER => Some(TEXTURE),
        GL_TRANSFORM_FEEDBACK_BUFFER => indexed(TRANSFORM_FEEDBACK),
        GL_UNIFORM_BUFFER => indexed(UNIFORM),
        GL_PARAMETER_BUFFER => Some(PARAMETER),
        _ => None,
    }
}

/// True when buffer bindpoint `bp` belongs to `kind` at any index.
pub fn is_buffer_kind(bp: Bindpoint, kind: u32) -> bool {
    bp % BUFFER_KINDS == kind
}

/// Texture kind of `target`; cube faces and proxies share their base kind.
pub fn texture_kind(target: u32) -> Option<u32> {
    let kind = match target {
        GL_TEXTURE_BUFFER => 0,
        GL_TEXTURE_1D | GL_PROXY_TEXTURE_1D => 1,
        GL_TEXTURE_2D | GL_PROXY_TEXTURE_2D => 2,
        GL_TEXTURE_3D | GL_PROXY_TEXTURE_3D => 3,
        GL_TEXTURE_CUBE_MAP => 4,
        GL_TEXTURE_CUBE_MAP_POSITIVE_X..=GL_TEXTURE_CUBE_MAP_NEGATIVE_Z => 4,
        GL_TEXTURE_1D_ARRAY => 5,
        GL_TEXTURE_2D_ARRAY => 6,
        GL_TEXTURE_CUBE_MAP_ARRAY => 7,
        GL_TEXTURE_2D_MULTISAMPLE => 8,
        GL_TEXTURE_2D_MULTISAMPLE_ARRAY => 9,
        GL_TEXTURE_RECTANGLE => 10,
        _ => return None,
    };
    Some(kind)
}

fn unit_base(unit: u32) -> Option<Bindpoint> {
    unit.checked_mul(TEXTURE_KINDS)
}

/// Bindpoint of texture `target` on texture unit `unit`; `None` when the unit is out of range.
pub fn texture_bindpoint(target: u32, unit: u32) -> Option<Bindpoint> {
    unit_base(unit)?.checked_add(texture_kind(target)?)
}

/// Every texture bindpoint of `unit`. Empty for out-of-range units.
pub fn texture_unit_bindpoints(unit: u32) -> impl Iterator<Item = Bindpoint> {
    let base = unit_base(unit).filter(|b| b.checked_add(TEXTURE_KINDS - 1).is_some());
    base.into_iter()
        .flat_map(|base| (0..TEXTURE_KINDS).map(move |kind| base + kind))
}

/// Bindpoint of query `target` at index `index`.
pub fn query_bindpoint(target: u32, index: u32) -> Option<Bindpoint> {
    let kind = match target {
        GL_SAMPLES_PASSED => 0,
        GL_ANY_SAMPLES_PASSED => 1,
        GL_ANY_SAMPLES_PASSED_CONSERVATIVE => 2,
        GL_PRIMITIVES_GENERATED => 3,
        GL_TRANSFORM_FEEDBACK_PRIMITIVES_WRITTEN => 4,
        GL_TIME_ELAPSED => 5,
        GL_TIMESTAMP => 6,
        _ => return None,
    };
    index.checked_mul(QUERY_KINDS)?.checked_add(kind)
}

/// Framebuffer bindpoints a bind to `target` sets. `GL_FRAMEBUFFER` sets draw and read.
pub fn framebuffer_bindpoints(target: u32) -> &'static [Bindpoint] {
    match target {
        GL_FRAMEBUFFER => &[GL_DRAW_FRAMEBUFFER, GL_READ_FRAMEBUFFER],
        GL_DRAW_FRAMEBUFFER => &[GL_DRAW_FRAMEBUFFER],
        GL_READ_FRAMEBUFFER => &[GL_READ_FRAMEBUFFER],
        _ => &[],
    }
}

/// Bindpoint a framebuffer call addresses; `GL_FRAMEBUFFER` means the draw binding.
pub fn framebuffer_bindpoint(target: u32) -> Option<Bindpoint> {
    framebuffer_bindpoints(target).first().copied()
}

#[cfg(test)]
#[path = "../../tests/unit/gl/bindpoints.rs"]
mod tests;

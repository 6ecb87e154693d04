/*!
Quad geometry for drawing a texture.

A texture whose padded size exceeds its logical size only shows the logical part,
so texture coordinates stop at `logical / padded` rather than at 1.
*/

use crate::bindings::coordinates::DestRect;
use crate::bittricks::{fixed_ratio, fixed_to_f32};
use crate::imp::CropRect;

/// One corner of a textured quad.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuadVertex {
    /// Screen pixels.
    pub position: [f32; 2],
    /// Normalized texture coordinates.
    pub tex_coord: [f32; 2],
}

/**
Fractional extent of the logical content within the padded texture, in 16.16 fixed point.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexExtent {
    pub s: u32,
    pub t: u32,
}

impl TexExtent {
    pub fn new(logical_width: u32, logical_height: u32, padded_width: u32, padded_height: u32) -> Self {
        TexExtent {
            s: fixed_ratio(logical_width, padded_width),
            t: fixed_ratio(logical_height, padded_height),
        }
    }

    pub fn s_f32(&self) -> f32 {
        fixed_to_f32(self.s)
    }

    pub fn t_f32(&self) -> f32 {
        fixed_to_f32(self.t)
    }
}

/**
Generates the 4-vertex triangle strip for `dest`.

Vertex order is top-left, top-right, bottom-left, bottom-right.
*/
pub fn textured_quad(dest: DestRect, extent: TexExtent) -> [QuadVertex; 4] {
    let (s, t) = (extent.s_f32(), extent.t_f32());
    let (left, top) = (dest.x, dest.y);
    let (right, bottom) = (dest.x + dest.width, dest.y + dest.height);
    [
        QuadVertex {
            position: [left, top],
            tex_coord: [0.0, 0.0],
        },
        QuadVertex {
            position: [right, top],
            tex_coord: [s, 0.0],
        },
        QuadVertex {
            position: [left, bottom],
            tex_coord: [0.0, t],
        },
        QuadVertex {
            position: [right, bottom],
            tex_coord: [s, t],
        },
    ]
}

/// Crop rect selecting the logical area, flipped so row 0 is the top.
pub fn logical_crop(logical_width: u16, logical_height: u16) -> CropRect {
    CropRect {
        x: 0,
        y: logical_height as i32,
        width: logical_width as i32,
        height: -(logical_height as i32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_corners() {
        let extent = TexExtent::new(320, 200, 512, 256);
        let quad = textured_quad(DestRect::new(10.0, 20.0, 640.0, 400.0), extent);
        assert_eq!(quad[0].position, [10.0, 20.0]);
        assert_eq!(quad[1].position, [650.0, 20.0]);
        assert_eq!(quad[2].position, [10.0, 420.0]);
        assert_eq!(quad[3].position, [650.0, 420.0]);
        assert_eq!(quad[0].tex_coord, [0.0, 0.0]);
        assert_eq!(quad[1].tex_coord, [0.625, 0.0]);
        assert_eq!(quad[2].tex_coord, [0.0, 0.78125]);
        assert_eq!(quad[3].tex_coord, [0.625, 0.78125]);
    }

    #[test]
    fn extent_tracks_ratio() {
        for (logical, padded) in [(1u32, 1u32), (3, 4), (100, 128), (1000, 1024), (65535, 65536)] {
            let extent = TexExtent::new(logical, logical, padded, padded);
            let exact = logical as f64 / padded as f64;
            assert!((extent.s_f32() as f64 - exact).abs() < 1.0 / 65536.0);
            assert_eq!(extent.s, extent.t);
        }
    }

    #[test]
    fn crop_flips() {
        assert_eq!(
            logical_crop(320, 200),
            CropRect {
                x: 0,
                y: 200,
                width: 320,
                height: -200
            }
        );
    }
}

// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Palette block operations.

A palette block is the byte prefix of a palette-indexed texture's CPU mirror.
Callers address it with RGB triplets regardless of the entry format.  For
entry formats with alpha, every entry is opaque except the key color, which is
fully transparent.
*/

use crate::bindings::error::TextureError;
use crate::pixel_formats::PaletteLayout;

fn check_range(layout: PaletteLayout, start: usize, count: usize) -> Result<(), TextureError> {
    let end = start.saturating_add(count);
    if end > layout.entries as usize {
        return Err(TextureError::PaletteRange {
            start,
            end,
            entries: layout.entries,
        });
    }
    Ok(())
}

/// A black palette block whose entries are all opaque.
pub(crate) fn empty_block(layout: PaletteLayout) -> Vec<u8> {
    let mut block = vec![0; layout.byte_len()];
    if layout.has_alpha() {
        for entry in block.chunks_exact_mut(layout.bytes_per_entry()) {
            entry[3] = 0xFF;
        }
    }
    block
}

/**
Writes `colors.len() / 3` RGB triplets starting at entry `start`.

A trailing partial triplet is ignored.
*/
pub(crate) fn write_rgb(
    layout: PaletteLayout,
    block: &mut [u8],
    start: usize,
    colors: &[u8],
    key_color: Option<u8>,
) -> Result<(), TextureError> {
    let count = colors.len() / 3;
    check_range(layout, start, count)?;
    let entry = layout.bytes_per_entry();
    for (i, rgb) in colors.chunks_exact(3).enumerate() {
        let index = start + i;
        let dst = &mut block[index * entry..(index + 1) * entry];
        dst[..3].copy_from_slice(rgb);
        if layout.has_alpha() {
            dst[3] = if key_color == Some(index as u8) { 0 } else { 0xFF };
        }
    }
    Ok(())
}

/// Reads `count` entries starting at `start` as RGB triplets.
pub(crate) fn read_rgb(
    layout: PaletteLayout,
    block: &[u8],
    start: usize,
    count: usize,
) -> Result<Vec<u8>, TextureError> {
    check_range(layout, start, count)?;
    let entry = layout.bytes_per_entry();
    let mut out = Vec::with_capacity(count * 3);
    for index in start..start + count {
        out.extend_from_slice(&block[index * entry..index * entry + 3]);
    }
    Ok(out)
}

/// Moves the transparent entry from `previous` to `key`.
pub(crate) fn apply_key_color(
    layout: PaletteLayout,
    block: &mut [u8],
    previous: Option<u8>,
    key: u8,
) -> Result<(), TextureError> {
    if !layout.has_alpha() {
        return Err(TextureError::NoPalette);
    }
    check_range(layout, key as usize, 1)?;
    let entry = layout.bytes_per_entry();
    if let Some(previous) = previous {
        block[previous as usize * entry + 3] = 0xFF;
    }
    block[key as usize * entry + 3] = 0;
    Ok(())
}

/**
Expands indices through the palette into texels of the entry format.

This is what a driver does for a compressed paletted upload; contexts without
that support get the expanded texels instead.  Indices past the end of the
palette produce zeroed texels.
*/
pub fn expand(layout: PaletteLayout, block: &[u8], indices: &[u8]) -> Vec<u8> {
    let entry = layout.bytes_per_entry();
    let mut out = Vec::with_capacity(indices.len() * entry);
    for index in indices {
        let start = *index as usize * entry;
        match block.get(start..start + entry) {
            Some(color) => out.extend_from_slice(color),
            None => out.resize(out.len() + entry, 0),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_entries_get_alpha() {
        let layout = PaletteLayout::RGBA8888_256;
        let mut block = vec![0u8; layout.byte_len()];
        write_rgb(layout, &mut block, 1, &[1, 2, 3, 4, 5, 6], Some(2)).unwrap();
        assert_eq!(&block[4..12], &[1, 2, 3, 0xFF, 4, 5, 6, 0]);
        assert_eq!(read_rgb(layout, &block, 1, 2).unwrap(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn new_blocks_are_opaque() {
        let layout = PaletteLayout::RGBA8888_256;
        let block = empty_block(layout);
        assert_eq!(block.len(), layout.byte_len());
        assert!(block.chunks_exact(4).all(|e| e == [0, 0, 0, 0xFF]));
        assert!(empty_block(PaletteLayout::RGB888_256).iter().all(|b| *b == 0));
    }

    #[test]
    fn range_is_checked() {
        let layout = PaletteLayout::RGB888_256;
        let mut block = vec![0u8; layout.byte_len()];
        assert_eq!(
            write_rgb(layout, &mut block, 255, &[0; 6], None),
            Err(TextureError::PaletteRange {
                start: 255,
                end: 257,
                entries: 256
            })
        );
        assert!(read_rgb(layout, &block, 0, 256).is_ok());
        assert!(read_rgb(layout, &block, 1, 256).is_err());
    }

    #[test]
    fn key_color_moves() {
        let layout = PaletteLayout::RGBA8888_256;
        let mut block = vec![0xFFu8; layout.byte_len()];
        apply_key_color(layout, &mut block, None, 5).unwrap();
        assert_eq!(block[5 * 4 + 3], 0);
        apply_key_color(layout, &mut block, Some(5), 9).unwrap();
        assert_eq!(block[5 * 4 + 3], 0xFF);
        assert_eq!(block[9 * 4 + 3], 0);

        let rgb = PaletteLayout::RGB888_256;
        let mut block = vec![0u8; rgb.byte_len()];
        assert_eq!(
            apply_key_color(rgb, &mut block, None, 0),
            Err(TextureError::NoPalette)
        );
    }

    #[test]
    fn expand_looks_up_entries() {
        let layout = PaletteLayout::RGB888_256;
        let mut block = vec![0u8; layout.byte_len()];
        block[3..6].copy_from_slice(&[10, 20, 30]);
        assert_eq!(expand(layout, &block, &[1, 0, 1]), vec![10, 20, 30, 0, 0, 0, 10, 20, 30]);
    }
}

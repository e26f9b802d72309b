//! Pure-computation RGBA8 buffer helpers shared by the layout and PNG paths.

/// Copies a `tile_w x tile_h` RGBA8 tile into `dst` (an image `dst_w` pixels
/// wide) with its top-left corner at pixel `(x0, y0)`.
///
/// Rows that would fall outside `dst` are skipped; columns are clipped.
pub fn blit(dst: &mut [u8], dst_w: u32, tile: &[u8], tile_w: u32, tile_h: u32, x0: u32, y0: u32) {
    if x0 >= dst_w {
        return;
    }
    let dst_stride = dst_w as usize * 4;
    let tile_stride = tile_w as usize * 4;
    let copy_w = tile_w.min(dst_w - x0) as usize * 4;
    for row in 0..tile_h as usize {
        let src_start = row * tile_stride;
        let dst_start = (y0 as usize + row) * dst_stride + x0 as usize * 4;
        let (Some(src), Some(out)) = (
            tile.get(src_start..src_start + copy_w),
            dst.get_mut(dst_start..dst_start + copy_w),
        ) else {
            break;
        };
        out.copy_from_slice(src);
    }
}

/// Fills a buffer with a two-tone checkerboard of `cell`-pixel squares, used
/// for the empty cells of the cross layout.
pub fn checkerboard(width: u32, height: u32, cell: u32) -> Vec<u8> {
    let cell = cell.max(1);
    let mut buf = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let v = if (x / cell + y / cell) % 2 == 0 { 48 } else { 64 };
            buf.extend_from_slice(&[v, v, v, 255]);
        }
    }
    buf
}

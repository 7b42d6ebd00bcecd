//! Bresenham line stepping along the current heading.

use super::point::{SkeletonPath, TerrainPoint};

/// Endpoint reached by moving `length` cells from `from` along its heading.
pub fn line_end(from: &TerrainPoint, length: i32) -> (i32, i32) {
    let theta = (from.heading as f32).to_radians();
    let x = (from.x as f32 + theta.sin() * length as f32) as i32;
    let y = (from.y as f32 + theta.cos() * length as f32) as i32;
    (x, y)
}

/// Appends the cells of a Bresenham line from the path's last point to the
/// endpoint `length` cells away. The start cell is not repeated; the end cell
/// is included. Appended points carry the start heading and height 0.
pub fn extend_line(path: &mut SkeletonPath, length: i32) {
    let Some(&start) = path.last() else {
        return;
    };
    let (x1, y1) = line_end(&start, length);

    let (mut x0, mut y0) = (start.x, start.y);
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    while x0 != x1 || y0 != y1 {
        let e2 = err << 1;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
        path.push(TerrainPoint::new(x0, y0, start.heading));
    }
}

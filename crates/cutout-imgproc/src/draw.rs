use cutout_image::Image;

/// Helper function to set a pixel's color, handling bounds checking.
#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x >= 0 && x < img.cols() as i64 && y >= 0 && y < img.rows() as i64 {
        let start = (y as usize * img.cols() + x as usize) * C;
        img.as_slice_mut()[start..start + C].copy_from_slice(&color);
    }
}

/// Draws a line on an image inplace using a standard Bresenham's line algorithm.
///
/// Pixels outside the image are skipped.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
/// * `thickness` - The thickness of the line (thickness > 1 is approximate).
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;

    let half_thickness = thickness as i64 / 2;

    loop {
        if thickness <= 1 {
            set_pixel(img, x0, y0, color);
        } else {
            // approximate thickness with a filled square around the point
            for i in -half_thickness..=half_thickness {
                for j in -half_thickness..=half_thickness {
                    set_pixel(img, x0 + i, y0 + j, color);
                }
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draws a closed polygon outline on an image inplace.
///
/// Consecutive points are connected with [`draw_line`], and the last point
/// connects back to the first. A single point draws one pixel.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `points` - The polygon vertices as (x, y) tuples.
/// * `color` - The color of the outline.
/// * `thickness` - The thickness of the outline.
pub fn draw_polygon<const C: usize>(
    img: &mut Image<u8, C>,
    points: &[(i64, i64)],
    color: [u8; C],
    thickness: usize,
) {
    match points {
        [] => {}
        [(x, y)] => set_pixel(img, *x, *y, color),
        _ => {
            for i in 0..points.len() {
                let p0 = points[i];
                let p1 = points[(i + 1) % points.len()];
                draw_line(img, p0, p1, color, thickness);
            }
        }
    }
}

/// Fills a closed polygon on an image inplace.
///
/// Interior pixels are filled with an even-odd scanline sweep, and the
/// polygon outline is drawn on top so every boundary pixel is covered,
/// including horizontal runs the sweep does not cross. Vertices may lie
/// outside the image; out-of-bounds pixels are skipped.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `points` - The polygon vertices as (x, y) tuples.
/// * `color` - The fill color.
///
/// # Example
///
/// ```rust
/// use cutout_image::{Image, ImageSize};
/// use cutout_imgproc::draw::fill_polygon;
///
/// let mut mask = Image::<u8, 1>::from_size_val(
///     ImageSize { width: 5, height: 5 },
///     0u8,
/// ).unwrap();
///
/// fill_polygon(&mut mask, &[(1, 1), (3, 1), (3, 3), (1, 3)], [255]);
///
/// assert_eq!(mask.get_pixel(2, 2, 0).unwrap(), 255);
/// assert_eq!(mask.get_pixel(0, 0, 0).unwrap(), 0);
/// ```
pub fn fill_polygon<const C: usize>(img: &mut Image<u8, C>, points: &[(i64, i64)], color: [u8; C]) {
    if points.len() < 3 {
        draw_polygon(img, points, color, 1);
        return;
    }

    let n = points.len();
    let min_y = points.iter().map(|p| p.1).min().unwrap_or(0).max(0);
    let max_y = points
        .iter()
        .map(|p| p.1)
        .max()
        .unwrap_or(-1)
        .min(img.rows() as i64 - 1);

    let mut intersections: Vec<i64> = Vec::with_capacity(n);

    for y in min_y..=max_y {
        intersections.clear();

        for i in 0..n {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % n];
            if y0 == y1 {
                // horizontal edges are covered by the outline pass
                continue;
            }

            let (lo, hi) = if y0 < y1 { (y0, y1) } else { (y1, y0) };
            // half-open span, so a vertex shared by two edges counts once
            if y < lo || y >= hi {
                continue;
            }

            let t = (y - y0) as f64 / (y1 - y0) as f64;
            let x = x0 as f64 + t * (x1 - x0) as f64;
            intersections.push(x.round() as i64);
        }

        intersections.sort_unstable();
        for pair in intersections.chunks_exact(2) {
            for x in pair[0]..=pair[1] {
                set_pixel(img, x, y, color);
            }
        }
    }

    draw_polygon(img, points, color, 1);
}

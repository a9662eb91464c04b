use cutout_image::Image;
use std::collections::VecDeque;

// Moore neighborhood in clockwise order starting east, with y pointing down.
const DX: [i64; 8] = [1, 1, 0, -1, -1, -1, 0, 1];
const DY: [i64; 8] = [0, 1, 1, 1, 0, -1, -1, -1];

// Backtrack direction after moving towards neighbor `d`: points from the
// new pixel to the last background neighbor scanned before `d`.
const BACKTRACK: [usize; 8] = [6, 6, 0, 0, 2, 2, 4, 4];

/// How the boundary chain of a contour is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContourApproximation {
    /// Keep every boundary pixel.
    None,
    /// Keep only the points where the boundary changes direction.
    Simple,
}

/// An object boundary as an ordered list of pixel coordinates `(x, y)`.
///
/// Points follow the outer boundary clockwise (in image coordinates,
/// y pointing down), starting at the topmost-leftmost pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// The boundary points of the contour.
    pub points: Vec<(i64, i64)>,
}

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left column of the rectangle.
    pub x: usize,
    /// Top row of the rectangle.
    pub y: usize,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

/// Find the outermost boundaries of the foreground in a binary image.
///
/// A pixel is foreground if it is nonzero. Regions are 8-connected, and
/// only outermost boundaries are returned: holes inside a region produce
/// no contour, and a region lying inside another region's hole produces
/// none either. Contours are returned in raster-scan order of each
/// region's topmost-leftmost pixel.
///
/// # Arguments
///
/// * `src` - The binary input image.
/// * `approximation` - Whether to keep the full boundary chain or only its
///   direction changes.
///
/// # Example
///
/// ```rust
/// use cutout_image::{Image, ImageSize};
/// use cutout_imgproc::contours::{find_contours, ContourApproximation};
///
/// let image = Image::<u8, 1>::new(
///     ImageSize { width: 4, height: 4 },
///     vec![
///         0, 0, 0, 0, //
///         0, 255, 255, 0, //
///         0, 255, 255, 0, //
///         0, 0, 0, 0, //
///     ],
/// ).unwrap();
///
/// let contours = find_contours(&image, ContourApproximation::None);
/// assert_eq!(contours.len(), 1);
/// assert_eq!(contours[0].points[0], (1, 1));
/// ```
pub fn find_contours(src: &Image<u8, 1>, approximation: ContourApproximation) -> Vec<Contour> {
    let width = src.width();
    let height = src.height();
    let data = src.as_slice();

    let mut labels = vec![0u32; width * height];
    let mut contours: Vec<Contour> = Vec::new();
    let mut next_label = 0u32;

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if data[idx] == 0 || labels[idx] != 0 {
                continue;
            }

            // first raster-scan pixel of a new region, which is also its
            // topmost-leftmost boundary pixel
            next_label += 1;
            let region_size = label_region(data, &mut labels, width, height, x, y, next_label);

            // a seed enclosed by an earlier boundary sits in that region's
            // hole; its border has a parent and is not outermost
            let seed = (x as i64, y as i64);
            if contours.iter().any(|c| point_in_polygon(seed, &c.points)) {
                continue;
            }

            let chain = trace_boundary(data, width, height, seed, region_size);

            let points = match approximation {
                ContourApproximation::None => chain,
                ContourApproximation::Simple => simplify_chain(chain),
            };
            contours.push(Contour { points });
        }
    }

    contours
}

/// Flood-fill one 8-connected foreground region, returning its pixel count.
fn label_region(
    data: &[u8],
    labels: &mut [u32],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    label: u32,
) -> usize {
    let mut queue = VecDeque::new();
    labels[y * width + x] = label;
    queue.push_back((x, y));

    let mut count = 0;
    while let Some((cx, cy)) = queue.pop_front() {
        count += 1;
        for d in 0..8 {
            let nx = cx as i64 + DX[d];
            let ny = cy as i64 + DY[d];
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                continue;
            }
            let nidx = ny as usize * width + nx as usize;
            if data[nidx] != 0 && labels[nidx] == 0 {
                labels[nidx] = label;
                queue.push_back((nx as usize, ny as usize));
            }
        }
    }

    count
}

/// Even-odd test with a horizontal ray from `point` towards positive x.
///
/// Integer exact. The caller guarantees `point` does not lie on the
/// polygon itself; a region seed is never a pixel of another region's
/// boundary.
fn point_in_polygon(point: (i64, i64), polygon: &[(i64, i64)]) -> bool {
    let (px, py) = point;
    let mut inside = false;

    for i in 0..polygon.len() {
        let (x0, y0) = polygon[i];
        let (x1, y1) = polygon[(i + 1) % polygon.len()];
        if (y0 > py) == (y1 > py) {
            continue;
        }

        // the edge crosses the scanline; count it when the crossing lies
        // strictly right of the point
        let lhs = (x1 - x0) * (py - y0);
        let rhs = (px - x0) * (y1 - y0);
        if (y1 > y0 && lhs > rhs) || (y1 < y0 && lhs < rhs) {
            inside = !inside;
        }
    }

    inside
}

/// Walk the outer boundary clockwise with Moore-neighbor tracing.
///
/// The walk stops when it re-enters the start pixel in the initial state
/// (Jacob's criterion), or when it is about to repeat its first move from
/// the start pixel. One-pixel-wide regions revisit pixels, as the boundary
/// passes them on both sides.
fn trace_boundary(
    data: &[u8],
    width: usize,
    height: usize,
    start: (i64, i64),
    region_size: usize,
) -> Vec<(i64, i64)> {
    let is_foreground = |x: i64, y: i64| {
        x >= 0
            && y >= 0
            && x < width as i64
            && y < height as i64
            && data[y as usize * width + x as usize] != 0
    };

    let mut points = vec![start];
    let mut current = start;
    // the start pixel is topmost-leftmost, so its west neighbor is background
    let mut backtrack = 4;
    let mut first_move = None;

    // every boundary state is a (pixel, backtrack) pair, so the walk
    // cannot be longer than this without repeating itself
    let max_steps = 8 * region_size + 8;

    for _ in 0..max_steps {
        let mut found = None;
        for step in 1..=8 {
            let d = (backtrack + step) % 8;
            if is_foreground(current.0 + DX[d], current.1 + DY[d]) {
                found = Some(d);
                break;
            }
        }

        let d = match found {
            Some(d) => d,
            // isolated pixel
            None => break,
        };

        if current == start {
            match first_move {
                None => first_move = Some(d),
                Some(d0) if d == d0 => break,
                _ => {}
            }
        }

        current = (current.0 + DX[d], current.1 + DY[d]);
        backtrack = BACKTRACK[d];

        if current == start && backtrack == 4 {
            break;
        }

        points.push(current);
    }

    // the fallback exits can re-enter the start pixel before stopping;
    // the chain never repeats its first point
    if points.len() > 1 && points.last() == points.first() {
        points.pop();
    }

    points
}

/// Drop chain points that continue in the direction of their predecessor.
fn simplify_chain(points: Vec<(i64, i64)>) -> Vec<(i64, i64)> {
    let n = points.len();
    if n <= 2 {
        return points;
    }

    let mut simplified = Vec::new();
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let curr = points[i];
        let next = points[(i + 1) % n];

        let incoming = (curr.0 - prev.0, curr.1 - prev.1);
        let outgoing = (next.0 - curr.0, next.1 - curr.1);
        if incoming != outgoing {
            simplified.push(curr);
        }
    }

    simplified
}

/// Compute the area enclosed by a contour with the shoelace formula.
///
/// Matches the area convention of boundary-pixel chains: a filled n x n
/// square has area `(n - 1)^2`, since the boundary runs through pixel
/// centers. Chains with fewer than 3 points enclose nothing.
///
/// # Example
///
/// ```rust
/// use cutout_imgproc::contours::{contour_area, Contour};
///
/// let square = Contour {
///     points: vec![(1, 1), (3, 1), (3, 3), (1, 3)],
/// };
/// assert_eq!(contour_area(&square), 4.0);
/// ```
pub fn contour_area(contour: &Contour) -> f64 {
    let points = &contour.points;
    if points.len() < 3 {
        return 0.0;
    }

    let mut acc = 0i64;
    for i in 0..points.len() {
        let (x0, y0) = points[i];
        let (x1, y1) = points[(i + 1) % points.len()];
        acc += x0 * y1 - x1 * y0;
    }

    acc.abs() as f64 / 2.0
}

/// Compute the axis-aligned bounding rectangle of a contour.
///
/// Width and height are inclusive pixel extents (`max - min + 1`). An
/// empty contour yields the zero rectangle.
pub fn bounding_rect(contour: &Contour) -> Rect {
    let mut points = contour.points.iter();
    let first = match points.next() {
        Some(p) => *p,
        None => {
            return Rect {
                x: 0,
                y: 0,
                width: 0,
                height: 0,
            }
        }
    };

    let (mut min_x, mut min_y) = first;
    let (mut max_x, mut max_y) = first;
    for &(x, y) in points {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    Rect {
        x: min_x as usize,
        y: min_y as usize,
        width: (max_x - min_x + 1) as usize,
        height: (max_y - min_y + 1) as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutout_image::{Image, ImageError, ImageSize};

    fn square_5x5() -> Result<Image<u8, 1>, ImageError> {
        #[rustfmt::skip]
        let image = Image::new(
            ImageSize { width: 5, height: 5 },
            vec![
                0,   0,   0,   0, 0, //
                0, 255, 255, 255, 0, //
                0, 255, 255, 255, 0, //
                0, 255, 255, 255, 0, //
                0,   0,   0,   0, 0, //
            ],
        )?;
        Ok(image)
    }

    #[test]
    fn test_find_contours_square() -> Result<(), ImageError> {
        let image = square_5x5()?;
        let contours = find_contours(&image, ContourApproximation::None);

        assert_eq!(contours.len(), 1);
        let expected = [
            (1, 1),
            (2, 1),
            (3, 1),
            (3, 2),
            (3, 3),
            (2, 3),
            (1, 3),
            (1, 2),
        ];
        assert_eq!(contours[0].points, expected);
        assert_eq!(contour_area(&contours[0]), 4.0);

        Ok(())
    }

    #[test]
    fn test_find_contours_square_simple() -> Result<(), ImageError> {
        let image = square_5x5()?;
        let contours = find_contours(&image, ContourApproximation::Simple);

        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points, [(1, 1), (3, 1), (3, 3), (1, 3)]);
        assert_eq!(contour_area(&contours[0]), 4.0);

        Ok(())
    }

    #[test]
    fn test_find_contours_empty() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 6,
                height: 4,
            },
            0u8,
        )?;
        let contours = find_contours(&image, ContourApproximation::None);
        assert!(contours.is_empty());

        Ok(())
    }

    #[test]
    fn test_find_contours_single_pixel() -> Result<(), ImageError> {
        let mut image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 5,
                height: 5,
            },
            0u8,
        )?;
        image.as_slice_mut()[3 * 5 + 2] = 255;

        let contours = find_contours(&image, ContourApproximation::Simple);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points, [(2, 3)]);
        assert_eq!(contour_area(&contours[0]), 0.0);

        Ok(())
    }

    #[test]
    fn test_find_contours_thin_line() -> Result<(), ImageError> {
        let mut image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 5,
                height: 5,
            },
            0u8,
        )?;
        let data = image.as_slice_mut();
        data[2 * 5 + 1] = 255;
        data[2 * 5 + 2] = 255;
        data[2 * 5 + 3] = 255;

        // the boundary passes each pixel on both sides without repeating
        // its start point at the tail
        let contours = find_contours(&image, ContourApproximation::None);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points, [(1, 2), (2, 2), (3, 2), (2, 2)]);
        assert_eq!(contour_area(&contours[0]), 0.0);

        Ok(())
    }

    #[test]
    fn test_find_contours_diagonal_pair() -> Result<(), ImageError> {
        let mut image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            0u8,
        )?;
        image.as_slice_mut()[0] = 255;
        image.as_slice_mut()[4 + 1] = 255;

        let contours = find_contours(&image, ContourApproximation::Simple);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points, [(0, 0), (1, 1)]);
        assert_eq!(contour_area(&contours[0]), 0.0);

        Ok(())
    }

    #[test]
    fn test_find_contours_two_regions_raster_order() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<u8, 1>::new(
            ImageSize { width: 9, height: 6 },
            vec![
                0,   0,   0, 0, 0,   0,   0,   0, 0, //
                0, 255, 255, 0, 0,   0,   0,   0, 0, //
                0, 255, 255, 0, 0,   0,   0,   0, 0, //
                0,   0,   0, 0, 0, 255, 255, 255, 0, //
                0,   0,   0, 0, 0, 255, 255, 255, 0, //
                0,   0,   0, 0, 0,   0,   0,   0, 0, //
            ],
        )?;

        let contours = find_contours(&image, ContourApproximation::Simple);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].points[0], (1, 1));
        assert_eq!(contours[1].points[0], (5, 3));

        Ok(())
    }

    #[test]
    fn test_find_contours_ignores_holes() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<u8, 1>::new(
            ImageSize { width: 7, height: 7 },
            vec![
                0, 0,   0,   0,   0, 0, 0, //
                0, 0,   0,   0,   0, 0, 0, //
                0, 0, 255, 255, 255, 0, 0, //
                0, 0, 255,   0, 255, 0, 0, //
                0, 0, 255, 255, 255, 0, 0, //
                0, 0,   0,   0,   0, 0, 0, //
                0, 0,   0,   0,   0, 0, 0, //
            ],
        )?;

        let contours = find_contours(&image, ContourApproximation::Simple);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points, [(2, 2), (4, 2), (4, 4), (2, 4)]);

        Ok(())
    }

    #[test]
    fn test_find_contours_nested_region_suppressed() -> Result<(), ImageError> {
        // a separate region centered in the hole of a ring belongs to the
        // ring's interior and gets no contour of its own
        #[rustfmt::skip]
        let image = Image::<u8, 1>::new(
            ImageSize { width: 9, height: 9 },
            vec![
                255, 255, 255, 255, 255, 255, 255, 255, 255, //
                255,   0,   0,   0,   0,   0,   0,   0, 255, //
                255,   0,   0,   0,   0,   0,   0,   0, 255, //
                255,   0,   0, 255, 255, 255,   0,   0, 255, //
                255,   0,   0, 255, 255, 255,   0,   0, 255, //
                255,   0,   0, 255, 255, 255,   0,   0, 255, //
                255,   0,   0,   0,   0,   0,   0,   0, 255, //
                255,   0,   0,   0,   0,   0,   0,   0, 255, //
                255, 255, 255, 255, 255, 255, 255, 255, 255, //
            ],
        )?;

        let contours = find_contours(&image, ContourApproximation::Simple);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points, [(0, 0), (8, 0), (8, 8), (0, 8)]);
        assert_eq!(contour_area(&contours[0]), 64.0);

        Ok(())
    }

    #[test]
    fn test_find_contours_touching_border() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            255u8,
        )?;

        let contours = find_contours(&image, ContourApproximation::None);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points.len(), 12);
        assert_eq!(contour_area(&contours[0]), 9.0);

        let simple = find_contours(&image, ContourApproximation::Simple);
        assert_eq!(simple[0].points, [(0, 0), (3, 0), (3, 3), (0, 3)]);

        Ok(())
    }

    #[test]
    fn test_contour_area_degenerate() {
        let empty = Contour { points: vec![] };
        assert_eq!(contour_area(&empty), 0.0);

        let pair = Contour {
            points: vec![(0, 0), (5, 5)],
        };
        assert_eq!(contour_area(&pair), 0.0);
    }

    #[test]
    fn test_bounding_rect() {
        let contour = Contour {
            points: vec![(3, 2), (7, 2), (7, 6), (3, 6)],
        };
        let rect = bounding_rect(&contour);
        assert_eq!(
            rect,
            Rect {
                x: 3,
                y: 2,
                width: 5,
                height: 5,
            }
        );

        let empty = bounding_rect(&Contour { points: vec![] });
        assert_eq!(empty.width, 0);
        assert_eq!(empty.height, 0);
    }
}

//! Pixel primitives over `RgbaImage`: triangles, circles and dots.
//!
//! All coordinates are signed; anything off the canvas is clipped.

use image::{Rgba, RgbaImage};

#[inline]
pub fn dot(img: &mut RgbaImage, x: i32, y: i32, colour: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, colour);
    }
}

fn hline(img: &mut RgbaImage, x0: i32, x1: i32, y: i32, colour: Rgba<u8>) {
    for x in x0..=x1 {
        dot(img, x, y, colour);
    }
}

/// Bresenham line between two points, inclusive.
pub fn line(img: &mut RgbaImage, x0: i32, y0: i32, x1: i32, y1: i32, colour: Rgba<u8>) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let (mut x, mut y) = (x0, y0);
    let mut err = dx + dy;
    loop {
        dot(img, x, y, colour);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Fills the triangle with base `(x, y)..(x + 2w, y)` and apex `(x + w, y + h)`.
///
/// A negative `h` puts the apex above the base.
pub fn fill_triangle(img: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, colour: Rgba<u8>) {
    let height = h.abs();
    if height == 0 {
        hline(img, x, x + 2 * w, y, colour);
        return;
    }
    let step = h.signum();
    for row in 0..=height {
        let half = w * (height - row) / height;
        hline(img, x + w - half, x + w + half, y + step * row, colour);
    }
}

/// Outlines the same triangle `fill_triangle` fills.
pub fn triangle(img: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, colour: Rgba<u8>) {
    let (ax, ay) = (x + w, y + h);
    line(img, x, y, x + 2 * w, y, colour);
    line(img, x, y, ax, ay, colour);
    line(img, x + 2 * w, y, ax, ay, colour);
}

/// Filled disc of radius `r`. Nothing is drawn for a negative radius.
pub fn fill_circle(img: &mut RgbaImage, cx: i32, cy: i32, r: i32, colour: Rgba<u8>) {
    if r < 0 {
        return;
    }
    for dy in -r..=r {
        let half = (((r * r - dy * dy) as f64).sqrt()) as i32;
        hline(img, cx - half, cx + half, cy + dy, colour);
    }
}

/// Midpoint circle outline of radius `r`.
pub fn circle(img: &mut RgbaImage, cx: i32, cy: i32, r: i32, colour: Rgba<u8>) {
    if r < 0 {
        return;
    }
    let (mut x, mut y) = (r, 0);
    let mut err = 1 - r;
    while x >= y {
        for (px, py) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            dot(img, cx + px, cy + py, colour);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([200, 10, 10, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn painted(img: &RgbaImage) -> usize {
        img.pixels().filter(|p| **p == RED).count()
    }

    #[test]
    fn test_dot_clips() {
        let mut img = RgbaImage::from_pixel(4, 4, CLEAR);
        dot(&mut img, -1, 0, RED);
        dot(&mut img, 0, 4, RED);
        dot(&mut img, 3, 3, RED);
        assert_eq!(painted(&img), 1);
    }

    #[test]
    fn test_line_endpoints() {
        let mut img = RgbaImage::from_pixel(10, 10, CLEAR);
        line(&mut img, 1, 1, 8, 5, RED);
        assert_eq!(*img.get_pixel(1, 1), RED);
        assert_eq!(*img.get_pixel(8, 5), RED);
        assert_eq!(painted(&img), 8);
    }

    #[test]
    fn test_triangle_up_and_down() {
        let mut up = RgbaImage::from_pixel(20, 20, CLEAR);
        fill_triangle(&mut up, 2, 10, 4, -8, RED);
        // Base row is full width, apex a single pixel above it.
        assert_eq!(*up.get_pixel(2, 10), RED);
        assert_eq!(*up.get_pixel(10, 10), RED);
        assert_eq!(*up.get_pixel(6, 2), RED);
        assert_eq!(*up.get_pixel(5, 2), CLEAR);
        assert_eq!(*up.get_pixel(6, 11), CLEAR);

        let mut down = RgbaImage::from_pixel(20, 20, CLEAR);
        fill_triangle(&mut down, 2, 2, 4, 8, RED);
        assert_eq!(*down.get_pixel(6, 10), RED);
        assert_eq!(*down.get_pixel(6, 1), CLEAR);
    }

    #[test]
    fn test_outline_inside_fill() {
        let mut filled = RgbaImage::from_pixel(20, 20, CLEAR);
        let mut outlined = RgbaImage::from_pixel(20, 20, CLEAR);
        fill_triangle(&mut filled, 1, 15, 6, -10, RED);
        triangle(&mut outlined, 1, 15, 6, -10, RED);
        assert!(painted(&outlined) < painted(&filled));
    }

    #[test]
    fn test_circles() {
        let mut img = RgbaImage::from_pixel(21, 21, CLEAR);
        fill_circle(&mut img, 10, 10, 5, RED);
        assert_eq!(*img.get_pixel(10, 10), RED);
        assert_eq!(*img.get_pixel(15, 10), RED);
        assert_eq!(*img.get_pixel(16, 10), CLEAR);

        let mut ring = RgbaImage::from_pixel(21, 21, CLEAR);
        circle(&mut ring, 10, 10, 5, RED);
        assert_eq!(*ring.get_pixel(10, 10), CLEAR);
        assert_eq!(*ring.get_pixel(15, 10), RED);
        assert_eq!(*ring.get_pixel(10, 5), RED);

        let mut none = RgbaImage::from_pixel(5, 5, CLEAR);
        fill_circle(&mut none, 2, 2, -1, RED);
        assert_eq!(painted(&none), 0);
    }
}

//! Shape generation for 2D primitives
//!
//! Every shape is emitted as a triangle list in screen coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    let at = |r: f32, theta: f32| center + Vec2::from_angle(theta) * r;

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        quad(
            &mut vertices,
            [
                at(inner_radius, theta1),
                at(outer_radius, theta1),
                at(outer_radius, theta2),
                at(inner_radius, theta2),
            ],
            color,
        );
    }

    vertices
}

/// Push two triangles covering the quad `a b c d` (in winding order)
fn quad(out: &mut Vec<Vertex>, [a, b, c, d]: [Vec2; 4], color: [f32; 4]) {
    for p in [a, b, c, c, d, a] {
        out.push(Vertex::new(p.x, p.y, color));
    }
}

/// Filled axis-aligned rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    let mut vertices = Vec::with_capacity(6);
    quad(
        &mut vertices,
        [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
        color,
    );
    vertices
}

/// Rectangle border of `thickness`, drawn inside the rectangle
pub fn rect_outline(min: Vec2, size: Vec2, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(size.x / 2.0).min(size.y / 2.0);
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(min, Vec2::new(size.x, t), color));
    vertices.extend(rect(Vec2::new(min.x, min.y + size.y - t), Vec2::new(size.x, t), color));
    vertices.extend(rect(Vec2::new(min.x, min.y + t), Vec2::new(t, size.y - 2.0 * t), color));
    vertices.extend(rect(
        Vec2::new(min.x + size.x - t, min.y + t),
        Vec2::new(t, size.y - 2.0 * t),
        color,
    ));
    vertices
}

/// Thick line segment from `a` to `b`
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = dir.perp() * (width / 2.0);
    let mut vertices = Vec::with_capacity(6);
    quad(&mut vertices, [a + perp, b + perp, b - perp, a - perp], color);
    vertices
}

/// Progress bar: background plus a fill covering `ratio` of the width
pub fn bar(min: Vec2, size: Vec2, ratio: f32, back: [f32; 4], fill: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = rect(min, size, back);
    let filled = size.x * ratio.clamp(0.0, 1.0);
    if filled > 0.0 {
        vertices.extend(rect(min, Vec2::new(filled, size.y), fill));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_extent(vertices: &[Vertex]) -> (f32, f32) {
        vertices.iter().fold((f32::MAX, f32::MIN), |(lo, hi), v| {
            (lo.min(v.position[0]), hi.max(v.position[0]))
        })
    }

    #[test]
    fn test_circle_triangle_count() {
        assert_eq!(circle(Vec2::ZERO, 10.0, [1.0; 4], 16).len(), 48);
        assert_eq!(ring(Vec2::ZERO, 8.0, 10.0, [1.0; 4], 16).len(), 96);
    }

    #[test]
    fn test_rect_covers_bounds() {
        let v = rect(Vec2::new(10.0, 20.0), Vec2::new(30.0, 5.0), [1.0; 4]);
        assert_eq!(v.len(), 6);
        assert_eq!(x_extent(&v), (10.0, 40.0));
    }

    #[test]
    fn test_bar_fill_width() {
        let v = bar(Vec2::ZERO, Vec2::new(200.0, 10.0), 0.25, [0.0; 4], [1.0; 4]);
        assert_eq!(v.len(), 12);
        assert_eq!(x_extent(&v[6..]), (0.0, 50.0));

        let empty = bar(Vec2::ZERO, Vec2::new(200.0, 10.0), 0.0, [0.0; 4], [1.0; 4]);
        assert_eq!(empty.len(), 6);

        let over = bar(Vec2::ZERO, Vec2::new(200.0, 10.0), 3.0, [0.0; 4], [1.0; 4]);
        assert_eq!(x_extent(&over[6..]), (0.0, 200.0));
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        assert!(line(Vec2::ONE, Vec2::ONE, 2.0, [1.0; 4]).is_empty());
        assert_eq!(line(Vec2::ZERO, Vec2::X, 2.0, [1.0; 4]).len(), 6);
    }
}

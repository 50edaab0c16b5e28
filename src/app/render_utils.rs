use eframe::egui::{Color32, Mesh, Painter, Pos2, Rect, Stroke, Vec2};

use crate::graph::Rgb;

pub(super) const EDGE_COLOR: Color32 = Color32::from_rgb(0xd4, 0xb5, 0xe8);
pub(super) const NODE_STROKE_COLOR: Color32 = Color32::from_rgb(0x4a, 0x37, 0x28);
pub(super) const SELECTED_RING_COLOR: Color32 = Color32::from_rgb(0xf5, 0xce, 0x5d);
pub(super) const LABEL_COLOR: Color32 = Color32::from_rgb(0x2d, 0x22, 0x18);
pub(super) const PANEL_TEXT_COLOR: Color32 = Color32::from_rgb(0x4a, 0x37, 0x28);

const BACKGROUND_START: Color32 = Color32::from_rgb(0xfa, 0xf8, 0xf3);
const BACKGROUND_END: Color32 = Color32::from_rgb(0xf5, 0xe6, 0xd3);

pub(super) fn rgb_color(color: Rgb) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let opacity = opacity.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (color.a() as f32 * opacity).round() as u8,
    )
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

/// Diagonal warm gradient with a faint dotted grid that follows the pan.
pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    let middle = blend_color(BACKGROUND_START, BACKGROUND_END, 0.5);
    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.left_top(), BACKGROUND_START);
    mesh.colored_vertex(rect.right_top(), middle);
    mesh.colored_vertex(rect.right_bottom(), BACKGROUND_END);
    mesh.colored_vertex(rect.left_bottom(), middle);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    painter.add(mesh);

    let step = (64.0 * zoom.clamp(0.6, 1.8)).max(24.0);
    let origin = rect.center() + pan;
    let dot = Color32::from_rgba_unmultiplied(0xc4, 0xa5, 0x7b, 60);

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
        while y < rect.bottom() {
            painter.circle_filled(Pos2::new(x, y), 1.2, dot);
            y += step;
        }
        x += step;
    }
}

/// Soft halo drawn behind a node.
pub(super) fn draw_glow(
    painter: &Painter,
    center: Pos2,
    radius: f32,
    color: Color32,
    opacity: f32,
) {
    for (extra, alpha) in [(10.0, 0.10), (6.0, 0.16), (3.0, 0.22)] {
        painter.circle_filled(center, radius + extra, with_opacity(color, alpha * opacity));
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

pub(super) fn swatch(painter: &Painter, center: Pos2, radius: f32, color: Color32) {
    painter.circle_filled(center, radius, color);
    painter.circle_stroke(center, radius, Stroke::new(1.0, NODE_STROKE_COLOR));
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn opacity_scales_alpha_only() {
        let color = with_opacity(Color32::from_rgb(200, 100, 50), 0.5);
        assert_eq!(color.a(), 128);
        assert_eq!(with_opacity(color, 2.0).a(), color.a());
    }

    #[test]
    fn visibility_culls_offscreen_shapes() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 100.0));
        assert!(circle_visible(rect, pos2(-5.0, 50.0), 10.0));
        assert!(!circle_visible(rect, pos2(-50.0, 50.0), 10.0));
        assert!(edge_visible(rect, pos2(-50.0, 50.0), pos2(150.0, 50.0), 1.0));
        assert!(!edge_visible(rect, pos2(-50.0, -50.0), pos2(-10.0, -20.0), 1.0));
    }
}

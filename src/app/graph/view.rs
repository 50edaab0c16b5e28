use eframe::egui::{Align2, FontId, Sense, Stroke, Ui, vec2};

use crate::util::truncate_label;

use super::super::ViewModel;
use super::super::render_utils::{
    EDGE_COLOR, LABEL_COLOR, NODE_STROKE_COLOR, PANEL_TEXT_COLOR, SELECTED_RING_COLOR, blend_color,
    circle_visible, draw_background, draw_glow, edge_visible, rgb_color, with_opacity,
};

const LABEL_CHARS: usize = 8;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.viewport.pan, self.viewport.zoom);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_drag(ui, rect, &response);
        self.handle_graph_hover(ui, rect, &response);
        self.handle_graph_clicks(rect, &response);

        if self.engine.view().is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "没有匹配的节点",
                FontId::proportional(16.0),
                LABEL_COLOR,
            );
            return;
        }

        let frame = self.engine.frame();
        let zoom = self.viewport.zoom;

        for edge in &frame.edges {
            let start = self.viewport.world_to_screen(rect, edge.from);
            let end = self.viewport.world_to_screen(rect, edge.to);
            if !edge_visible(rect, start, end, edge.width) {
                continue;
            }

            let color = if edge.highlighted {
                blend_color(EDGE_COLOR, NODE_STROKE_COLOR, 0.25)
            } else {
                EDGE_COLOR
            };
            painter.line_segment(
                [start, end],
                Stroke::new(edge.width * zoom.sqrt(), with_opacity(color, edge.opacity)),
            );
        }

        // Hovered node last so its enlarged circle sits on top.
        let mut order = (0..frame.nodes.len()).collect::<Vec<_>>();
        order.sort_by_key(|&index| frame.nodes[index].hovered);

        for index in order {
            let visual = &frame.nodes[index];
            let Some(node) = self.engine.view().node_at(visual.index) else {
                continue;
            };

            let center = self.viewport.world_to_screen(rect, visual.position);
            let radius = visual.radius * zoom;
            if !circle_visible(rect, center, radius + 12.0) {
                continue;
            }

            let fill = rgb_color(node.color);
            let state = self.engine.node_state(&node.id);
            let stroke_width = if state.dragging {
                visual.stroke_width + 1.0
            } else {
                visual.stroke_width
            };
            draw_glow(&painter, center, radius, fill, visual.opacity);
            painter.circle_filled(center, radius, with_opacity(fill, visual.opacity));
            painter.circle_stroke(
                center,
                radius,
                Stroke::new(
                    stroke_width * zoom.sqrt(),
                    with_opacity(NODE_STROKE_COLOR, visual.opacity),
                ),
            );

            if state.selected {
                painter.circle_stroke(
                    center,
                    radius + 4.0,
                    Stroke::new(2.0, with_opacity(SELECTED_RING_COLOR, visual.opacity)),
                );
            }
            if visual.pinned && !visual.hovered {
                painter.circle_filled(
                    center + vec2(radius * 0.7, -radius * 0.7),
                    2.5,
                    with_opacity(NODE_STROKE_COLOR, visual.opacity),
                );
            }

            let font_size = (13.0 * zoom.sqrt()).clamp(9.0, 22.0);
            if radius > 8.0 || visual.hovered {
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    truncate_label(&node.label, LABEL_CHARS),
                    FontId::proportional(font_size),
                    with_opacity(LABEL_COLOR, visual.opacity.max(0.6)),
                );
            }
        }

        if let Some(id) = self.engine.hovered_id()
            && let Some(node) = self.snapshot.node(id)
        {
            let text = match node.description.as_deref() {
                Some(description) => format!("{}  |  {}", node.label, description),
                None => node.label.clone(),
            };
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                text,
                FontId::proportional(13.0),
                PANEL_TEXT_COLOR,
            );
        }
    }
}

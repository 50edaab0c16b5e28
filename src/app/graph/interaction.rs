use eframe::egui::{self, Rect, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        self.viewport.zoom_at(rect, pointer, scroll);
    }

    pub(in crate::app) fn handle_graph_hover(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| response.hovered() && rect.contains(*pointer));
        let world = pointer.map(|pointer| self.viewport.screen_to_world(rect, pointer));
        if self.engine.hover(world).is_some() {
            ui.ctx().request_repaint();
        }

        if self.engine.hovered_id().is_some() || self.engine.is_dragging() {
            ui.ctx().set_cursor_icon(if self.engine.is_dragging() {
                egui::CursorIcon::Grabbing
            } else {
                egui::CursorIcon::PointingHand
            });
        }
    }

    /// Primary drag on a node moves it; anywhere else it pans.
    pub(in crate::app) fn handle_graph_drag(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if response.drag_started_by(egui::PointerButton::Primary) {
            let origin = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(origin) = origin {
                let world = self.viewport.screen_to_world(rect, origin);
                if let Some(id) = self.engine.hit_test(world).map(str::to_owned) {
                    let pointer = response
                        .interact_pointer_pos()
                        .map(|pointer| self.viewport.screen_to_world(rect, pointer))
                        .unwrap_or(world);
                    self.engine.drag_start(&id, pointer);
                }
            }
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            if self.engine.is_dragging() {
                if let Some(pointer) = response.interact_pointer_pos() {
                    self.engine
                        .drag_move(self.viewport.screen_to_world(rect, pointer));
                }
            } else {
                self.viewport.pan_by(response.drag_delta());
            }
        }

        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.viewport.pan_by(response.drag_delta());
        }

        if response.drag_stopped() && self.engine.is_dragging() {
            self.engine.drag_end();
        }
    }

    pub(in crate::app) fn handle_graph_clicks(&mut self, rect: Rect, response: &egui::Response) {
        let Some(pointer) = response.interact_pointer_pos() else {
            return;
        };
        let world = self.viewport.screen_to_world(rect, pointer);

        if response.double_clicked() {
            if let Some(id) = self.engine.hit_test(world).map(str::to_owned) {
                self.engine.release(&id);
            }
        } else if response.clicked_by(egui::PointerButton::Primary)
            && let Some(selection) = self.engine.click(world)
        {
            self.selection = Some(selection);
        }
    }
}

use eframe::egui::{self, RichText, Sense, Ui, vec2};

use crate::graph::RelationDirection;

use super::super::ViewModel;
use super::super::render_utils::{rgb_color, swatch};

enum DetailsAction {
    Close,
    Select(String),
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let Some(selection) = &self.selection else {
            return;
        };

        let mut action = None;
        ui.horizontal(|ui| {
            ui.heading("节点信息");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("✕").on_hover_text("关闭").clicked() {
                    action = Some(DetailsAction::Close);
                }
            });
        });
        ui.separator();

        let node = &selection.node;
        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(vec2(18.0, 18.0), Sense::hover());
            swatch(ui.painter(), rect.center(), 8.0, rgb_color(node.color));
            ui.label(RichText::new(node.label.as_str()).strong().size(18.0));
        });
        ui.label(format!("分类: {}", node.category.display_label()));
        if node.id != node.label {
            ui.small(node.id.as_str());
        }

        ui.add_space(6.0);
        match node.description.as_deref() {
            Some(description) => ui.label(description),
            None => ui.weak("暂无描述"),
        };

        ui.separator();
        ui.label(RichText::new(format!("相关节点 ({})", selection.relations.len())).strong());
        if selection.relations.is_empty() {
            ui.label("没有相关节点");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("related_nodes_scroll")
                .max_height(320.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for relation in &selection.relations {
                        let arrow = match relation.direction {
                            RelationDirection::Outgoing => "→",
                            RelationDirection::Incoming => "←",
                        };
                        let text = match relation.label.as_deref() {
                            Some(label) => format!("{arrow} {}  ({label})", relation.other_label),
                            None => format!("{arrow} {}", relation.other_label),
                        };

                        let in_view = self.engine.view().contains_node(&relation.other_id);
                        let response = ui.link(text);
                        let response = if in_view {
                            response
                        } else {
                            response.on_hover_text("当前筛选中不可见")
                        };
                        if response.clicked() {
                            action = Some(DetailsAction::Select(relation.other_id.clone()));
                        }
                    }
                });
        }

        if self.engine.is_pinned(&node.id) {
            ui.add_space(6.0);
            ui.weak("已固定 · 双击节点释放");
        }

        match action {
            Some(DetailsAction::Close) => self.close_selection(),
            Some(DetailsAction::Select(id)) => self.select_node(&id),
            None => {}
        }
    }
}

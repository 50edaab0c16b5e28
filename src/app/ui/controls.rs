use eframe::egui::{self, RichText, Sense, Ui, vec2};

use crate::util::truncate_label;

use super::super::ViewModel;
use super::super::render_utils::{rgb_color, swatch};

const NODE_LIST_LABEL_CHARS: usize = 18;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("控制面板");
        ui.separator();
        ui.add_space(4.0);

        ui.label("搜索节点").on_hover_text("Substring match on node labels.");
        let search_changed = ui
            .add(egui::TextEdit::singleline(&mut self.search).hint_text("输入关键词..."))
            .changed();

        ui.add_space(6.0);
        ui.label("分类筛选");
        let mut category_changed = false;
        ui.horizontal_wrapped(|ui| {
            category_changed |= ui
                .selectable_value(&mut self.category, None, "全部")
                .changed();
            for category in self.categories.clone() {
                category_changed |= ui
                    .selectable_value(&mut self.category, Some(category), category.display_label())
                    .on_hover_text(category.name())
                    .changed();
            }
        });

        if search_changed || category_changed {
            self.apply_filter();
        }

        ui.separator();
        ui.label(RichText::new(format!("节点列表 ({})", self.engine.view().node_count())).strong());
        self.draw_node_list(ui);

        ui.separator();
        ui.label(RichText::new("统计").strong());
        ui.label(format!("总节点数: {}", self.snapshot.node_count()));
        ui.label(format!("总连接数: {}", self.snapshot.edge_count()));
        ui.label(format!(
            "当前显示: {} 节点 / {} 连接",
            self.engine.view().node_count(),
            self.engine.view().edge_count()
        ));
        ui.label(format!(
            "物理模拟: {} (alpha {:.3})",
            self.engine.status().label(),
            self.engine.alpha()
        ));
        let remaining = self.engine.stabilize_remaining();
        if !remaining.is_zero() {
            ui.label(format!(
                "{:.1}s 后固定布局 (共 {:.1}s)",
                remaining.as_secs_f32(),
                self.engine.config().stabilize_after.as_secs_f32()
            ));
        }
        ui.label(format!("缩放: {:.0}%", self.viewport.zoom * 100.0));

        ui.add_space(6.0);
        if ui.button("重置视图").clicked() {
            self.viewport.reset();
        }
    }

    fn draw_node_list(&mut self, ui: &mut Ui) {
        if self.engine.view().is_empty() {
            ui.label("没有匹配的节点");
            return;
        }

        let mut clicked = None;
        let selected_id = self.selection.as_ref().map(|selection| selection.node.id.as_str());
        egui::ScrollArea::vertical()
            .id_salt("node_list_scroll")
            .max_height(260.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for node in self.engine.view().nodes() {
                    ui.horizontal(|ui| {
                        let (rect, _) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
                        swatch(ui.painter(), rect.center(), 5.0, rgb_color(node.color));

                        let is_selected = selected_id == Some(node.id.as_str());
                        let label = truncate_label(&node.label, NODE_LIST_LABEL_CHARS);
                        let connections = self.engine.view().connection_count(&node.id);
                        if ui
                            .selectable_label(is_selected, label)
                            .on_hover_text(format!(
                                "{} · {connections} 连接",
                                node.category.display_label()
                            ))
                            .clicked()
                        {
                            clicked = Some(node.id.clone());
                        }
                    });
                }
            });

        if let Some(id) = clicked {
            self.select_node(&id);
        }
    }
}

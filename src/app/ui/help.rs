use eframe::egui::{self, Align2, RichText, Ui, vec2};

use super::super::ViewModel;

const HINTS: &[&str] = &[
    "拖拽节点: 移动并固定位置",
    "拖拽空白处: 平移画布",
    "滚轮: 缩放",
    "单击节点: 查看详情",
    "双击节点: 释放固定",
    "悬停节点: 高亮相关连接",
];

impl ViewModel {
    pub(in crate::app) fn draw_help(&mut self, ui: &Ui) {
        egui::Area::new(egui::Id::new("help_card"))
            .anchor(Align2::RIGHT_BOTTOM, vec2(-12.0, -12.0))
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    let title = if self.show_help { "操作提示 ▾" } else { "操作提示 ▸" };
                    let title = egui::Label::new(RichText::new(title).strong())
                        .sense(egui::Sense::click());
                    if ui.add(title).clicked() {
                        self.show_help = !self.show_help;
                    }
                    if self.show_help {
                        ui.add_space(4.0);
                        for hint in HINTS {
                            ui.label(*hint);
                        }
                    }
                });
            });
    }
}

use std::time::Duration;

use eframe::egui::{self, Align, Context, Layout, RichText};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        let dt = self.frame_delta(ctx);
        self.engine.advance(dt);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("知识图谱").strong());
                    ui.separator();
                    ui.label(format!("节点 {}", self.engine.view().node_count()));
                    ui.label(format!("连接 {}", self.engine.view().edge_count()));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("physics: {}", self.engine.status().label()));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if self.selection.is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(300.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_graph(ui);
                self.draw_help(ui);
            });

        if self.engine.is_active() {
            ctx.request_repaint();
        }
    }

    fn frame_delta(&mut self, ctx: &Context) -> Duration {
        let now = ctx.input(|input| input.time);
        let previous = self.last_frame_secs.replace(now);
        previous
            .map(|previous| Duration::from_secs_f64((now - previous).max(0.0)))
            .unwrap_or_default()
    }
}

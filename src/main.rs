// hide console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui::{self, vec2, CentralPanel, Frame, SidePanel, ViewportBuilder};
use eframe::NativeOptions;
use fluent_bundle::{FluentBundle, FluentResource};
use tracing::info;
use unic_langid::langid;

mod common;
mod umlclass;

use crate::common::controller::DiagramController;
use crate::common::fluent::{create_fluent_bundle, tr};

const SIDEBAR_WIDTH: f32 = 200.0;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let options = NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size(vec2(1500.0, 750.0))
            .with_resizable(false),
        ..Default::default()
    };
    eframe::run_native(
        "ClassBox UML Editor",
        options,
        Box::new(|_cc| {
            let app = ClassBoxApp::new()?;
            Ok(Box::new(app) as Box<dyn eframe::App>)
        }),
    )
}

struct ClassBoxApp {
    bundle: FluentBundle<FluentResource>,
    diagram: Box<dyn DiagramController>,
}

impl ClassBoxApp {
    fn new() -> Result<Self, String> {
        let bundle = create_fluent_bundle(&vec![langid!("en-US")])?;
        info!("starting {}", tr(&bundle, "app-title"));
        Ok(Self {
            bundle,
            diagram: crate::umlclass::umlclass_controllers::new(),
        })
    }
}

impl eframe::App for ClassBoxApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SidePanel::left("sidebar")
            .exact_width(SIDEBAR_WIDTH)
            .resizable(false)
            .show(ctx, |ui| {
                self.diagram.show_sidebar(ui, &self.bundle);
            });

        CentralPanel::default()
            // When displaying the canvas it looks better
            // to set inner margins to 0.
            .frame(Frame::central_panel(&ctx.style()).inner_margin(0))
            .show(ctx, |ui| {
                let (mut ui_canvas, response) = self.diagram.new_ui_canvas(ui);
                self.diagram.draw_in(&mut ui_canvas);
                self.diagram.handle_input(ui, &response);
            });
    }
}

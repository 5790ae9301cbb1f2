use eframe::egui;
use fluent_bundle::{FluentBundle, FluentResource};

use crate::common::canvas::{Canvas, UiCanvas};

pub trait DiagramController {
    fn model_name(&self) -> String;

    fn new_ui_canvas(&self, ui: &mut egui::Ui) -> (UiCanvas, egui::Response);
    fn draw_in(&mut self, canvas: &mut dyn Canvas);
    fn handle_input(&mut self, ui: &mut egui::Ui, response: &egui::Response);

    fn show_sidebar(&mut self, ui: &mut egui::Ui, bundle: &FluentBundle<FluentResource>);
}

pub trait ElementController {
    fn uuid(&self) -> uuid::Uuid;

    // Position makes sense even for elements such as connections
    fn position(&self) -> egui::Pos2;
    fn bounds(&self) -> egui::Rect;
}

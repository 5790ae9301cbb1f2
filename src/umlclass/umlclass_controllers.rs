
use eframe::egui;
use fluent_bundle::{FluentBundle, FluentResource};
use std::sync::{Arc, RwLock};
use tracing::debug;

use super::umlclass_models::{ClassBoxEditor, Generalization, UmlClassBox};
use crate::common::canvas::{Canvas, Stroke, UiCanvas};
use crate::common::controller::{DiagramController, ElementController};
use crate::common::fluent::tr;

/// Where freshly stamped boxes land. Stamping twice stacks the second box
/// on top of the first until it is dragged away.
const STAMP_POSITION: egui::Pos2 = egui::Pos2::new(200.0, 150.0);

pub fn new() -> Box<dyn DiagramController> {
    Box::new(UmlClassDiagramController::new(
        "UML class diagram".to_owned(),
    ))
}

/// The generalization gesture as an explicit state machine. A single input
/// handler is gated by this state, so re-activating the tool can never
/// accumulate handlers and a press/release pair yields at most one arrow.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Tool {
    Select,
    Generalization(GeneralizationState),
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum GeneralizationState {
    Armed,
    AwaitingRelease { start: egui::Pos2 },
}

impl Tool {
    /// Activating the tool again deactivates it; a half-finished gesture
    /// is discarded.
    fn toggle_generalization(&mut self) {
        *self = match self {
            Tool::Select => Tool::Generalization(GeneralizationState::Armed),
            Tool::Generalization(_) => Tool::Select,
        };
    }

    fn on_press(&mut self, pos: egui::Pos2) {
        if *self == Tool::Generalization(GeneralizationState::Armed) {
            *self = Tool::Generalization(GeneralizationState::AwaitingRelease { start: pos });
        }
    }

    /// Completes the gesture. Returns the recorded (start, end) pair iff a
    /// matching press was seen while the tool was armed.
    fn on_release(&mut self, pos: egui::Pos2) -> Option<(egui::Pos2, egui::Pos2)> {
        match *self {
            Tool::Generalization(GeneralizationState::AwaitingRelease { start }) => {
                *self = Tool::Generalization(GeneralizationState::Armed);
                Some((start, pos))
            }
            _ => None,
        }
    }
}

/// Per-gesture drag state, captured on press over a box and discarded on
/// release. The dragged box follows the cursor by delta from the origin,
/// with no snapping, clamping, or collision handling.
struct DragState {
    target: uuid::Uuid,
    origin_cursor: egui::Pos2,
    origin_position: egui::Pos2,
}

impl DragState {
    fn position_for(&self, cursor: egui::Pos2) -> egui::Pos2 {
        self.origin_position + (cursor - self.origin_cursor)
    }
}

pub struct UmlClassDiagramController {
    name: String,
    editor: ClassBoxEditor,
    boxes: Vec<UmlClassBoxController>,
    arrows: Vec<GeneralizationController>,

    tool: Tool,
    drag: Option<DragState>,

    camera_offset: egui::Pos2,
    camera_scale: f32,
}

impl UmlClassDiagramController {
    pub fn new(name: String) -> Self {
        Self {
            name,
            editor: ClassBoxEditor::default(),
            boxes: Vec::new(),
            arrows: Vec::new(),

            tool: Tool::Select,
            drag: None,

            camera_offset: egui::Pos2::ZERO,
            camera_scale: 1.0,
        }
    }

    /// Snapshots the editor into a new box at the default stamp position.
    fn stamp_class_box(&mut self) -> uuid::Uuid {
        let uuid = uuid::Uuid::now_v7();
        let model = UmlClassBox::from_editor(uuid, &self.editor);
        debug!(%uuid, name = %model.name, "stamping class box");
        self.boxes.push(UmlClassBoxController {
            model: Arc::new(RwLock::new(model)),
            position: STAMP_POSITION,
            bounds_rect: egui::Rect::ZERO,
        });
        uuid
    }

    fn add_generalization(&mut self, start: egui::Pos2, end: egui::Pos2) {
        let uuid = uuid::Uuid::now_v7();
        debug!(%uuid, ?start, ?end, "drawing generalization");
        self.arrows.push(GeneralizationController {
            model: Generalization::new(uuid, start, end),
        });
    }

    fn generalization_press(&mut self, pos: egui::Pos2) {
        self.tool.on_press(pos);
    }

    fn generalization_release(&mut self, pos: egui::Pos2) {
        if let Some((start, end)) = self.tool.on_release(pos) {
            self.add_generalization(start, end);
        }
    }

    fn begin_drag(&mut self, cursor: egui::Pos2) {
        self.drag = self
            .boxes
            .iter()
            .rev()
            .find(|b| b.bounds_rect.contains(cursor))
            .map(|b| DragState {
                target: b.uuid(),
                origin_cursor: cursor,
                origin_position: b.position,
            });
    }

    fn update_drag(&mut self, cursor: egui::Pos2) {
        let Some(drag) = &self.drag else { return };
        let new_position = drag.position_for(cursor);
        let target = drag.target;
        if let Some(b) = self.boxes.iter_mut().find(|b| b.uuid() == target) {
            b.position = new_position;
        }
    }

    fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Ctrl+click re-sync: overwrites the box under the cursor with the
    /// editor's current values, not its creation-time values.
    fn resync_box_at(&mut self, pos: egui::Pos2) -> bool {
        let Some(b) = self
            .boxes
            .iter_mut()
            .rev()
            .find(|b| b.bounds_rect.contains(pos))
        else {
            return false;
        };
        let mut model = b.model.write().unwrap();
        debug!(uuid = %model.uuid, "re-syncing class box from editor");
        model.apply_editor(&self.editor);
        true
    }
}

impl DiagramController for UmlClassDiagramController {
    fn model_name(&self) -> String {
        self.name.clone()
    }

    fn new_ui_canvas(&self, ui: &mut egui::Ui) -> (UiCanvas, egui::Response) {
        let canvas_pos = ui.next_widget_position();
        let canvas_size = ui.available_size();
        let canvas_rect = egui::Rect {
            min: canvas_pos,
            max: canvas_pos + canvas_size,
        };

        let (painter_response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let ui_canvas = UiCanvas::new(
            painter,
            canvas_rect,
            self.camera_offset,
            self.camera_scale,
        );
        ui_canvas.clear(egui::Color32::WHITE);
        ui_canvas.draw_gridlines(
            Some((50.0, egui::Color32::from_rgb(220, 220, 220))),
            Some((50.0, egui::Color32::from_rgb(220, 220, 220))),
        );
        (ui_canvas, painter_response)
    }

    fn draw_in(&mut self, canvas: &mut dyn Canvas) {
        for b in &mut self.boxes {
            b.draw_in(canvas);
        }
        for a in &mut self.arrows {
            a.draw_in(canvas);
        }
    }

    fn handle_input(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let world_pos = ui.ctx().pointer_interact_pos().map(|p| {
            ((p - self.camera_offset - response.rect.min.to_vec2()) / self.camera_scale).to_pos2()
        });

        match self.tool {
            Tool::Generalization(_) => {
                if response.hovered() {
                    let (pressed, released) = ui.input(|i| {
                        (i.pointer.primary_pressed(), i.pointer.primary_released())
                    });
                    if let Some(pos) = world_pos {
                        if pressed {
                            self.generalization_press(pos);
                        }
                        if released {
                            self.generalization_release(pos);
                        }
                    }
                }
            }
            Tool::Select => {
                if response.clicked() && ui.input(|i| i.modifiers.ctrl) {
                    if let Some(pos) = world_pos {
                        self.resync_box_at(pos);
                    }
                } else if response.drag_started_by(egui::PointerButton::Primary) {
                    if let Some(pos) = world_pos {
                        self.begin_drag(pos);
                    }
                } else if response.dragged_by(egui::PointerButton::Primary) {
                    if let Some(pos) = world_pos {
                        self.update_drag(pos);
                    }
                } else if response.drag_stopped() {
                    self.end_drag();
                }
            }
        }

        // Handle camera pan
        if response.dragged_by(egui::PointerButton::Middle) {
            self.camera_offset += response.drag_delta();
        }

        // Handle zoom
        if response.hovered() {
            let scroll_delta = ui.ctx().input(|i| i.raw_scroll_delta);

            let factor = if scroll_delta.y > 0.0 && self.camera_scale < 10.0 {
                1.5
            } else if scroll_delta.y < 0.0 && self.camera_scale > 0.01 {
                0.66
            } else {
                0.0
            };

            if factor != 0.0 {
                if let Some(cursor_pos) = ui.ctx().pointer_interact_pos() {
                    let old_factor = self.camera_scale;
                    self.camera_scale *= factor;
                    self.camera_offset -= ((cursor_pos
                        - self.camera_offset
                        - response.rect.min.to_vec2())
                        / old_factor)
                        * (self.camera_scale - old_factor);
                }
            }
        }
    }

    fn show_sidebar(&mut self, ui: &mut egui::Ui, bundle: &FluentBundle<FluentResource>) {
        let width = ui.available_width();

        ui.vertical_centered(|ui| {
            ui.label(tr(bundle, "sidebar-menu").as_ref());
        });
        ui.separator();

        ui.label(tr(bundle, "field-name").as_ref());
        ui.add_sized(
            (width, 20.0),
            egui::TextEdit::singleline(&mut self.editor.name),
        );

        ui.label(tr(bundle, "field-attributes").as_ref());
        ui.add_sized(
            (width, 60.0),
            egui::TextEdit::multiline(&mut self.editor.attributes),
        );

        ui.label(tr(bundle, "field-methods").as_ref());
        ui.add_sized(
            (width, 60.0),
            egui::TextEdit::multiline(&mut self.editor.methods),
        );

        ui.separator();

        if ui
            .add_sized(
                [width, 20.0],
                egui::Button::new(tr(bundle, "button-build-class-box").as_ref()),
            )
            .clicked()
        {
            self.stamp_class_box();
        }

        let armed = matches!(self.tool, Tool::Generalization(_));
        if ui
            .add_sized(
                [width, 20.0],
                egui::Button::new(tr(bundle, "button-generalization").as_ref()).selected(armed),
            )
            .clicked()
        {
            self.tool.toggle_generalization();
        }
    }
}

pub struct UmlClassBoxController {
    pub model: Arc<RwLock<UmlClassBox>>,

    pub position: egui::Pos2,
    pub bounds_rect: egui::Rect,
}

impl UmlClassBoxController {
    fn draw_in(&mut self, canvas: &mut dyn Canvas) {
        let read = self.model.read().unwrap();
        self.bounds_rect = canvas.draw_class(
            self.position,
            &read.name,
            &[&read.parse_attributes(), &read.parse_methods()],
            egui::Color32::WHITE,
            Stroke::new(1.0, egui::Color32::BLACK),
        );
    }
}

impl ElementController for UmlClassBoxController {
    fn uuid(&self) -> uuid::Uuid {
        self.model.read().unwrap().uuid
    }

    fn position(&self) -> egui::Pos2 {
        self.position
    }

    fn bounds(&self) -> egui::Rect {
        self.bounds_rect
    }
}

pub struct GeneralizationController {
    pub model: Generalization,
}

impl GeneralizationController {
    fn draw_in(&mut self, canvas: &mut dyn Canvas) {
        canvas.draw_line(
            [self.model.start, self.model.end],
            Stroke::new(1.0, egui::Color32::BLACK),
        );
        canvas.draw_polygon(
            self.model.arrowhead().to_vec(),
            egui::Color32::BLACK,
            Stroke::new(1.0, egui::Color32::BLACK),
        );
    }
}

impl ElementController for GeneralizationController {
    fn uuid(&self) -> uuid::Uuid {
        self.model.uuid
    }

    fn position(&self) -> egui::Pos2 {
        (self.model.start + self.model.end.to_vec2()) / 2.0
    }

    fn bounds(&self) -> egui::Rect {
        egui::Rect::from_two_pos(self.model.start, self.model.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagram() -> UmlClassDiagramController {
        UmlClassDiagramController::new("test diagram".to_owned())
    }

    fn stamp_with(
        d: &mut UmlClassDiagramController,
        name: &str,
        attributes: &str,
        methods: &str,
    ) -> uuid::Uuid {
        d.editor = ClassBoxEditor {
            name: name.to_owned(),
            attributes: attributes.to_owned(),
            methods: methods.to_owned(),
        };
        let uuid = d.stamp_class_box();
        // Bounds are normally recorded during drawing
        d.boxes.last_mut().unwrap().bounds_rect =
            egui::Rect::from_center_size(STAMP_POSITION, egui::Vec2::new(80.0, 60.0));
        uuid
    }

    #[test]
    fn stamped_box_snapshots_editor() {
        let mut d = diagram();
        stamp_with(&mut d, "Vehicle", "-wheels: int", "+drive(): void");

        d.editor.name = "Bicycle".to_owned();

        let model = d.boxes[0].model.read().unwrap();
        assert_eq!(model.name, "Vehicle");
        assert_eq!(model.attributes, "-wheels: int");
        assert_eq!(model.methods, "+drive(): void");
    }

    #[test]
    fn drag_moves_box_by_cursor_delta() {
        let mut d = diagram();
        stamp_with(&mut d, "A", "", "");

        let grab = STAMP_POSITION + egui::Vec2::new(5.0, -3.0);
        d.begin_drag(grab);
        // Arbitrary intermediate drag events within one session
        d.update_drag(grab + egui::Vec2::new(40.0, 0.0));
        d.update_drag(grab + egui::Vec2::new(-12.0, 80.0));
        d.update_drag(grab + egui::Vec2::new(30.0, 50.0));
        d.end_drag();

        assert_eq!(d.boxes[0].position, STAMP_POSITION + egui::Vec2::new(30.0, 50.0));
    }

    #[test]
    fn drag_outside_any_box_moves_nothing() {
        let mut d = diagram();
        stamp_with(&mut d, "A", "", "");

        d.begin_drag(STAMP_POSITION + egui::Vec2::new(500.0, 500.0));
        d.update_drag(STAMP_POSITION + egui::Vec2::new(600.0, 600.0));

        assert_eq!(d.boxes[0].position, STAMP_POSITION);
    }

    #[test]
    fn drag_state_resets_between_sessions() {
        let mut d = diagram();
        stamp_with(&mut d, "A", "", "");

        let grab = STAMP_POSITION;
        d.begin_drag(grab);
        d.update_drag(grab + egui::Vec2::new(10.0, 10.0));
        d.end_drag();

        // Second session starts from the moved position
        let moved = d.boxes[0].position;
        d.boxes[0].bounds_rect = egui::Rect::from_center_size(moved, egui::Vec2::new(80.0, 60.0));
        d.begin_drag(moved);
        d.update_drag(moved + egui::Vec2::new(-4.0, 6.0));
        d.end_drag();

        assert_eq!(d.boxes[0].position, moved + egui::Vec2::new(-4.0, 6.0));
    }

    #[test]
    fn one_press_release_cycle_adds_exactly_one_arrow() {
        let mut d = diagram();
        d.tool.toggle_generalization();

        d.generalization_press(egui::Pos2::new(10.0, 20.0));
        d.generalization_release(egui::Pos2::new(110.0, 220.0));

        assert_eq!(d.arrows.len(), 1);
        assert_eq!(d.arrows[0].model.start, egui::Pos2::new(10.0, 20.0));
        assert_eq!(d.arrows[0].model.end, egui::Pos2::new(110.0, 220.0));
    }

    #[test]
    fn retoggling_tool_does_not_stack_arrow_creation() {
        let mut d = diagram();
        // Toggle the tool on, off, and on again
        d.tool.toggle_generalization();
        d.tool.toggle_generalization();
        d.tool.toggle_generalization();

        d.generalization_press(egui::Pos2::new(0.0, 0.0));
        d.generalization_release(egui::Pos2::new(50.0, 50.0));

        assert_eq!(d.arrows.len(), 1);
    }

    #[test]
    fn release_without_press_draws_nothing() {
        let mut d = diagram();
        d.tool.toggle_generalization();

        d.generalization_release(egui::Pos2::new(50.0, 50.0));

        assert!(d.arrows.is_empty());
        assert_eq!(d.tool, Tool::Generalization(GeneralizationState::Armed));
    }

    #[test]
    fn toggling_off_discards_half_finished_gesture() {
        let mut d = diagram();
        d.tool.toggle_generalization();
        d.generalization_press(egui::Pos2::new(1.0, 1.0));

        d.tool.toggle_generalization();
        assert_eq!(d.tool, Tool::Select);

        d.tool.toggle_generalization();
        d.generalization_release(egui::Pos2::new(2.0, 2.0));
        assert!(d.arrows.is_empty());
    }

    #[test]
    fn resync_applies_editor_values_at_click_time() {
        let mut d = diagram();
        stamp_with(&mut d, "Old", "-a", "-m()");

        d.editor = ClassBoxEditor {
            name: "New".to_owned(),
            attributes: "+b: int".to_owned(),
            methods: "".to_owned(),
        };

        assert!(d.resync_box_at(STAMP_POSITION));
        let model = d.boxes[0].model.read().unwrap();
        assert_eq!(model.name, "New");
        assert_eq!(model.attributes, "+b: int");
        assert_eq!(model.methods, "");
    }

    #[test]
    fn resync_misses_outside_bounds() {
        let mut d = diagram();
        stamp_with(&mut d, "Old", "", "");

        d.editor.name = "New".to_owned();

        assert!(!d.resync_box_at(STAMP_POSITION + egui::Vec2::new(500.0, 0.0)));
        assert_eq!(d.boxes[0].model.read().unwrap().name, "Old");
    }

    #[test]
    fn counts_grow_monotonically() {
        let mut d = diagram();
        stamp_with(&mut d, "A", "", "");
        stamp_with(&mut d, "B", "", "");
        d.tool.toggle_generalization();
        d.generalization_press(egui::Pos2::ZERO);
        d.generalization_release(egui::Pos2::new(1.0, 1.0));

        assert_eq!(d.boxes.len(), 2);
        assert_eq!(d.arrows.len(), 1);
    }
}

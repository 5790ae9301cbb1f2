use eframe::egui;

pub const CLASS_NAME_FONT_SIZE: f32 = 15.0;
pub const CLASS_ITEM_FONT_SIZE: f32 = 10.0;

#[derive(Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: egui::Color32,
}

impl Stroke {
    pub fn new(width: f32, color: egui::Color32) -> Self {
        Self { width, color }
    }
}

impl From<Stroke> for egui::Stroke {
    fn from(value: Stroke) -> egui::Stroke {
        egui::Stroke {
            width: value.width,
            color: value.color,
        }
    }
}

pub trait Canvas {
    fn draw_line(&mut self, points: [egui::Pos2; 2], stroke: Stroke);
    fn draw_rectangle(&mut self, rect: egui::Rect, color: egui::Color32, stroke: Stroke);
    fn draw_polygon(&mut self, vertices: Vec<egui::Pos2>, color: egui::Color32, stroke: Stroke);

    fn measure_text(
        &mut self,
        position: egui::Pos2,
        anchor: egui::Align2,
        text: &str,
        font_size: f32,
    ) -> egui::Rect;
    fn draw_text(
        &mut self,
        position: egui::Pos2,
        anchor: egui::Align2,
        text: &str,
        font_size: f32,
        text_color: egui::Color32,
    );

    /// Draws a class box centered at `position`: name on top, then one
    /// compartment per item slice, separated by horizontal lines.
    /// Items are (access modifier, member) pairs; the modifier column is
    /// aligned across all compartments. Returns the box bounds.
    fn draw_class(
        &mut self,
        position: egui::Pos2,
        name: &str,
        compartments: &[&[(&str, &str)]],
        fill: egui::Color32,
        stroke: Stroke,
    ) -> egui::Rect {
        // Measure phase
        let mut offsets = vec![0.0];
        let mut max_width: f32 = 0.0;
        let mut compartment_separators = vec![];

        let modifier_column = compartments
            .iter()
            .flat_map(|c| c.iter())
            .map(|e| {
                self.measure_text(position, egui::Align2::LEFT_CENTER, e.0, CLASS_ITEM_FONT_SIZE)
                    .width()
            })
            .fold(0.0 as f32, |a, b| a.max(b));

        {
            let r = self.measure_text(
                egui::Pos2::ZERO,
                egui::Align2::CENTER_TOP,
                name,
                CLASS_NAME_FONT_SIZE,
            );
            offsets.push(r.height());
            max_width = max_width.max(r.width());
        }

        for compartment in compartments.iter().filter(|e| !e.is_empty()) {
            compartment_separators.push(offsets.iter().sum::<f32>());

            for (_modifier, member) in *compartment {
                let r = self.measure_text(
                    egui::Pos2::ZERO,
                    egui::Align2::LEFT_TOP,
                    member,
                    CLASS_ITEM_FONT_SIZE,
                );
                offsets.push(r.height());
                max_width = max_width.max(modifier_column + r.width());
            }
        }

        offsets.iter_mut().fold(0.0, |acc, x| {
            *x += acc;
            *x
        });
        let global_offset = offsets.last().unwrap() / 2.0;
        let rect = egui::Rect::from_center_size(
            position,
            egui::Vec2::new(max_width + 4.0, 2.0 * global_offset),
        );
        self.draw_rectangle(rect, fill, stroke);

        // Draw phase
        let mut offset_counter = 0;

        self.draw_text(
            position - egui::Vec2::new(0.0, global_offset - offsets[offset_counter]),
            egui::Align2::CENTER_TOP,
            name,
            CLASS_NAME_FONT_SIZE,
            egui::Color32::BLACK,
        );
        offset_counter += 1;

        for (idx, compartment) in compartments.iter().filter(|e| !e.is_empty()).enumerate() {
            if let Some(separator_offset) = compartment_separators.get(idx) {
                self.draw_line(
                    [
                        egui::Pos2::new(
                            position.x - rect.width() / 2.0,
                            position.y - global_offset + separator_offset,
                        ),
                        egui::Pos2::new(
                            position.x + rect.width() / 2.0,
                            position.y - global_offset + separator_offset,
                        ),
                    ],
                    Stroke::new(1.0, egui::Color32::BLACK),
                );
            }

            for (modifier, member) in *compartment {
                self.draw_text(
                    egui::Pos2::new(
                        position.x - max_width / 2.0 + modifier_column / 2.0,
                        position.y - global_offset + offsets[offset_counter],
                    ),
                    egui::Align2::CENTER_TOP,
                    modifier,
                    CLASS_ITEM_FONT_SIZE,
                    egui::Color32::BLACK,
                );
                self.draw_text(
                    egui::Pos2::new(
                        position.x - max_width / 2.0 + modifier_column,
                        position.y - global_offset + offsets[offset_counter],
                    ),
                    egui::Align2::LEFT_TOP,
                    member,
                    CLASS_ITEM_FONT_SIZE,
                    egui::Color32::BLACK,
                );
                offset_counter += 1;
            }
        }

        rect
    }
}

pub struct UiCanvas {
    painter: egui::Painter,
    canvas: egui::Rect,
    camera_offset: egui::Pos2,
    camera_scale: f32,
}

impl UiCanvas {
    pub fn new(
        painter: egui::Painter,
        canvas: egui::Rect,
        camera_offset: egui::Pos2,
        camera_scale: f32,
    ) -> Self {
        Self {
            painter,
            canvas,
            camera_offset,
            camera_scale,
        }
    }

    pub fn clear(&self, color: egui::Color32) {
        self.painter.rect(
            self.canvas,
            egui::CornerRadius::ZERO,
            color,
            egui::Stroke::NONE,
            egui::StrokeKind::Middle,
        );
    }

    pub fn draw_gridlines(
        &self,
        vertical: Option<(f32, egui::Color32)>,
        horizontal: Option<(f32, egui::Color32)>,
    ) {
        let canvas_size_scaled = (self.canvas.max - self.canvas.min) / self.camera_scale;

        if let Some((distance_x, color)) = vertical {
            for x in
                (0..((canvas_size_scaled.x / distance_x) as u32 + 2)).map(|e| distance_x * e as f32)
            {
                self.painter.vline(
                    self.canvas.min.x
                        + self.camera_offset.x % (distance_x * self.camera_scale)
                        + x * self.camera_scale,
                    egui::Rangef::new(self.canvas.min.y, self.canvas.max.y),
                    egui::Stroke::new(1.0, color),
                );
            }
        }
        if let Some((distance_y, color)) = horizontal {
            for y in
                (0..((canvas_size_scaled.y / distance_y) as u32 + 2)).map(|e| distance_y * e as f32)
            {
                self.painter.hline(
                    egui::Rangef::new(self.canvas.min.x, self.canvas.max.x),
                    self.canvas.min.y
                        + self.camera_offset.y % (distance_y * self.camera_scale)
                        + y * self.camera_scale,
                    egui::Stroke::new(1.0, color),
                );
            }
        }
    }

    fn sc_tr(&self, pos: egui::Pos2) -> egui::Pos2 {
        (pos * self.camera_scale) + self.canvas.min.to_vec2() + self.camera_offset.to_vec2()
    }
}

impl Canvas for UiCanvas {
    fn draw_line(&mut self, points: [egui::Pos2; 2], stroke: Stroke) {
        self.painter.line_segment(
            [self.sc_tr(points[0]), self.sc_tr(points[1])],
            egui::Stroke::from(stroke),
        );
    }

    fn draw_rectangle(&mut self, rect: egui::Rect, color: egui::Color32, stroke: Stroke) {
        self.painter.rect(
            (rect * self.camera_scale)
                .translate(self.canvas.min.to_vec2() + self.camera_offset.to_vec2())
                .intersect(self.canvas),
            egui::CornerRadius::ZERO,
            color,
            egui::Stroke::from(stroke),
            egui::StrokeKind::Middle,
        );
    }

    fn draw_polygon(&mut self, vertices: Vec<egui::Pos2>, color: egui::Color32, stroke: Stroke) {
        let vertices = vertices.into_iter().map(|p| self.sc_tr(p)).collect();
        self.painter.add(egui::Shape::convex_polygon(
            vertices,
            color,
            egui::Stroke::from(stroke),
        ));
    }

    fn measure_text(
        &mut self,
        position: egui::Pos2,
        anchor: egui::Align2,
        text: &str,
        font_size: f32,
    ) -> egui::Rect {
        self.painter
            .text(
                self.sc_tr(position),
                anchor,
                text,
                egui::FontId::proportional(font_size * self.camera_scale),
                egui::Color32::TRANSPARENT,
            )
            .translate(-self.canvas.min.to_vec2() - self.camera_offset.to_vec2())
            / self.camera_scale
    }

    fn draw_text(
        &mut self,
        position: egui::Pos2,
        anchor: egui::Align2,
        text: &str,
        font_size: f32,
        text_color: egui::Color32,
    ) {
        // Text below ~4px would rasterize to noise, skip it
        if font_size * self.camera_scale >= 4.0 {
            self.painter.text(
                self.sc_tr(position),
                anchor,
                text,
                egui::FontId::proportional(font_size * self.camera_scale),
                text_color,
            );
        }
    }
}

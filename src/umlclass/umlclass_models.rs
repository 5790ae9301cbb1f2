
use eframe::egui;

/// The live sidebar-backed record. There is exactly one instance per session,
/// owned by the diagram controller; stamped boxes copy it, they never alias it.
#[derive(Clone, Default)]
pub struct ClassBoxEditor {
    pub name: String,
    pub attributes: String,
    pub methods: String,
}

pub enum UmlClassAccessModifier {
    Public,
    Package,
    Protected,
    Private,
}

impl UmlClassAccessModifier {
    pub fn char(&self) -> &'static str {
        match self {
            UmlClassAccessModifier::Public => "+",
            UmlClassAccessModifier::Package => "~",
            UmlClassAccessModifier::Protected => "#",
            UmlClassAccessModifier::Private => "-",
        }
    }
}

pub struct UmlClassBox {
    pub uuid: uuid::Uuid,
    pub name: String,
    pub attributes: String,
    pub methods: String,
}

impl UmlClassBox {
    /// Snapshots the editor record. The box is independent of any
    /// subsequent editor edits.
    pub fn from_editor(uuid: uuid::Uuid, editor: &ClassBoxEditor) -> Self {
        Self {
            uuid,
            name: editor.name.clone(),
            attributes: editor.attributes.clone(),
            methods: editor.methods.clone(),
        }
    }

    /// Overwrites all three fields with the editor's current values.
    /// The only mutation path for an already-placed box.
    pub fn apply_editor(&mut self, editor: &ClassBoxEditor) {
        self.name = editor.name.clone();
        self.attributes = editor.attributes.clone();
        self.methods = editor.methods.clone();
    }

    pub fn parse_attributes(&self) -> Vec<(&str, &str)> {
        Self::parse_string(&self.attributes)
    }

    pub fn parse_methods(&self) -> Vec<(&str, &str)> {
        Self::parse_string(&self.methods)
    }

    fn parse_string(input: &str) -> Vec<(&str, &str)> {
        input.split("\n")
            .filter(|e| e.len() > 0)
            .map(Self::strip_access_modifiers).collect()
    }

    fn strip_access_modifiers(input: &str) -> (&str, &str) {
        for m in [UmlClassAccessModifier::Public,
                  UmlClassAccessModifier::Package,
                  UmlClassAccessModifier::Protected,
                  UmlClassAccessModifier::Private] {
            if let Some(r) = input.strip_prefix(m.char()) {
                return (m.char(), r.trim())
            }
        }
        return ("", input.trim())
    }
}

pub const GENERALIZATION_ARROWHEAD_HALF_SIZE: f32 = 10.0;

/// An inheritance arrow between two canvas points. Purely coordinate-based:
/// it carries no reference to the boxes it may visually connect, and it is
/// immutable once drawn.
pub struct Generalization {
    pub uuid: uuid::Uuid,
    pub start: egui::Pos2,
    pub end: egui::Pos2,
}

impl Generalization {
    pub fn new(uuid: uuid::Uuid, start: egui::Pos2, end: egui::Pos2) -> Self {
        Self { uuid, start, end }
    }

    /// Fixed-geometry triangular arrowhead anchored at the end point.
    pub fn arrowhead(&self) -> [egui::Pos2; 3] {
        let h = GENERALIZATION_ARROWHEAD_HALF_SIZE;
        [
            egui::Pos2::new(self.end.x + h, self.end.y),
            egui::Pos2::new(self.end.x - h, self.end.y + h),
            egui::Pos2::new(self.end.x - h, self.end.y - h),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_snapshot_is_independent_of_later_edits() {
        let mut editor = ClassBoxEditor {
            name: "Vehicle".to_owned(),
            attributes: "-wheels: int".to_owned(),
            methods: "+drive(): void".to_owned(),
        };

        let snapshot = UmlClassBox::from_editor(uuid::Uuid::now_v7(), &editor);
        editor.name = "Bicycle".to_owned();
        editor.attributes.clear();

        assert_eq!(snapshot.name, "Vehicle");
        assert_eq!(snapshot.attributes, "-wheels: int");
        assert_eq!(snapshot.methods, "+drive(): void");
    }

    #[test]
    fn apply_editor_overwrites_all_fields() {
        let editor = ClassBoxEditor {
            name: "A".to_owned(),
            attributes: "x".to_owned(),
            methods: "y".to_owned(),
        };
        let mut class_box = UmlClassBox::from_editor(uuid::Uuid::now_v7(), &editor);

        let later = ClassBoxEditor {
            name: "B".to_owned(),
            attributes: "".to_owned(),
            methods: "+run()".to_owned(),
        };
        class_box.apply_editor(&later);

        assert_eq!(class_box.name, "B");
        assert_eq!(class_box.attributes, "");
        assert_eq!(class_box.methods, "+run()");
    }

    #[test]
    fn parse_splits_lines_and_strips_modifiers() {
        let editor = ClassBoxEditor {
            name: "C".to_owned(),
            attributes: "+a: int\n#b: str\n\nplain".to_owned(),
            methods: "~m()\n-n()".to_owned(),
        };
        let class_box = UmlClassBox::from_editor(uuid::Uuid::now_v7(), &editor);

        assert_eq!(
            class_box.parse_attributes(),
            vec![("+", "a: int"), ("#", "b: str"), ("", "plain")]
        );
        assert_eq!(class_box.parse_methods(), vec![("~", "m()"), ("-", "n()")]);
    }

    #[test]
    fn arrowhead_vertices_are_fixed_around_end_point() {
        let arrow = Generalization::new(
            uuid::Uuid::now_v7(),
            egui::Pos2::new(1.0, 2.0),
            egui::Pos2::new(40.0, 60.0),
        );
        assert_eq!(
            arrow.arrowhead(),
            [
                egui::Pos2::new(50.0, 60.0),
                egui::Pos2::new(30.0, 70.0),
                egui::Pos2::new(30.0, 50.0),
            ]
        );
    }
}

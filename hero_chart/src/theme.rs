use egui::Color32;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ThemeId {
    Brand,
    Light,
}

impl ThemeId {
    pub fn label(self) -> &'static str {
        match self {
            ThemeId::Brand => "Brand",
            ThemeId::Light => "Light",
        }
    }

    pub fn from_name(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => ThemeId::Light,
            _ => ThemeId::Brand,
        }
    }
}

/// Colors for one hero chart frame.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub bg_top: Color32,
    pub bg_bottom: Color32,
    pub grid: Color32,
    pub bull: Color32,
    pub bear: Color32,
    /// Moving-average strokes, fastest period first. Extra periods reuse the last.
    pub averages: [Color32; 3],
    pub average_width: f32,
    pub wick_width: f32,
}

impl Theme {
    pub fn average_color(&self, slot: usize) -> Color32 {
        self.averages[slot.min(self.averages.len() - 1)]
    }
}

pub fn theme_from_id(id: ThemeId) -> Theme {
    match id {
        ThemeId::Brand => Theme {
            bg_top: Color32::from_rgba_unmultiplied(10, 22, 40, 128),
            bg_bottom: Color32::from_rgba_unmultiplied(5, 10, 20, 128),
            grid: Color32::from_rgba_unmultiplied(255, 255, 255, 13),
            bull: Color32::from_rgb(0x10, 0xb9, 0x81),
            bear: Color32::from_rgb(0xef, 0x44, 0x44),
            averages: [
                Color32::from_rgba_unmultiplied(201, 162, 39, 204),
                Color32::from_rgba_unmultiplied(201, 162, 39, 128),
                Color32::from_rgba_unmultiplied(201, 162, 39, 77),
            ],
            average_width: 1.5,
            wick_width: 1.0,
        },
        ThemeId::Light => Theme {
            bg_top: Color32::from_rgb(250, 250, 250),
            bg_bottom: Color32::from_rgb(236, 238, 242),
            grid: Color32::from_rgba_unmultiplied(0, 0, 0, 18),
            bull: Color32::from_rgb(20, 150, 70),
            bear: Color32::from_rgb(180, 40, 40),
            averages: [
                Color32::from_rgba_unmultiplied(150, 110, 10, 220),
                Color32::from_rgba_unmultiplied(150, 110, 10, 150),
                Color32::from_rgba_unmultiplied(150, 110, 10, 90),
            ],
            average_width: 1.5,
            wick_width: 1.0,
        },
    }
}

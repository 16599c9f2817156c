use nih_plug_egui::egui::{Color32, FontFamily};

macro_rules! define_colors {
    ($($name:ident = $value:expr;)*) => {
        $(pub(crate) const $name: Color32 = $value;)*
    };
}

define_colors! {
    // basic color definitions
    BG_BLACK = Color32::from_rgb(0, 0, 0);
    BG_LIGHT_BLUE = Color32::from_rgb(173, 216, 230);

    FG_BLACK = Color32::from_rgb(0, 0, 0);
    FG_WHITE = Color32::from_rgb(255, 255, 255);
    FG_GREY = Color32::from_rgb(128, 128, 128);
    FG_DARK_GREY = Color32::from_rgb(85, 85, 85);
    FG_LIGHT_BLUE = Color32::from_rgb(173, 216, 230);
    FG_ORANGE = Color32::from_rgb(255, 165, 0);
    FG_YELLOW = Color32::from_rgb(255, 255, 0);

    // program colors
    EDITOR_BG = BG_LIGHT_BLUE;
    RESPONSE_BG = BG_BLACK;
    RESPONSE_CURVE = FG_LIGHT_BLUE;
    RESPONSE_BORDER = FG_LIGHT_BLUE;
    GRID_LINE = FG_LIGHT_BLUE;
    GRID_GAIN_LINE = FG_DARK_GREY;
    GRID_ZERO_DB = FG_ORANGE;
    GRID_LABEL = FG_LIGHT_BLUE;
    ANALYZER_LEFT = FG_ORANGE;
    ANALYZER_RIGHT = FG_YELLOW;

    KNOB_FACE = Color32::from_rgb(236, 236, 231);
    KNOB_BORDER = Color32::from_rgb(54, 69, 79);
    KNOB_DISABLED = FG_GREY;
    KNOB_TEXT = FG_BLACK;
    KNOB_TEXT_DISABLED = FG_WHITE;
    KNOB_LABEL = FG_BLACK;

    TOGGLE_OFF = FG_BLACK;
    TOGGLE_ON = FG_GREY;
    TOGGLE_HOVER_BG = Color32::from_black_alpha(20);
}

pub(crate) const TEXT_BASE: f32 = 14.0;
pub(crate) const TEXT_SM: f32 = 13.0;

pub(crate) const FONT_NORMAL: FontFamily = FontFamily::Proportional;

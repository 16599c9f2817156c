use super::{
    knob::get_arc_points,
    palette::{self as C},
};
use nih_plug::prelude::{BoolParam, Param, ParamSetter};
use nih_plug_egui::egui::{
    pos2, vec2, Align2, Color32, FontId, Rect, Response, Sense, Shape, Stroke, Ui, Widget,
};
use std::f32::consts::{FRAC_PI_2, TAU};

const POWER_GAP: f32 = 40.0 / 360.0 * TAU;

pub(crate) enum ButtonContent {
    Text(&'static str),
    Power,
}

/// Flips a [`BoolParam`] on click. Drawn grey while the param is on, black otherwise.
pub(crate) struct ToggleButton<'a> {
    param: &'a BoolParam,
    param_setter: &'a ParamSetter<'a>,
    content: ButtonContent,
}

impl<'a> ToggleButton<'a> {
    pub(crate) fn new(
        param: &'a BoolParam,
        param_setter: &'a ParamSetter<'a>,
        content: ButtonContent,
    ) -> Self {
        Self {
            param,
            param_setter,
            content,
        }
    }

    fn toggle(&self) {
        let value = self.param.modulated_plain_value();
        self.param_setter.begin_set_parameter(self.param);
        self.param_setter.set_parameter(self.param, !value);
        self.param_setter.end_set_parameter(self.param);
    }
}

/// The square the power symbol sits in, centred in `rect` with a 5px margin.
pub(crate) fn power_icon_bounds(rect: Rect) -> Rect {
    let size = (rect.width().min(rect.height()) - 10.0).max(0.0);
    Rect::from_center_size(rect.center(), vec2(size, size))
}

fn paint_power_icon(ui: &Ui, rect: Rect, color: Color32) {
    let painter = ui.painter_at(rect);
    let bounds = power_icon_bounds(rect);
    let stroke = Stroke::new(2.0, color);

    // arc open at the top, a bar dropping through the gap
    let radius = ((bounds.width() - 8.0) / 2.0).max(0.0);
    let center = bounds.center();
    let points = get_arc_points(
        1.0,
        FRAC_PI_2 - POWER_GAP,
        FRAC_PI_2 - (TAU - POWER_GAP),
        center,
        radius,
        0.1,
    );
    painter.add(Shape::line(points, stroke));
    painter.line_segment([pos2(center.x, center.y - radius), center], stroke);

    painter.circle_stroke(center, bounds.width() / 2.0, stroke);
}

impl<'a> Widget for ToggleButton<'a> {
    fn ui(self, ui: &mut Ui) -> Response {
        let mut response = ui.allocate_response(ui.available_size(), Sense::click());

        if response.clicked() {
            self.toggle();
            response.mark_changed();
        }

        let rect = response.rect;
        if response.hovered() {
            ui.painter_at(rect).rect_filled(rect, 4.0, C::TOGGLE_HOVER_BG);
        }

        let color = if self.param.modulated_plain_value() {
            C::TOGGLE_ON
        } else {
            C::TOGGLE_OFF
        };
        match self.content {
            ButtonContent::Text(text) => {
                ui.painter_at(rect).text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    text,
                    FontId::new(C::TEXT_BASE, C::FONT_NORMAL),
                    color,
                );
            }
            ButtonContent::Power => paint_power_icon(ui, rect, color),
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod power_icon_bounds {
        use super::*;

        #[test]
        fn test_01() {
            let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 25.0));
            let expected = Rect::from_min_size(pos2(42.5, 5.0), vec2(15.0, 15.0));
            assert_eq!(power_icon_bounds(rect), expected);
        }

        #[test]
        fn test_02() {
            let rect = Rect::from_min_size(pos2(10.0, 10.0), vec2(8.0, 8.0));
            assert_eq!(power_icon_bounds(rect).width(), 0.0);
        }
    }
}

use super::palette as C;
use crate::parameter_formatters::DisplayParam;
use nih_plug::prelude::ParamSetter;
use nih_plug_egui::egui::{
    pos2, vec2, Align2, FontId, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Widget,
};
use std::{
    f32::consts::TAU,
    ops::{Add, Mul, Sub},
};

/// When shift+dragging a parameter, one pixel dragged corresponds to this much change in the
/// noramlized parameter.
const GRANULAR_DRAG_MULTIPLIER: f32 = 0.0002;
const NORMAL_DRAG_MULTIPLIER: f32 = 0.001;

/// Height of the value text and the range labels
const TEXT_HEIGHT: f32 = C::TEXT_BASE;

/// Text drawn next to the dial at `pos` (0.0 = start of the arc, 1.0 = end).
pub(crate) struct KnobLabel {
    pub(crate) pos: f32,
    pub(crate) text: &'static str,
}

/// A rotary dial filling its rect, with the value in the centre and labels
/// around the rim.
pub(crate) struct RotaryKnob<'a, P: DisplayParam> {
    param: &'a P,
    param_setter: &'a ParamSetter<'a>,
    suffix: &'static str,
    decimals: usize,
    labels: &'a [KnobLabel],
}

impl<'a, P: DisplayParam> RotaryKnob<'a, P> {
    // negative length to rotate clockwise
    // https://www.desmos.com/calculator/cctb9rqruw
    const ARC_START: f32 = -3.0 / 8.0 * TAU;
    const ARC_END: f32 = -9.0 / 8.0 * TAU;

    pub(crate) fn for_param(
        param: &'a P,
        param_setter: &'a ParamSetter,
        suffix: &'static str,
        decimals: usize,
        labels: &'a [KnobLabel],
    ) -> Self {
        Self {
            param,
            param_setter,
            suffix,
            decimals,
            labels,
        }
    }

    fn set_normalized_value(&self, normalized: f32) {
        // This snaps to the nearest plain value if the parameter is stepped in some way.
        let value = self.param.preview_plain(normalized);
        if value != self.param.modulated_plain_value() {
            self.param_setter.set_parameter(self.param, value);
        }
    }

    fn normalized_value(&self) -> f32 {
        self.param.modulated_normalized_value()
    }

    /// NOTE: You need to call begin and end drag when using this
    fn reset_param(&self) {
        self.param_setter
            .set_parameter(self.param, self.param.default_plain_value());
    }
}

/// The square the dial is drawn in: as wide as the rect allows, leaving room for the labels
/// below, pinned to the top.
pub(crate) fn dial_bounds(rect: Rect) -> Rect {
    let size = (rect.width().min(rect.height()) - TEXT_HEIGHT * 2.0).max(0.0);
    Rect::from_center_size(
        pos2(rect.center().x, rect.top() + 2.0 + size / 2.0),
        vec2(size, size),
    )
}

impl<'a, P: DisplayParam> Widget for RotaryKnob<'a, P> {
    fn ui(self, ui: &mut Ui) -> Response {
        // fills whatever rect it is `put()` into
        let mut response = ui.allocate_response(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;

        // handle mouse click/drag events
        //
        // drag only occurs after (1) holding down mouse, then (2) moving mouse
        // therefore `drag_started()` and `clicked()` cannot BOTH be true at the same frame
        //
        // when ctrl+clicking on the knob, reset the parameter
        if response.clicked() && ui.input(|x| x.modifiers.command) {
            self.param_setter.begin_set_parameter(self.param);
            self.reset_param();
            self.param_setter.end_set_parameter(self.param);
            response.mark_changed();
        } else {
            if response.drag_started() {
                self.param_setter.begin_set_parameter(self.param);
            }

            if response.interact_pointer_pos().is_some() {
                let drag_distance = -response.drag_delta().y;

                // check drag_delta to make sure we are actually dragging
                if drag_distance != 0.0 {
                    let value = self.normalized_value();

                    // Shift dragging switches to a more granular input method
                    let new_value = if ui.input(|mem| mem.modifiers.shift) {
                        value + (drag_distance * GRANULAR_DRAG_MULTIPLIER)
                    } else {
                        value + (drag_distance * NORMAL_DRAG_MULTIPLIER)
                    }
                    .clamp(0.0, 1.0);

                    self.set_normalized_value(new_value);
                    response.mark_changed();
                }
            }

            if response.drag_stopped() {
                self.param_setter.end_set_parameter(self.param);
            }
        }

        let enabled = ui.is_enabled();
        let painter = ui.painter_at(rect);
        let bounds = dial_bounds(rect);
        let center = bounds.center();
        let radius = bounds.width() / 2.0;

        // dial face
        painter.circle(
            center,
            radius,
            if enabled { C::KNOB_FACE } else { C::KNOB_DISABLED },
            Stroke::new(1.0, if enabled { C::KNOB_BORDER } else { C::KNOB_DISABLED }),
        );

        // pointer, from the rim to just outside the value text
        {
            let angle = lerp(Self::ARC_START, Self::ARC_END, self.normalized_value());
            let inner = (TEXT_HEIGHT * 1.5).min(radius);
            let pointer = Shape::line_segment(
                [
                    point_on_circle(center, inner, angle),
                    point_on_circle(center, radius - 2.0, angle),
                ],
                Stroke::new(4.0, if enabled { C::KNOB_BORDER } else { C::KNOB_DISABLED }),
            );
            painter.add(pointer);
        }

        // value text
        painter.text(
            center,
            Align2::CENTER_CENTER,
            self.param.display(self.suffix, self.decimals).format(),
            FontId::new(TEXT_HEIGHT, C::FONT_NORMAL),
            if enabled { C::KNOB_TEXT } else { C::KNOB_TEXT_DISABLED },
        );

        // range labels around the rim
        for label in self.labels {
            let angle = lerp(Self::ARC_START, Self::ARC_END, label.pos);
            painter.text(
                point_on_circle(center, radius + TEXT_HEIGHT * 1.2, angle),
                Align2::CENTER_CENTER,
                label.text,
                FontId::new(TEXT_HEIGHT, C::FONT_NORMAL),
                C::KNOB_LABEL,
            );
        }

        response
    }
}

/// Radian measurements start from the right and lie on the x-axis, see this
/// visualizer: https://www.desmos.com/calculator/cctb9rqruw
pub(crate) fn point_on_circle(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    pos2(
        center.x + radius * angle.cos(),
        center.y - radius * angle.sin(),
    )
}

/// Return a bunch of points that lie on an arc.
///
/// * `value` - A scalar between 0.0 and 1.0 to interpolate between `start` and `end`
/// * `start` - Starting angle in radians
/// * `end` - Ending angle in radians
/// * `center` - Center point of the circle which the arc is based on
/// * `radius` - radius
/// * `max_arc_distance` - How precise the curve should be, measured in radians
pub(crate) fn get_arc_points(
    value: f32,
    start: f32,
    mut end: f32,
    center: Pos2,
    radius: f32,
    max_arc_distance: f32,
) -> Vec<Pos2> {
    end = lerp(start, end, value);
    let length = (end - start).abs();

    let points = (length / max_arc_distance).ceil() as usize;
    let points = points.max(2);
    (0..points)
        .map(|i| {
            let t = i as f32 / (points - 1) as f32;
            point_on_circle(center, radius, lerp(start, end, t))
        })
        .collect()
}

pub(crate) fn lerp<T>(start: T, end: T, t: f32) -> T
where
    T: Add<T, Output = T> + Sub<T, Output = T> + Mul<f32, Output = T> + Copy,
{
    (end - start) * t.clamp(0.0, 1.0) + start
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    mod get_arc_points {
        use super::*;

        #[test]
        fn ends_on_start_and_end() {
            let center = pos2(10.0, 10.0);
            let points = get_arc_points(1.0, 0.0, -TAU / 4.0, center, 5.0, 0.2);
            let first = points[0];
            let last = points[points.len() - 1];
            assert_abs_diff_eq!(first.x, 15.0, epsilon = 1e-4);
            assert_abs_diff_eq!(first.y, 10.0, epsilon = 1e-4);
            // a quarter turn clockwise ends straight below the centre
            assert_abs_diff_eq!(last.x, 10.0, epsilon = 1e-4);
            assert_abs_diff_eq!(last.y, 15.0, epsilon = 1e-4);
        }

        #[test]
        fn points_lie_on_circle() {
            let center = pos2(0.0, 0.0);
            for p in get_arc_points(0.5, 1.0, -3.0, center, 7.0, 0.1) {
                assert_abs_diff_eq!(p.to_vec2().length(), 7.0, epsilon = 1e-4);
            }
        }
    }

    mod dial_bounds {
        use super::*;

        #[test]
        fn square_below_top_edge() {
            let rect = Rect::from_min_size(pos2(0.0, 100.0), vec2(200.0, 120.0));
            let bounds = dial_bounds(rect);
            assert_eq!(bounds.width(), bounds.height());
            assert_eq!(bounds.width(), 120.0 - TEXT_HEIGHT * 2.0);
            assert_eq!(bounds.top(), 102.0);
            assert_eq!(bounds.center().x, 100.0);
        }

        #[test]
        fn tiny_rect_collapses() {
            let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 10.0));
            assert_eq!(dial_bounds(rect).width(), 0.0);
        }
    }

    #[test]
    fn arc_runs_clockwise_from_bottom_left() {
        let center = pos2(0.0, 0.0);
        type Knob<'a> = RotaryKnob<'a, nih_plug::prelude::FloatParam>;
        let start = point_on_circle(center, 1.0, Knob::ARC_START);
        let end = point_on_circle(center, 1.0, Knob::ARC_END);
        // both ends sit below the centre, mirrored left and right
        assert!(start.x < 0.0 && start.y > 0.0);
        assert!(end.x > 0.0 && end.y > 0.0);
        assert_abs_diff_eq!(start.x, -end.x, epsilon = 1e-5);
    }
}

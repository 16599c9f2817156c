use super::{
    button::{ButtonContent, ToggleButton},
    knob::{KnobLabel, RotaryKnob},
    palette::{self as C},
};
use crate::{
    display::{db_to_y, freq_to_x, FREQUENCY_MARKERS, GAIN_MARKERS},
    params::{GAIN_DECIMALS, QUALITY_DECIMALS},
    response::ResponseCurve,
    ColinasEq,
};
use nih_plug::prelude::*;
use nih_plug_egui::{
    create_egui_editor,
    egui::{
        self, pos2, vec2, Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, TextStyle,
        Ui,
    },
    resizable_window::ResizableWindow,
};
use std::time::{Duration, Instant};

// the DPI-independent size of the window
pub(crate) const GUI_DEFAULT_WIDTH: u32 = 800;
pub(crate) const GUI_DEFAULT_HEIGHT: u32 = 600;
pub(crate) const GUI_MINIMUM_WIDTH: u32 = 400;
pub(crate) const GUI_MINIMUM_HEIGHT: u32 = 300;

const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

const BYPASS_ROW_HEIGHT: f32 = 25.0;
const ANALYZER_TOGGLE_WIDTH: f32 = 80.0;

const FREQUENCY_LABELS: &[KnobLabel] = &[
    KnobLabel { pos: 0.0, text: "20Hz" },
    KnobLabel { pos: 1.0, text: "20kHz" },
];
const GAIN_LABELS: &[KnobLabel] = &[
    KnobLabel { pos: 0.0, text: "-24dB" },
    KnobLabel { pos: 1.0, text: "+24dB" },
];
const QUALITY_LABELS: &[KnobLabel] = &[
    KnobLabel { pos: 0.0, text: "0.1" },
    KnobLabel { pos: 1.0, text: "10.0" },
];
const SLOPE_LABELS: &[KnobLabel] = &[
    KnobLabel { pos: 0.0, text: "12" },
    KnobLabel { pos: 1.0, text: "48" },
];

/// Removes `amount` from the top of `rect`, returning the removed strip.
fn take_top(rect: &mut Rect, amount: f32) -> Rect {
    let amount = amount.clamp(0.0, rect.height());
    let strip = Rect::from_min_max(rect.min, pos2(rect.right(), rect.top() + amount));
    rect.min.y += amount;
    strip
}

fn take_left(rect: &mut Rect, amount: f32) -> Rect {
    let amount = amount.clamp(0.0, rect.width());
    let strip = Rect::from_min_max(rect.min, pos2(rect.left() + amount, rect.bottom()));
    rect.min.x += amount;
    strip
}

fn take_right(rect: &mut Rect, amount: f32) -> Rect {
    let amount = amount.clamp(0.0, rect.width());
    let strip = Rect::from_min_max(pos2(rect.right() - amount, rect.top()), rect.max);
    rect.max.x -= amount;
    strip
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CutColumn {
    bypass: Rect,
    freq: Rect,
    slope: Rect,
}

impl CutColumn {
    fn new(mut area: Rect) -> Self {
        let bypass = take_top(&mut area, BYPASS_ROW_HEIGHT);
        let freq = take_top(&mut area, area.height() * 0.5);
        Self {
            bypass,
            freq,
            slope: area,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PeakColumn {
    bypass: Rect,
    freq: Rect,
    gain: Rect,
    quality: Rect,
}

impl PeakColumn {
    fn new(mut area: Rect) -> Self {
        let bypass = take_top(&mut area, BYPASS_ROW_HEIGHT);
        let freq = take_top(&mut area, area.height() * 0.33);
        let gain = take_top(&mut area, area.height() * 0.5);
        Self {
            bypass,
            freq,
            gain,
            quality: area,
        }
    }
}

/// Where everything in the window goes.
#[derive(Debug, Clone, Copy, PartialEq)]
struct EditorLayout {
    /// Black box holding the grid, curves and labels
    response: Rect,
    /// Inside `response`, leaving space for the labels. Gets the rounded border.
    render: Rect,
    /// Inside `render`, the area the grid and curves are mapped to
    analysis: Rect,

    low_cut: CutColumn,
    peak: PeakColumn,
    high_cut: CutColumn,
    analyzer_toggle: Rect,
}

impl EditorLayout {
    fn new(mut bounds: Rect) -> Self {
        let response = take_top(&mut bounds, bounds.height() * 0.33);
        take_top(&mut bounds, 10.0);

        let render = Rect::from_min_max(
            response.min + vec2(30.0, 20.0),
            response.max - vec2(30.0, 5.0),
        );
        let analysis = render.shrink2(vec2(0.0, 4.0));

        let low_cut = CutColumn::new(take_left(&mut bounds, bounds.width() * 0.33));
        let high_cut = CutColumn::new(take_right(&mut bounds, bounds.width() * 0.5));
        let peak = PeakColumn::new(bounds);

        // shares the low cut bypass row, left of the power button
        let analyzer_toggle = Rect::from_min_size(
            low_cut.bypass.min,
            vec2(
                ANALYZER_TOGGLE_WIDTH.min(low_cut.bypass.width() / 3.0),
                low_cut.bypass.height(),
            ),
        );

        Self {
            response,
            render,
            analysis,
            low_cut,
            peak,
            high_cut,
            analyzer_toggle,
        }
    }
}

/// Label for a gain line. The response curve and the analyzer share this axis.
fn gain_label(db: f32) -> String {
    if db > 0.0 {
        format!("+{db}")
    } else {
        format!("{db}")
    }
}

fn paint_grid(painter: &Painter, layout: &EditorLayout) {
    let area = layout.analysis;
    let font_id = FontId::new(C::TEXT_SM, C::FONT_NORMAL);

    for (freq, label) in FREQUENCY_MARKERS {
        let x = freq_to_x(*freq, area);
        painter.vline(x, area.y_range(), Stroke::new(1.0, C::GRID_LINE));
        painter.text(
            pos2(x, layout.response.top() + 1.0),
            Align2::CENTER_TOP,
            *label,
            font_id.clone(),
            C::GRID_LABEL,
        );
    }

    for db in GAIN_MARKERS {
        let y = db_to_y(*db, area);
        let is_zero = *db == 0.0;
        let line_color = if is_zero { C::GRID_ZERO_DB } else { C::GRID_GAIN_LINE };
        painter.hline(area.x_range(), y, Stroke::new(1.0, line_color));

        let label = gain_label(*db);
        let label_color = if is_zero { C::GRID_ZERO_DB } else { C::GRID_LABEL };
        painter.text(
            pos2(layout.response.right(), y),
            Align2::RIGHT_CENTER,
            &label,
            font_id.clone(),
            label_color,
        );
        painter.text(
            pos2(layout.response.left() + 1.0, y),
            Align2::LEFT_CENTER,
            label,
            font_id.clone(),
            label_color,
        );
    }
}

fn paint_path(painter: &Painter, path: &[Pos2], width: f32, color: Color32) {
    if path.len() < 2 {
        return;
    }
    painter.add(Shape::line(path.to_vec(), Stroke::new(width, color)));
}

fn paint_response(ui: &Ui, layout: &EditorLayout, response: &ResponseCurve, analyzer: bool) {
    let painter = ui.painter_at(layout.response);
    painter.rect_filled(layout.response, 0.0, C::RESPONSE_BG);
    paint_grid(&painter, layout);

    let curves = ui.painter_at(layout.render);
    if analyzer {
        paint_path(&curves, response.left_path(), 3.0, C::ANALYZER_LEFT);
        paint_path(&curves, response.right_path(), 3.0, C::ANALYZER_RIGHT);
    }
    paint_path(
        &curves,
        &response.response_path(layout.analysis),
        4.0,
        C::RESPONSE_CURVE,
    );

    painter.rect_stroke(layout.render, 8.0, Stroke::new(1.0, C::RESPONSE_BORDER));
}

/// Lets the display chain and analyzers update at most once per [`FRAME_INTERVAL`], however
/// often egui repaints.
#[derive(Debug, Default)]
struct FrameTimer {
    last: Option<Instant>,
}

impl FrameTimer {
    fn due(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < FRAME_INTERVAL => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

struct EditorState {
    response: ResponseCurve,
    timer: FrameTimer,
}

pub(crate) fn create_gui(
    plugin: &mut ColinasEq,
    _async_executor: AsyncExecutor<ColinasEq>,
) -> Option<Box<dyn Editor>> {
    let params = plugin.params.clone();
    let params_changed = plugin.params_changed.clone();
    let analyzer = plugin.analyzer.clone();
    let egui_state = plugin.params.editor_state.clone();
    create_egui_editor(
        plugin.params.editor_state.clone(),
        EditorState {
            response: ResponseCurve::default(),
            timer: FrameTimer::default(),
        },
        |ctx, _state| {
            // Override GUI styling
            {
                use egui::FontFamily::Proportional;

                let mut style = (*ctx.style()).clone();

                // font sizes
                style.text_styles = [
                    (TextStyle::Heading, FontId::new(16.0, Proportional)),
                    (TextStyle::Body, FontId::new(C::TEXT_BASE, Proportional)),
                    (TextStyle::Small, FontId::new(C::TEXT_SM, Proportional)),
                    (TextStyle::Button, FontId::new(C::TEXT_BASE, Proportional)),
                    // nih-plug's ParamSlider uses monospace for some reason,
                    // need to add this or else ParamSlider will panic
                    (TextStyle::Monospace, FontId::new(C::TEXT_BASE, Proportional)),
                ]
                .into();

                style.visuals.panel_fill = C::EDITOR_BG;
                style.spacing.item_spacing = vec2(0.0, 0.0);
                style.interaction.selectable_labels = false;

                ctx.set_style(style);
            }

            nih_log!("editor opened");
        },
        move |ctx, setter, state| {
            ResizableWindow::new("resizable-window")
                .min_size(vec2(GUI_MINIMUM_WIDTH as f32, GUI_MINIMUM_HEIGHT as f32))
                .show(ctx, &egui_state, |ui| {
                    let layout = EditorLayout::new(ui.max_rect());
                    let analyzer_enabled = params.analyzer_enabled.value();

                    if state.timer.due(Instant::now()) {
                        state
                            .response
                            .tick(
                                &params,
                                &params_changed,
                                &analyzer,
                                layout.analysis,
                                analyzer_enabled,
                            );
                    }
                    paint_response(ui, &layout, &state.response, analyzer_enabled);

                    // low cut
                    ui.put(
                        layout.low_cut.bypass,
                        ToggleButton::new(&params.low_cut_bypassed, setter, ButtonContent::Power),
                    );
                    ui.put(
                        layout.analyzer_toggle,
                        ToggleButton::new(
                            &params.analyzer_enabled,
                            setter,
                            ButtonContent::Text("Analyzer"),
                        ),
                    );
                    ui.add_enabled_ui(!params.low_cut_bypassed.value(), |ui| {
                        ui.put(
                            layout.low_cut.freq,
                            RotaryKnob::for_param(
                                &params.low_cut_freq,
                                setter,
                                "Hz",
                                0,
                                FREQUENCY_LABELS,
                            ),
                        );
                        ui.put(
                            layout.low_cut.slope,
                            RotaryKnob::for_param(
                                &params.low_cut_slope,
                                setter,
                                "",
                                0,
                                SLOPE_LABELS,
                            ),
                        );
                    });

                    // peak
                    ui.put(
                        layout.peak.bypass,
                        ToggleButton::new(&params.peak_bypassed, setter, ButtonContent::Power),
                    );
                    ui.add_enabled_ui(!params.peak_bypassed.value(), |ui| {
                        ui.put(
                            layout.peak.freq,
                            RotaryKnob::for_param(
                                &params.peak_freq,
                                setter,
                                "Hz",
                                0,
                                FREQUENCY_LABELS,
                            ),
                        );
                        ui.put(
                            layout.peak.gain,
                            RotaryKnob::for_param(
                                &params.peak_gain,
                                setter,
                                "dB",
                                GAIN_DECIMALS,
                                GAIN_LABELS,
                            ),
                        );
                        ui.put(
                            layout.peak.quality,
                            RotaryKnob::for_param(
                                &params.peak_quality,
                                setter,
                                "",
                                QUALITY_DECIMALS,
                                QUALITY_LABELS,
                            ),
                        );
                    });

                    // high cut
                    ui.put(
                        layout.high_cut.bypass,
                        ToggleButton::new(&params.high_cut_bypassed, setter, ButtonContent::Power),
                    );
                    ui.add_enabled_ui(!params.high_cut_bypassed.value(), |ui| {
                        ui.put(
                            layout.high_cut.freq,
                            RotaryKnob::for_param(
                                &params.high_cut_freq,
                                setter,
                                "Hz",
                                0,
                                FREQUENCY_LABELS,
                            ),
                        );
                        ui.put(
                            layout.high_cut.slope,
                            RotaryKnob::for_param(
                                &params.high_cut_slope,
                                setter,
                                "",
                                0,
                                SLOPE_LABELS,
                            ),
                        );
                    });
                });

            // the analyzer and curve are polled, not pushed
            ctx.request_repaint_after(FRAME_INTERVAL);
        },
    )
}

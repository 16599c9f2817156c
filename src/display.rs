//! Shared frequency and gain axes of the response area.

use nih_plug_egui::egui::Rect;

/// Frequency range of the response area, 20Hz - 20kHz
pub(crate) const MIN_DISPLAY_FREQUENCY: f32 = 20.0;
pub(crate) const MAX_DISPLAY_FREQUENCY: f32 = 20000.0;

/// Gain range of the response area. The analyzer is drawn against the same axis.
pub(crate) const MIN_DISPLAY_DB: f32 = -24.0;
pub(crate) const MAX_DISPLAY_DB: f32 = 24.0;

/// Vertical grid lines with their labels.
pub(crate) const FREQUENCY_MARKERS: &[(f32, &str)] = &[
    (20.0, "20Hz"),
    (50.0, "50Hz"),
    (100.0, "100Hz"),
    (200.0, "200Hz"),
    (500.0, "500Hz"),
    (1000.0, "1kHz"),
    (2000.0, "2kHz"),
    (5000.0, "5kHz"),
    (10000.0, "10kHz"),
    (20000.0, "20kHz"),
];

/// Horizontal grid lines
pub(crate) const GAIN_MARKERS: &[f32] = &[-24.0, -12.0, 0.0, 12.0, 24.0];

/// Linear interpolation of `value` from `src_min..src_max` onto `dst_min..dst_max`.
pub(crate) fn remap(value: f32, src_min: f32, src_max: f32, dst_min: f32, dst_max: f32) -> f32 {
    dst_min + (value - src_min) / (src_max - src_min) * (dst_max - dst_min)
}

/// 0.0 at 20Hz, 1.0 at 20kHz.
pub(crate) fn freq_to_log_position(freq: f32) -> f32 {
    (freq / MIN_DISPLAY_FREQUENCY).log10()
        / (MAX_DISPLAY_FREQUENCY / MIN_DISPLAY_FREQUENCY).log10()
}

/// Inverse of [`freq_to_log_position()`].
pub(crate) fn log_position_to_freq(position: f32) -> f32 {
    MIN_DISPLAY_FREQUENCY * (MAX_DISPLAY_FREQUENCY / MIN_DISPLAY_FREQUENCY).powf(position)
}

pub(crate) fn freq_to_x(freq: f32, rect: Rect) -> f32 {
    rect.left() + freq_to_log_position(freq) * rect.width()
}

/// `MAX_DISPLAY_DB` is the top of `rect`, `MIN_DISPLAY_DB` the bottom.
pub(crate) fn db_to_y(db: f32, rect: Rect) -> f32 {
    remap(
        db,
        MIN_DISPLAY_DB,
        MAX_DISPLAY_DB,
        rect.bottom(),
        rect.top(),
    )
}

//! Validation of the parameter state a host hands back to us.

use crate::params::{
    ChainSettings, Slope, MAX_FREQUENCY, MAX_GAIN_DB, MAX_QUALITY, MIN_FREQUENCY, MIN_GAIN_DB,
    MIN_QUALITY,
};
use nih_plug::{
    nih_warn,
    prelude::Enum,
    wrapper::state::{ParamValue, PluginState},
};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub(crate) enum StateError {
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),
    #[error("parameter `{id}` should be a {expected}")]
    WrongType { id: String, expected: &'static str },
    #[error("parameter `{0}` is not a finite number")]
    NotFinite(String),
    #[error("parameter `{id}` is {value}, outside of {min}..={max}")]
    OutOfRange {
        id: String,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("parameter `{id}` has no variant `{variant}`")]
    UnknownVariant { id: String, variant: String },
}

type Result<T, E = StateError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ParamKind {
    Float { min: f32, max: f32 },
    Slope,
    Toggle,
}

fn param_kind(id: &str) -> Option<ParamKind> {
    let kind = match id {
        "lowcut_freq" | "highcut_freq" | "peak_freq" => ParamKind::Float {
            min: MIN_FREQUENCY,
            max: MAX_FREQUENCY,
        },
        "peak_gain" => ParamKind::Float {
            min: MIN_GAIN_DB,
            max: MAX_GAIN_DB,
        },
        "peak_quality" => ParamKind::Float {
            min: MIN_QUALITY,
            max: MAX_QUALITY,
        },
        "lowcut_slope" | "highcut_slope" => ParamKind::Slope,
        "lowcut_bypassed" | "peak_bypassed" | "highcut_bypassed" | "analyzer_enabled" => {
            ParamKind::Toggle
        }
        _ => return None,
    };
    Some(kind)
}

fn slope_from_id(id: &str) -> Option<Slope> {
    let index = Slope::ids()?.iter().position(|variant| *variant == id)?;
    Some(Slope::from_index(index))
}

/// Enum params may also be stored by index.
fn slope_from_index(index: i32) -> Option<Slope> {
    let index = usize::try_from(index).ok()?;
    (index < Slope::variants().len()).then(|| Slope::from_index(index))
}

fn check_param(id: &str, value: &ParamValue) -> Result<()> {
    let kind = param_kind(id).ok_or_else(|| StateError::UnknownParameter(id.to_string()))?;

    match (kind, value) {
        (ParamKind::Float { min, max }, ParamValue::F32(value)) => {
            if !value.is_finite() {
                return Err(StateError::NotFinite(id.to_string()));
            }
            if *value < min || *value > max {
                return Err(StateError::OutOfRange {
                    id: id.to_string(),
                    value: *value,
                    min,
                    max,
                });
            }
            Ok(())
        }
        (ParamKind::Slope, ParamValue::String(variant)) => match slope_from_id(variant) {
            Some(_) => Ok(()),
            None => Err(StateError::UnknownVariant {
                id: id.to_string(),
                variant: variant.clone(),
            }),
        },
        (ParamKind::Slope, ParamValue::I32(index)) => match slope_from_index(*index) {
            Some(_) => Ok(()),
            None => Err(StateError::UnknownVariant {
                id: id.to_string(),
                variant: index.to_string(),
            }),
        },
        (ParamKind::Toggle, ParamValue::Bool(_)) => Ok(()),
        (kind, _) => Err(StateError::WrongType {
            id: id.to_string(),
            expected: match kind {
                ParamKind::Float { .. } => "float",
                ParamKind::Slope => "slope id",
                ParamKind::Toggle => "bool",
            },
        }),
    }
}

/// Drop every entry that would not load cleanly. The affected parameters keep their current
/// value. Returns the number of dropped entries.
pub(crate) fn sanitize_state(state: &mut PluginState) -> usize {
    let before = state.params.len();

    state.params.retain(|id, value| match check_param(id, value) {
        Ok(()) => true,
        Err(err) => {
            nih_warn!("ignoring saved state: {err}");
            false
        }
    });

    before - state.params.len()
}

/// The chain a state would load into. Missing or invalid entries fall back to the defaults.
pub(crate) fn settings_from_state(state: &PluginState) -> ChainSettings {
    let mut settings = ChainSettings::default();

    for (id, value) in &state.params {
        if check_param(id, value).is_err() {
            continue;
        }

        match (id.as_str(), value) {
            ("lowcut_freq", ParamValue::F32(v)) => settings.low_cut_freq = *v,
            ("highcut_freq", ParamValue::F32(v)) => settings.high_cut_freq = *v,
            ("peak_freq", ParamValue::F32(v)) => settings.peak_freq = *v,
            ("peak_gain", ParamValue::F32(v)) => settings.peak_gain_db = *v,
            ("peak_quality", ParamValue::F32(v)) => settings.peak_quality = *v,
            ("lowcut_slope", ParamValue::String(s)) => {
                if let Some(slope) = slope_from_id(s) {
                    settings.low_cut_slope = slope;
                }
            }
            ("lowcut_slope", ParamValue::I32(i)) => {
                if let Some(slope) = slope_from_index(*i) {
                    settings.low_cut_slope = slope;
                }
            }
            ("highcut_slope", ParamValue::String(s)) => {
                if let Some(slope) = slope_from_id(s) {
                    settings.high_cut_slope = slope;
                }
            }
            ("highcut_slope", ParamValue::I32(i)) => {
                if let Some(slope) = slope_from_index(*i) {
                    settings.high_cut_slope = slope;
                }
            }
            ("lowcut_bypassed", ParamValue::Bool(b)) => settings.low_cut_bypassed = *b,
            ("peak_bypassed", ParamValue::Bool(b)) => settings.peak_bypassed = *b,
            ("highcut_bypassed", ParamValue::Bool(b)) => settings.high_cut_bypassed = *b,
            _ => (),
        }
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slope_id(slope: Slope) -> &'static str {
        Slope::ids().unwrap()[slope.to_index()]
    }

    /// The same shape nih-plug writes for our parameters.
    fn state_json(settings: &ChainSettings) -> serde_json::Value {
        serde_json::json!({
            "version": "0.1.0",
            "params": {
                "lowcut_freq": settings.low_cut_freq,
                "highcut_freq": settings.high_cut_freq,
                "peak_freq": settings.peak_freq,
                "peak_gain": settings.peak_gain_db,
                "peak_quality": settings.peak_quality,
                "lowcut_slope": slope_id(settings.low_cut_slope),
                "highcut_slope": slope_id(settings.high_cut_slope),
                "lowcut_bypassed": settings.low_cut_bypassed,
                "peak_bypassed": settings.peak_bypassed,
                "highcut_bypassed": settings.high_cut_bypassed,
                "analyzer_enabled": true,
            },
            "fields": {},
        })
    }

    fn state(json: serde_json::Value) -> PluginState {
        serde_json::from_value(json).unwrap()
    }

    mod sanitize_state {
        use super::*;

        #[test]
        fn round_trip() {
            let settings = ChainSettings {
                low_cut_freq: 85.0,
                high_cut_freq: 12500.0,
                peak_freq: 2200.0,
                peak_gain_db: -7.5,
                peak_quality: 2.35,
                low_cut_slope: Slope::S36,
                high_cut_slope: Slope::S24,
                low_cut_bypassed: false,
                peak_bypassed: true,
                high_cut_bypassed: false,
            };

            let bytes = serde_json::to_vec(&state(state_json(&settings))).unwrap();
            let mut restored: PluginState = serde_json::from_slice(&bytes).unwrap();

            assert_eq!(sanitize_state(&mut restored), 0);
            assert_eq!(settings_from_state(&restored), settings);
        }

        #[test]
        fn drops_bad_entries() {
            let mut json = state_json(&ChainSettings::default());
            json["params"]["peak_gain"] = serde_json::json!(48.0);
            json["params"]["peak_quality"] = serde_json::json!("wide");
            json["params"]["lowcut_slope"] = serde_json::json!("slope_96");
            json["params"]["peak_bypassed"] = serde_json::json!(1.0);
            json["params"]["mystery"] = serde_json::json!(true);

            let mut state = state(json);
            assert_eq!(sanitize_state(&mut state), 5);
            assert_eq!(state.params.len(), 7);
            assert!(!state.params.contains_key("peak_gain"));
            assert!(state.params.contains_key("peak_freq"));
        }
    }

    mod check_param {
        use super::*;

        #[test]
        fn test_01() {
            let input = ParamValue::F32(f32::NAN);
            let expected = Err(StateError::NotFinite("peak_freq".to_string()));
            assert_eq!(check_param("peak_freq", &input), expected);
        }

        #[test]
        fn test_02() {
            let input = ParamValue::F32(5.0);
            let expected = Err(StateError::OutOfRange {
                id: "lowcut_freq".to_string(),
                value: 5.0,
                min: MIN_FREQUENCY,
                max: MAX_FREQUENCY,
            });
            assert_eq!(check_param("lowcut_freq", &input), expected);
        }

        #[test]
        fn test_03() {
            let input = ParamValue::Bool(true);
            let expected = Err(StateError::WrongType {
                id: "highcut_slope".to_string(),
                expected: "slope id",
            });
            assert_eq!(check_param("highcut_slope", &input), expected);
        }

        #[test]
        fn test_04() {
            let input = ParamValue::String("slope_48".to_string());
            assert_eq!(check_param("highcut_slope", &input), Ok(()));
        }

        #[test]
        fn test_05() {
            let input = ParamValue::F32(MAX_QUALITY);
            assert_eq!(check_param("peak_quality", &input), Ok(()));
        }

        #[test]
        fn test_06() {
            let input = ParamValue::I32(3);
            assert_eq!(check_param("lowcut_slope", &input), Ok(()));
        }

        #[test]
        fn test_07() {
            let input = ParamValue::I32(4);
            let expected = Err(StateError::UnknownVariant {
                id: "lowcut_slope".to_string(),
                variant: "4".to_string(),
            });
            assert_eq!(check_param("lowcut_slope", &input), expected);
            assert!(check_param("lowcut_slope", &ParamValue::I32(-1)).is_err());
        }
    }

    mod settings_from_state {
        use super::*;

        #[test]
        fn missing_entries_use_defaults() {
            let state = state(serde_json::json!({
                "version": "0.1.0",
                "params": { "peak_gain": 3.0 },
                "fields": {},
            }));
            let expected = ChainSettings {
                peak_gain_db: 3.0,
                ..Default::default()
            };
            assert_eq!(settings_from_state(&state), expected);
        }

        #[test]
        fn slope_by_index() {
            let mut state = state(serde_json::json!({
                "version": "0.1.0",
                "params": {},
                "fields": {},
            }));
            state
                .params
                .insert("highcut_slope".to_string(), ParamValue::I32(2));

            assert_eq!(sanitize_state(&mut state), 0);
            assert_eq!(settings_from_state(&state).high_cut_slope, Slope::S36);
        }
    }
}

use nih_plug::prelude::{Enum, EnumParam, FloatParam, Param};
use std::sync::Arc;

type V2SFormatter = dyn Fn(f32) -> String + Send + Sync;
type S2VFormatter = dyn Fn(&str) -> Option<f32> + Send + Sync;

/// What a knob shows in its centre.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParamDisplay {
    Float {
        value: f32,
        suffix: &'static str,
        /// digits after the dot when the value is not shown in thousands
        decimals: usize,
    },
    Choice {
        name: &'static str,
    },
}

impl ParamDisplay {
    pub(crate) fn format(&self) -> String {
        match self {
            Self::Float {
                value,
                suffix,
                decimals,
            } => format_float(*value, suffix, *decimals),
            Self::Choice { name } => format_choice(name),
        }
    }
}

/// Values above 999 are divided by 1000 and shown with two decimals, with a `k` in front of a
/// non-empty suffix.
fn format_float(mut value: f32, suffix: &str, decimals: usize) -> String {
    let mut thousands = false;
    if value > 999.0 {
        value /= 1000.0;
        thousands = true;
    }

    let digits = if thousands { 2 } else { decimals };
    let mut s = format!("{value:.digits$}");

    if !suffix.is_empty() {
        s.push(' ');
        if thousands {
            s.push('k');
        }
        s.push_str(suffix);
    }

    s
}

fn format_choice(name: &str) -> String {
    name.to_string()
}

/// Parameters that know how to describe themselves to a knob.
pub(crate) trait DisplayParam: Param {
    fn display(&self, suffix: &'static str, decimals: usize) -> ParamDisplay;
}

impl DisplayParam for FloatParam {
    fn display(&self, suffix: &'static str, decimals: usize) -> ParamDisplay {
        ParamDisplay::Float {
            value: self.modulated_plain_value(),
            suffix,
            decimals,
        }
    }
}

impl<T: Enum + PartialEq + 'static> DisplayParam for EnumParam<T> {
    fn display(&self, _suffix: &'static str, _decimals: usize) -> ParamDisplay {
        let index = self.value().to_index();
        ParamDisplay::Choice {
            name: T::variants()[index],
        }
    }
}

/// Format a value the same way the knobs do, see [`ParamDisplay::Float`].
pub(crate) fn v2s_f32_k_suffix(suffix: &'static str, decimals: usize) -> Arc<V2SFormatter> {
    Arc::new(move |value| {
        ParamDisplay::Float {
            value,
            suffix,
            decimals,
        }
        .format()
    })
}

/// Parse the output of [`v2s_f32_k_suffix()`]. The unit is optional, a unit starting with `k`
/// multiplies the value by 1000.
pub(crate) fn s2v_f32_k_suffix() -> Arc<S2VFormatter> {
    Arc::new(move |string| {
        let string = string.trim();

        let number_end = string
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(string.len());
        let (number, unit) = string.split_at(number_end);
        let value: f32 = number.trim().parse().ok()?;

        match unit.trim().chars().next() {
            Some('k') | Some('K') => Some(value * 1000.0),
            _ => Some(value),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    mod v2s_f32_k_suffix {
        use super::*;

        #[test]
        fn test_01() {
            let input = 750.0;
            let expected = "750 Hz";
            assert_eq!(v2s_f32_k_suffix("Hz", 0)(input), expected);
        }

        #[test]
        fn test_02() {
            let input = 1500.0;
            let expected = "1.50 kHz";
            assert_eq!(v2s_f32_k_suffix("Hz", 0)(input), expected);
        }

        #[test]
        fn test_03() {
            let input = 20000.0;
            let expected = "20.00 kHz";
            assert_eq!(v2s_f32_k_suffix("Hz", 0)(input), expected);
        }

        #[test]
        fn test_04() {
            let input = 6.0;
            let expected = "6 dB";
            assert_eq!(v2s_f32_k_suffix("dB", 0)(input), expected);
        }

        #[test]
        fn test_05() {
            let input = 0.7;
            let expected = "0.70";
            assert_eq!(v2s_f32_k_suffix("", 2)(input), expected);
        }

        #[test]
        fn test_06() {
            // exactly 999 stays in plain units
            let input = 999.0;
            let expected = "999 Hz";
            assert_eq!(v2s_f32_k_suffix("Hz", 0)(input), expected);
        }
    }

    mod s2v_f32_k_suffix {
        use super::*;

        #[test]
        fn test_01() {
            let input = "750 Hz";
            let expected = Some(750.0);
            assert_eq!(s2v_f32_k_suffix()(input), expected);
        }

        #[test]
        fn test_02() {
            let input = "1.50 kHz";
            let expected = Some(1500.0);
            assert_eq!(s2v_f32_k_suffix()(input), expected);
        }

        #[test]
        fn test_03() {
            let input = "2k";
            let expected = Some(2000.0);
            assert_eq!(s2v_f32_k_suffix()(input), expected);
        }

        #[test]
        fn test_04() {
            let input = "-6.5 dB";
            let expected = Some(-6.5);
            assert_eq!(s2v_f32_k_suffix()(input), expected);
        }

        #[test]
        fn test_05() {
            let input = "  0.7 ";
            let expected = Some(0.7);
            assert_eq!(s2v_f32_k_suffix()(input), expected);
        }

        #[test]
        fn test_06() {
            let input = "Hz";
            let expected = None;
            assert_eq!(s2v_f32_k_suffix()(input), expected);
        }
    }

    mod param_display {
        use super::*;
        use crate::params::Slope;

        #[test]
        fn choice_uses_variant_name() {
            let param = EnumParam::new("Slope", Slope::S36);
            assert_eq!(param.display("", 0).format(), "36 dB/Oct");
        }

        #[test]
        fn float_uses_current_value() {
            let param = FloatParam::new(
                "Freq",
                1000.0,
                nih_plug::prelude::FloatRange::Linear {
                    min: 20.0,
                    max: 20000.0,
                },
            );
            assert_eq!(param.display("Hz", 0).format(), "1.00 kHz");
        }
    }
}

use crate::data_types::GuideBarUnits;

/// Formats a value in seconds according to the guide bar units.
pub fn format_number(seconds: f64, units: GuideBarUnits) -> String {
    let (value, unit) = if units.contains(GuideBarUnits::HZ) {
        let hz = if seconds != 0.0 { 1.0 / seconds } else { 0.0 };
        (hz, "Hz")
    } else if units.contains(GuideBarUnits::MS) {
        (seconds * 1000.0, "ms")
    } else {
        (seconds, "s")
    };

    let text = format_scalar(value);
    if units.contains(GuideBarUnits::SHOW_UNITS) {
        format!("{} {}", text, unit)
    } else {
        text
    }
}

/// Roughly three significant digits, trailing zeros removed.
fn format_scalar(value: f64) -> String {
    let magnitude = value.abs();
    let text = if magnitude >= 100.0 {
        format!("{:.0}", value)
    } else if magnitude >= 10.0 {
        format!("{:.1}", value)
    } else if magnitude >= 1.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.3}", value)
    };

    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.');
        if trimmed == "-0" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        text
    }
}

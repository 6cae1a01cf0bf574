use std::time::Duration;

use thousands::Separable;

/// `Score: 1,234`
pub fn format_score(label: &str, value: u32) -> String {
    format!("{label}: {}", value.separate_with_commas())
}

/// Formats elapsed run time as `m:ss`, truncating partial seconds.
pub fn format_survival_time(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Like [`format_survival_time`], from simulation milliseconds.
pub fn format_survival_ms(elapsed_ms: f32) -> String {
    let ms = if elapsed_ms.is_finite() { elapsed_ms.max(0.0) } else { 0.0 };
    format_survival_time(Duration::from_millis(ms as u64))
}

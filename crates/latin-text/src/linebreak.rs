//! Width-measured word wrapping
//!
//! Greedy line breaking on whitespace, constrained by rendered width
//! rather than character count: the caller supplies the measure function
//! because width depends on the active font and size.

/// Split text into lines no wider than `max_width`.
///
/// `measure` returns the rendered width of a candidate line in the same
/// unit as `max_width`. A single word wider than `max_width` gets its
/// own line rather than being broken mid-word.
pub fn wrap_to_width<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    if max_width <= 0.0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
            continue;
        }

        let candidate = format!("{current_line} {word}");
        if measure(&candidate) <= max_width {
            current_line = candidate;
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

//! Text layout helpers that do not depend on a live graphics context.

/// Splits `label` into lines no wider than `max_width`, breaking at whitespace.
///
/// `measure` reports the rendered width of a candidate line. Single words
/// wider than `max_width` occupy a line of their own.
pub(crate) fn wrap_label<M>(label: &str, max_width: f32, mut measure: M) -> Vec<String>
where
    M: FnMut(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in label.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

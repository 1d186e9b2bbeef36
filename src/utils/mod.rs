mod logging;

pub use logging::init_logging;

/// Fills `{name}` placeholders in a prompt template.
///
/// Unknown placeholders are left untouched so a template typo shows up in the
/// rendered prompt instead of silently disappearing.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in values {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

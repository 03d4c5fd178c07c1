use crate::memory::{format_number, Value};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

/// Border style shared by every pane
pub(crate) fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Format a value with styled spans
pub(crate) fn format_value_styled(value: &Value) -> Vec<Span<'static>> {
    match value {
        Value::Undefined => vec![Span::styled(
            "undefined",
            Style::default()
                .fg(DEFAULT_THEME.comment)
                .add_modifier(Modifier::DIM),
        )],
        Value::Null => vec![Span::styled("null", Style::default().fg(DEFAULT_THEME.number))],
        Value::Boolean(b) => vec![Span::styled(
            b.to_string(),
            Style::default().fg(DEFAULT_THEME.number),
        )],
        Value::Number(n) => vec![Span::styled(
            format_number(*n),
            Style::default().fg(DEFAULT_THEME.number),
        )],
        Value::String(s) => vec![Span::styled(
            format!("{:?}", s.as_ref()),
            Style::default().fg(DEFAULT_THEME.string),
        )],
        Value::Function(_) | Value::Native(_) => vec![Span::styled(
            value.inspect(),
            Style::default().fg(DEFAULT_THEME.function),
        )],
        Value::Object(_) | Value::Array(_) => vec![Span::styled(
            value.inspect(),
            Style::default().fg(DEFAULT_THEME.fg),
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &Value) -> String {
        format_value_styled(value)
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn test_value_text() {
        assert_eq!(text(&Value::Undefined), "undefined");
        assert_eq!(text(&Value::Number(2.5)), "2.5");
        assert_eq!(text(&Value::string("yah me")), "\"yah me\"");
        assert_eq!(text(&Value::array(vec![Value::Number(1.0)])), "[1]");
    }
}

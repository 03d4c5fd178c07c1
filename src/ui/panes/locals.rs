//! Locals pane rendering
//!
//! Shows the bindings of the stepped function's scope in declaration order,
//! followed by the expressions evaluated so far and their results.

use super::utils::{border_style, format_value_styled};
use crate::memory::Value;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// One evaluated expression and its outcome
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub expression: String,
    pub result: Result<Value, String>,
}

/// Data needed to render the locals pane
pub struct LocalsRenderData<'a> {
    pub locals: &'a [(String, Value)],
    pub evaluations: &'a [Evaluation],
    pub is_called: bool,
}

pub fn render_locals_pane(
    frame: &mut Frame,
    area: Rect,
    data: LocalsRenderData,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Locals ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let mut all_items = Vec::new();
    let comment = Style::default().fg(DEFAULT_THEME.comment);

    if !data.is_called {
        all_items.push(ListItem::new("(not called)").style(comment));
    } else if data.locals.is_empty() {
        all_items.push(ListItem::new("(no locals)").style(comment));
    }

    for (name, value) in data.locals {
        let mut spans = vec![
            Span::styled(
                name.clone(),
                Style::default()
                    .fg(DEFAULT_THEME.fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" = ", comment),
        ];
        spans.extend(format_value_styled(value));
        all_items.push(ListItem::new(Line::from(spans)));
    }

    if !data.evaluations.is_empty() {
        all_items.push(ListItem::new(""));
        all_items.push(ListItem::new(Line::from(vec![
            Span::styled("▸ ", Style::default().fg(DEFAULT_THEME.secondary)),
            Span::styled("Evaluated", comment),
        ])));
    }
    for evaluation in data.evaluations {
        let mut spans = vec![
            Span::styled(
                evaluation.expression.clone(),
                Style::default().fg(DEFAULT_THEME.evaluation),
            ),
            Span::styled(" → ", comment),
        ];
        match &evaluation.result {
            Ok(value) => spans.extend(format_value_styled(value)),
            Err(message) => spans.push(Span::styled(
                message.clone(),
                Style::default().fg(DEFAULT_THEME.error),
            )),
        }
        all_items.push(ListItem::new(Line::from(spans)));
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    *scroll_offset = (*scroll_offset).min(all_items.len().saturating_sub(visible_height));

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

//! Steps pane rendering
//!
//! Lists the linearized steps with their jumps so the effect of `if`
//! decomposition is visible while stepping.

use super::utils::border_style;
use crate::codegen::Generator;
use crate::parser::ast::{Program, Stmt};
use crate::transform::{Instruction, Step};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// One rendered step: the code it runs and its jump annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepLabel {
    pub code: String,
    pub jumps: String,
}

/// First line of a statement as the generator prints it
fn first_line(generator: &Generator, stmt: &Stmt) -> String {
    let text = generator.generate(&Program::new(vec![stmt.clone()]));
    let line = text.lines().next().unwrap_or_default();
    if text.lines().nth(1).is_some() {
        format!("{} …", line)
    } else {
        line.to_string()
    }
}

/// Labels for `steps`, computed once since steps never change after parsing
pub fn step_labels(steps: &[Step]) -> Vec<StepLabel> {
    let generator = Generator::new(2);
    steps
        .iter()
        .map(|step| {
            let mut code = Vec::new();
            let mut jumps = Vec::new();
            for instruction in &step.instructions {
                match instruction {
                    Instruction::Execute(stmt) => code.push(first_line(&generator, stmt)),
                    Instruction::Jump(n) => jumps.push(format!("skip {}", n)),
                    Instruction::ConditionalJump {
                        test,
                        offset_if_true,
                        offset_if_false,
                    } => {
                        let test = Stmt::Expression {
                            expression: test.clone(),
                            location: test.location(),
                        };
                        let test = first_line(&generator, &test);
                        code.push(format!("if ({})", test.trim_end_matches(';')));
                        if *offset_if_true > 0 {
                            jumps.push(format!("true: skip {}", offset_if_true));
                        }
                        if *offset_if_false > 0 {
                            jumps.push(format!("false: skip {}", offset_if_false));
                        }
                    }
                }
            }
            StepLabel {
                code: code.join(" "),
                jumps: jumps.join(", "),
            }
        })
        .collect()
}

pub fn render_steps_pane(
    frame: &mut Frame,
    area: Rect,
    labels: &[StepLabel],
    position: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(format!(" Steps ({}) ", labels.len()))
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let total = labels.len() + 1;

    // Follow the position unless the user scrolled it into view already
    if position < *scroll_offset || position >= *scroll_offset + visible_height {
        *scroll_offset = position.saturating_sub(visible_height / 2);
    }
    *scroll_offset = (*scroll_offset).min(total.saturating_sub(visible_height));

    let end_label = StepLabel {
        code: "(end)".to_string(),
        jumps: String::new(),
    };
    let items: Vec<ListItem> = labels
        .iter()
        .chain(std::iter::once(&end_label))
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(index, label)| {
            let is_current = index == position;
            let marker = if is_current { "▶" } else { " " };
            let mut spans = vec![
                Span::styled(
                    format!("{}{:3} ", marker, index),
                    if is_current {
                        Style::default()
                            .fg(DEFAULT_THEME.secondary)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(DEFAULT_THEME.comment)
                    },
                ),
                Span::styled(label.code.clone(), Style::default().fg(DEFAULT_THEME.fg)),
            ];
            if !label.jumps.is_empty() {
                spans.push(Span::styled(
                    format!("  ⤼ {}", label.jumps),
                    Style::default().fg(DEFAULT_THEME.jump),
                ));
            }
            let line = Line::from(spans);
            if is_current {
                ListItem::new(line).style(Style::default().bg(DEFAULT_THEME.current_line_bg))
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::transform::linearize::linearize;

    #[test]
    fn test_labels() {
        let body = Parser::new("a = 1;\nif (a > 0) { b = 2; } else { c = 3; }\nwhile (x) { y(); }")
            .unwrap()
            .parse_program()
            .unwrap()
            .body;
        let labels = step_labels(&linearize(body));
        assert_eq!(labels.len(), 5);
        assert_eq!(labels[0].code, "a = 1;");
        assert_eq!(labels[1].code, "if (a > 0)");
        assert_eq!(labels[1].jumps, "false: skip 1");
        assert_eq!(labels[2].jumps, "skip 1");
        assert_eq!(labels[4].code, "while (x) { …");
    }
}

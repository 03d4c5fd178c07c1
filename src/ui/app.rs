//! Main TUI application state and logic

use super::panes::{
    self, Evaluation, LocalsRenderData, SourceScrollState, StatusRenderData, StepLabel,
};
use crate::stepper::{Stepper, StepperError};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Console,
    Locals,
    Steps,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> console -> locals -> steps)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Console,
            FocusedPane::Console => FocusedPane::Locals,
            FocusedPane::Locals => FocusedPane::Steps,
            FocusedPane::Steps => FocusedPane::Source,
        }
    }
}

/// Keyboard routing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing an expression to evaluate
    Evaluate(String),
}

/// The main application state
pub struct App {
    /// The driver for the function on screen
    pub stepper: Stepper,

    /// The function text
    pub source_code: String,

    step_labels: Vec<StepLabel>,

    pub focused_pane: FocusedPane,
    pub input_mode: InputMode,

    /// Per-pane scroll offsets
    pub source_scroll: SourceScrollState,
    pub console_scroll: usize,
    pub locals_scroll: usize,
    pub steps_scroll: usize,

    /// Expressions evaluated so far, oldest first
    pub evaluations: Vec<Evaluation>,

    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether the last action failed
    pub is_error: bool,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create an app for a stepper that has already been parsed and called
    pub fn new(stepper: Stepper, source_code: String) -> Self {
        let step_labels = panes::step_labels(stepper.steps());
        let long_ago = Instant::now()
            .checked_sub(Duration::from_secs(1))
            .unwrap_or_else(Instant::now);
        App {
            stepper,
            source_code,
            step_labels,
            focused_pane: FocusedPane::Source,
            input_mode: InputMode::Normal,
            source_scroll: SourceScrollState::default(),
            console_scroll: 0,
            locals_scroll: 0,
            steps_scroll: 0,
            evaluations: Vec::new(),
            should_quit: false,
            status_message: String::from("Ready!"),
            is_error: false,
            is_playing: false,
            last_play_time: long_ago,
            last_space_press: long_ago,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_secs(1) {
                if self.stepper.is_finished() {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                } else {
                    self.step_forward();
                    if self.is_error {
                        self.is_playing = false;
                    }
                }
                self.last_play_time = Instant::now();
            }

            // Poll with a timeout so auto-play keeps ticking
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Console (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Locals (top) | Steps (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            self.stepper.current_location().map(|location| location.line),
            self.is_error,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_console_pane(
            frame,
            left_rows[1],
            self.stepper.console(),
            self.focused_pane == FocusedPane::Console,
            &mut self.console_scroll,
        );

        let locals = self.stepper.locals();
        panes::render_locals_pane(
            frame,
            right_rows[0],
            LocalsRenderData {
                locals: &locals,
                evaluations: &self.evaluations,
                is_called: self.stepper.is_called(),
            },
            self.focused_pane == FocusedPane::Locals,
            &mut self.locals_scroll,
        );

        panes::render_steps_pane(
            frame,
            right_rows[1],
            &self.step_labels,
            self.stepper.position(),
            self.focused_pane == FocusedPane::Steps,
            &mut self.steps_scroll,
        );

        let input = match &self.input_mode {
            InputMode::Evaluate(input) => Some(input.as_str()),
            InputMode::Normal => None,
        };
        panes::render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                position: self.stepper.position(),
                total_steps: self.stepper.len(),
                is_error: self.is_error,
                is_playing: self.is_playing,
                input,
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        if let InputMode::Evaluate(input) = &mut self.input_mode {
            match key.code {
                KeyCode::Enter => {
                    let expression = std::mem::take(input);
                    self.input_mode = InputMode::Normal;
                    self.evaluate(expression);
                }
                KeyCode::Esc => self.input_mode = InputMode::Normal,
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                let result = self.stepper.back();
                self.report(result, "Moved back");
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Char('s') => {
                self.is_playing = false;
                let result = self.stepper.forward();
                self.report(result, "Skipped");
            }
            KeyCode::Char('i') => {
                let result = self.stepper.step_in();
                self.report(result, "Step in is not supported yet");
            }
            KeyCode::Char('e') => {
                self.is_playing = false;
                self.input_mode = InputMode::Evaluate(String::new());
            }
            KeyCode::Up => self.scroll(-1),
            KeyCode::Down => self.scroll(1),
            KeyCode::Char(' ') => {
                // Toggle auto-play (200ms debounce against key repeat)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    self.status_message = if self.is_playing {
                        "Playing...".to_string()
                    } else {
                        "Paused".to_string()
                    };
                }
            }
            KeyCode::Enter => {
                // Run to the end
                self.is_playing = false;
                let mut stepped = 0;
                while !self.stepper.is_finished() {
                    match self.stepper.step() {
                        Ok(()) => stepped += 1,
                        Err(err) => {
                            self.report(Err(err), "");
                            return;
                        }
                    }
                }
                self.report(Ok(()), &format!("Ran {} step(s) to the end", stepped));
                self.console_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                // Reposition to the start; nothing is undone
                self.is_playing = false;
                while self.stepper.position() > 0 {
                    if self.stepper.back().is_err() {
                        break;
                    }
                }
                self.report(Ok(()), "Back at the start (state kept)");
            }
            _ => {}
        }
    }

    fn scroll(&mut self, delta: isize) {
        match self.focused_pane {
            FocusedPane::Source => {
                // Scrolling moves the current line the other way visually
                if let Some(row) = self.source_scroll.target_line_row {
                    self.source_scroll.target_line_row = Some(row.saturating_add_signed(-delta));
                }
            }
            FocusedPane::Console => {
                self.console_scroll = self.console_scroll.saturating_add_signed(delta)
            }
            FocusedPane::Locals => self.locals_scroll = self.locals_scroll.saturating_add_signed(delta),
            FocusedPane::Steps => self.steps_scroll = self.steps_scroll.saturating_add_signed(delta),
        }
    }

    fn step_forward(&mut self) {
        let result = self.stepper.step();
        self.report(result, "Stepped");
        // Auto-scroll console to bottom
        self.console_scroll = usize::MAX;
    }

    fn evaluate(&mut self, expression: String) {
        if expression.trim().is_empty() {
            return;
        }
        let result = self.stepper.evaluate(&expression);
        self.status_message = match &result {
            Ok(value) => format!("{} → {}", expression, value.inspect()),
            Err(err) => err.to_string(),
        };
        self.is_error = result.is_err();
        self.evaluations.push(Evaluation {
            expression,
            result: result.map_err(|err| err.to_string()),
        });
        self.locals_scroll = usize::MAX;
    }

    fn report(&mut self, result: Result<(), StepperError>, success: &str) {
        match result {
            Ok(()) => {
                self.is_error = false;
                self.status_message = success.to_string();
            }
            Err(err) => {
                self.is_error = matches!(err, StepperError::Runtime(_));
                self.status_message = err.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Value;
    use crossterm::event::KeyModifiers;

    fn app(text: &str) -> App {
        let mut stepper = Stepper::new();
        stepper.parse(text).unwrap();
        stepper.call(Value::Undefined, Vec::new()).unwrap();
        App::new(stepper, text.to_string())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_keys_drive_the_stepper() {
        let mut app = app("function () {\n  a = 1;\n  a = 2;\n  a = 3;\n}");
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.stepper.position(), 2);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.stepper.position(), 1);
        press(&mut app, KeyCode::Enter);
        assert!(app.stepper.is_finished());
        assert!(!app.is_error);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.stepper.position(), 0);
    }

    #[test]
    fn test_evaluate_mode() {
        let mut app = app("function () { var a = 41; }");
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('e'));
        for c in "a + 1".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.evaluations.len(), 1);
        assert!(matches!(app.evaluations[0].result, Ok(Value::Number(n)) if n == 42.0));

        press(&mut app, KeyCode::Char('e'));
        for c in "nope".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert!(app.is_error);
        assert!(app.evaluations[1].result.is_err());
    }

    #[test]
    fn test_bounds_are_reported_not_errors() {
        let mut app = app("function () { a = 1; }");
        press(&mut app, KeyCode::Left);
        assert!(!app.is_error);
        assert!(app.status_message.contains("cannot move"));
    }
}

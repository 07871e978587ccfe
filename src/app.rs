// src/app.rs

use ratatui::widgets::ListState;
use vanguard_score::core::knowledge_base;
use vanguard_score::core::models::{CheckResult, ScoreReport};

pub const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub enum AppState {
    Idle,
    Scanning,
    Finished,
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    pub report: Option<ScoreReport>,
    /// Set instead of `report` when the computation failed.
    pub error: Option<String>,
    /// Applicable checks, earned badges first.
    pub findings: Vec<CheckResult>,
    pub analysis_list_state: ListState,
    pub spinner_frame: usize,
    /// Animated towards the final percentage on every tick.
    pub displayed_score: u8,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            state: AppState::Idle,
            input: String::new(),
            report: None,
            error: None,
            findings: Vec::new(),
            analysis_list_state: ListState::default(),
            spinner_frame: 0,
            displayed_score: 0,
        }
    }

    pub fn start_scan(&mut self) {
        self.state = AppState::Scanning;
        self.spinner_frame = 0;
    }

    pub fn finish(&mut self, outcome: Result<ScoreReport, String>) {
        match outcome {
            Ok(report) => {
                let mut findings: Vec<CheckResult> = report
                    .checks
                    .iter()
                    .filter(|check| check.contribution.is_applicable())
                    .filter(|check| knowledge_base::get_check_detail(check.kind).is_some())
                    .copied()
                    .collect();
                findings.sort_by_key(|check| (!check.passed(), check.kind));
                self.findings = findings;
                self.report = Some(report);
                self.error = None;
            }
            Err(e) => {
                self.findings.clear();
                self.report = None;
                self.error = Some(e);
            }
        }
        self.analysis_list_state = ListState::default();
        if !self.findings.is_empty() {
            self.analysis_list_state.select(Some(0));
        }
        self.displayed_score = 0;
        self.state = AppState::Finished;
    }

    /// The final score as a whole percentage.
    pub fn target_score(&self) -> u8 {
        self.report
            .as_ref()
            .map(|report| (report.score.normalized * 100.0).round().clamp(0.0, 100.0) as u8)
            .unwrap_or(0)
    }

    pub fn on_tick(&mut self) {
        match self.state {
            AppState::Scanning => {
                self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
            }
            AppState::Finished => {
                let target = self.target_score();
                if self.displayed_score < target {
                    self.displayed_score = (self.displayed_score + 2).min(target);
                }
            }
            AppState::Idle => {}
        }
    }

    pub fn scroll_up(&mut self) {
        if self.findings.is_empty() {
            return;
        }
        let selected = self.analysis_list_state.selected().unwrap_or(0);
        self.analysis_list_state.select(Some(selected.saturating_sub(1)));
    }

    pub fn scroll_down(&mut self) {
        if self.findings.is_empty() {
            return;
        }
        let last = self.findings.len() - 1;
        let selected = self.analysis_list_state.selected().map_or(0, |i| (i + 1).min(last));
        self.analysis_list_state.select(Some(selected));
    }

    pub fn selected_finding(&self) -> Option<&CheckResult> {
        self.analysis_list_state
            .selected()
            .and_then(|index| self.findings.get(index))
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

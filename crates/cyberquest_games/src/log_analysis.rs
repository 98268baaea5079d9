//! Multi-question log triage scenarios.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{Attempt, Countdown, Difficulty, GameError, RunStatus, log_question_score};

/// One question about a scenario's logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct LogQuestion {
    question: String,
    #[serde(skip_serializing)]
    answer: String,
}

impl LogQuestion {
    /// Answers compare without regard to case.
    pub fn is_answered_by(&self, input: &str) -> bool {
        input.eq_ignore_ascii_case(&self.answer)
    }
}

/// A block of log lines with questions about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct LogScenario {
    id: String,
    title: String,
    description: String,
    difficulty: Difficulty,
    points: u32,
    time_limit_secs: u32,
    logs: Vec<String>,
    questions: Vec<LogQuestion>,
    hints: Vec<String>,
}

impl LogScenario {
    /// Indices of the log lines containing `term`, ignoring case.
    ///
    /// An empty term clears the highlight rather than matching every line.
    #[instrument(skip(self), fields(scenario = %self.id))]
    pub fn search(&self, term: &str) -> Vec<usize> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        let hits: Vec<usize> = self
            .logs
            .iter()
            .enumerate()
            .filter(|(_, line)| line.to_lowercase().contains(&term))
            .map(|(index, _)| index)
            .collect();
        debug!(hits = hits.len(), "Searched logs");
        hits
    }
}

/// A player's pass through the log scenarios.
///
/// Each correct answer is scored on its own. A scenario is solved once its
/// last question is answered.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct LogAnalysisRun {
    scenarios: Vec<LogScenario>,
    current_scenario: usize,
    current_question: usize,
    status: RunStatus,
    countdown: Option<Countdown>,
    score: u32,
    combo: u32,
}

impl LogAnalysisRun {
    /// Creates a run over `scenarios`.
    pub fn new(scenarios: Vec<LogScenario>) -> Self {
        let status = if scenarios.is_empty() {
            RunStatus::Finished
        } else {
            RunStatus::Ready
        };
        Self {
            scenarios,
            current_scenario: 0,
            current_question: 0,
            status,
            countdown: None,
            score: 0,
            combo: 0,
        }
    }

    /// The scenario being played, `None` once finished.
    pub fn scenario(&self) -> Option<&LogScenario> {
        if self.status == RunStatus::Finished {
            None
        } else {
            self.scenarios.get(self.current_scenario)
        }
    }

    /// The question awaiting an answer.
    pub fn question(&self) -> Option<&LogQuestion> {
        self.scenario()
            .and_then(|s| s.questions().get(self.current_question))
    }

    /// Starts, or restarts after a timeout, the current scenario from its
    /// first question.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if the run is finished or the scenario is solved.
    #[instrument(skip(self), fields(scenario = self.current_scenario))]
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), GameError> {
        if matches!(self.status, RunStatus::Finished | RunStatus::Solved) {
            return Err(GameError::new("Nothing to start"));
        }
        let limit = self
            .scenarios
            .get(self.current_scenario)
            .map(|s| *s.time_limit_secs())
            .ok_or_else(|| GameError::new("Scenario out of range"))?;
        self.countdown = Some(Countdown::start(now, limit));
        self.current_question = 0;
        self.status = RunStatus::Active;
        info!(limit, "Log scenario started");
        Ok(())
    }

    /// Seconds left on the current scenario.
    pub fn time_left(&self, now: DateTime<Utc>) -> Option<u32> {
        self.countdown.map(|c| c.time_left(now))
    }

    /// Times out the scenario if its clock has run down.
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        let expired = self.status == RunStatus::Active
            && self.countdown.is_some_and(|c| c.is_expired(now));
        if expired {
            warn!(scenario = self.current_scenario, "Log scenario timed out");
            self.status = RunStatus::TimedOut;
            self.combo = 0;
        }
        expired
    }

    /// Answers the current question.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if no scenario is active.
    #[instrument(skip(self, input), fields(scenario = self.current_scenario, question = self.current_question))]
    pub fn answer(&mut self, input: &str, now: DateTime<Utc>) -> Result<Attempt, GameError> {
        if self.status != RunStatus::Active {
            return Err(GameError::new("No active scenario"));
        }
        let scenario = self
            .scenarios
            .get(self.current_scenario)
            .ok_or_else(|| GameError::new("Scenario out of range"))?;
        let question = scenario
            .questions()
            .get(self.current_question)
            .ok_or_else(|| GameError::new("Question out of range"))?;
        let attempt_id = format!("{}#{}", scenario.id(), self.current_question);
        let correct = question.is_answered_by(input);
        let points = *scenario.points();
        let question_count = u32::try_from(scenario.questions().len()).unwrap_or(u32::MAX);
        let last_question = self.current_question + 1 >= scenario.questions().len();

        if self.expire(now) {
            return Ok(Attempt::new(attempt_id, false, true, None, self.combo, self.score));
        }

        if !correct {
            debug!("Wrong answer");
            self.combo = 0;
            return Ok(Attempt::new(attempt_id, false, false, None, self.combo, self.score));
        }

        let time_left = self.time_left(now).unwrap_or(0);
        let breakdown = log_question_score(points, question_count, time_left, self.combo);
        self.score += breakdown.total();
        self.combo += 1;
        if last_question {
            self.status = RunStatus::Solved;
            info!(score = self.score, "Log scenario solved");
        } else {
            self.current_question += 1;
        }
        Ok(Attempt::new(
            attempt_id,
            true,
            false,
            Some(breakdown),
            self.combo,
            self.score,
        ))
    }

    /// Moves to the next scenario.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] while a scenario is active or once finished.
    pub fn advance(&mut self) -> Result<RunStatus, GameError> {
        match self.status {
            RunStatus::Active => return Err(GameError::new("Scenario is still active")),
            RunStatus::Finished => return Err(GameError::new("Run is already finished")),
            RunStatus::Ready | RunStatus::Solved | RunStatus::TimedOut => {}
        }
        self.countdown = None;
        self.current_question = 0;
        if self.current_scenario + 1 >= self.scenarios.len() {
            self.status = RunStatus::Finished;
        } else {
            self.current_scenario += 1;
            self.status = RunStatus::Ready;
        }
        Ok(self.status)
    }

    /// Whether every scenario has been played.
    pub fn is_finished(&self) -> bool {
        self.status == RunStatus::Finished
    }
}

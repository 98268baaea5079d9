//! Active game and quiz sessions.
//!
//! Sessions live in memory keyed by a random id. Game state machines come
//! from `cyberquest_games`; finished sessions are handed to
//! [`ProgressService`]. Persisting never blocks play: a failed write is
//! logged and reported in the summary.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use cyberquest_games::{
    Attempt, Card, Challenge, ChallengeRun, CommandDrill, DrillCommand, FlipOutcome, GameError,
    GameKind, Keystroke, LogAnalysisRun, LogScenario, MemoryBoard, MemoryDifficulty, MemoryIcon,
    RunStatus, Trophy, TypingDrill, TypingStats, content, level_for_game_score,
};
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::quiz::{
    AnswerFeedback, Question, QuizFilter, QuizOutcome, QuizSession, question_bank,
    select_questions,
};
use crate::{GameRecord, ProgressService};

/// Identifier handed to the player when a session starts.
pub type SessionId = String;

/// Typing drill length when none is chosen.
pub const DEFAULT_TYPING_SECS: u32 = 60;

/// Age after which a session is dropped, finished or not. The longest timed
/// activity is a 600 second typing drill.
pub const STALE_SESSION_SECS: i64 = 3600;

/// What went wrong with a play request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PlayErrorKind {
    /// No session has the given id.
    #[display("not found")]
    NotFound,
    /// The game refused the action.
    #[display("rejected")]
    Rejected,
    /// Session storage could not be accessed.
    #[display("internal")]
    Internal,
}

/// Play error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Play error ({}): {} at {}:{}", kind, message, file, line)]
pub struct PlayError {
    /// Error category.
    pub kind: PlayErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl PlayError {
    /// Creates a new play error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: PlayErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    #[track_caller]
    fn rejected(message: impl Into<String>) -> Self {
        Self::new(PlayErrorKind::Rejected, message)
    }

    #[track_caller]
    fn not_found(id: &str) -> Self {
        Self::new(PlayErrorKind::NotFound, format!("No session {}", id))
    }
}

impl From<GameError> for PlayError {
    #[track_caller]
    fn from(err: GameError) -> Self {
        Self::rejected(err.message)
    }
}

/// How to start a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct StartGame {
    game: GameKind,
    /// Memory only; defaults to easy.
    #[serde(default)]
    memory_difficulty: Option<MemoryDifficulty>,
    /// Typing drill only; defaults to [`DEFAULT_TYPING_SECS`].
    #[serde(default)]
    duration_secs: Option<u32>,
}

impl StartGame {
    /// Default options for `game`.
    pub fn of(game: GameKind) -> Self {
        Self::new(game, None, None)
    }
}

enum Activity {
    Challenges(ChallengeRun),
    Logs(LogAnalysisRun),
    Memory(MemoryBoard),
    Command(CommandDrill),
    Typing(TypingDrill),
    Quiz(QuizSession),
}

struct PlaySession {
    activity: Activity,
    started_at: DateTime<Utc>,
}

impl PlaySession {
    fn label(&self) -> String {
        match &self.activity {
            Activity::Challenges(run) => run.kind().to_string(),
            Activity::Logs(_) => GameKind::LogAnalysis.to_string(),
            Activity::Memory(_) => GameKind::Memory.to_string(),
            Activity::Command(_) => GameKind::Command.to_string(),
            Activity::Typing(_) => GameKind::Typing.to_string(),
            Activity::Quiz(_) => "quiz".to_string(),
        }
    }

    fn is_done(&self, now: DateTime<Utc>) -> bool {
        match &self.activity {
            Activity::Challenges(run) => run.is_finished(),
            Activity::Logs(run) => run.is_finished(),
            Activity::Memory(board) => board.is_game_over() || board.is_expired(now),
            Activity::Command(drill) => drill.is_finished(now),
            Activity::Typing(drill) => drill.is_finished(now),
            Activity::Quiz(quiz) => quiz.is_finished() || quiz.time_left(now) == 0,
        }
    }

    /// Like `is_done`, but also closes a quiz whose clock ran out and awards
    /// the trophies of a typing drill that has ended.
    fn is_over(&mut self, now: DateTime<Utc>) -> bool {
        match &mut self.activity {
            Activity::Quiz(quiz) => {
                quiz.expire(now);
            }
            Activity::Typing(drill) if drill.is_finished(now) => {
                drill.award_trophies(now);
            }
            _ => {}
        }
        self.is_done(now)
    }

    /// Started longer ago than any session is kept.
    fn is_stale(&self, now: DateTime<Utc>) -> bool {
        (now - self.started_at).num_seconds() > STALE_SESSION_SECS
    }

    fn view(&self, id: &str, now: DateTime<Utc>) -> PlayView {
        let (score, time_left, state) = match &self.activity {
            Activity::Challenges(run) => (
                *run.score(),
                run.time_left(now),
                GameState::Challenge {
                    kind: *run.kind(),
                    status: *run.status(),
                    current: *run.current(),
                    total: run.challenges().len(),
                    challenge: run.current_challenge().cloned(),
                    combo: *run.combo(),
                    solved: *run.solved(),
                },
            ),
            Activity::Logs(run) => (
                *run.score(),
                run.time_left(now),
                GameState::LogAnalysis {
                    status: *run.status(),
                    scenario: run.scenario().cloned(),
                    question: *run.current_question(),
                    combo: *run.combo(),
                },
            ),
            Activity::Memory(board) => (
                *board.score(),
                Some(board.time_left(now)),
                GameState::Memory {
                    difficulty: *board.difficulty(),
                    cards: board.cards().iter().map(CardView::from).collect(),
                    moves: *board.moves(),
                    matches: *board.matches(),
                    combo: *board.combo(),
                },
            ),
            Activity::Command(drill) => (
                *drill.score(),
                Some(drill.time_left(now)),
                GameState::Command {
                    target: drill.target().clone(),
                    completed: *drill.completed(),
                },
            ),
            Activity::Typing(drill) => (
                *drill.score(),
                Some(drill.time_left(now)),
                GameState::Typing {
                    target: drill.target().clone(),
                    duration_secs: *drill.duration_secs(),
                    stats: drill.stats(now),
                    trophies: drill.trophies().clone(),
                },
            ),
            Activity::Quiz(quiz) => (
                *quiz.score(),
                Some(quiz.time_left(now)),
                GameState::Quiz {
                    question: quiz.current_question().cloned(),
                    current: *quiz.current(),
                    total: quiz.questions().len(),
                    correct: *quiz.correct(),
                    streak: *quiz.streak(),
                },
            ),
        };

        let finished = self.is_done(now);

        PlayView {
            id: id.to_string(),
            score,
            time_left,
            finished,
            state,
        }
    }
}

/// A memory card as the player sees it. Face-down cards hide their icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CardView {
    id: usize,
    icon: Option<MemoryIcon>,
    is_flipped: bool,
    is_matched: bool,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        let visible = *card.is_flipped() || *card.is_matched();
        Self {
            id: *card.id(),
            icon: visible.then(|| card.icon().clone()),
            is_flipped: *card.is_flipped(),
            is_matched: *card.is_matched(),
        }
    }
}

/// Game-specific part of a [`PlayView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameState {
    /// One of the eight challenge games.
    Challenge {
        /// Which game.
        kind: GameKind,
        /// State of the current challenge.
        status: RunStatus,
        /// Index of the current challenge.
        current: usize,
        /// Number of challenges.
        total: usize,
        /// The current challenge, without its answer.
        challenge: Option<Challenge>,
        /// Consecutive solves.
        combo: u32,
        /// Challenges solved so far.
        solved: usize,
    },
    /// Log triage.
    LogAnalysis {
        /// State of the current scenario.
        status: RunStatus,
        /// The current scenario, without its answers.
        scenario: Option<LogScenario>,
        /// Index of the question awaiting an answer.
        question: usize,
        /// Consecutive correct answers.
        combo: u32,
    },
    /// Card matching.
    Memory {
        /// Board size.
        difficulty: MemoryDifficulty,
        /// Cards in deal order.
        cards: Vec<CardView>,
        /// Pairs of flips made.
        moves: u32,
        /// Pairs found.
        matches: usize,
        /// Consecutive matches.
        combo: u32,
    },
    /// Command drill.
    Command {
        /// Command to type next.
        target: DrillCommand,
        /// Commands typed so far.
        completed: u32,
    },
    /// Typing drill.
    Typing {
        /// Command to type next.
        target: DrillCommand,
        /// Chosen drill length.
        duration_secs: u32,
        /// Live numbers.
        stats: TypingStats,
        /// Trophies earned so far.
        trophies: Vec<Trophy>,
    },
    /// Timed quiz.
    Quiz {
        /// Question awaiting an answer.
        question: Option<Question>,
        /// Index of that question.
        current: usize,
        /// Number of questions.
        total: usize,
        /// Correct answers so far.
        correct: u32,
        /// Current run of correct answers.
        streak: u32,
    },
}

/// Snapshot of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct PlayView {
    id: SessionId,
    score: u32,
    /// `None` while an untimed challenge or nothing is on the clock.
    time_left: Option<u32>,
    /// Whether the session can be finished.
    finished: bool,
    state: GameState,
}

/// Result of a submitted answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct SubmitResult {
    attempt: Attempt,
    view: PlayView,
}

/// Result of a card flip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct FlipResult {
    outcome: FlipOutcome,
    view: PlayView,
}

/// Result of a drill input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct InputResult {
    keystroke: Keystroke,
    /// Trophies earned by this input. Only an input arriving after the
    /// drill's clock ran out earns any.
    new_trophies: Vec<Trophy>,
    view: PlayView,
}

/// Result of a quiz answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct QuizAnswerResult {
    feedback: AnswerFeedback,
    view: PlayView,
}

/// What a finished session earned and whether it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct FinishSummary {
    id: SessionId,
    /// Game id, or `quiz`.
    activity: String,
    score: u32,
    /// Seconds from start to finish.
    duration_secs: u32,
    /// False when signed out or when persisting failed.
    saved: bool,
    /// Present for quizzes.
    quiz: Option<QuizOutcome>,
}

enum Finished {
    Game(GameRecord),
    Quiz(QuizOutcome),
}

/// Owns every active session.
#[derive(Debug, Clone)]
pub struct PlayManager {
    sessions: Arc<Mutex<HashMap<SessionId, PlaySession>>>,
    rng: Arc<Mutex<StdRng>>,
    progress: ProgressService,
}

impl std::fmt::Debug for PlaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaySession")
            .field("activity", &self.label())
            .field("started_at", &self.started_at)
            .finish()
    }
}

impl PlayManager {
    /// Creates a manager with an entropy-seeded shuffle.
    #[instrument(skip_all)]
    pub fn new(progress: ProgressService) -> Self {
        Self::with_rng(progress, StdRng::from_entropy())
    }

    /// Creates a manager with a fixed shuffle, for reproducible deals.
    pub fn with_seed(progress: ProgressService, seed: u64) -> Self {
        Self::with_rng(progress, StdRng::seed_from_u64(seed))
    }

    fn with_rng(progress: ProgressService, rng: StdRng) -> Self {
        info!("Creating play manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            rng: Arc::new(Mutex::new(rng)),
            progress,
        }
    }

    fn lock_sessions(&self) -> Result<MutexGuard<'_, HashMap<SessionId, PlaySession>>, PlayError> {
        self.sessions
            .lock()
            .map_err(|_| PlayError::new(PlayErrorKind::Internal, "Session table poisoned"))
    }

    fn lock_rng(&self) -> Result<MutexGuard<'_, StdRng>, PlayError> {
        self.rng
            .lock()
            .map_err(|_| PlayError::new(PlayErrorKind::Internal, "Shuffle poisoned"))
    }

    fn insert(&self, activity: Activity, now: DateTime<Utc>) -> Result<PlayView, PlayError> {
        let id = uuid::Uuid::new_v4().to_string();
        let session = PlaySession {
            activity,
            started_at: now,
        };
        let view = session.view(&id, now);
        info!(session_id = %id, activity = %session.label(), "Session started");
        let mut sessions = self.lock_sessions()?;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_stale(now));
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, "Stale sessions dropped");
        }
        sessions.insert(id, session);
        Ok(view)
    }

    fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut PlaySession, &mut StdRng) -> Result<T, PlayError>,
    ) -> Result<T, PlayError> {
        let mut sessions = self.lock_sessions()?;
        let session = sessions.get_mut(id).ok_or_else(|| PlayError::not_found(id))?;
        let mut rng = self.lock_rng()?;
        f(session, &mut *rng)
    }

    /// Number of sessions in play.
    pub fn active_sessions(&self) -> Result<usize, PlayError> {
        Ok(self.lock_sessions()?.len())
    }

    /// Starts a game. Challenge games and log analysis start the clock on
    /// their first challenge right away.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] for an unsupported typing length.
    #[instrument(skip(self))]
    pub fn start_game(&self, options: StartGame, now: DateTime<Utc>) -> Result<PlayView, PlayError> {
        let activity = match options.game {
            GameKind::LogAnalysis => {
                let mut run = LogAnalysisRun::new(content::log_scenarios());
                run.start(now)?;
                Activity::Logs(run)
            }
            GameKind::Memory => {
                let difficulty = options.memory_difficulty.unwrap_or_default();
                let board =
                    MemoryBoard::deal(difficulty, &content::memory_icons(), &mut *self.lock_rng()?, now)?;
                Activity::Memory(board)
            }
            GameKind::Command => {
                let drill =
                    CommandDrill::start(content::drill_commands(), &mut *self.lock_rng()?, now)?;
                Activity::Command(drill)
            }
            GameKind::Typing => {
                let duration = options.duration_secs.unwrap_or(DEFAULT_TYPING_SECS);
                let drill = TypingDrill::start(
                    content::typing_commands(),
                    duration,
                    &mut *self.lock_rng()?,
                    now,
                )?;
                Activity::Typing(drill)
            }
            kind => {
                let challenges = content::challenges_for(kind)
                    .ok_or_else(|| PlayError::rejected(format!("{} has no challenges", kind)))?;
                let mut run = ChallengeRun::new(kind, challenges);
                run.start(now)?;
                Activity::Challenges(run)
            }
        };
        self.insert(activity, now)
    }

    /// Starts a quiz over questions matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] when no question matches.
    #[instrument(skip(self))]
    pub fn start_quiz(&self, filter: QuizFilter, now: DateTime<Utc>) -> Result<PlayView, PlayError> {
        let questions = select_questions(
            &question_bank(),
            filter.category().as_deref(),
            *filter.difficulty(),
            &mut *self.lock_rng()?,
        );
        let quiz = QuizSession::start(questions, filter, now)?;
        self.insert(Activity::Quiz(quiz), now)
    }

    /// Current state of a session.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] for an unknown id.
    pub fn view(&self, id: &str, now: DateTime<Utc>) -> Result<PlayView, PlayError> {
        self.with_session(id, |session, _| {
            session.is_over(now);
            Ok(session.view(id, now))
        })
    }

    /// Answers the current challenge or log question.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] for an unknown id, a game that takes no typed
    /// answers, or no active challenge.
    #[instrument(skip(self, input))]
    pub fn submit(&self, id: &str, input: &str, now: DateTime<Utc>) -> Result<SubmitResult, PlayError> {
        self.with_session(id, |session, _| {
            let attempt = match &mut session.activity {
                Activity::Challenges(run) => run.submit(input, now)?,
                Activity::Logs(run) => run.answer(input, now)?,
                _ => return Err(PlayError::rejected("This game does not take answers")),
            };
            Ok(SubmitResult {
                attempt,
                view: session.view(id, now),
            })
        })
    }

    /// Moves on to the next challenge or scenario and starts its clock.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] while the current one is still in play.
    #[instrument(skip(self))]
    pub fn advance(&self, id: &str, now: DateTime<Utc>) -> Result<PlayView, PlayError> {
        self.with_session(id, |session, _| {
            match &mut session.activity {
                Activity::Challenges(run) => {
                    run.expire(now);
                    if run.advance()? == RunStatus::Ready {
                        run.start(now)?;
                    }
                }
                Activity::Logs(run) => {
                    run.expire(now);
                    if run.advance()? == RunStatus::Ready {
                        run.start(now)?;
                    }
                }
                _ => return Err(PlayError::rejected("This game has no next challenge")),
            }
            Ok(session.view(id, now))
        })
    }

    /// Restarts the clock on a timed-out challenge or scenario.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] if there is nothing to retry.
    #[instrument(skip(self))]
    pub fn retry(&self, id: &str, now: DateTime<Utc>) -> Result<PlayView, PlayError> {
        self.with_session(id, |session, _| {
            let status = match &mut session.activity {
                Activity::Challenges(run) => {
                    run.expire(now);
                    *run.status()
                }
                Activity::Logs(run) => {
                    run.expire(now);
                    *run.status()
                }
                _ => return Err(PlayError::rejected("This game cannot be retried")),
            };
            if status != RunStatus::TimedOut {
                return Err(PlayError::rejected("Only a timed-out challenge can be retried"));
            }
            match &mut session.activity {
                Activity::Challenges(run) => run.start(now)?,
                Activity::Logs(run) => run.start(now)?,
                _ => {}
            }
            Ok(session.view(id, now))
        })
    }

    /// Flips a memory card.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] for a non-memory session, an index off the
    /// board, or after the clock runs out.
    #[instrument(skip(self))]
    pub fn flip(&self, id: &str, index: usize, now: DateTime<Utc>) -> Result<FlipResult, PlayError> {
        self.with_session(id, |session, _| {
            let Activity::Memory(board) = &mut session.activity else {
                return Err(PlayError::rejected("Not a memory game"));
            };
            if board.is_expired(now) {
                return Err(PlayError::rejected("Time is up"));
            }
            let outcome = board.flip(index)?;
            Ok(FlipResult {
                outcome,
                view: session.view(id, now),
            })
        })
    }

    /// Turns mismatched memory cards back over.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] for a non-memory session.
    pub fn hide(&self, id: &str, now: DateTime<Utc>) -> Result<PlayView, PlayError> {
        self.with_session(id, |session, _| {
            let Activity::Memory(board) = &mut session.activity else {
                return Err(PlayError::rejected("Not a memory game"));
            };
            board.hide_unmatched();
            Ok(session.view(id, now))
        })
    }

    /// Feeds the drill input box.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] for a session that is not a drill.
    #[instrument(skip(self, text))]
    pub fn input(&self, id: &str, text: &str, now: DateTime<Utc>) -> Result<InputResult, PlayError> {
        self.with_session(id, |session, rng| {
            let (keystroke, new_trophies) = match &mut session.activity {
                Activity::Command(drill) => (drill.input(text, rng, now)?, Vec::new()),
                Activity::Typing(drill) => {
                    let keystroke = drill.input(text, rng, now)?;
                    let trophies = if drill.is_finished(now) {
                        drill.award_trophies(now)
                    } else {
                        Vec::new()
                    };
                    (keystroke, trophies)
                }
                _ => return Err(PlayError::rejected("Not a drill")),
            };
            Ok(InputResult {
                keystroke,
                new_trophies,
                view: session.view(id, now),
            })
        })
    }

    /// Indices of the current scenario's log lines containing `term`.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] for a session that is not log analysis.
    pub fn search_logs(&self, id: &str, term: &str) -> Result<Vec<usize>, PlayError> {
        self.with_session(id, |session, _| {
            let Activity::Logs(run) = &session.activity else {
                return Err(PlayError::rejected("Not a log analysis game"));
            };
            Ok(run.scenario().map(|s| s.search(term)).unwrap_or_default())
        })
    }

    /// Answers the current quiz question and records it as answered for the
    /// signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] for a non-quiz session, an option out of range,
    /// or once the quiz is over.
    #[instrument(skip(self))]
    pub async fn answer_quiz(
        &self,
        id: &str,
        option: usize,
        now: DateTime<Utc>,
    ) -> Result<QuizAnswerResult, PlayError> {
        let result = self.with_session(id, |session, rng| {
            let Activity::Quiz(quiz) = &mut session.activity else {
                return Err(PlayError::rejected("Not a quiz"));
            };
            let feedback = quiz.answer(option, rng, now)?;
            Ok(QuizAnswerResult {
                feedback,
                view: session.view(id, now),
            })
        })?;

        if self.progress.auth().user().is_some() {
            let answered = [result.feedback.question_id().clone()];
            if let Err(e) = self.progress.record_answered_questions(&answered).await {
                warn!(error = %e, "Failed to record answered question");
            }
        }
        Ok(result)
    }

    /// Drops a session without saving it.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] for an unknown id.
    #[instrument(skip(self))]
    pub fn abandon(&self, id: &str) -> Result<(), PlayError> {
        self.lock_sessions()?
            .remove(id)
            .ok_or_else(|| PlayError::not_found(id))?;
        info!("Session abandoned");
        Ok(())
    }

    /// Ends a session that has run its course and saves the result for the
    /// signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] for an unknown id or a session still in play.
    /// Persistence failures are not errors.
    #[instrument(skip(self))]
    pub async fn finish(&self, id: &str, now: DateTime<Utc>) -> Result<FinishSummary, PlayError> {
        let (session, finished) = {
            let mut sessions = self.lock_sessions()?;
            let session = sessions.get_mut(id).ok_or_else(|| PlayError::not_found(id))?;
            if !session.is_over(now) {
                return Err(PlayError::rejected("Game is still in progress"));
            }
            let session = sessions.remove(id).ok_or_else(|| PlayError::not_found(id))?;
            let finished = Self::result_of(&session, now);
            (session, finished)
        };

        let duration_secs = (now - session.started_at).num_seconds().max(0) as u32;
        let activity = session.label();
        let (score, quiz) = match &finished {
            Finished::Game(record) => (*record.score(), None),
            Finished::Quiz(outcome) => (*outcome.score(), Some(outcome.clone())),
        };

        let saved = if self.progress.auth().user().is_none() {
            debug!("Signed out, result not saved");
            false
        } else {
            match self.persist(&finished).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, activity = %activity, score, "Failed to save result");
                    false
                }
            }
        };

        info!(activity = %activity, score, saved, "Session finished");
        Ok(FinishSummary {
            id: id.to_string(),
            activity,
            score,
            duration_secs,
            saved,
            quiz,
        })
    }

    fn result_of(session: &PlaySession, now: DateTime<Utc>) -> Finished {
        let duration = (now - session.started_at).num_seconds().max(0) as u32;
        let record = |game: GameKind, score: u32, difficulty: String, metadata| {
            Finished::Game(GameRecord::new(game, score, duration, difficulty, true, metadata))
        };
        match &session.activity {
            Activity::Challenges(run) => record(
                *run.kind(),
                *run.score(),
                "mixed".to_string(),
                json!({ "solved": run.solved(), "total": run.challenges().len() }),
            ),
            Activity::Logs(run) => record(
                GameKind::LogAnalysis,
                *run.score(),
                "mixed".to_string(),
                json!({ "scenarios": run.scenarios().len() }),
            ),
            Activity::Memory(board) => record(
                GameKind::Memory,
                *board.score(),
                board.difficulty().to_string(),
                json!({
                    "moves": board.moves(),
                    "matches": board.matches(),
                    "all_matched": board.is_game_over(),
                }),
            ),
            Activity::Command(drill) => record(
                GameKind::Command,
                *drill.score(),
                "standard".to_string(),
                json!({ "completed": drill.completed() }),
            ),
            Activity::Typing(drill) => record(
                GameKind::Typing,
                *drill.score(),
                format!("{}s", drill.duration_secs()),
                json!({
                    "stats": drill.stats(now),
                    "trophies": drill.trophies(),
                }),
            ),
            Activity::Quiz(quiz) => Finished::Quiz(quiz.outcome(now)),
        }
    }

    async fn persist(&self, finished: &Finished) -> Result<(), crate::BackendError> {
        match finished {
            Finished::Game(record) => {
                let score = *record.score();
                self.progress
                    .award_points(score, level_for_game_score(score))
                    .await?;
                self.progress.record_game(record).await
            }
            Finished::Quiz(outcome) => self.progress.record_quiz(outcome).await,
        }
    }
}

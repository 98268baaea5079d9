//! Per-route view models.
//!
//! Each builder takes the static catalog plus the signed-in profile, if
//! any, and returns what the page renders.

use cyberquest_games::{Difficulty, GameKind, MemoryDifficulty, TYPING_TIME_OPTIONS};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::catalog::{
    ALL_CATEGORIES, Course, CtfChallenge, GameListing, Lab, Landing, RoadmapLevel, courses,
    ctf_categories, filter_ctf, filter_roadmap, game_listings, labs, landing, roadmap,
    total_items,
};
use crate::quiz::{MAX_QUESTIONS, QUIZ_CATEGORIES, QUIZ_TIME_LIMIT_SECS};
use crate::{AuthState, AuthUser, Profile};

/// A course with the viewer's progress through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct CourseCard {
    course: Course,
    /// Percentage of modules complete; zero when signed out.
    progress: u32,
    completed_modules: Vec<usize>,
    unlocked_modules: Vec<usize>,
    certified: bool,
}

/// `/courses`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct CoursesPage {
    courses: Vec<CourseCard>,
}

/// Builds the course catalog for `profile`.
pub fn courses_page(profile: Option<&Profile>) -> CoursesPage {
    let cards = courses()
        .into_iter()
        .map(|course| {
            let indices = 0..course.modules().len();
            let (progress, completed_modules, unlocked_modules, certified) = match profile {
                Some(profile) => (
                    course.progress_for(profile),
                    indices
                        .clone()
                        .filter(|&i| course.is_module_complete(profile, i))
                        .collect(),
                    indices
                        .filter(|&i| course.is_module_unlocked(profile, i))
                        .collect(),
                    course.is_complete_for(profile),
                ),
                None => (
                    0,
                    Vec::new(),
                    indices
                        .filter(|&i| !course.modules()[i].locked())
                        .collect(),
                    false,
                ),
            };
            CourseCard {
                course,
                progress,
                completed_modules,
                unlocked_modules,
                certified,
            }
        })
        .collect();
    CoursesPage { courses: cards }
}

/// A lab with the challenges the viewer has finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct LabCard {
    lab: Lab,
    completed_challenges: Vec<usize>,
}

/// `/labs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct LabsPage {
    labs: Vec<LabCard>,
}

/// Builds the lab list for `profile`.
pub fn labs_page(profile: Option<&Profile>) -> LabsPage {
    let cards = labs()
        .into_iter()
        .map(|lab| {
            let completed_challenges = profile
                .map(|profile| {
                    (0..lab.challenges().len())
                        .filter(|&i| profile.has_completed(&lab.challenge_id(i)))
                        .collect()
                })
                .unwrap_or_default();
            LabCard {
                lab,
                completed_challenges,
            }
        })
        .collect();
    LabsPage { labs: cards }
}

/// `/ctf`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CtfPage {
    categories: Vec<String>,
    selected: String,
    challenges: Vec<CtfChallenge>,
}

/// CTF listing filtered by `category`; `None` means every category.
pub fn ctf_page(category: Option<&str>) -> CtfPage {
    let selected = category.unwrap_or(ALL_CATEGORIES).to_string();
    CtfPage {
        categories: ctf_categories(),
        challenges: filter_ctf(&selected),
        selected,
    }
}

/// `/roadmap`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RoadmapPage {
    levels: Vec<RoadmapLevel>,
    search: String,
    difficulty: Option<Difficulty>,
    completed: Vec<String>,
    completed_count: usize,
    total_items: usize,
    /// Percentage of all roadmap items complete.
    progress: u32,
}

/// Roadmap filtered by `search` and `difficulty`, marked with the viewer's
/// completed items. Progress counts every item, not just the visible ones.
pub fn roadmap_page(
    profile: Option<&Profile>,
    search: &str,
    difficulty: Option<Difficulty>,
) -> RoadmapPage {
    let full = roadmap();
    let total = total_items();
    let completed: Vec<String> = profile
        .map(|profile| {
            full.iter()
                .flat_map(|level| level.sections())
                .flat_map(|section| section.topics())
                .flat_map(|topic| topic.items())
                .filter(|item| profile.has_completed(item.id()))
                .map(|item| item.id().clone())
                .collect()
        })
        .unwrap_or_default();
    let progress = if total == 0 {
        0
    } else {
        ((completed.len() as f64 / total as f64) * 100.0).round() as u32
    };

    RoadmapPage {
        levels: filter_roadmap(full, search, difficulty),
        search: search.to_string(),
        difficulty,
        completed_count: completed.len(),
        completed,
        total_items: total,
        progress,
    }
}

/// `/quick-test` before a quiz starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct QuickTestSetup {
    categories: Vec<String>,
    difficulties: Vec<Difficulty>,
    max_questions: usize,
    time_limit_secs: u32,
}

/// Options offered on the quiz setup screen.
pub fn quick_test_setup() -> QuickTestSetup {
    QuickTestSetup {
        categories: QUIZ_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        difficulties: Difficulty::iter().collect(),
        max_questions: MAX_QUESTIONS,
        time_limit_secs: QUIZ_TIME_LIMIT_SECS,
    }
}

/// `/quick-game`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct QuickGamePage {
    games: Vec<GameListing>,
    memory_difficulties: Vec<MemoryDifficulty>,
    typing_durations: Vec<u32>,
    selected: Option<GameKind>,
}

/// The game picker, optionally with one game selected.
pub fn quick_game_page(selected: Option<GameKind>) -> QuickGamePage {
    QuickGamePage {
        games: game_listings(),
        memory_difficulties: MemoryDifficulty::iter().collect(),
        typing_durations: TYPING_TIME_OPTIONS.to_vec(),
        selected,
    }
}

/// `/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct HomePage {
    landing: Landing,
    signed_in: bool,
}

/// The landing page.
pub fn home_page(user: Option<&AuthUser>) -> HomePage {
    HomePage {
        landing: landing(),
        signed_in: user.is_some(),
    }
}

/// `/auth`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct AuthPage {
    signed_in: bool,
    user: Option<AuthUser>,
    loading: bool,
    /// Inline error banner from the last failed attempt.
    error: Option<String>,
}

/// The sign-in page for the current auth state.
pub fn auth_page(state: &AuthState) -> AuthPage {
    AuthPage {
        signed_in: state.user().is_some(),
        user: state.user().clone(),
        loading: *state.loading(),
        error: state.error().clone(),
    }
}

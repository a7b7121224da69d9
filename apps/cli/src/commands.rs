//! Command flows backing the CLI: persist through the store first, then
//! patch the snapshot. A failed store or completion call returns before any
//! snapshot mutation, so prior state stays visible.

use std::fmt::Write as _;

use tracing::info;

use crate::completion::{Completer, CompletionError, PromptKind};
use crate::errors::AppError;
use crate::models::{CoverLetter, Question, Stored, UserProfile};
use crate::state::{QuestionView, Snapshot, Tab};
use crate::store::EntityStore;

/// Creates or fully replaces the single profile record.
pub async fn set_profile(
    store: &EntityStore,
    snapshot: &mut Snapshot,
    profile: UserProfile,
) -> Result<(), AppError> {
    let stored = match snapshot.user() {
        Some(existing) => {
            let updated = Stored::new(existing.id, profile);
            store.put(&updated).await?;
            updated
        }
        None => {
            let id = store.add(&profile).await?;
            Stored::new(id, profile)
        }
    };

    info!("profile saved (id {})", stored.id);
    snapshot.set_user(Some(stored));
    Ok(())
}

/// Saves the cover-letter text: replaces the existing record when one is
/// already stored, inserts the first one otherwise.
pub async fn save_letter(
    store: &EntityStore,
    snapshot: &mut Snapshot,
    text: String,
) -> Result<(), AppError> {
    let stored = match snapshot.cover_letter() {
        Some(existing) => {
            let updated = Stored::new(existing.id, CoverLetter { text });
            store.put(&updated).await?;
            updated
        }
        None => {
            let letter = CoverLetter { text };
            let id = store.add(&letter).await?;
            Stored::new(id, letter)
        }
    };

    snapshot.set_cover_letter(Some(stored));
    Ok(())
}

/// Generates a cover letter from the profile plus optional extra
/// requirements, then persists it through the normal save path. On any
/// completion failure nothing is written and the previously saved letter
/// stays untouched.
pub async fn generate_letter(
    store: &EntityStore,
    snapshot: &mut Snapshot,
    completer: &dyn Completer,
    requirements: &str,
) -> Result<String, AppError> {
    let profile = require_profile(snapshot)?.record.clone();

    let text = completer
        .generate(requirements, PromptKind::CoverLetter, &profile)
        .await?
        .ok_or(CompletionError::EmptyContent)?;

    save_letter(store, snapshot, text.clone()).await?;
    Ok(text)
}

pub async fn delete_letter(store: &EntityStore, snapshot: &mut Snapshot) -> Result<(), AppError> {
    let Some(existing) = snapshot.cover_letter() else {
        return Err(AppError::NotFound("no cover letter saved yet".to_string()));
    };

    store.delete::<CoverLetter>(existing.id).await?;
    snapshot.set_cover_letter(None);
    Ok(())
}

/// Adds a question to the list and persists it. The draft enters the
/// snapshot first (newest on top) and is upgraded in place once the store
/// returns its id, matched by content rather than list position.
pub async fn add_question(
    store: &EntityStore,
    snapshot: &mut Snapshot,
    question: Question,
) -> Result<i64, AppError> {
    snapshot.prepend_question(QuestionView::unsaved(question.clone()));

    let id = store.add(&question).await?;
    snapshot.confirm_saved(&question, id);
    Ok(id)
}

/// Answers a question through the completion service and saves the pair.
pub async fn answer_question(
    store: &EntityStore,
    snapshot: &mut Snapshot,
    completer: &dyn Completer,
    question_text: String,
) -> Result<String, AppError> {
    let profile = require_profile(snapshot)?.record.clone();

    let answer = completer
        .generate(&question_text, PromptKind::Question, &profile)
        .await?
        .ok_or(CompletionError::EmptyContent)?;

    add_question(
        store,
        snapshot,
        Question {
            question: question_text,
            answer: answer.clone(),
        },
    )
    .await?;
    Ok(answer)
}

/// Edits a saved question: puts the full replacement record (no merge at
/// the store level), then patches the snapshot entry with the same id.
/// Fields the caller leaves out keep their current values.
pub async fn update_question(
    store: &EntityStore,
    snapshot: &mut Snapshot,
    id: i64,
    question: Option<String>,
    answer: Option<String>,
) -> Result<(), AppError> {
    let Some(existing) = snapshot
        .questions()
        .iter()
        .find(|v| v.slot.id() == Some(id))
    else {
        return Err(AppError::NotFound(format!("no saved question with id {id}")));
    };

    let current = existing.slot.question().clone();
    let updated = Stored::new(
        id,
        Question {
            question: question.unwrap_or(current.question),
            answer: answer.unwrap_or(current.answer),
        },
    );

    store.put(&updated).await?;
    snapshot.replace_question(updated);
    Ok(())
}

pub async fn delete_question(
    store: &EntityStore,
    snapshot: &mut Snapshot,
    id: i64,
) -> Result<(), AppError> {
    store.delete::<Question>(id).await?;
    snapshot.remove_question(id);
    Ok(())
}

/// Display order for the question list: unsaved drafts first, then saved
/// questions newest first.
pub fn questions_newest_first(snapshot: &Snapshot) -> Vec<&QuestionView> {
    let mut views: Vec<&QuestionView> = snapshot.questions().iter().collect();
    views.sort_by(|a, b| match (a.slot.id(), b.slot.id()) {
        (None, None) => std::cmp::Ordering::Equal,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (Some(_), None) => std::cmp::Ordering::Greater,
        (Some(a), Some(b)) => b.cmp(&a),
    });
    views
}

/// Renders the active tab. Falls back to the personal-info view while the
/// profile is incomplete, mirroring the forced tab in the original UI.
pub fn render_status(snapshot: &Snapshot) -> String {
    let tab = if snapshot.is_profile_complete() {
        snapshot.active_tab()
    } else {
        Tab::PersonalInfo
    };

    let mut out = String::new();
    match tab {
        Tab::Main => {
            out.push_str("Cover letter\n");
            match snapshot.cover_letter() {
                Some(letter) => {
                    let _ = writeln!(out, "{}", letter.record.text);
                }
                None => out.push_str(
                    "Add your cover letter template or use AI assistance\n",
                ),
            }
        }
        Tab::Questions => {
            out.push_str("Questions\n");
            if snapshot.questions().is_empty() {
                out.push_str("No saved questions yet\n");
            }
            for view in questions_newest_first(snapshot) {
                let q = view.slot.question();
                match view.slot.id() {
                    Some(id) if view.is_edit_mode => {
                        let _ = writeln!(out, "[{id}] (editing) {}\n    {}", q.question, q.answer);
                    }
                    Some(id) => {
                        let _ = writeln!(out, "[{id}] {}\n    {}", q.question, q.answer);
                    }
                    None => {
                        let _ = writeln!(out, "[draft] {}\n    {}", q.question, q.answer);
                    }
                }
            }
        }
        Tab::PersonalInfo => {
            out.push_str("Personal info\n");
            match snapshot.user() {
                Some(user) => {
                    let p = &user.record;
                    let _ = writeln!(
                        out,
                        "Name: {}\nJob title: {}\nYears of experience: {}\nSkills: {}",
                        p.name, p.job_title, p.years_of_experience, p.skills
                    );
                }
                None => out.push_str("Fill in your personal info to get started\n"),
            }
        }
    }
    out
}

fn require_profile(snapshot: &Snapshot) -> Result<&Stored<UserProfile>, AppError> {
    snapshot.user().ok_or_else(|| {
        AppError::Validation("fill in your personal info before generating".to_string())
    })
}

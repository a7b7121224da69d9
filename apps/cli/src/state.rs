//! In-memory application state: the single snapshot of the three entity
//! collections plus navigation state, shared by every presentation flow for
//! the lifetime of one session. The snapshot performs no persistence itself;
//! callers persist through the store first, then patch the snapshot.

use crate::models::{CoverLetter, Question, Stored, UserProfile};
use crate::store::{EntityStore, StoreError};

/// The three views the original page switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Main,
    Questions,
    PersonalInfo,
}

/// Persisted-or-not state of one question in the list, checked at the type
/// level instead of via an optional id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionSlot {
    Unsaved(Question),
    Saved(Stored<Question>),
}

impl QuestionSlot {
    pub fn question(&self) -> &Question {
        match self {
            QuestionSlot::Unsaved(q) => q,
            QuestionSlot::Saved(s) => &s.record,
        }
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            QuestionSlot::Unsaved(_) => None,
            QuestionSlot::Saved(s) => Some(s.id),
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, QuestionSlot::Saved(_))
    }
}

/// View-model over a question: the persisted entity plus UI-only flags.
/// Never persisted directly; writes go through the inner `Question`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub slot: QuestionSlot,
    pub is_edit_mode: bool,
}

impl QuestionView {
    pub fn saved(stored: Stored<Question>) -> Self {
        Self {
            slot: QuestionSlot::Saved(stored),
            is_edit_mode: false,
        }
    }

    pub fn unsaved(question: Question) -> Self {
        Self {
            slot: QuestionSlot::Unsaved(question),
            is_edit_mode: true,
        }
    }
}

/// The aggregated snapshot. Constructed once, passed by explicit handle to
/// every flow that needs it; mutated only from the single main task.
#[derive(Debug, Default)]
pub struct Snapshot {
    user: Option<Stored<UserProfile>>,
    cover_letter: Option<Stored<CoverLetter>>,
    questions: Vec<QuestionView>,
    active_tab: Tab,
}

impl Snapshot {
    /// Rebuilds the snapshot from the store. All three collections are
    /// fetched before anything is patched, so a failure anywhere leaves the
    /// prior snapshot fully intact.
    pub async fn load(&mut self, store: &EntityStore) -> Result<(), StoreError> {
        let users = store.get_all::<UserProfile>().await?;
        let questions = store.get_all::<Question>().await?;
        let letters = store.get_all::<CoverLetter>().await?;

        self.user = users.into_iter().next();
        self.questions = questions.into_iter().map(QuestionView::saved).collect();
        self.cover_letter = letters.into_iter().next();
        Ok(())
    }

    pub fn user(&self) -> Option<&Stored<UserProfile>> {
        self.user.as_ref()
    }

    pub fn cover_letter(&self) -> Option<&Stored<CoverLetter>> {
        self.cover_letter.as_ref()
    }

    pub fn questions(&self) -> &[QuestionView] {
        &self.questions
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    /// True iff a profile record exists; navigation falls back to the
    /// personal-info view while this is false.
    pub fn is_profile_complete(&self) -> bool {
        self.user.is_some()
    }

    pub fn set_user(&mut self, user: Option<Stored<UserProfile>>) {
        self.user = user;
    }

    pub fn set_cover_letter(&mut self, cover_letter: Option<Stored<CoverLetter>>) {
        self.cover_letter = cover_letter;
    }

    pub fn set_questions(&mut self, questions: Vec<QuestionView>) {
        self.questions = questions;
    }

    pub fn set_active_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Prepends a question to the list (newest entries show first).
    pub fn prepend_question(&mut self, view: QuestionView) {
        self.questions.insert(0, view);
    }

    /// Upgrades the unsaved entry matching `record` to its persisted form.
    /// Matches by content, not by list position: the just-saved question is
    /// not necessarily at index 0. Returns false if no unsaved entry matches.
    pub fn confirm_saved(&mut self, record: &Question, id: i64) -> bool {
        let Some(view) = self
            .questions
            .iter_mut()
            .find(|v| !v.slot.is_saved() && v.slot.question() == record)
        else {
            return false;
        };

        view.slot = QuestionSlot::Saved(Stored::new(id, record.clone()));
        view.is_edit_mode = false;
        true
    }

    /// Replaces the saved entry with the same id and clears its edit flag.
    /// Returns false when no saved entry carries that id.
    pub fn replace_question(&mut self, stored: Stored<Question>) -> bool {
        let Some(view) = self
            .questions
            .iter_mut()
            .find(|v| v.slot.id() == Some(stored.id))
        else {
            return false;
        };

        view.slot = QuestionSlot::Saved(stored);
        view.is_edit_mode = false;
        true
    }

    /// Drops the question with the given id from the snapshot. The store
    /// delete is the caller's responsibility and happens first.
    pub fn remove_question(&mut self, id: i64) {
        self.questions.retain(|v| v.slot.id() != Some(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_store() -> EntityStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::init_schema(&pool).await.unwrap();
        EntityStore::new(pool)
    }

    fn profile() -> UserProfile {
        UserProfile {
            name: "Ada".to_string(),
            job_title: "Engineer".to_string(),
            years_of_experience: "7".to_string(),
            skills: "Rust".to_string(),
        }
    }

    #[tokio::test]
    async fn profile_complete_flips_after_load() {
        let store = memory_store().await;
        let mut snapshot = Snapshot::default();

        snapshot.load(&store).await.unwrap();
        assert!(!snapshot.is_profile_complete());

        store.add(&profile()).await.unwrap();
        snapshot.load(&store).await.unwrap();
        assert!(snapshot.is_profile_complete());
    }

    #[tokio::test]
    async fn failed_load_retains_prior_snapshot() {
        let store = memory_store().await;
        store
            .add(&CoverLetter {
                text: "Hello".to_string(),
            })
            .await
            .unwrap();

        let mut snapshot = Snapshot::default();
        snapshot.load(&store).await.unwrap();
        assert_eq!(snapshot.cover_letter().unwrap().record.text, "Hello");

        // A pool without the schema stands in for an unavailable store.
        let broken = EntityStore::new(
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await
                .unwrap(),
        );
        assert!(snapshot.load(&broken).await.is_err());
        assert_eq!(snapshot.cover_letter().unwrap().record.text, "Hello");
    }

    #[tokio::test]
    async fn load_replaces_question_views_as_saved() {
        let store = memory_store().await;
        store
            .add(&Question {
                question: "Why?".to_string(),
                answer: "Because.".to_string(),
            })
            .await
            .unwrap();

        let mut snapshot = Snapshot::default();
        snapshot.set_questions(vec![QuestionView::unsaved(Question {
            question: "draft".to_string(),
            answer: String::new(),
        })]);
        snapshot.load(&store).await.unwrap();

        assert_eq!(snapshot.questions().len(), 1);
        assert!(snapshot.questions()[0].slot.is_saved());
        assert!(!snapshot.questions()[0].is_edit_mode);
    }

    #[test]
    fn confirm_saved_matches_by_content_not_position() {
        let mut snapshot = Snapshot::default();
        let older = Question {
            question: "older draft".to_string(),
            answer: String::new(),
        };
        let saved_one = Question {
            question: "How?".to_string(),
            answer: "Thus.".to_string(),
        };

        snapshot.prepend_question(QuestionView::unsaved(older.clone()));
        // A newer draft lands at index 0 before the first one finishes saving.
        snapshot.prepend_question(QuestionView::unsaved(saved_one.clone()));

        assert!(snapshot.confirm_saved(&older, 5));

        let views = snapshot.questions();
        assert_eq!(views[0].slot.question(), &saved_one);
        assert!(!views[0].slot.is_saved());
        assert_eq!(views[1].slot.id(), Some(5));
        assert_eq!(views[1].slot.question(), &older);
    }

    #[test]
    fn confirm_saved_ignores_already_saved_entries() {
        let mut snapshot = Snapshot::default();
        let q = Question {
            question: "Why?".to_string(),
            answer: "Because.".to_string(),
        };
        snapshot.prepend_question(QuestionView::saved(Stored::new(1, q.clone())));

        assert!(!snapshot.confirm_saved(&q, 2));
        assert_eq!(snapshot.questions()[0].slot.id(), Some(1));
    }

    #[test]
    fn replace_question_patches_the_matching_entry() {
        let mut snapshot = Snapshot::default();
        let q = Question {
            question: "Why?".to_string(),
            answer: "Because.".to_string(),
        };
        let mut view = QuestionView::saved(Stored::new(1, q));
        view.is_edit_mode = true;
        snapshot.set_questions(vec![view]);

        let updated = Stored::new(
            1,
            Question {
                question: "Why?".to_string(),
                answer: "It depends.".to_string(),
            },
        );
        assert!(snapshot.replace_question(updated.clone()));

        assert_eq!(snapshot.questions()[0].slot.question(), &updated.record);
        assert!(!snapshot.questions()[0].is_edit_mode);

        let unknown = Stored::new(
            9,
            Question {
                question: "How?".to_string(),
                answer: String::new(),
            },
        );
        assert!(!snapshot.replace_question(unknown));
    }

    #[test]
    fn remove_question_drops_only_the_matching_id() {
        let mut snapshot = Snapshot::default();
        let q = |t: &str| Question {
            question: t.to_string(),
            answer: String::new(),
        };
        snapshot.prepend_question(QuestionView::saved(Stored::new(1, q("a"))));
        snapshot.prepend_question(QuestionView::saved(Stored::new(2, q("b"))));

        snapshot.remove_question(1);
        assert_eq!(snapshot.questions().len(), 1);
        assert_eq!(snapshot.questions()[0].slot.id(), Some(2));
    }
}

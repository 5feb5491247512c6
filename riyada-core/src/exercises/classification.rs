//! Sort-into-buckets exercise.
//!
//! The learner selects an item from the remaining pool and drops it on a
//! category. Each item moves through
//!
//! ```text
//! Unclassified -> Selected -> Classified        (right bucket, permanent)
//!                          -> Rejected -> Unclassified   (wrong bucket, after the error clears)
//! ```
//!
//! The exercise is complete once every item is classified.

use std::fmt;
use std::time::Instant;

use tracing::debug;

use crate::exercises::ExerciseError;
use crate::exercises::feedback::{FEEDBACK_DURATION, Feedback, FeedbackKind};

pub const SUCCESS_MESSAGE: &str = "Correct, well done!";
pub const ERROR_MESSAGE: &str = "Wrong, try a different bucket.";

/// The set of buckets an exercise sorts into.
pub trait Category: Copy + Eq + fmt::Debug + 'static {
    /// Every bucket, in display order.
    fn all() -> &'static [Self];

    fn label(&self) -> &'static str;
}

/// One sortable item with its ground-truth bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem<C> {
    pub id: u32,
    pub name: &'static str,
    pub category: C,
    /// Sub-category or hint shown once the item is placed.
    pub note: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState<C> {
    Unclassified,
    Selected,
    Rejected,
    Classified(C),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Correct,
    Wrong,
}

#[derive(Debug, Clone)]
pub struct ClassificationExercise<C: Category> {
    catalog: &'static [CatalogItem<C>],
    placed: Vec<u32>,
    selected: Option<u32>,
    feedback: Option<Feedback>,
    rejected: Option<u32>,
}

impl<C: Category> ClassificationExercise<C> {
    pub fn new(catalog: &'static [CatalogItem<C>]) -> Self {
        Self {
            catalog,
            placed: Vec::new(),
            selected: None,
            feedback: None,
            rejected: None,
        }
    }

    pub fn catalog(&self) -> &'static [CatalogItem<C>] {
        self.catalog
    }

    /// Items not yet classified, in catalog order.
    pub fn remaining(&self) -> Vec<&'static CatalogItem<C>> {
        self.catalog
            .iter()
            .filter(|item| !self.placed.contains(&item.id))
            .collect()
    }

    /// Items classified into `category`, in the order they were placed.
    pub fn bucket(
        &self,
        category: C,
    ) -> Vec<&'static CatalogItem<C>> {
        self.placed
            .iter()
            .filter_map(|id| self.find(*id))
            .filter(|item| item.category == category)
            .collect()
    }

    pub fn selected(&self) -> Option<&'static CatalogItem<C>> {
        self.selected.and_then(|id| self.find(id))
    }

    pub fn state(
        &self,
        id: u32,
        now: Instant,
    ) -> Result<ItemState<C>, ExerciseError> {
        let item = self.find(id).ok_or(ExerciseError::UnknownItem(id))?;
        if self.placed.contains(&id) {
            return Ok(ItemState::Classified(item.category));
        }
        if self.selected == Some(id) {
            return Ok(ItemState::Selected);
        }
        if self.rejected == Some(id) && self.feedback(now).is_some() {
            return Ok(ItemState::Rejected);
        }
        Ok(ItemState::Unclassified)
    }

    /// The current signal, if it has not yet expired.
    pub fn feedback(
        &self,
        now: Instant,
    ) -> Option<&Feedback> {
        self.feedback.as_ref().filter(|f| f.is_active(now))
    }

    /// Drops an expired signal.
    pub fn tick(
        &mut self,
        now: Instant,
    ) {
        if self.feedback.as_ref().is_some_and(|f| !f.is_active(now)) {
            self.feedback = None;
            self.rejected = None;
        }
    }

    /// Picks up an item from the remaining pool, replacing any previous pick.
    pub fn select(
        &mut self,
        id: u32,
        now: Instant,
    ) -> Result<(), ExerciseError> {
        self.tick(now);
        if self.find(id).is_none() {
            return Err(ExerciseError::UnknownItem(id));
        }
        if self.placed.contains(&id) {
            return Err(ExerciseError::AlreadyClassified(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Drops the selected item on `category`.
    ///
    /// The selection is cleared either way. A wrong bucket leaves the item in
    /// the pool.
    pub fn place(
        &mut self,
        category: C,
        now: Instant,
    ) -> Result<Placement, ExerciseError> {
        self.tick(now);
        let id = self.selected.take().ok_or(ExerciseError::NothingSelected)?;
        let item = self.find(id).ok_or(ExerciseError::UnknownItem(id))?;

        if item.category == category {
            self.placed.push(id);
            self.rejected = None;
            self.feedback = Some(Feedback::new(
                FeedbackKind::Success,
                SUCCESS_MESSAGE,
                now,
                FEEDBACK_DURATION,
            ));
            debug!(id, ?category, "item classified");
            Ok(Placement::Correct)
        } else {
            self.rejected = Some(id);
            self.feedback = Some(Feedback::new(
                FeedbackKind::Error,
                ERROR_MESSAGE,
                now,
                FEEDBACK_DURATION,
            ));
            debug!(id, ?category, "item rejected");
            Ok(Placement::Wrong)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.placed.len() == self.catalog.len()
    }

    /// Returns every item to the pool.
    pub fn reset(&mut self) {
        *self = Self::new(self.catalog);
    }

    fn find(
        &self,
        id: u32,
    ) -> Option<&'static CatalogItem<C>> {
        self.catalog.iter().find(|item| item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Colour {
        Red,
        Blue,
    }

    impl Category for Colour {
        fn all() -> &'static [Self] {
            &[Colour::Red, Colour::Blue]
        }

        fn label(&self) -> &'static str {
            match self {
                Colour::Red => "Red",
                Colour::Blue => "Blue",
            }
        }
    }

    const ITEMS: &[CatalogItem<Colour>] = &[
        CatalogItem { id: 1, name: "Apple", category: Colour::Red, note: "" },
        CatalogItem { id: 2, name: "Sky", category: Colour::Blue, note: "" },
        CatalogItem { id: 3, name: "Cherry", category: Colour::Red, note: "" },
    ];

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    // =========================================================================
    // placement tests
    // =========================================================================

    #[test]
    fn correct_placement_moves_item_to_bucket() {
        let now = Instant::now();
        let mut exercise = ClassificationExercise::new(ITEMS);

        exercise.select(1, now).unwrap();
        let outcome = exercise.place(Colour::Red, now).unwrap();

        assert_eq!(outcome, Placement::Correct);
        assert_eq!(exercise.bucket(Colour::Red), vec![&ITEMS[0]]);
        assert_eq!(exercise.state(1, now).unwrap(), ItemState::Classified(Colour::Red));
        assert_eq!(exercise.feedback(now).unwrap().kind, FeedbackKind::Success);
        assert_eq!(exercise.remaining().len(), 2);
    }

    #[test]
    fn wrong_placement_returns_item_to_pool_after_delay() {
        let now = Instant::now();
        let mut exercise = ClassificationExercise::new(ITEMS);

        exercise.select(2, now).unwrap();
        let outcome = exercise.place(Colour::Red, now).unwrap();

        assert_eq!(outcome, Placement::Wrong);
        assert_eq!(exercise.state(2, now).unwrap(), ItemState::Rejected);
        assert!(exercise.bucket(Colour::Red).is_empty());
        assert_eq!(exercise.feedback(now + ms(1000)).unwrap().kind, FeedbackKind::Error);

        let later = now + ms(1500);
        assert!(exercise.feedback(later).is_none());
        assert_eq!(exercise.state(2, later).unwrap(), ItemState::Unclassified);
        assert_eq!(exercise.remaining().len(), 3);
    }

    #[test]
    fn tick_clears_expired_feedback() {
        let now = Instant::now();
        let mut exercise = ClassificationExercise::new(ITEMS);
        exercise.select(2, now).unwrap();
        exercise.place(Colour::Red, now).unwrap();

        exercise.tick(now + ms(200));
        assert!(exercise.feedback(now + ms(200)).is_some());

        exercise.tick(now + ms(1600));
        assert!(exercise.feedback(now + ms(1600)).is_none());
    }

    #[test]
    fn place_without_selection_is_an_error() {
        let mut exercise = ClassificationExercise::new(ITEMS);

        let result = exercise.place(Colour::Blue, Instant::now());

        assert_eq!(result, Err(ExerciseError::NothingSelected));
    }

    #[test]
    fn classified_items_cannot_be_selected_again() {
        let now = Instant::now();
        let mut exercise = ClassificationExercise::new(ITEMS);
        exercise.select(1, now).unwrap();
        exercise.place(Colour::Red, now).unwrap();

        assert_eq!(exercise.select(1, now), Err(ExerciseError::AlreadyClassified(1)));
        assert_eq!(exercise.select(99, now), Err(ExerciseError::UnknownItem(99)));
    }

    #[test]
    fn selecting_replaces_previous_selection() {
        let now = Instant::now();
        let mut exercise = ClassificationExercise::new(ITEMS);

        exercise.select(1, now).unwrap();
        exercise.select(3, now).unwrap();

        assert_eq!(exercise.selected().map(|i| i.id), Some(3));
        assert_eq!(exercise.state(1, now).unwrap(), ItemState::Unclassified);
        assert_eq!(exercise.state(3, now).unwrap(), ItemState::Selected);
    }

    // =========================================================================
    // completion tests
    // =========================================================================

    #[test]
    fn all_classified_is_complete_and_reset_restores_pool() {
        let mut now = Instant::now();
        let mut exercise = ClassificationExercise::new(ITEMS);

        for item in ITEMS {
            exercise.select(item.id, now).unwrap();
            exercise.place(item.category, now).unwrap();
            now += ms(100);
        }

        assert!(exercise.is_complete());
        assert!(exercise.remaining().is_empty());
        assert_eq!(
            exercise.bucket(Colour::Red).iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![1, 3]
        );

        exercise.reset();

        assert!(!exercise.is_complete());
        assert_eq!(exercise.remaining().len(), ITEMS.len());
        assert!(exercise.feedback(now).is_none());
    }

    #[test]
    fn deselect_drops_the_pick() {
        let now = Instant::now();
        let mut exercise = ClassificationExercise::new(ITEMS);
        exercise.select(1, now).unwrap();

        exercise.deselect();

        assert!(exercise.selected().is_none());
        assert!(matches!(
            exercise.place(Colour::Red, now),
            Err(ExerciseError::NothingSelected)
        ));
    }
}

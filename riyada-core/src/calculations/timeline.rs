//! Implementation timeline for the set-up phase of a project.
//!
//! Each task starts in a month between 1 and 12 and runs for 1 to 12 whole
//! months. A task is active in month `m` when `start <= m < start + duration`.
//! The chart shows a fixed number of months from month 1; tasks that run
//! past the last visible month are marked as clipped.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const MAX_START_MONTH: u8 = 12;
pub const MAX_DURATION: u8 = 12;

/// Months shown by a fresh timeline.
pub const DEFAULT_SPAN: u8 = 10;

/// Widest chart, enough for a task starting in month 12 that runs a year.
pub const MAX_SPAN: u8 = 24;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimelineError {
    #[error("no task with id {0}")]
    UnknownTask(u32),

    #[error("start month must be between 1 and 12, got {0}")]
    StartOutOfRange(u8),

    #[error("duration must be between 1 and 12 months, got {0}")]
    DurationOutOfRange(u8),

    #[error("the chart can show 1 to 24 months, got {0}")]
    SpanOutOfRange(u8),

    #[error("a task needs a name")]
    EmptyName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    pub start_month: u8,
    pub duration: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineTask {
    pub id: u32,
    pub name: String,
    pub start_month: u8,
    pub duration: u8,
}

impl TimelineTask {
    /// Last month in which the task is active.
    pub fn end_month(&self) -> u8 {
        self.start_month
            .saturating_add(self.duration)
            .saturating_sub(1)
    }

    pub fn is_active(
        &self,
        month: u8,
    ) -> bool {
        month >= self.start_month && month < self.start_month.saturating_add(self.duration)
    }
}

/// One chart line: which of the visible months the task covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GanttRow {
    pub id: u32,
    pub name: String,
    pub active: Vec<bool>,
    /// The task continues past the last visible month.
    pub clipped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    tasks: Vec<TimelineTask>,
    span: u8,
}

fn check_start(month: u8) -> Result<u8, TimelineError> {
    if (1..=MAX_START_MONTH).contains(&month) {
        Ok(month)
    } else {
        Err(TimelineError::StartOutOfRange(month))
    }
}

fn check_duration(months: u8) -> Result<u8, TimelineError> {
    if (1..=MAX_DURATION).contains(&months) {
        Ok(months)
    } else {
        Err(TimelineError::DurationOutOfRange(months))
    }
}

impl Timeline {
    /// The eleven set-up steps of the factory example.
    pub fn seeded() -> Self {
        let tasks = [
            ("Government licences", 1, 2),
            ("Financing arrangements", 2, 2),
            ("Appoint project management", 3, 1),
            ("Machinery import contracts", 3, 1),
            ("Buildings and construction", 4, 3),
            ("Import machinery and equipment", 5, 2),
            ("Source raw materials", 7, 1),
            ("Arrange vehicles and transport", 7, 1),
            ("Hire staff", 7, 1),
            ("Install machinery and equipment", 8, 1),
            ("Trial run", 9, 1),
        ]
        .into_iter()
        .zip(1..)
        .map(|((name, start_month, duration), id)| TimelineTask {
            id,
            name: name.to_string(),
            start_month,
            duration,
        })
        .collect();
        Self {
            tasks,
            span: DEFAULT_SPAN,
        }
    }

    /// Builds a timeline from custom tasks, numbered from 1 in order.
    pub fn with_tasks<I>(tasks: I) -> Result<Self, TimelineError>
    where
        I: IntoIterator<Item = NewTask>,
    {
        let mut checked = Vec::new();
        for (task, id) in tasks.into_iter().zip(1..) {
            let name = task.name.trim();
            if name.is_empty() {
                return Err(TimelineError::EmptyName);
            }
            checked.push(TimelineTask {
                id,
                name: name.to_string(),
                start_month: check_start(task.start_month)?,
                duration: check_duration(task.duration)?,
            });
        }
        Ok(Self {
            tasks: checked,
            span: DEFAULT_SPAN,
        })
    }

    pub fn tasks(&self) -> &[TimelineTask] {
        &self.tasks
    }

    pub fn span(&self) -> u8 {
        self.span
    }

    pub fn set_span(
        &mut self,
        months: u8,
    ) -> Result<(), TimelineError> {
        if !(1..=MAX_SPAN).contains(&months) {
            return Err(TimelineError::SpanOutOfRange(months));
        }
        self.span = months;
        Ok(())
    }

    pub fn set_start(
        &mut self,
        id: u32,
        month: u8,
    ) -> Result<(), TimelineError> {
        let month = check_start(month)?;
        self.task_mut(id)?.start_month = month;
        debug!(id, month, "task moved");
        Ok(())
    }

    pub fn set_duration(
        &mut self,
        id: u32,
        months: u8,
    ) -> Result<(), TimelineError> {
        let months = check_duration(months)?;
        self.task_mut(id)?.duration = months;
        debug!(id, months, "task resized");
        Ok(())
    }

    /// Month in which the last task ends, or 0 with no tasks.
    pub fn finish_month(&self) -> u8 {
        self.tasks
            .iter()
            .map(TimelineTask::end_month)
            .max()
            .unwrap_or(0)
    }

    /// Number of tasks running in `month`.
    pub fn load(
        &self,
        month: u8,
    ) -> usize {
        self.tasks.iter().filter(|t| t.is_active(month)).count()
    }

    pub fn chart(&self) -> Vec<GanttRow> {
        self.tasks
            .iter()
            .map(|task| GanttRow {
                id: task.id,
                name: task.name.clone(),
                active: (1..=self.span).map(|m| task.is_active(m)).collect(),
                clipped: task.end_month() > self.span,
            })
            .collect()
    }

    fn task_mut(
        &mut self,
        id: u32,
    ) -> Result<&mut TimelineTask, TimelineError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TimelineError::UnknownTask(id))
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // schedule tests
    // =========================================================================

    #[test]
    fn seeded_plan_finishes_in_month_nine() {
        let timeline = Timeline::seeded();

        assert_eq!(timeline.tasks().len(), 11);
        assert_eq!(timeline.finish_month(), 9);
        assert_eq!(timeline.load(7), 3);
        assert_eq!(timeline.load(10), 0);
    }

    #[test]
    fn active_months_are_start_inclusive_end_exclusive() {
        let task = TimelineTask {
            id: 5,
            name: "Buildings and construction".to_string(),
            start_month: 4,
            duration: 3,
        };

        let active: Vec<u8> = (1..=12).filter(|m| task.is_active(*m)).collect();

        assert_eq!(active, vec![4, 5, 6]);
        assert_eq!(task.end_month(), 6);
    }

    #[test]
    fn chart_covers_the_visible_span() {
        let chart = Timeline::seeded().chart();

        assert_eq!(chart.len(), 11);
        assert!(chart.iter().all(|row| row.active.len() == 10));
        assert_eq!(
            chart[0].active,
            vec![true, true, false, false, false, false, false, false, false, false]
        );
        assert!(chart.iter().all(|row| !row.clipped));
    }

    #[test]
    fn narrowing_the_span_clips_late_tasks() {
        let mut timeline = Timeline::seeded();

        timeline.set_span(8).unwrap();
        let chart = timeline.chart();

        assert_eq!(chart[10].active, vec![false; 8]);
        assert!(chart[10].clipped);
        assert!(!chart[9].clipped);
    }

    // =========================================================================
    // editing tests
    // =========================================================================

    #[test]
    fn moving_a_task_changes_the_finish() {
        let mut timeline = Timeline::seeded();

        timeline.set_start(11, 12).unwrap();
        timeline.set_duration(11, 3).unwrap();

        assert_eq!(timeline.finish_month(), 14);
        assert!(timeline.chart()[10].clipped);
    }

    #[test]
    fn out_of_range_edits_are_rejected() {
        let mut timeline = Timeline::seeded();

        assert_eq!(timeline.set_start(1, 0), Err(TimelineError::StartOutOfRange(0)));
        assert_eq!(timeline.set_start(1, 13), Err(TimelineError::StartOutOfRange(13)));
        assert_eq!(
            timeline.set_duration(1, 0),
            Err(TimelineError::DurationOutOfRange(0))
        );
        assert_eq!(timeline.set_start(42, 2), Err(TimelineError::UnknownTask(42)));
        assert_eq!(timeline.set_span(25), Err(TimelineError::SpanOutOfRange(25)));
        assert_eq!(timeline, Timeline::seeded());
    }

    #[test]
    fn custom_tasks_are_numbered_in_order() {
        let timeline = Timeline::with_tasks([
            NewTask {
                name: "Lease signed".to_string(),
                start_month: 1,
                duration: 1,
            },
            NewTask {
                name: "Fit-out".to_string(),
                start_month: 2,
                duration: 4,
            },
        ])
        .unwrap();

        assert_eq!(timeline.tasks()[1].id, 2);
        assert_eq!(timeline.finish_month(), 5);
    }

    #[test]
    fn empty_timeline_finishes_at_zero() {
        let timeline = Timeline::with_tasks(Vec::<NewTask>::new()).unwrap();

        assert_eq!(timeline.finish_month(), 0);
        assert!(timeline.chart().is_empty());
    }
}

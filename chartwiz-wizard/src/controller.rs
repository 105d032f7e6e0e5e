//! Wizard step state machine.
//!
//! Holds the current index, the completed markers and the category. Step
//! content comes from [`steps_for`]; the controller never stores it. Guards
//! take the selection count as input so the controller stays free of the
//! stores it gates.

use std::collections::BTreeSet;
use std::fmt;

use chartwiz_core::domain::Category;
use tracing::{debug, info};

use crate::error::WizardError;
use crate::steps::{steps_for, StepDescriptor, StepId};

/// Why an advance was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardFailure {
    NoCategory,
    NoIndicators,
}

impl fmt::Display for GuardFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardFailure::NoCategory => f.write_str("select a category first"),
            GuardFailure::NoIndicators => f.write_str("select at least one indicator"),
        }
    }
}

/// Result of a successful [`WizardController::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved { from: StepId, to: StepId },
    /// The last step passed its guard; the caller assembles the payload.
    Finish,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardController {
    current: usize,
    completed: BTreeSet<usize>,
    category: Option<Category>,
}

impl WizardController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Restore the state of a previously generated chart.
    pub fn hydrate(&mut self, category: Category, completed: impl IntoIterator<Item = usize>) {
        let total = steps_for(Some(category)).len();
        self.current = 0;
        self.category = Some(category);
        self.completed = completed.into_iter().filter(|&i| i < total).collect();
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn steps(&self) -> &'static [StepDescriptor] {
        steps_for(self.category)
    }

    pub fn total_steps(&self) -> usize {
        self.steps().len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> StepDescriptor {
        let steps = self.steps();
        steps[self.current.min(steps.len() - 1)]
    }

    pub fn is_last_step(&self) -> bool {
        self.current + 1 == self.total_steps()
    }

    pub fn completed(&self) -> &BTreeSet<usize> {
        &self.completed
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    /// Choose the category. Only allowed while on the first step.
    ///
    /// Returns whether the category actually changed. A change drops every
    /// completed marker after the first step, since the indicator catalog
    /// behind step 1 is a different one.
    pub fn select_category(&mut self, category: Category) -> Result<bool, WizardError> {
        if self.current != 0 {
            return Err(WizardError::CategoryLocked {
                step: self.current_step().id,
            });
        }
        let previous = self.category.replace(category);
        self.completed.insert(0);
        if previous == Some(category) {
            return Ok(false);
        }

        let stale = self.completed.split_off(&1);
        info!(
            %category,
            previous = ?previous,
            steps = self.total_steps(),
            invalidated = stale.len(),
            "category selected"
        );
        Ok(true)
    }

    /// Check the current step's completion guard.
    pub fn check_guard(&self, selected_count: usize) -> Result<(), GuardFailure> {
        match self.current_step().id {
            StepId::SelectCategory if self.category.is_none() => Err(GuardFailure::NoCategory),
            StepId::SelectIndicators | StepId::DateChartType | StepId::Preview
                if selected_count == 0 =>
            {
                Err(GuardFailure::NoIndicators)
            }
            _ => Ok(()),
        }
    }

    pub fn can_advance(&self, selected_count: usize) -> bool {
        self.check_guard(selected_count).is_ok()
    }

    /// Move forward if the guard passes. On failure nothing changes.
    pub fn advance(&mut self, selected_count: usize) -> Result<Advance, GuardFailure> {
        if let Err(failure) = self.check_guard(selected_count) {
            debug!(step = %self.current_step().id, %failure, "advance blocked");
            return Err(failure);
        }
        let from = self.current_step().id;
        self.completed.insert(self.current);
        if self.is_last_step() {
            info!(step = %from, "final step passed");
            return Ok(Advance::Finish);
        }
        self.current += 1;
        let to = self.current_step().id;
        debug!(%from, %to, index = self.current, "advanced");
        Ok(Advance::Moved { from, to })
    }

    /// Step back one. `None` on the first step.
    pub fn retreat(&mut self) -> Option<StepId> {
        if self.current == 0 {
            return None;
        }
        self.current -= 1;
        let to = self.current_step().id;
        debug!(%to, index = self.current, "retreated");
        Some(to)
    }
}

use chartwiz_core::data::SourceError;
use chartwiz_core::domain::SelectionKey;
use chartwiz_core::{AssemblyError, SelectionError};
use thiserror::Error;

use crate::config::SettingsError;
use crate::controller::GuardFailure;
use crate::steps::StepId;

/// Errors surfaced by the wizard session.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("cannot advance: {0}")]
    Guard(GuardFailure),

    #[error("the category can only be changed on the first step (now on '{step}')")]
    CategoryLocked { step: StepId },

    #[error("the wizard is not open")]
    NotOpen,

    #[error("'{0}' is not in the loaded catalog")]
    UnknownIndicator(SelectionKey),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("assembly failed: {0}")]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("catalog worker: {0}")]
    Worker(#[from] std::io::Error),
}

impl From<GuardFailure> for WizardError {
    fn from(failure: GuardFailure) -> Self {
        WizardError::Guard(failure)
    }
}

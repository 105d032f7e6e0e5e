//! ChartWiz Wizard: step state machine and session orchestration.
//!
//! This crate builds on `chartwiz-core` to provide:
//! - Category-dependent step topology and the guarded step controller
//! - The wizard session (open / close / chart-generated callback)
//! - A background catalog worker with stale-reply discard
//! - Settings from TOML and environment
//! - JSONL chart log and logging setup

pub mod chart_log;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod notice;
pub mod session;
pub mod steps;
pub mod worker;

pub use chart_log::ChartLog;
pub use config::{Settings, SettingsError};
pub use controller::{Advance, GuardFailure, WizardController};
pub use error::WizardError;
pub use notice::{Notice, NoticeLevel, Notices};
pub use session::{ChartGeneratedCallback, Collaborators, SessionOptions, StepOutcome, WizardSession};
pub use steps::{steps_for, StepDescriptor, StepId, BASE_STEP_COUNT};
pub use worker::{CatalogReply, CatalogWorker};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn controller_is_send_sync() {
        assert_send::<WizardController>();
        assert_sync::<WizardController>();
    }

    #[test]
    fn settings_are_send_sync() {
        assert_send::<Settings>();
        assert_sync::<Settings>();
    }

    #[test]
    fn session_moves_across_threads() {
        assert_send::<WizardSession>();
        assert_send::<Collaborators>();
        assert_sync::<Collaborators>();
    }

    #[test]
    fn worker_reply_is_send() {
        assert_send::<CatalogReply>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<WizardError>();
        assert_sync::<WizardError>();
    }
}

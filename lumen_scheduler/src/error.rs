//! Scheduler-boundary errors (§7 "Flash / sequence name not found").
//!
//! Most lookup failures described in the specification are handled as logged
//! no-ops rather than propagated `Result`s, since a missing scene or sequence
//! name must never take the engine down mid-show. `Scheduler::start_sequence`
//! and `Scheduler::fire_flash` resolve their scene/sequence arguments through
//! this type internally, then log and discard the error rather than
//! propagating it to the caller. `UnknownFixture` covers a case that cannot
//! currently arise (flash records are only ever keyed by names drawn from the
//! fixture registry itself) but is kept for symmetry with the registry's own
//! `get` signature and in case a future caller resolves fixture names from
//! outside the registry.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchedulerError>;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("scene {0:?} is not in the scene catalog")]
    UnknownScene(String),

    #[error("sequence {0:?} is not in the sequence catalog")]
    UnknownSequence(String),

    #[error("fixture {0:?} is not in the fixture registry")]
    UnknownFixture(String),
}

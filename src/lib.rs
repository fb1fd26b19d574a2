//! StudyQuest - gamified study planning
//!
//! StudyQuest turns study sessions and exam preparation cycles into XP, levels,
//! ranks, medals and daily streaks, and keeps everything in one persisted
//! state document.
//!
//! ## Layers
//!
//! 1. **Gamification**: pure transforms over progress snapshots (level curve,
//!    session and cycle XP, login streaks with protection shields, medals).
//!
//! 2. **Store**: `UnifiedStateStore` folds every transform into the single
//!    root state and hands whole snapshots to a debounced writer.
//!
//! 3. **Simulation**: a clock that fakes day changes so the streak rules can
//!    be exercised without waiting.

pub mod config;
pub mod domain;
pub mod error;
pub mod gamification;
pub mod simulation;
pub mod store;

pub use domain::*;
pub use error::{ClockError, EngineError, StorageError};
pub use gamification::{GamificationEvent, ProgressionRules};
pub use store::{JsonFileStorage, MemoryStorage, NewSession, UnifiedStateStore};

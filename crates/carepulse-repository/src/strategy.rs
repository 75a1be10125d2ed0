//! Strategy and effect repositories.
//!
//! Both use only the generic owner-scoped operations; outcome analytics go
//! through the registration repository instead.

use carepulse_types::{Effect, Strategy};

use crate::child::ChildRepository;
use crate::composer::BasicKeys;

/// Strategies of a patient.
pub type StrategyRepository<S> = ChildRepository<Strategy, S, BasicKeys<Strategy>>;

/// Effects of a strategy.
pub type EffectRepository<S> = ChildRepository<Effect, S, BasicKeys<Effect>>;

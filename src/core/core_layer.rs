// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "bonuses/mod.rs"]
pub mod bonuses;

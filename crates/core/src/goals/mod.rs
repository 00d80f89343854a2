//! Goals module - domain models, the favorite resolver, services, and traits.

mod goals_model;
mod goals_resolver;
mod goals_service;
mod goals_traits;

pub use goals_model::{Contribution, ContributionDirection, Goal, GoalWriteIntent, NewGoal};
pub use goals_resolver::{apply_goal_intents, contribute, select_favorite, set_favorite};
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};

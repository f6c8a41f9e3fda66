//! Goal parsing and workout plan generation.
//!
//! [`planner::Planner`] is the entry point: it turns free text into a
//! [`types::GoalProfile`] and a goal plus a set of catalog exercises into a
//! [`types::Plan`], using a [`gateway::CompletionService`] for the language
//! model round trip.

pub mod catalog;
pub mod coerce;
pub mod error;
pub mod gateway;
pub mod planner;
pub mod prompt;
pub mod sanitize;
pub mod types;
pub mod validate;

pub use catalog::{ExerciseCatalog, ExerciseProjection, ExerciseStore, PgExerciseStore};
pub use error::{CoachError, RepositoryError, ServiceError, ValidationError};
pub use gateway::{CompletionService, GatewayConfig, GeminiGateway};
pub use planner::{Planner, PlannerOptions, ValidationMode};
pub use types::{ExerciseRef, GoalProfile, Plan, PlanStep, PrimaryGoal};

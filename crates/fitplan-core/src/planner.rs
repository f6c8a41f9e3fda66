//! Orchestration facade: the two public operations of the core.
//!
//! ```text
//! parse_goal:    text -> build_goal_prompt -> complete -> sanitize -> coerce_goal_profile
//! generate_plan: goal + exercises -> build_plan_prompt -> complete -> sanitize -> coerce_plan
//! ```
//!
//! The first failure is propagated untouched. In [`ValidationMode::Strict`]
//! the coerced DTO is additionally run through [`crate::validate`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::catalog::ExerciseProjection;
use crate::coerce::{coerce_goal_profile, coerce_plan};
use crate::error::CoachError;
use crate::gateway::{CompletionService, GatewayConfig, GeminiGateway};
use crate::prompt::{build_goal_prompt, build_plan_prompt_with_target};
use crate::sanitize::sanitize_and_parse;
use crate::types::{DEFAULT_DURATION_SECONDS, GoalProfile, Plan};
use crate::validate::{check_goal_profile, check_plan};

/// How much the facade trusts a well-formed model answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Return whatever coercion produces. Plans may reference unknown or
    /// null exercise ids.
    #[default]
    Permissive,
    /// Reject goals outside the closed set and plans that step outside the
    /// offered exercises, with a [`crate::error::ValidationError`].
    Strict,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Permissive => "permissive",
            Self::Strict => "strict",
        })
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "invalid validation mode {other:?} (expected permissive or strict)"
            )),
        }
    }
}

/// Tunables for [`Planner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerOptions {
    pub validation: ValidationMode,
    /// Total plan length the model is asked to approximate.
    pub target_duration_seconds: i64,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            validation: ValidationMode::Permissive,
            target_duration_seconds: DEFAULT_DURATION_SECONDS,
        }
    }
}

/// Turns free text into goal profiles and goal profiles into plans.
pub struct Planner {
    gateway: Box<dyn CompletionService>,
    options: PlannerOptions,
}

impl Planner {
    /// Build a planner around any completion service.
    pub fn new(gateway: impl CompletionService + 'static) -> Self {
        Self {
            gateway: Box::new(gateway),
            options: PlannerOptions::default(),
        }
    }

    /// Build a planner that talks to Gemini with `config`.
    pub fn gemini(config: GatewayConfig) -> Self {
        Self::new(GeminiGateway::new(config))
    }

    pub fn with_options(mut self, options: PlannerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    /// Parse a user's free-text goal into a [`GoalProfile`].
    #[instrument(skip_all, fields(model = %self.gateway.model(), mode = %self.options.validation))]
    pub async fn parse_goal(&self, text: &str) -> Result<GoalProfile, CoachError> {
        let prompt = build_goal_prompt(text);
        let raw = self.gateway.complete(&prompt).await?;
        let parsed = sanitize_and_parse(&raw)?;
        let profile = coerce_goal_profile(&parsed)?;

        if self.options.validation == ValidationMode::Strict {
            check_goal_profile(&profile)?;
        }

        info!(
            primary_goal = %profile.primary_goal,
            duration_seconds = profile.duration_seconds,
            constraints = profile.constraints.len(),
            "parsed goal"
        );
        Ok(profile)
    }

    /// Ask the model for a plan built only from `exercises`.
    ///
    /// The caller chooses the allowed exercises; this operation never reads
    /// the catalog itself. In permissive mode the returned plan may still
    /// reference ids outside `exercises`; such steps are logged, not
    /// rejected.
    #[instrument(skip_all, fields(model = %self.gateway.model(), mode = %self.options.validation, exercises = exercises.len()))]
    pub async fn generate_plan(
        &self,
        goal: &GoalProfile,
        exercises: &[ExerciseProjection],
    ) -> Result<Plan, CoachError> {
        let prompt =
            build_plan_prompt_with_target(goal, exercises, self.options.target_duration_seconds);
        let raw = self.gateway.complete(&prompt).await?;
        let parsed = sanitize_and_parse(&raw)?;
        let plan = coerce_plan(&parsed)?;

        match self.options.validation {
            ValidationMode::Strict => check_plan(&plan, exercises, goal)?,
            ValidationMode::Permissive => {
                if let Err(violation) = check_plan(&plan, exercises, goal) {
                    warn!(%violation, "accepting plan that fails validation");
                }
            }
        }

        info!(
            steps = plan.steps.len(),
            total_seconds = plan.total_duration_seconds(),
            "generated plan"
        );
        Ok(plan)
    }
}

impl fmt::Debug for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("model", &self.gateway.model())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

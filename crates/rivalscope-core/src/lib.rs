//! Shared types and configuration for rivalscope.
//!
//! Holds the report contract ([`CompetitorAnalysis`]), the job record tracked
//! by the server ([`AnalysisJob`]), the extractor output ([`ScrapedPage`]), and
//! the environment-driven [`AppConfig`].

pub mod analysis;
pub mod app_config;
pub mod config;
pub mod job;
pub mod page;

use thiserror::Error;

pub use analysis::{
    parse_launch_date, CompetitorAnalysis, Competitor, Launch, OfferingsAnalysis,
    PartnershipAnalysis, PricingAnalysis, SocialMediaAnalysis, NOT_AVAILABLE,
};
pub use app_config::{AppConfig, Environment, DEFAULT_USER_AGENT};
pub use config::{load_app_config, load_app_config_from_env};
pub use job::{AnalysisJob, JobFailure, JobOutcome, JobState};
pub use page::{PageLink, ScrapedPage};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

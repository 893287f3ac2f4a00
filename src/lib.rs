//! # Pipeline Tasks
//!
//! A minimal follow-up task slice for a recruiting applicant pipeline.
//!
//! Two thin layers over a managed Supabase/PostgREST store, independent of
//! each other:
//! - an HTTP endpoint that creates follow-up tasks against application
//!   records (`pipeline-tasks` binary)
//! - a today dashboard that lists tasks due today and marks them complete
//!   (`today-board` binary)
//!
//! Neither side owns storage; both go through the [`store::TaskStore`] seam,
//! and only the Supabase implementation behind it holds the service-role
//! credential.
//!
//! ## Modules
//! - `api`: task creation HTTP endpoint
//! - `config`: environment-driven configuration
//! - `dashboard`: today view state machine and rendering
//! - `store`: row types, the `TaskStore` seam, and the PostgREST client

pub mod api;
pub mod config;
pub mod dashboard;
pub mod store;

pub use config::Config;

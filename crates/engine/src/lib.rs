//! Skirmish engine library.
//!
//! Combat resolution and analytics on top of `skirmish-domain`.
//!
//! ## Structure
//!
//! - `use_cases/` - Auto-resolution, smart initiative and post-combat analytics
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;

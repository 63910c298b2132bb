//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod account;
mod chat;
pub mod credential;
pub mod demo;
pub mod logging;
pub mod migration;
mod preferences;
mod rating;
mod ride;
mod route;

pub use account::AccountService;
pub use chat::{ChatService, MAX_MESSAGE_LEN};
pub use credential::{CredentialHasher, CredentialParams};
pub use demo::DemoService;
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use preferences::PreferencesService;
pub use rating::RatingService;
pub use ride::RideService;
pub use route::FavoriteRouteService;

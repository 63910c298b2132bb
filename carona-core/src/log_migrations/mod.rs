//! Event log migrations - embedded SQL files for logs.duckdb
//!
//! Kept apart from the store migrations so the log database can be deleted
//! or exported without touching member data.

/// Event log migrations, applied in order by `MigrationService`.
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_initial_schema.sql", include_str!("001_initial_schema.sql")),
];

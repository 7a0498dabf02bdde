// Remittance Dashboard - Core Library
// Static tables -> aggregates -> chart specs -> rendered page

pub mod data;
pub mod stats;
pub mod quality;
pub mod format;
pub mod figure;
pub mod charts;
pub mod layout;
pub mod page;
pub mod config;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use data::{
    Dataset, MonthlyRecord, DailyRecord, HourlyRecord, CountryRecord, ClientRecord, FailureRecord,
    load_table, client_logo,
    ACTIVE_COUNTRIES, MONTHLY_GROWTH_RATE_PCT,
};
pub use stats::{Summary, PeakDay, PeakHour, TopClient};
pub use quality::{
    DataQualityEngine, QualityReport, QualityIssue, Severity,
    ValidationResult as QualityValidationResult,
};
pub use figure::{Figure, Trace, Layout};
pub use layout::{build_dashboard, Node, DASHBOARD_TITLE};
pub use page::Page;
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Business services containing domain logic and use cases.

pub mod auth;
pub mod backup;
pub mod dashboard;
pub mod password;
pub mod reports;
pub mod settings;
pub mod token;
pub mod weather;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig, RegisterRequest};
pub use backup::{Backup, BackupService, RestoreSummary};
pub use dashboard::DashboardService;
pub use password::PasswordHasher;
pub use reports::{GenerateReportRequest, ReportService, ReportType};
pub use settings::{
    NotificationSettings, NotificationSettingsUpdate, SettingsService, SettingsUpdate,
    UserSettings,
};
pub use token::{
    Clock, DenylistCleanup, DenylistCleanupConfig, FixedClock, InMemoryDenylist, SystemClock,
    TokenDenylist, TokenService, TokenServiceConfig,
};
pub use weather::{Coordinates, WeatherService};

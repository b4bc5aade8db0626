//! Application constants and configuration

pub const DEFAULT_API_BASE_URL: &str = "https://niro-chat-backend.onrender.com";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bounds for the /ask request timeout slider (seconds)
pub const ASK_TIMEOUT_MIN_SECS: u64 = 10;
pub const ASK_TIMEOUT_MAX_SECS: u64 = 300;
pub const ASK_TIMEOUT_DEFAULT_SECS: u64 = 60;

/// The /health probe uses a short fixed timeout
pub const HEALTH_TIMEOUT_SECS: u64 = 5;

/// One-click starter questions shown in the sidebar
pub const QUICK_QUERIES: &[&str] = &[
    "Show all abnormal tests for Lab 12 yesterday",
    "How many reports were generated this month?",
    "List abnormal parameters for male patients last week",
    "Compare abnormal test count by lab center",
    "Show test results trend over the last 30 days",
];

/// Categorical columns with this many or more distinct values are not charted
pub const CHART_CATEGORY_CUTOFF: usize = 20;
/// At most this many bar charts per result set
pub const CHART_MAX_BARS: usize = 2;
/// Each bar chart shows the most frequent values only
pub const CHART_TOP_VALUES: usize = 10;

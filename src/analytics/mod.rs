//! Analytics aggregator: period resolution, metric derivation and the
//! dashboard snapshot shape

pub mod engine;
pub mod period;
pub mod snapshot;

pub use engine::AnalyticsService;
pub use period::{PeriodWindow, ReportingPeriod};
pub use snapshot::{
    AnalyticsSnapshot, CategoryShare, CountTrend, LabelCount, MoneyTrend, ProductRank, SeriesPoint,
};

//! The metrics snapshot returned to the dashboard

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::period::{PeriodWindow, ReportingPeriod};
use crate::core::Money;

/// A monetary metric with its previous-period value and trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoneyTrend {
    pub current: Money,
    pub previous: Money,
    /// Percentage change vs the previous period, one decimal.
    pub trend_pct: f64,
}

/// A count metric with its previous-period value and trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountTrend {
    pub current: u64,
    pub previous: u64,
    pub trend_pct: f64,
}

/// One time bucket of the revenue series. Buckets are gap-free over the
/// spanned range: a day or month without sales appears with zero revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// "2026-08-06" for daily buckets, "2026-08" for monthly ones
    pub label: String,
    pub revenue: Money,
    pub orders: u64,
}

/// One category's slice of the attributed revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub name: String,
    pub revenue: Money,
    /// Integer share of total attributed revenue, ties broken by first
    /// appearance in the scanned orders
    pub share_pct: u8,
    /// Stable dashboard color, assigned by rank
    pub color: String,
}

/// One product's revenue over the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRank {
    pub product_id: Uuid,
    pub name: String,
    pub revenue: Money,
    pub units: u64,
}

/// One bucket of an enumerated-field distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

/// The full dashboard snapshot for one reporting period.
///
/// Derived, never stored: two snapshots taken against the same store
/// state and the same `now` are identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub period: ReportingPeriod,
    pub window: PeriodWindow,

    /// Revenue over orders with status PAID, SHIPPED or DELIVERED
    pub revenue: MoneyTrend,
    pub orders: CountTrend,
    pub average_order_value: MoneyTrend,

    pub new_customers: CountTrend,

    /// Distinct purchasing registered customers over accounts registered
    /// by period end, as a percentage. An approximation, not a funnel.
    pub conversion_rate_pct: f64,

    pub series: Vec<SeriesPoint>,
    pub top_categories: Vec<CategoryShare>,
    pub top_products: Vec<ProductRank>,

    /// Counts over every order in the period, whatever its status
    pub payment_methods: Vec<LabelCount>,
    pub statuses: Vec<LabelCount>,
}

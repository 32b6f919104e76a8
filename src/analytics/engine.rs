//! The analytics aggregation engine
//!
//! Read-only and deterministic: given a fixed store snapshot and a fixed
//! `now`, two runs produce identical output. Aggregation maps are
//! insertion-ordered (`IndexMap`) and every sort is stable, so ties
//! resolve by first appearance in the scanned orders.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use uuid::Uuid;

use crate::analytics::period::{PeriodWindow, ReportingPeriod, month_floor, next_month_floor};
use crate::analytics::snapshot::{
    AnalyticsSnapshot, CategoryShare, CountTrend, LabelCount, MoneyTrend, ProductRank, SeriesPoint,
};
use crate::catalog::{Category, Product, ProductFilter};
use crate::core::{Money, ShopResult};
use crate::customers::Customer;
use crate::orders::{Order, OrderStatus, PaymentMethod};
use crate::storage::{CatalogStore, CustomerStore, OrderStore};

/// Dashboard colors assigned to the top categories by rank.
const CATEGORY_COLORS: [&str; 4] = ["#6366F1", "#22C55E", "#F59E0B", "#EF4444"];

/// Periods spanning at most this many days bucket daily, longer ones
/// bucket by calendar month.
const DAILY_BUCKET_MAX_DAYS: i64 = 35;

/// Read-only derivation of dashboard metrics from the order ledger.
#[derive(Clone)]
pub struct AnalyticsService {
    orders: Arc<dyn OrderStore>,
    catalog: Arc<dyn CatalogStore>,
    customers: Arc<dyn CustomerStore>,
}

impl AnalyticsService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        catalog: Arc<dyn CatalogStore>,
        customers: Arc<dyn CustomerStore>,
    ) -> Self {
        Self {
            orders,
            catalog,
            customers,
        }
    }

    /// Snapshot for a period, evaluated against the current wall clock.
    pub async fn snapshot(&self, period: ReportingPeriod) -> ShopResult<AnalyticsSnapshot> {
        self.snapshot_at(period, Utc::now()).await
    }

    /// Snapshot with an explicit `now`, the deterministic entry point the
    /// tests drive.
    pub async fn snapshot_at(
        &self,
        period: ReportingPeriod,
        now: DateTime<Utc>,
    ) -> ShopResult<AnalyticsSnapshot> {
        let (cur, prev) = period.resolve(now);

        let cur_orders = self.orders.orders_in_range(cur.start, cur.end).await?;
        let prev_orders = if prev.is_empty() {
            Vec::new()
        } else {
            self.orders.orders_in_range(prev.start, prev.end).await?
        };

        let products: HashMap<Uuid, Product> = self
            .catalog
            .list_products(&ProductFilter::default(), usize::MAX)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let categories: HashMap<Uuid, Category> = self
            .catalog
            .list_categories()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let customers = self.customers.list_customers().await?;

        let cur_q = qualifying(&cur_orders);
        let prev_q = qualifying(&prev_orders);

        let revenue_cur = revenue_of(&cur_q);
        let revenue_prev = revenue_of(&prev_q);
        let count_cur = cur_q.len() as u64;
        let count_prev = prev_q.len() as u64;

        let new_cur = customers.iter().filter(|c| cur.contains(c.created_at)).count() as u64;
        let new_prev = customers
            .iter()
            .filter(|c| prev.contains(c.created_at))
            .count() as u64;

        // all_time starts its series at the first sale rather than
        // emitting decades of empty buckets
        let series_window = if period == ReportingPeriod::AllTime {
            match cur_q.first() {
                Some(first) => PeriodWindow::new(first.created_at, cur.end),
                None => PeriodWindow::new(cur.end, cur.end),
            }
        } else {
            cur
        };

        Ok(AnalyticsSnapshot {
            period,
            window: cur,
            revenue: money_trend(revenue_cur, revenue_prev),
            orders: count_trend(count_cur, count_prev),
            average_order_value: money_trend(
                revenue_cur.divided_by(count_cur),
                revenue_prev.divided_by(count_prev),
            ),
            new_customers: count_trend(new_cur, new_prev),
            conversion_rate_pct: conversion_rate(&cur_q, &customers, cur.end),
            series: build_series(&series_window, &cur_q),
            top_categories: category_breakdown(&cur_q, &products, &categories),
            top_products: top_products(&cur_q),
            payment_methods: payment_distribution(&cur_orders),
            statuses: status_distribution(&cur_orders),
        })
    }
}

/// Orders that count toward revenue: PAID, SHIPPED or DELIVERED.
fn qualifying(orders: &[Order]) -> Vec<&Order> {
    orders
        .iter()
        .filter(|o| o.status.counts_toward_revenue())
        .collect()
}

fn revenue_of(orders: &[&Order]) -> Money {
    orders.iter().map(|o| o.total).sum()
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Percentage change vs the previous period. A zero previous value yields
/// +100% when the current value is positive and 0% otherwise, so the
/// dashboard never sees NaN or infinity.
pub(crate) fn trend_pct(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 { 100.0 } else { 0.0 }
    } else {
        round1((current - previous) / previous * 100.0)
    }
}

fn money_trend(current: Money, previous: Money) -> MoneyTrend {
    MoneyTrend {
        current,
        previous,
        trend_pct: trend_pct(current.as_f64(), previous.as_f64()),
    }
}

fn count_trend(current: u64, previous: u64) -> CountTrend {
    CountTrend {
        current,
        previous,
        trend_pct: trend_pct(current as f64, previous as f64),
    }
}

/// Distinct purchasing registered customers over accounts registered by
/// period end, as a percentage. Guest orders do not count as conversions.
fn conversion_rate(qualifying: &[&Order], customers: &[Customer], end: DateTime<Utc>) -> f64 {
    let registered = customers.iter().filter(|c| c.created_at < end).count();
    if registered == 0 {
        return 0.0;
    }
    let purchasing: HashSet<Uuid> = qualifying
        .iter()
        .filter_map(|o| o.customer.account_id())
        .collect();
    round1(purchasing.len() as f64 / registered as f64 * 100.0)
}

/// Gap-free revenue series over the window: daily buckets for short
/// windows, calendar-month buckets otherwise.
fn build_series(window: &PeriodWindow, orders: &[&Order]) -> Vec<SeriesPoint> {
    if window.is_empty() {
        return Vec::new();
    }

    let mut points = Vec::new();
    if window.span() <= Duration::days(DAILY_BUCKET_MAX_DAYS) {
        let mut day = window.start.date_naive();
        let last = (window.end - Duration::seconds(1)).date_naive();
        while day <= last {
            let (revenue, count) = orders
                .iter()
                .filter(|o| o.created_at.date_naive() == day)
                .fold((Money::ZERO, 0u64), |(r, c), o| (r + o.total, c + 1));
            points.push(SeriesPoint {
                label: day.format("%Y-%m-%d").to_string(),
                revenue,
                orders: count,
            });
            day = day.succ_opt().expect("the day after any date exists");
        }
    } else {
        let mut bucket = month_floor(window.start);
        let last = month_floor(window.end - Duration::seconds(1));
        while bucket <= last {
            let next = next_month_floor(bucket);
            let (revenue, count) = orders
                .iter()
                .filter(|o| o.created_at >= bucket && o.created_at < next)
                .fold((Money::ZERO, 0u64), |(r, c), o| (r + o.total, c + 1));
            points.push(SeriesPoint {
                label: bucket.format("%Y-%m").to_string(),
                revenue,
                orders: count,
            });
            bucket = next;
        }
    }
    points
}

/// Attribute each line's revenue to its product's category and return the
/// top four shares. Integer-rounded percentages; ties resolve by first
/// appearance; colors are assigned by final rank.
fn category_breakdown(
    orders: &[&Order],
    products: &HashMap<Uuid, Product>,
    categories: &HashMap<Uuid, Category>,
) -> Vec<CategoryShare> {
    let mut attributed: IndexMap<Option<Uuid>, Money> = IndexMap::new();
    for order in orders {
        for item in &order.items {
            let category_id = products.get(&item.product_id).and_then(|p| p.category_id);
            *attributed.entry(category_id).or_insert(Money::ZERO) += item.line_total();
        }
    }

    let total: Money = attributed.values().copied().sum();
    if total.is_zero() {
        return Vec::new();
    }

    let mut ranked: Vec<(Option<Uuid>, Money)> = attributed.into_iter().collect();
    // Stable sort: equal revenues keep insertion order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(CATEGORY_COLORS.len())
        .enumerate()
        .map(|(rank, (category_id, revenue))| CategoryShare {
            category_id,
            name: category_id
                .and_then(|id| categories.get(&id))
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "Uncategorized".to_string()),
            revenue,
            share_pct: (revenue.as_f64() / total.as_f64() * 100.0).round() as u8,
            color: CATEGORY_COLORS[rank].to_string(),
        })
        .collect()
}

/// Top five products by revenue, names taken from the frozen line-item
/// snapshots.
fn top_products(orders: &[&Order]) -> Vec<ProductRank> {
    let mut ranks: IndexMap<Uuid, ProductRank> = IndexMap::new();
    for order in orders {
        for item in &order.items {
            let entry = ranks.entry(item.product_id).or_insert_with(|| ProductRank {
                product_id: item.product_id,
                name: item.product_name.clone(),
                revenue: Money::ZERO,
                units: 0,
            });
            entry.revenue += item.line_total();
            entry.units += u64::from(item.quantity);
        }
    }

    let mut ranked: Vec<ProductRank> = ranks.into_values().collect();
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    ranked.truncate(5);
    ranked
}

/// Counts over every order in the period, in enum declaration order so
/// the output shape is stable.
fn payment_distribution(orders: &[Order]) -> Vec<LabelCount> {
    PaymentMethod::ALL
        .iter()
        .map(|method| LabelCount {
            label: method.label().to_string(),
            count: orders.iter().filter(|o| o.payment_method == *method).count() as u64,
        })
        .collect()
}

fn status_distribution(orders: &[Order]) -> Vec<LabelCount> {
    OrderStatus::ALL
        .iter()
        .map(|status| LabelCount {
            label: status.label().to_string(),
            count: orders.iter().filter(|o| o.status == *status).count() as u64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::{DeliveryType, OrderChannel, OrderCustomer, OrderItem};
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
    }

    fn order(created_at: DateTime<Utc>, total: i64, status: OrderStatus) -> Order {
        Order {
            id: Uuid::new_v4(),
            created_at,
            customer: OrderCustomer::Guest {
                name: "Awa".to_string(),
                email: Some("awa@example.sn".to_string()),
                phone: None,
                address: None,
            },
            channel: OrderChannel::Web,
            payment_method: PaymentMethod::Wave,
            delivery: DeliveryType::Pickup,
            delivery_fee: Money::ZERO,
            status,
            total: Money::from_minor(total),
            items: vec![OrderItem {
                id: Uuid::new_v4(),
                product_id: Uuid::new_v4(),
                product_name: "Maillot".to_string(),
                quantity: 1,
                unit_price: Money::from_minor(total),
                size: None,
                custom_name: None,
                custom_number: None,
            }],
            idempotency_key: None,
        }
    }

    #[test]
    fn test_trend_conventions() {
        assert_eq!(trend_pct(150.0, 100.0), 50.0);
        assert_eq!(trend_pct(50.0, 100.0), -50.0);
        // Zero previous never divides
        assert_eq!(trend_pct(10.0, 0.0), 100.0);
        assert_eq!(trend_pct(0.0, 0.0), 0.0);
        // One decimal
        assert_eq!(trend_pct(1.0, 3.0), -66.7);
    }

    #[test]
    fn test_qualifying_excludes_pending_and_cancelled() {
        let orders = vec![
            order(at(2026, 8, 1), 1000, OrderStatus::Paid),
            order(at(2026, 8, 2), 2000, OrderStatus::Pending),
            order(at(2026, 8, 3), 5000, OrderStatus::Cancelled),
            order(at(2026, 8, 4), 3000, OrderStatus::Delivered),
        ];
        let q = qualifying(&orders);
        assert_eq!(q.len(), 2);
        assert_eq!(revenue_of(&q), Money::from_minor(4000));
    }

    #[test]
    fn test_daily_series_is_gap_free() {
        let window = PeriodWindow::new(
            Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap(),
            at(2026, 8, 4),
        );
        let o1 = order(at(2026, 8, 1), 1000, OrderStatus::Paid);
        let o2 = order(at(2026, 8, 3), 2000, OrderStatus::Paid);
        let series = build_series(&window, &[&o1, &o2]);

        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["2026-08-01", "2026-08-02", "2026-08-03", "2026-08-04"]
        );
        assert_eq!(series[0].revenue, Money::from_minor(1000));
        // The gap day is present with zero revenue
        assert_eq!(series[1].revenue, Money::ZERO);
        assert_eq!(series[1].orders, 0);
        assert_eq!(series[2].revenue, Money::from_minor(2000));
    }

    #[test]
    fn test_monthly_series_for_long_windows() {
        let window = PeriodWindow::new(
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            at(2026, 4, 15),
        );
        let o = order(at(2026, 2, 10), 4000, OrderStatus::Paid);
        let series = build_series(&window, &[&o]);

        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["2026-01", "2026-02", "2026-03", "2026-04"]);
        assert_eq!(series[1].revenue, Money::from_minor(4000));
        assert_eq!(series[0].revenue, Money::ZERO);
    }

    #[test]
    fn test_empty_window_has_no_series() {
        let end = at(2026, 8, 1);
        assert!(build_series(&PeriodWindow::new(end, end), &[]).is_empty());
    }

    #[test]
    fn test_top_products_ranked_by_revenue() {
        let mut o1 = order(at(2026, 8, 1), 0, OrderStatus::Paid);
        let shirt = Uuid::new_v4();
        let shorts = Uuid::new_v4();
        o1.items = vec![
            OrderItem {
                id: Uuid::new_v4(),
                product_id: shirt,
                product_name: "Maillot".to_string(),
                quantity: 2,
                unit_price: Money::from_minor(1000),
                size: None,
                custom_name: None,
                custom_number: None,
            },
            OrderItem {
                id: Uuid::new_v4(),
                product_id: shorts,
                product_name: "Short".to_string(),
                quantity: 1,
                unit_price: Money::from_minor(5000),
                size: None,
                custom_name: None,
                custom_number: None,
            },
        ];
        let ranked = top_products(&[&o1]);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "Short");
        assert_eq!(ranked[0].revenue, Money::from_minor(5000));
        assert_eq!(ranked[1].units, 2);
    }

    #[test]
    fn test_distributions_cover_every_variant() {
        let orders = vec![
            order(at(2026, 8, 1), 1000, OrderStatus::Paid),
            order(at(2026, 8, 2), 1000, OrderStatus::Pending),
        ];
        let statuses = status_distribution(&orders);
        assert_eq!(statuses.len(), 5);
        assert_eq!(statuses[0].label, "PENDING");
        assert_eq!(statuses[0].count, 1);
        assert_eq!(statuses[4].label, "CANCELLED");
        assert_eq!(statuses[4].count, 0);

        let payments = payment_distribution(&orders);
        assert_eq!(payments.len(), 4);
        assert_eq!(payments[0].label, "Wave");
        assert_eq!(payments[0].count, 2);
    }

    #[test]
    fn test_conversion_counts_distinct_accounts() {
        let alice = Uuid::new_v4();
        let customers = vec![
            Customer {
                id: alice,
                name: "Alice".to_string(),
                email: "alice@example.sn".to_string(),
                phone: None,
                created_at: at(2026, 7, 1),
            },
            Customer {
                id: Uuid::new_v4(),
                name: "Binta".to_string(),
                email: "binta@example.sn".to_string(),
                phone: None,
                created_at: at(2026, 7, 2),
            },
        ];
        let mut o1 = order(at(2026, 8, 1), 1000, OrderStatus::Paid);
        o1.customer = OrderCustomer::Account { customer_id: alice };
        let mut o2 = order(at(2026, 8, 2), 1000, OrderStatus::Paid);
        o2.customer = OrderCustomer::Account { customer_id: alice };

        // One purchasing account out of two registered
        let rate = conversion_rate(&[&o1, &o2], &customers, at(2026, 9, 1));
        assert_eq!(rate, 50.0);

        // No registered customers at all: zero, not a division error
        assert_eq!(conversion_rate(&[], &[], at(2026, 9, 1)), 0.0);
    }
}

//! Headline numbers shown above the charts.

use std::collections::HashSet;

use dashboard_core::formatting::{format_amount, format_watch_time};
use dashboard_core::models::{BillingRecord, ViewingEvent};
use dashboard_core::policy::{INVOICE_SETTLED, PAYMENT_APPROVED};
use serde::Serialize;

/// Sum of gross amounts over approved and settled billing rows.
///
/// Rows with an empty amount contribute nothing.
pub fn cost_total(billing: &[BillingRecord]) -> f64 {
    billing
        .iter()
        .filter(|b| b.payment_status == PAYMENT_APPROVED && b.final_invoice_result == INVOICE_SETTLED)
        .filter_map(|b| b.gross_sale_amount)
        .sum()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeadlineMetrics {
    pub titles_watched: usize,
    pub devices: usize,
    pub countries: usize,
    pub total_watched_seconds: u64,
    pub amount_paid: f64,
}

impl HeadlineMetrics {
    /// Compute over every retained event; the profile filter does not apply.
    pub fn compute(events: &[ViewingEvent], billing: &[BillingRecord]) -> Self {
        Self {
            titles_watched: distinct_count(events, |e| e.title.as_str()),
            devices: distinct_count(events, |e| e.device_type.as_str()),
            countries: distinct_count(events, |e| e.country.as_str()),
            total_watched_seconds: events
                .iter()
                .map(|e| u64::from(e.total_watched_seconds))
                .sum(),
            amount_paid: cost_total(billing),
        }
    }

    /// Total watch time as `D:H:M:S`.
    pub fn time_spent(&self) -> String {
        format_watch_time(self.total_watched_seconds)
    }

    /// Amount paid in whole euros.
    pub fn amount_label(&self) -> String {
        format_amount(self.amount_paid)
    }
}

fn distinct_count<'a>(events: &'a [ViewingEvent], key: impl Fn(&'a ViewingEvent) -> &'a str) -> usize {
    events.iter().map(key).collect::<HashSet<_>>().len()
}

/// Convenience wrapper for [`HeadlineMetrics::compute`].
pub fn headline_metrics(events: &[ViewingEvent], billing: &[BillingRecord]) -> HeadlineMetrics {
    HeadlineMetrics::compute(events, billing)
}

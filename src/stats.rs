// Aggregates - sum/mean/max over the static tables
//
// Computed once at startup. Every number shown on a summary card or footnote
// comes from a Summary field, never from a literal.

use crate::data::{ClientRecord, DailyRecord, Dataset, HourlyRecord};
use anyhow::{Context, Result};
use serde::Serialize;

pub fn sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().sum()
}

/// Arithmetic mean, None for an empty input
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (total, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(total, n), v| (total + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(total / n as f64)
    }
}

pub fn max<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    values.into_iter().fold(None, |best, v| match best {
        Some(b) if b >= v => Some(b),
        _ => Some(v),
    })
}

/// First row holding the largest key
pub fn argmax_by<T, F>(rows: &[T], key: F) -> Option<&T>
where
    F: Fn(&T) -> f64,
{
    let mut best: Option<(&T, f64)> = None;
    for row in rows {
        let k = key(row);
        match best {
            Some((_, b)) if b >= k => {}
            _ => best = Some((row, k)),
        }
    }
    best.map(|(row, _)| row)
}

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PeakDay {
    pub day: String,
    pub volume: f64,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeakHour {
    /// Short label, e.g. "1:30 PM"
    pub label: String,
    pub volume: f64,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopClient {
    pub client: String,
    pub market_share: f64,
}

/// Every aggregate the dashboard displays
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_transactions: u64,
    pub mean_monthly_transactions: f64,
    pub mean_success_rate: f64,
    pub peak_success_rate: f64,
    pub total_volume: f64,
    pub mean_monthly_volume: f64,
    pub total_remitters: u64,
    pub total_recipients: u64,
    pub total_unique_users: u64,
    pub total_failures: u64,
    pub peak_day_volume: f64,
    pub peak_day_count: u64,
    pub peak_day: PeakDay,
    pub peak_volume_hour: PeakHour,
    pub peak_count_hour: PeakHour,
    pub top_client: TopClient,
}

impl Summary {
    pub fn compute(data: &Dataset) -> Result<Self> {
        let monthly = &data.monthly;

        let total_transactions: u64 = monthly.iter().map(|m| m.transactions).sum();
        let mean_monthly_transactions =
            mean(monthly.iter().map(|m| m.transactions as f64)).context("Monthly table is empty")?;
        let mean_success_rate =
            mean(monthly.iter().map(|m| m.success_rate)).context("Monthly table is empty")?;
        let peak_success_rate =
            max(monthly.iter().map(|m| m.success_rate)).context("Monthly table is empty")?;
        let total_volume = sum(monthly.iter().map(|m| m.volume));
        let mean_monthly_volume =
            mean(monthly.iter().map(|m| m.volume)).context("Monthly table is empty")?;

        let total_remitters: u64 = monthly.iter().map(|m| m.unique_remitters).sum();
        let total_recipients: u64 = monthly.iter().map(|m| m.unique_recipients).sum();

        let total_failures: u64 = data.failures.iter().map(|f| f.count).sum();

        // Footnote maxima are taken per column, independent of which row holds them
        let peak_day_volume = max(data.daily.iter().map(|d| d.volume)).context("Daily table is empty")?;
        let peak_day_count = data.daily.iter().map(|d| d.count).max().context("Daily table is empty")?;

        Ok(Summary {
            total_transactions,
            mean_monthly_transactions,
            mean_success_rate,
            peak_success_rate,
            total_volume,
            mean_monthly_volume,
            total_remitters,
            total_recipients,
            total_unique_users: total_remitters + total_recipients,
            total_failures,
            peak_day_volume,
            peak_day_count,
            peak_day: peak_day(&data.daily)?,
            peak_volume_hour: peak_hour(&data.hourly, |h| h.volume)?,
            peak_count_hour: peak_hour(&data.hourly, |h| h.count as f64)?,
            top_client: top_client(&data.clients)?,
        })
    }
}

fn peak_day(daily: &[DailyRecord]) -> Result<PeakDay> {
    let row = argmax_by(daily, |d| d.volume).context("Daily table is empty")?;
    Ok(PeakDay {
        day: row.day.clone(),
        volume: row.volume,
        count: row.count,
    })
}

fn peak_hour<F>(hourly: &[HourlyRecord], key: F) -> Result<PeakHour>
where
    F: Fn(&HourlyRecord) -> f64,
{
    let row = argmax_by(hourly, key).context("Hourly table is empty")?;
    Ok(PeakHour {
        label: row.short_label()?,
        volume: row.volume,
        count: row.count,
    })
}

fn top_client(clients: &[ClientRecord]) -> Result<TopClient> {
    let row = argmax_by(clients, |c| c.market_share).context("Client table is empty")?;
    Ok(TopClient {
        client: row.client.clone(),
        market_share: row.market_share,
    })
}

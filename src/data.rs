// Static tables - compiled into the binary, loaded once at startup
//
// Every table lives in data/*.csv and is embedded with include_str!, so the
// dashboard has no runtime I/O. Column headers match the source workbook.

use anyhow::{bail, Context, Result};
use chrono::NaiveTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ============================================================================
// RAW TABLES
// ============================================================================

const MONTHLY_CSV: &str = include_str!("../data/monthly.csv");
const DAILY_CSV: &str = include_str!("../data/daily.csv");
const HOURLY_CSV: &str = include_str!("../data/hourly.csv");
const COUNTRIES_CSV: &str = include_str!("../data/countries.csv");
const CLIENTS_CSV: &str = include_str!("../data/clients.csv");
const FAILURES_CSV: &str = include_str!("../data/failures.csv");

/// Countries with at least one transfer during the year.
/// Reported figure; the country table only breaks out the largest corridors.
pub const ACTIVE_COUNTRIES: u32 = 64;

/// Month-over-month growth in unique users, as reported.
pub const MONTHLY_GROWTH_RATE_PCT: f64 = 27.66;

/// Logo files under assets/, keyed by client name
const CLIENT_LOGOS: &[(&str, &str)] = &[
    ("Lemfi", "CLIENT_LOGOS/LEMFI.png"),
    ("DLocal", "CLIENT_LOGOS/DLocal.png"),
    ("Tangent", "CLIENT_LOGOS/Tangent.jpg"),
    ("Nala", "CLIENT_LOGOS/Nala.png"),
    ("Wapipay", "CLIENT_LOGOS/wapipay.jpg"),
    ("Cellulant", "CLIENT_LOGOS/Cellulant.png"),
    ("Hello FXBud", "CLIENT_LOGOS/fxbud.jpg"),
    ("Finpesa", "CLIENT_LOGOS/finpesa.png"),
];

/// Logo path (relative to assets/) for a client, if one exists
pub fn client_logo(client: &str) -> Option<&'static str> {
    CLIENT_LOGOS
        .iter()
        .find(|(name, _)| *name == client)
        .map(|(_, path)| *path)
}

// ============================================================================
// RECORDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    #[serde(rename = "Month")]
    pub month: String,

    #[serde(rename = "Transactions")]
    pub transactions: u64,

    /// KES
    #[serde(rename = "Volume")]
    pub volume: f64,

    /// Percent of attempted transfers that completed
    #[serde(rename = "Success_Rate")]
    pub success_rate: f64,

    #[serde(rename = "Unique_Remitters")]
    pub unique_remitters: u64,

    #[serde(rename = "Unique_Recipients")]
    pub unique_recipients: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    #[serde(rename = "Day")]
    pub day: String,

    #[serde(rename = "Volume")]
    pub volume: f64,

    #[serde(rename = "Count")]
    pub count: u64,
}

/// Half-hour bucket, labelled like "1:30:00 PM"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    #[serde(rename = "Hour")]
    pub hour: String,

    #[serde(rename = "Volume")]
    pub volume: f64,

    #[serde(rename = "Count")]
    pub count: u64,
}

impl HourlyRecord {
    pub fn time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.hour, "%I:%M:%S %p")
            .with_context(|| format!("Invalid hour label: {}", self.hour))
    }

    /// "1:30:00 PM" -> "1:30 PM"
    pub fn short_label(&self) -> Result<String> {
        Ok(self.time()?.format("%-I:%M %p").to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    /// ISO 3166-1 alpha-3, or "Unknown"
    #[serde(rename = "Country")]
    pub country: String,

    #[serde(rename = "Volume")]
    pub volume: f64,

    #[serde(rename = "Transactions")]
    pub transactions: u64,

    #[serde(rename = "Market_Share")]
    pub market_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    #[serde(rename = "Client")]
    pub client: String,

    #[serde(rename = "Volume")]
    pub volume: f64,

    #[serde(rename = "Transactions")]
    pub transactions: u64,

    #[serde(rename = "Market_Share")]
    pub market_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    #[serde(rename = "Reason")]
    pub reason: String,

    #[serde(rename = "Total")]
    pub count: u64,

    #[serde(rename = "Percentage")]
    pub percentage: f64,
}

// ============================================================================
// DATASET
// ============================================================================

/// All tables behind the dashboard. Immutable once loaded.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub monthly: Vec<MonthlyRecord>,
    pub daily: Vec<DailyRecord>,
    pub hourly: Vec<HourlyRecord>,
    pub countries: Vec<CountryRecord>,
    pub clients: Vec<ClientRecord>,
    pub failures: Vec<FailureRecord>,
}

impl Dataset {
    pub fn load() -> Result<Self> {
        Ok(Dataset {
            monthly: load_table("monthly", MONTHLY_CSV)?,
            daily: load_table("daily", DAILY_CSV)?,
            hourly: load_table("hourly", HOURLY_CSV)?,
            countries: load_table("countries", COUNTRIES_CSV)?,
            clients: load_table("clients", CLIENTS_CSV)?,
            failures: load_table("failures", FAILURES_CSV)?,
        })
    }

    pub fn row_count(&self) -> usize {
        self.monthly.len()
            + self.daily.len()
            + self.hourly.len()
            + self.countries.len()
            + self.clients.len()
            + self.failures.len()
    }
}

/// Deserialize one CSV table. Empty tables are rejected.
pub fn load_table<T: DeserializeOwned>(name: &str, raw: &str) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_reader(raw.as_bytes());

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let row: T = result.with_context(|| format!("Failed to deserialize {} row {}", name, i + 1))?;
        rows.push(row);
    }

    if rows.is_empty() {
        bail!("Table {} has no rows", name);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_all_tables() {
        let data = Dataset::load().unwrap();

        assert_eq!(data.monthly.len(), 12);
        assert_eq!(data.daily.len(), 7);
        assert_eq!(data.hourly.len(), 48);
        assert_eq!(data.countries.len(), 10);
        assert_eq!(data.clients.len(), 9);
        assert_eq!(data.failures.len(), 11);
        assert_eq!(data.row_count(), 97);
    }

    #[test]
    fn test_rows_keep_source_order() {
        let data = Dataset::load().unwrap();

        assert_eq!(data.monthly[0].month, "January");
        assert_eq!(data.monthly[11].month, "December");
        assert_eq!(data.monthly[11].transactions, 68452);
        assert_eq!(data.daily[4].day, "Friday");
        assert_eq!(data.hourly[0].hour, "12:00:00 AM");
        assert_eq!(data.hourly[47].hour, "11:30:00 PM");
        assert_eq!(data.countries[9].country, "Unknown");
        assert_eq!(data.clients[5].client, "Hello FXBud");
        assert_eq!(data.failures[3].reason, "Insufficient Balance");
        assert_eq!(data.failures[3].count, 31173);
    }

    #[test]
    fn test_load_table_rejects_empty() {
        let err = load_table::<DailyRecord>("daily", "Day,Volume,Count\n").unwrap_err();
        assert!(err.to_string().contains("daily"));
    }

    #[test]
    fn test_load_table_reports_bad_row() {
        let raw = "Day,Volume,Count\nMonday,12.5,7\nTuesday,lots,3\n";
        let err = load_table::<DailyRecord>("daily", raw).unwrap_err();
        assert!(err.to_string().contains("daily row 2"));
    }

    #[test]
    fn test_hour_labels() {
        let data = Dataset::load().unwrap();

        assert_eq!(data.hourly[0].time().unwrap(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert_eq!(data.hourly[27].short_label().unwrap(), "1:30 PM");
        assert_eq!(data.hourly[24].short_label().unwrap(), "12:00 PM");

        // Half-hour buckets, strictly increasing through the day
        for pair in data.hourly.windows(2) {
            let gap = pair[1].time().unwrap() - pair[0].time().unwrap();
            assert_eq!(gap.num_minutes(), 30);
        }
    }

    #[test]
    fn test_client_logos() {
        assert_eq!(client_logo("Lemfi"), Some("CLIENT_LOGOS/LEMFI.png"));
        assert_eq!(client_logo("Hello FXBud"), Some("CLIENT_LOGOS/fxbud.jpg"));
        assert_eq!(client_logo("Others"), None);
    }
}

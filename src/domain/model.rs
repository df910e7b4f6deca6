use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A service address on the account. Each premise has its own usage data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Premise {
    pub premise_id: String,
    pub address: String,
}

/// One usage sample exactly as the portal reported it.
///
/// The portal's record shape is not documented, so the value is kept as-is,
/// whatever its JSON type. The accessors only look at the object fields
/// observed in practice and return `None` for anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageRecord {
    pub value: serde_json::Value,
}

impl UsageRecord {
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.value.get(field)
    }

    /// Consumption for the period, in the units the portal reports (kWh).
    pub fn usage(&self) -> Option<f64> {
        match self.get("usage")? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn cost(&self) -> Option<f64> {
        match self.get("cost")? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().trim_start_matches('$').parse().ok(),
            _ => None,
        }
    }

    /// Date or period marker of the sample.
    pub fn period(&self) -> Option<&str> {
        ["period", "billDate", "date"]
            .iter()
            .find_map(|key| self.get(key).and_then(|v| v.as_str()))
    }
}

/// Aggregation granularity of a usage report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    Month,
    #[default]
    Day,
    Hour,
    FifteenMinute,
}

impl Interval {
    /// Code the usage report endpoint expects in its `interval` parameter.
    pub fn code(&self) -> &'static str {
        match self {
            Interval::Month => "m",
            Interval::Day => "d",
            Interval::Hour => "h",
            Interval::FifteenMinute => "mi",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" | "month" => Ok(Interval::Month),
            "d" | "day" => Ok(Interval::Day),
            "h" | "hour" => Ok(Interval::Hour),
            "mi" | "fifteen-minute" | "fifteen_minute" | "15m" => Ok(Interval::FifteenMinute),
            other => Err(format!("unknown interval: {}", other)),
        }
    }
}

/// Anti-forgery token scraped from the login form: the input's name and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken {
    pub field_name: String,
    pub value: String,
}

/// Shape of `GET /api/account/{accountNum}/dashboard/current`, reduced to
/// what the client reads.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Dashboard {
    #[serde(default)]
    pub addresses: Vec<DashboardAddress>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DashboardAddress {
    #[serde(deserialize_with = "string_or_number")]
    pub premise_id: String,
    #[serde(default)]
    pub street: String,
}

impl From<DashboardAddress> for Premise {
    fn from(address: DashboardAddress) -> Self {
        Premise {
            premise_id: address.premise_id,
            address: address.street,
        }
    }
}

/// Shape of `GET /api/report/usage/{premiseId}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UsageReport {
    pub data: Vec<UsageRecord>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected premise id as string or number, got {}",
            other
        ))),
    }
}

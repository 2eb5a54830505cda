use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};
use crate::state::{QueryState, StatePatch, TrackedKeys};

pub const SHOP_ID: &str = "shopId";
pub const DELIVERY_STATUS: &str = "deliveryStatus";
pub const PAYMENT_STATUS: &str = "paymentStatus";
pub const DATE_FROM: &str = "dateFrom";
pub const DATE_TO: &str = "dateTo";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryStatus {
    Pending,
    Shipped,
    InTransit,
    Delivered,
    Returned,
    Cancelled,
}

impl DeliveryStatus {
    pub const ALL: [DeliveryStatus; 6] = [
        DeliveryStatus::Pending,
        DeliveryStatus::Shipped,
        DeliveryStatus::InTransit,
        DeliveryStatus::Delivered,
        DeliveryStatus::Returned,
        DeliveryStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "PENDING",
            DeliveryStatus::Shipped => "SHIPPED",
            DeliveryStatus::InTransit => "IN_TRANSIT",
            DeliveryStatus::Delivered => "DELIVERED",
            DeliveryStatus::Returned => "RETURNED",
            DeliveryStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == upper)
            .ok_or_else(|| QueryError::UnknownDeliveryStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    Overdue,
    Partial,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Paid,
        PaymentStatus::Unpaid,
        PaymentStatus::Overdue,
        PaymentStatus::Partial,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::Overdue => "OVERDUE",
            PaymentStatus::Partial => "PARTIAL",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == upper)
            .ok_or_else(|| QueryError::UnknownPaymentStatus(s.to_string()))
    }
}

/// Inclusive date range; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        match (start, end) {
            (Some(s), Some(e)) if s > e => Err(QueryError::InvalidDateRange {
                start: s.format(DATE_FORMAT).to_string(),
                end: e.format(DATE_FORMAT).to_string(),
            }),
            _ => Ok(Self { start, end }),
        }
    }

    /// Parse ISO `YYYY-MM-DD` bounds; empty strings count as open bounds.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        Self::new(parse_date(DATE_FROM, start)?, parse_date(DATE_TO, end)?)
    }

    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| s <= date) && self.end.is_none_or(|e| date <= e)
    }
}

fn parse_date(key: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Some)
            .map_err(|_| QueryError::InvalidDate {
                key: key.to_string(),
                value: value.to_string(),
            }),
    }
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

/// Quick ranges offered next to the date inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    Last7Days,
    Last30Days,
    QuarterToDate,
    YearToDate,
    All,
}

impl DatePreset {
    pub const ALL: [DatePreset; 5] = [
        DatePreset::Last7Days,
        DatePreset::Last30Days,
        DatePreset::QuarterToDate,
        DatePreset::YearToDate,
        DatePreset::All,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DatePreset::Last7Days => "7d",
            DatePreset::Last30Days => "30d",
            DatePreset::QuarterToDate => "QTD",
            DatePreset::YearToDate => "YTD",
            DatePreset::All => "All",
        }
    }

    /// Range ending at `today`. A start before the earliest representable
    /// date is left open.
    pub fn range(self, today: NaiveDate) -> DateRange {
        let start = match self {
            DatePreset::Last7Days => today.checked_sub_signed(Duration::days(6)),
            DatePreset::Last30Days => today.checked_sub_signed(Duration::days(29)),
            DatePreset::QuarterToDate => {
                let first_month = today.month0() / 3 * 3 + 1;
                NaiveDate::from_ymd_opt(today.year(), first_month, 1)
            }
            DatePreset::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            DatePreset::All => return DateRange::default(),
        };
        DateRange {
            start,
            end: Some(today),
        }
    }
}

impl FromStr for DatePreset {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QueryError::UnknownPreset(s.to_string()))
    }
}

/// Filters of the retailer distributions list.
///
/// Values are kept as the raw strings the URL carries; the typed accessors
/// are where they get coerced and validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
}

impl DistributionFilters {
    pub const KEYS: [&'static str; 5] =
        [SHOP_ID, DELIVERY_STATUS, PAYMENT_STATUS, DATE_FROM, DATE_TO];

    pub fn tracked_keys() -> TrackedKeys {
        TrackedKeys::new(Self::KEYS)
    }

    pub fn shop_id(&self) -> Result<Option<u64>> {
        match non_empty(&self.shop_id) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| QueryError::InvalidShopId(raw.to_string())),
        }
    }

    pub fn delivery_status(&self) -> Result<Option<DeliveryStatus>> {
        non_empty(&self.delivery_status)
            .map(|raw| raw.parse())
            .transpose()
    }

    pub fn payment_status(&self) -> Result<Option<PaymentStatus>> {
        non_empty(&self.payment_status)
            .map(|raw| raw.parse())
            .transpose()
    }

    pub fn date_range(&self) -> Result<DateRange> {
        DateRange::parse(self.date_from.as_deref(), self.date_to.as_deref())
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_from = format_date(range.start);
        self.date_to = format_date(range.end);
    }

    pub fn apply_preset(&mut self, preset: DatePreset, today: NaiveDate) {
        self.set_date_range(preset.range(today));
    }

    /// Active filter chips in display order.
    pub fn active(&self) -> Vec<(&'static str, &str)> {
        Self::KEYS
            .into_iter()
            .filter_map(|key| match self.value(key) {
                Some(value) if !value.is_empty() => Some((key, value)),
                _ => None,
            })
            .collect()
    }

    /// Dismiss one chip.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        *self
            .slot_mut(key)
            .ok_or_else(|| QueryError::UnknownKey(key.to_string()))? = None;
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Parameters for the distributions list request. Values are validated
    /// before being handed over.
    pub fn request_params(&self, page: u32, limit: u32) -> Result<Vec<(&'static str, String)>> {
        let mut params = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(shop) = self.shop_id()? {
            params.push(("retailerShopId", shop.to_string()));
        }
        if let Some(status) = self.delivery_status()? {
            params.push(("status", status.to_string()));
        }
        let range = self.date_range()?;
        if let Some(start) = format_date(range.start) {
            params.push(("startDate", start));
        }
        if let Some(end) = format_date(range.end) {
            params.push(("endDate", end));
        }
        if let Some(status) = self.payment_status()? {
            params.push(("paymentStatus", status.to_string()));
        }
        Ok(params)
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            SHOP_ID => Some(&mut self.shop_id),
            DELIVERY_STATUS => Some(&mut self.delivery_status),
            PAYMENT_STATUS => Some(&mut self.payment_status),
            DATE_FROM => Some(&mut self.date_from),
            DATE_TO => Some(&mut self.date_to),
            _ => None,
        }
    }
}

impl QueryState for DistributionFilters {
    fn value(&self, key: &str) -> Option<&str> {
        match key {
            SHOP_ID => self.shop_id.as_deref(),
            DELIVERY_STATUS => self.delivery_status.as_deref(),
            PAYMENT_STATUS => self.payment_status.as_deref(),
            DATE_FROM => self.date_from.as_deref(),
            DATE_TO => self.date_to.as_deref(),
            _ => None,
        }
    }

    fn apply(&mut self, patch: &StatePatch) {
        for (key, value) in patch.iter() {
            if let Some(slot) = self.slot_mut(key) {
                *slot = value.map(str::to_string);
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

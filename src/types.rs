//! Data types for the delivery tracker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::eta::{compute_eta_minutes, format_eta, ETA_UNKNOWN};
use crate::stage::{map_status_to_stage, stage_definition};

/// Delivery lifecycle status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryStatus {
    Confirmed,
    Preparing,
    InTransit,
    Delivered,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Confirmed => "CONFIRMED",
            DeliveryStatus::Preparing => "PREPARING",
            DeliveryStatus::InTransit => "IN_TRANSIT",
            DeliveryStatus::Delivered => "DELIVERED",
        }
    }
}

impl FromStr for DeliveryStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONFIRMED" => Ok(DeliveryStatus::Confirmed),
            "PREPARING" => Ok(DeliveryStatus::Preparing),
            "IN_TRANSIT" => Ok(DeliveryStatus::InTransit),
            "DELIVERED" => Ok(DeliveryStatus::Delivered),
            _ => Err(()),
        }
    }
}

impl Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A delivery as returned by the provider. The status is kept as the raw
/// wire string so that values this crate does not know survive decoding.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub estimated_delivery_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delivery_address: String,
    #[serde(default)]
    pub driver: Option<Driver>,
}

impl DeliveryRecord {
    pub fn status(&self) -> Option<DeliveryStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Everything the display layer needs for one delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingView {
    pub stage_ordinal: usize,
    pub stage_label: &'static str,
    pub stage_description: &'static str,
    pub eta_minutes: Option<i64>,
    pub eta_text: String,
    pub record: DeliveryRecord,
    pub fetched_at: DateTime<Utc>,
}

impl TrackingView {
    /// Build the view for `record` as seen at `now`.
    pub fn from_record(record: DeliveryRecord, now: DateTime<Utc>) -> Self {
        let stage_ordinal = map_status_to_stage(record.status.as_deref());
        let stage = stage_definition(stage_ordinal);
        let eta_minutes = compute_eta_minutes(record.estimated_delivery_time, now);
        let eta_text = match eta_minutes {
            Some(minutes) => format_eta(minutes),
            None => ETA_UNKNOWN.to_string(),
        };

        Self {
            stage_ordinal,
            stage_label: stage.label,
            stage_description: stage.description,
            eta_minutes,
            eta_text,
            record,
            fetched_at: now,
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.record.status() == Some(DeliveryStatus::Delivered)
    }

    pub fn driver_name(&self) -> Option<&str> {
        self.record.driver.as_ref().map(|d| d.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn status_parses_known_values_only() {
        assert_eq!("IN_TRANSIT".parse::<DeliveryStatus>(), Ok(DeliveryStatus::InTransit));
        assert_eq!("DELIVERED".parse::<DeliveryStatus>(), Ok(DeliveryStatus::Delivered));
        assert!("in_transit".parse::<DeliveryStatus>().is_err());
        assert!("CANCELLED".parse::<DeliveryStatus>().is_err());
    }

    #[test]
    fn view_for_in_transit_record() {
        let record = DeliveryRecord {
            status: Some("IN_TRANSIT".to_string()),
            estimated_delivery_time: Some(now() + Duration::milliseconds(1_500_000)),
            delivery_address: "12 rue des Lilas".to_string(),
            ..Default::default()
        };

        let view = TrackingView::from_record(record, now());
        assert_eq!(view.stage_ordinal, 2);
        assert_eq!(view.stage_label, "En route");
        assert_eq!(view.eta_minutes, Some(25));
        assert_eq!(view.eta_text, "25 minutes");
        assert_eq!(view.fetched_at, now());
        assert!(!view.is_delivered());
        assert_eq!(view.driver_name(), None);
    }

    #[test]
    fn view_without_estimate_or_known_status() {
        let record = DeliveryRecord {
            status: Some("LOST_IN_SPACE".to_string()),
            ..Default::default()
        };

        let view = TrackingView::from_record(record, now());
        assert_eq!(view.stage_ordinal, 0);
        assert_eq!(view.eta_minutes, None);
        assert_eq!(view.eta_text, "N/A");
    }

    #[test]
    fn view_serializes_camel_case() {
        let record = DeliveryRecord {
            status: Some("DELIVERED".to_string()),
            driver: Some(Driver {
                name: "Karim".to_string(),
                phone: None,
            }),
            ..Default::default()
        };
        let view = TrackingView::from_record(record, now());
        assert!(view.is_delivered());
        assert_eq!(view.driver_name(), Some("Karim"));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["stageOrdinal"], 3);
        assert_eq!(json["etaText"], "N/A");
        assert_eq!(json["record"]["driver"]["name"], "Karim");
    }
}

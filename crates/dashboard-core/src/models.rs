use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Movie vs. series classification of a viewing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContentType {
    Movie,
    Serie,
}

impl ContentType {
    /// The other variant, used by the Movie/Serie toggle.
    pub fn toggled(self) -> Self {
        match self {
            ContentType::Movie => ContentType::Serie,
            ContentType::Serie => ContentType::Movie,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Movie => "Movie",
            ContentType::Serie => "Serie",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse device bucket shown in the device chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeviceCategory {
    Tv,
    Tablet,
    Pc,
    Phone,
}

impl DeviceCategory {
    pub fn label(self) -> &'static str {
        match self {
            DeviceCategory::Tv => "TV",
            DeviceCategory::Tablet => "Tablet",
            DeviceCategory::Pc => "PC",
            DeviceCategory::Phone => "Phone",
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of `ViewingActivity.csv`, after header spaces became underscores.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewingRecord {
    #[serde(rename = "Profile_Name")]
    pub profile_name: String,
    #[serde(rename = "Start_Time")]
    pub start_time: String,
    /// Watched time as `HH:MM:SS`.
    #[serde(rename = "Duration")]
    pub duration: String,
    #[serde(rename = "Attributes", default)]
    pub attributes: Option<String>,
    #[serde(rename = "Title")]
    pub title: String,
    /// Set for trailers, hooks and other auto-played extras.
    #[serde(rename = "Supplemental_Video_Type", default)]
    pub supplemental_video_type: Option<String>,
    #[serde(rename = "Device_Type")]
    pub device_type: String,
    /// Playback position at the end of the session, `HH:MM:SS`.
    #[serde(rename = "Bookmark")]
    pub bookmark: String,
    #[serde(rename = "Latest_Bookmark", default)]
    pub latest_bookmark: Option<String>,
    /// Country code followed by a name, e.g. `"FR (France)"`.
    #[serde(rename = "Country")]
    pub country: String,
}

/// A retained viewing row with every derived column populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewingEvent {
    pub profile_name: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub device_type: String,
    pub country: String,
    pub supplemental_video_type: Option<String>,
    /// Seconds watched, from the `Duration` column.
    pub total_watched_seconds: u32,
    /// Bookmark position in seconds. The name is historical: it never held minutes.
    pub duration_minutes: u32,
    pub total_watched_hours: f64,
    /// 0 = Monday … 6 = Sunday, in the display timezone.
    pub watched_weekday: u8,
    /// 1–12, in the display timezone.
    pub watched_month: u32,
    /// 0–23, in the display timezone.
    pub watched_hour: u32,
    /// Title text before the first colon.
    pub show_title: String,
    pub percent_watched: f64,
    pub content_type: ContentType,
}

/// One row of `BillingHistory.csv`; other columns are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BillingRecord {
    #[serde(rename = "Pmt Status")]
    pub payment_status: String,
    #[serde(rename = "Final Invoice Result")]
    pub final_invoice_result: String,
    /// Empty for rows that were never charged.
    #[serde(rename = "Gross Sale Amt", default)]
    pub gross_sale_amount: Option<f64>,
}

/// An entry of the static country-code lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCode {
    pub country_name: String,
    pub iso_2: String,
    pub iso_3: String,
    pub un_code: String,
}

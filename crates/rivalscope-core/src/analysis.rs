//! The competitive-research report returned to the dashboard.
//!
//! A [`CompetitorAnalysis`] holds the JSON object the model produced and
//! serializes it back out unchanged, including fields outside the known
//! schema and values in shapes the schema does not expect. Typed views
//! ([`Competitor`], [`Launch`], the section types) are decoded on read.
//!
//! Every collection in the report is optional: the language model that writes
//! it is not schema-constrained, so consumers must treat an absent array the
//! same as an empty one. The accessors on [`CompetitorAnalysis`] do that, and
//! [`CompetitorAnalysis::with_defaults`] backfills a copy for consumers that
//! need a guaranteed shape.
//!
//! Typed decoding is lenient where models are known to drift: metric fields
//! accept `"12,400"` or `"1.2M"` as well as numbers, string lists accept a bare
//! string, and `null` is accepted anywhere.

use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Placeholder shown for a section the report does not contain.
pub const NOT_AVAILABLE: &str = "Not available";

const PRICING_UNAVAILABLE: &str = "Pricing information not available.";
const SOCIAL_UNAVAILABLE: &str = "Social media information not available.";
const PARTNERSHIPS_UNAVAILABLE: &str = "Partnership information not available.";
const OFFERINGS_UNAVAILABLE: &str = "Offering information not available.";

const TIMEOUT_SUMMARY: &str = "Analysis was started but couldn't be completed within the time limit. Try again with a simpler website.";
const TIMEOUT_ERROR: &str = "Analysis timed out";

const WEBSITE_URL: &str = "websiteUrl";
const SUMMARY: &str = "summary";
const COMPETITORS: &str = "competitors";
const PRICING: &str = "pricing";
const SOCIAL_MEDIA: &str = "socialMedia";
const PARTNERSHIPS: &str = "partnerships";
const OFFERINGS: &str = "offerings";
const RECENT_LAUNCHES: &str = "recentLaunches";
const IS_PARTIAL_RESULT: &str = "isPartialResult";
const ERROR: &str = "error";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitorAnalysis {
    doc: Map<String, Value>,
}

impl From<Map<String, Value>> for CompetitorAnalysis {
    fn from(doc: Map<String, Value>) -> Self {
        Self { doc }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub strengths: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub weaknesses: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub important_urls: Option<Vec<ImportantUrl>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportantUrl {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingAnalysis {
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::items")]
    pub competitors: Option<Vec<CompetitorPricing>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorPricing {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::items")]
    pub plans: Option<Vec<PricingPlan>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub price: String,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub features: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMediaAnalysis {
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::object")]
    pub main_company: Option<SocialProfile>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub competitor_profiles: Option<Vec<SocialProfile>>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub platform_comparisons: Option<Vec<PlatformComparison>>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub insights: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialProfile {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::items")]
    pub platforms: Option<Vec<SocialPlatform>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialPlatform {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub followers: Option<Number>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub engagement: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub post_frequency: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub strategy: Option<String>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub top_posts: Option<Vec<TopPost>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPost {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub engagement: Option<Number>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformComparison {
    #[serde(default, deserialize_with = "lenient::string")]
    pub platform: String,
    #[serde(default, deserialize_with = "lenient::items")]
    pub companies: Option<Vec<PlatformCompany>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformCompany {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub followers: Option<Number>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub engagement: Option<Number>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub post_frequency: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub strengths: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub weaknesses: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnershipAnalysis {
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::items")]
    pub partnerships: Option<Vec<Partnership>>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub recommendations: Option<Vec<PartnerRecommendation>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partnership {
    #[serde(default, deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub benefits: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRecommendation {
    #[serde(default, deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub website: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub rationale: String,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub potential_benefits: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferingsAnalysis {
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::items")]
    pub offerings: Option<Vec<Offering>>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub competitor_unique_offerings: Option<Vec<CompetitorOfferings>>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub trends: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub gaps: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offering {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub unique_selling_points: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub competitors: Option<Vec<OfferingComparison>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferingComparison {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub has_feature: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub offering_details: Option<OfferingDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferingDetails {
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub key_features: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub unique_aspects: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub limitations: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorOfferings {
    #[serde(default, deserialize_with = "lenient::string")]
    pub competitor: String,
    #[serde(default, deserialize_with = "lenient::items")]
    pub offerings: Option<Vec<UniqueOffering>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueOffering {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub key_features: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub target_audience: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Launch {
    #[serde(default, deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub launch_type: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub impact: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub target_audience: Option<String>,
}

impl CompetitorAnalysis {
    /// Deterministic report used when the model reply cannot be interpreted.
    ///
    /// Every section is present with empty collections, and `error` carries
    /// the reason so the dashboard can label the report.
    #[must_use]
    pub fn fallback(website_url: &str, reason: &str) -> Self {
        let mut doc = Self::default();
        doc.insert(WEBSITE_URL, Value::from(website_url));
        doc.insert(
            SUMMARY,
            Value::from(format!(
                "The analysis for {website_url} could not be interpreted: {reason}"
            )),
        );
        doc.insert(ERROR, Value::from(reason));
        doc.with_defaults()
    }

    /// Report recorded when a job runs past its deadline.
    ///
    /// `findings` is whatever the pipeline learned before the deadline fired
    /// (typically the page title and description).
    #[must_use]
    pub fn partial(website_url: &str, findings: Option<&str>) -> Self {
        let summary = match findings.map(str::trim).filter(|f| !f.is_empty()) {
            Some(findings) => format!("{TIMEOUT_SUMMARY} What was gathered so far: {findings}"),
            None => TIMEOUT_SUMMARY.to_string(),
        };
        let mut doc = Self::default();
        doc.insert(WEBSITE_URL, Value::from(website_url));
        doc.insert(SUMMARY, Value::from(summary));
        doc.insert(IS_PARTIAL_RESULT, Value::Bool(true));
        doc.insert(ERROR, Value::from(TIMEOUT_ERROR));
        doc
    }

    /// Returns a copy where every section and collection is present.
    ///
    /// Existing values are left alone, except that a section which is not an
    /// object is replaced and a lone record where a list belongs is wrapped.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        let doc = &mut self.doc;

        for competitor in records_mut(doc, COMPETITORS) {
            for key in ["strengths", "weaknesses", "importantUrls"] {
                ensure_list(competitor, key);
            }
        }

        fill_section(doc, PRICING, PRICING_UNAVAILABLE, |pricing| {
            for entry in records_mut(pricing, "competitors") {
                ensure_list(entry, "plans");
            }
        });

        fill_section(doc, SOCIAL_MEDIA, SOCIAL_UNAVAILABLE, |social| {
            if let Some(main) = social.get_mut("mainCompany").and_then(Value::as_object_mut) {
                ensure_list(main, "platforms");
            }
            for key in ["competitorProfiles", "platformComparisons", "insights"] {
                ensure_list(social, key);
            }
        });

        fill_section(doc, PARTNERSHIPS, PARTNERSHIPS_UNAVAILABLE, |partnerships| {
            for key in ["partnerships", "recommendations"] {
                ensure_list(partnerships, key);
            }
        });

        fill_section(doc, OFFERINGS, OFFERINGS_UNAVAILABLE, |offerings| {
            for key in ["offerings", "competitorUniqueOfferings", "trends", "gaps"] {
                ensure_list(offerings, key);
            }
        });

        ensure_list(doc, RECENT_LAUNCHES);
        self
    }

    /// The report as the JSON object that goes over the wire.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.doc
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.doc
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.doc.get(key)
    }

    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        self.doc.insert(key.to_string(), value)
    }

    #[must_use]
    pub fn website_url(&self) -> &str {
        self.str_field(WEBSITE_URL).unwrap_or_default()
    }

    pub fn set_website_url(&mut self, url: &str) {
        self.insert(WEBSITE_URL, Value::from(url));
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        self.str_field(SUMMARY).unwrap_or_default()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.str_field(ERROR)
    }

    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.get(IS_PARTIAL_RESULT)
            .cloned()
            .and_then(lenient::flag_from)
            .unwrap_or(false)
    }

    #[must_use]
    pub fn competitors(&self) -> Vec<Competitor> {
        self.items(COMPETITORS)
    }

    #[must_use]
    pub fn recent_launches(&self) -> Vec<Launch> {
        self.items(RECENT_LAUNCHES)
    }

    #[must_use]
    pub fn pricing(&self) -> Option<PricingAnalysis> {
        self.section(PRICING)
    }

    #[must_use]
    pub fn social_media(&self) -> Option<SocialMediaAnalysis> {
        self.section(SOCIAL_MEDIA)
    }

    #[must_use]
    pub fn partnerships(&self) -> Option<PartnershipAnalysis> {
        self.section(PARTNERSHIPS)
    }

    #[must_use]
    pub fn offerings(&self) -> Option<OfferingsAnalysis> {
        self.section(OFFERINGS)
    }

    #[must_use]
    pub fn pricing_summary(&self) -> &str {
        self.section_summary(PRICING)
    }

    #[must_use]
    pub fn social_media_summary(&self) -> &str {
        self.section_summary(SOCIAL_MEDIA)
    }

    #[must_use]
    pub fn partnerships_summary(&self) -> &str {
        self.section_summary(PARTNERSHIPS)
    }

    #[must_use]
    pub fn offerings_summary(&self) -> &str {
        self.section_summary(OFFERINGS)
    }

    /// Recent launches ordered by date, newest first. Launches whose date
    /// cannot be read keep their relative order at the end.
    #[must_use]
    pub fn launches_newest_first(&self) -> Vec<Launch> {
        let mut launches = self.recent_launches();
        launches.sort_by_cached_key(|launch| Reverse(parse_launch_date(&launch.date)));
        launches
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn items<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.get(key)
            .cloned()
            .and_then(lenient::items_from)
            .unwrap_or_default()
    }

    fn section<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key).cloned().and_then(lenient::object_from)
    }

    fn section_summary(&self, key: &str) -> &str {
        self.get(key)
            .and_then(|section| section.get(SUMMARY))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(NOT_AVAILABLE)
    }
}

/// Makes `obj[key]` a list: absent, `null` and scalars become `[]`, a lone
/// object becomes a one-element list.
fn ensure_list(obj: &mut Map<String, Value>, key: &str) {
    let slot = obj.entry(key.to_string()).or_insert(Value::Null);
    if slot.is_object() {
        let record = slot.take();
        *slot = Value::Array(vec![record]);
    } else if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
}

fn records_mut<'a>(
    obj: &'a mut Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a mut Map<String, Value>> {
    ensure_list(obj, key);
    obj.get_mut(key)
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}

/// Ensures `doc[key]` is an object with a summary, then hands it to `fill`.
fn fill_section(
    doc: &mut Map<String, Value>,
    key: &str,
    unavailable: &str,
    fill: impl FnOnce(&mut Map<String, Value>),
) {
    let mut section = match doc.remove(key) {
        Some(Value::Object(section)) => section,
        _ => Map::new(),
    };
    section
        .entry(SUMMARY.to_string())
        .or_insert_with(|| Value::from(unavailable));
    fill(&mut section);
    doc.insert(key.to_string(), Value::Object(section));
}

/// Reads the free-form date strings models put on launches.
///
/// Accepts RFC 3339 timestamps, ISO dates, `March 5, 2024`, `5 March 2024`,
/// `03/05/2024`, month-precision forms (`2024-03`, `March 2024`) and a bare
/// year. Month- and year-precision dates resolve to the first day.
#[must_use]
pub fn parse_launch_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.date_naive());
    }

    const DAY_FORMATS: [&str; 6] = [
        "%Y-%m-%d",
        "%B %d, %Y",
        "%b %d, %Y",
        "%d %B %Y",
        "%m/%d/%Y",
        "%Y/%m/%d",
    ];
    for fmt in DAY_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    const MONTH_FORMATS: [&str; 3] = ["%d %Y-%m", "%d %B %Y", "%d %b %Y"];
    let first_of_month = format!("1 {s}");
    for fmt in MONTH_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&first_of_month, fmt) {
            return Some(date);
        }
    }

    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }

    None
}

mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::{Number, Value};

    fn value_to_string(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            other => Some(other.to_string()),
        }
    }

    pub(super) fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(value_to_string(Value::deserialize(d)?).unwrap_or_default())
    }

    pub(super) fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(value_to_string(Value::deserialize(d)?))
    }

    pub(super) fn strings<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Vec<String>>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Null => None,
            Value::Array(items) => Some(items.into_iter().filter_map(value_to_string).collect()),
            Value::String(s) if s.trim().is_empty() => Some(Vec::new()),
            other => value_to_string(other).map(|s| vec![s]),
        })
    }

    /// Arrays of records. Elements that do not fit the record shape are
    /// skipped; a single object is read as a one-element list.
    pub(super) fn items_from<T: DeserializeOwned>(value: Value) -> Option<Vec<T>> {
        match value {
            Value::Array(values) => Some(
                values
                    .into_iter()
                    .filter_map(|v| serde_json::from_value(v).ok())
                    .collect(),
            ),
            value @ Value::Object(_) => serde_json::from_value(value).ok().map(|item| vec![item]),
            _ => None,
        }
    }

    pub(super) fn items<'de, D, T>(d: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(items_from(Value::deserialize(d)?))
    }

    /// Nested sections. Anything other than an object (`"N/A"`, `[]`) reads
    /// as absent.
    pub(super) fn object_from<T: DeserializeOwned>(value: Value) -> Option<T> {
        match value {
            value @ Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }

    pub(super) fn object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(object_from(Value::deserialize(d)?))
    }

    pub(super) fn flag_from(value: Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" => Some(true),
                "false" | "no" | "n" => Some(false),
                _ => None,
            },
            Value::Number(n) => n.as_f64().map(|v| v != 0.0),
            _ => None,
        }
    }

    pub(super) fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(flag_from(Value::deserialize(d)?))
    }

    pub(super) fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Number>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => Some(n),
            Value::String(s) => parse_scaled(&s).and_then(to_number),
            _ => None,
        })
    }

    /// Parses human-formatted counts such as `12,400`, `10K+`, `1.2M` or `3.5%`.
    pub(super) fn parse_scaled(raw: &str) -> Option<f64> {
        let cleaned: String = raw
            .trim()
            .trim_start_matches(['~', '+', '≈'])
            .trim_end_matches(['+', '%'])
            .chars()
            .filter(|c| !matches!(c, ',' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        let (digits, multiplier) = match cleaned.chars().last()? {
            'k' => (&cleaned[..cleaned.len() - 1], 1_000.0),
            'm' => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
            'b' => (&cleaned[..cleaned.len() - 1], 1_000_000_000.0),
            _ => (cleaned.as_str(), 1.0),
        };

        let value = digits.parse::<f64>().ok()? * multiplier;
        value.is_finite().then_some(value)
    }

    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn to_number(value: f64) -> Option<Number> {
        if value.fract() == 0.0 && value.abs() < 9.0e15 {
            Some(Number::from(value as i64))
        } else {
            Number::from_f64(value)
        }
    }
}

//! Site queue records
//!
//! A site is a crawl target fed to the scraping pipeline. Priority and
//! status are closed enums stored as lowercase text.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sort::{Sort, SortKey};
use super::validation::{optional_text, required_text};
use super::{Pagination, ValidationError};

const MAX_NAME_LEN: usize = 256;
const MAX_URL_LEN: usize = 2048;
const MAX_DESCRIPTION_LEN: usize = 4096;
const MAX_CATEGORY_LEN: usize = 128;
const MAX_TAG_LEN: usize = 64;

/// Scraping priority tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SitePriority {
    High,
    #[default]
    Medium,
    Low,
}

impl SitePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Numeric weight, higher is more urgent.
    pub fn rank(&self) -> i16 {
        match self {
            Self::High => 2,
            Self::Medium => 1,
            Self::Low => 0,
        }
    }
}

impl FromStr for SitePriority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ValidationError::InvalidVariant {
                field: "priority",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for SitePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Queue status of a site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    #[default]
    Pending,
    Active,
    Paused,
    Completed,
}

impl SiteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    /// Legal transitions when the queue runs with strict transitions.
    ///
    /// Staying in the same status is always allowed.
    pub fn can_transition_to(&self, next: SiteStatus) -> bool {
        use SiteStatus::*;
        *self == next
            || matches!(
                (self, next),
                (Pending, Active) | (Active, Paused) | (Active, Completed) | (Paused, Active)
            )
    }
}

impl FromStr for SiteStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            _ => Err(ValidationError::InvalidVariant {
                field: "status",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated site name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteName(String);

impl SiteName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        required_text("name", s, MAX_NAME_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated absolute http(s) URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrl(String);

impl SiteUrl {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let raw = required_text("url", s, MAX_URL_LEN)?;
        let parsed = url::Url::parse(&raw).map_err(|_| ValidationError::InvalidFormat {
            field: "url",
            reason: "must be an absolute URL",
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidFormat {
                field: "url",
                reason: "scheme must be http or https",
            });
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stored site record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub priority: SitePriority,
    pub status: SiteStatus,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

/// Validated input for a new site; status always starts as pending.
#[derive(Debug, Clone)]
pub struct NewSite {
    pub name: SiteName,
    pub url: SiteUrl,
    pub priority: SitePriority,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

/// Partial update; `None` leaves the stored value untouched.
///
/// The optional text fields nest: `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct SitePatch {
    pub name: Option<SiteName>,
    pub url: Option<SiteUrl>,
    pub priority: Option<SitePriority>,
    pub status: Option<SiteStatus>,
    pub description: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    /// Only apply the patch if the stored status still equals this value.
    pub expected_status: Option<SiteStatus>,
}

impl SitePatch {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.url.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.tags.is_none()
    }

    /// Apply the supplied fields to `site` and bump `last_updated_at`.
    pub fn apply_to(&self, site: &mut Site, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            site.name = name.as_str().to_owned();
        }
        if let Some(url) = &self.url {
            site.url = url.as_str().to_owned();
        }
        if let Some(priority) = self.priority {
            site.priority = priority;
        }
        if let Some(status) = self.status {
            site.status = status;
        }
        if let Some(description) = &self.description {
            site.description = description.clone();
        }
        if let Some(category) = &self.category {
            site.category = category.clone();
        }
        if let Some(tags) = &self.tags {
            site.tags = tags.clone();
        }
        site.last_updated_at = now;
    }
}

/// Listing filter; every supplied field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteFilter {
    pub status: Option<SiteStatus>,
    pub priority: Option<SitePriority>,
    pub category: Option<String>,
}

impl SiteFilter {
    pub fn matches(&self, site: &Site) -> bool {
        self.status.map_or(true, |s| site.status == s)
            && self.priority.map_or(true, |p| site.priority == p)
            && self
                .category
                .as_deref()
                .map_or(true, |c| site.category.as_deref() == Some(c))
    }
}

/// Sort keys accepted by `GET /api/sites`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SiteSortKey {
    #[default]
    CreatedAt,
    LastUpdatedAt,
    Name,
    Priority,
    Status,
}

impl SortKey for SiteSortKey {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "created_at" => Some(Self::CreatedAt),
            "last_updated_at" | "updated_at" => Some(Self::LastUpdatedAt),
            "name" => Some(Self::Name),
            "priority" => Some(Self::Priority),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    fn default_descending(self) -> bool {
        matches!(self, Self::CreatedAt | Self::LastUpdatedAt | Self::Priority)
    }
}

impl Sort<SiteSortKey> {
    /// Total order over sites; ties fall back to the id so pages stay stable.
    pub fn compare(&self, a: &Site, b: &Site) -> Ordering {
        let primary = match self.key {
            SiteSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SiteSortKey::LastUpdatedAt => a.last_updated_at.cmp(&b.last_updated_at),
            SiteSortKey::Name => a.name.cmp(&b.name),
            SiteSortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
            SiteSortKey::Status => a.status.as_str().cmp(b.status.as_str()),
        };
        self.orient(primary).then_with(|| a.id.cmp(&b.id))
    }
}

/// Reduced projection consumed by the n8n automation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct N8nSite {
    pub id: Uuid,
    pub link: String,
    pub category_id: Option<String>,
}

impl From<&Site> for N8nSite {
    fn from(site: &Site) -> Self {
        Self {
            id: site.id,
            link: site.url.clone(),
            category_id: site.category.clone(),
        }
    }
}

/// `POST /api/sites` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSiteRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    pub priority: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateSiteRequest {
    pub fn validate(&self) -> Result<NewSite, ValidationError> {
        Ok(NewSite {
            name: SiteName::new(&self.name)?,
            url: SiteUrl::new(&self.url)?,
            priority: self
                .priority
                .as_deref()
                .map(str::parse)
                .transpose()?
                .unwrap_or_default(),
            description: optional_text("description", self.description.as_deref(), MAX_DESCRIPTION_LEN)?,
            category: optional_text("category", self.category.as_deref(), MAX_CATEGORY_LEN)?,
            tags: normalize_tags(&self.tags)?,
        })
    }
}

/// `PUT /api/sites/{id}` body
///
/// Absent or `null` fields are left alone. A blank `description` or
/// `category` clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSiteRequest {
    pub name: Option<String>,
    pub url: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateSiteRequest {
    pub fn validate(&self) -> Result<SitePatch, ValidationError> {
        Ok(SitePatch {
            name: self.name.as_deref().map(SiteName::new).transpose()?,
            url: self.url.as_deref().map(SiteUrl::new).transpose()?,
            priority: self.priority.as_deref().map(str::parse).transpose()?,
            status: self.status.as_deref().map(str::parse).transpose()?,
            description: self
                .description
                .as_deref()
                .map(|d| optional_text("description", Some(d), MAX_DESCRIPTION_LEN))
                .transpose()?,
            category: self
                .category
                .as_deref()
                .map(|c| optional_text("category", Some(c), MAX_CATEGORY_LEN))
                .transpose()?,
            tags: self.tags.as_deref().map(normalize_tags).transpose()?,
            expected_status: None,
        })
    }
}

/// `GET /api/sites` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteListParams {
    pub skip: Option<u64>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub sort_by: Option<String>,
    pub sort_desc: Option<bool>,
}

impl SiteListParams {
    pub fn filter(&self) -> Result<SiteFilter, ValidationError> {
        Ok(SiteFilter {
            status: non_blank(self.status.as_deref()).map(str::parse).transpose()?,
            priority: non_blank(self.priority.as_deref()).map(str::parse).transpose()?,
            category: non_blank(self.category.as_deref()).map(str::to_owned),
        })
    }

    pub fn sort(&self) -> Result<Sort<SiteSortKey>, ValidationError> {
        Sort::from_params(self.sort_by.as_deref(), self.sort_desc)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.skip.unwrap_or(0), self.limit.unwrap_or(super::pagination::DEFAULT_LIMIT))
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Trim tags, drop blanks and duplicates, keep first-seen order.
fn normalize_tags(tags: &[String]) -> Result<Vec<String>, ValidationError> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || out.iter().any(|t| t == tag) {
            continue;
        }
        if tag.len() > MAX_TAG_LEN {
            return Err(ValidationError::TooLong {
                field: "tags",
                max: MAX_TAG_LEN,
            });
        }
        out.push(tag.to_owned());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(name: &str, priority: SitePriority) -> Site {
        let now = Utc::now();
        Site {
            id: Uuid::new_v4(),
            name: name.into(),
            url: "https://example.com".into(),
            priority,
            status: SiteStatus::Pending,
            description: None,
            category: Some("ai".into()),
            tags: vec![],
            created_at: now,
            last_updated_at: now,
        }
    }

    #[test]
    fn parses_enums_case_insensitively() {
        assert_eq!("HIGH".parse::<SitePriority>().unwrap(), SitePriority::High);
        assert_eq!(" paused ".parse::<SiteStatus>().unwrap(), SiteStatus::Paused);
        assert!(matches!(
            "urgent".parse::<SitePriority>(),
            Err(ValidationError::InvalidVariant { field: "priority", .. })
        ));
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&SiteStatus::Completed).unwrap(), "\"completed\"");
        assert_eq!(serde_json::to_string(&SitePriority::High).unwrap(), "\"high\"");
    }

    #[test]
    fn strict_transitions() {
        use SiteStatus::*;
        assert!(Pending.can_transition_to(Active));
        assert!(Active.can_transition_to(Paused));
        assert!(Active.can_transition_to(Completed));
        assert!(Paused.can_transition_to(Active));
        assert!(Paused.can_transition_to(Paused));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Active));
        assert!(!Paused.can_transition_to(Completed));
    }

    #[test]
    fn url_validation() {
        assert!(SiteUrl::new("https://example.com").is_ok());
        assert!(matches!(SiteUrl::new(""), Err(ValidationError::Empty { field: "url" })));
        assert!(matches!(
            SiteUrl::new("example.com"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            SiteUrl::new("ftp://example.com"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn create_request_defaults_priority() {
        let req = CreateSiteRequest {
            name: "Example".into(),
            url: "https://example.com".into(),
            tags: vec![" ai ".into(), "ai".into(), "".into(), "search".into()],
            ..Default::default()
        };
        let new = req.validate().unwrap();
        assert_eq!(new.priority, SitePriority::Medium);
        assert_eq!(new.tags, vec!["ai", "search"]);
    }

    #[test]
    fn create_request_rejects_blank_name() {
        let req = CreateSiteRequest {
            name: "   ".into(),
            url: "https://example.com".into(),
            ..Default::default()
        };
        assert_eq!(req.validate().unwrap_err(), ValidationError::Empty { field: "name" });
    }

    #[test]
    fn patch_applies_only_supplied_fields() {
        let mut s = site("Before", SitePriority::Low);
        let created = s.created_at;
        let patch = UpdateSiteRequest {
            status: Some("active".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();

        patch.apply_to(&mut s, created + chrono::Duration::seconds(5));
        assert_eq!(s.name, "Before");
        assert_eq!(s.priority, SitePriority::Low);
        assert_eq!(s.status, SiteStatus::Active);
        assert!(s.last_updated_at > created);
    }

    #[test]
    fn blank_text_clears_but_absent_keeps() {
        let mut s = site("a", SitePriority::High);
        s.description = Some("old".into());

        let keep = UpdateSiteRequest::default().validate().unwrap();
        assert!(keep.category.is_none());
        keep.apply_to(&mut s, Utc::now());
        assert_eq!(s.category.as_deref(), Some("ai"));

        let clear = UpdateSiteRequest {
            description: Some("  ".into()),
            category: Some(String::new()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(clear.category, Some(None));
        assert!(!clear.is_empty());
        clear.apply_to(&mut s, Utc::now());
        assert_eq!(s.description, None);
        assert_eq!(s.category, None);
    }

    #[test]
    fn filter_requires_all_fields() {
        let s = site("a", SitePriority::High);
        let filter = SiteFilter {
            priority: Some(SitePriority::High),
            category: Some("ai".into()),
            ..Default::default()
        };
        assert!(filter.matches(&s));

        let filter = SiteFilter {
            priority: Some(SitePriority::High),
            status: Some(SiteStatus::Active),
            ..Default::default()
        };
        assert!(!filter.matches(&s));
    }

    #[test]
    fn priority_sort_descending_puts_high_first() {
        let low = site("low", SitePriority::Low);
        let high = site("high", SitePriority::High);
        let sort = Sort::new(SiteSortKey::Priority, true);
        assert_eq!(sort.compare(&high, &low), Ordering::Less);
    }

    #[test]
    fn list_params_blank_filters_are_ignored() {
        let params = SiteListParams {
            status: Some("".into()),
            priority: Some("high".into()),
            ..Default::default()
        };
        let filter = params.filter().unwrap();
        assert_eq!(filter.status, None);
        assert_eq!(filter.priority, Some(SitePriority::High));
    }
}

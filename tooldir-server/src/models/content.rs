//! Blog articles and glossary terms
//!
//! Both are document-shaped: typed known fields plus an `extra` map that
//! carries whatever else the editors stored. Articles reference terms by
//! id and terms keep the reverse list; neither is a foreign key.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::sort::{Sort, SortKey};
use super::{Pagination, ValidationError};

/// Blog article document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub glossary_term_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Article {
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            slug: slug.into(),
            summary: None,
            content: None,
            glossary_term_ids: Vec::new(),
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        }
    }
}

/// Glossary term document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub definitions: Vec<String>,
    #[serde(default)]
    pub related_article_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GlossaryTerm {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: slug.into(),
            definitions: Vec::new(),
            related_article_ids: Vec::new(),
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        }
    }
}

/// Article with its glossary terms resolved
#[derive(Debug, Clone, Serialize)]
pub struct ArticleWithTerms {
    #[serde(flatten)]
    pub article: Article,
    pub glossary_terms: Vec<GlossaryTerm>,
}

/// Glossary term with its related articles resolved
#[derive(Debug, Clone, Serialize)]
pub struct TermWithArticles {
    #[serde(flatten)]
    pub term: GlossaryTerm,
    pub related_articles: Vec<Article>,
}

/// Ids added and removed between two reference lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdDiff {
    pub added: Vec<Uuid>,
    pub removed: Vec<Uuid>,
}

impl IdDiff {
    pub fn between(old: &[Uuid], new: &[Uuid]) -> Self {
        let old_set: HashSet<&Uuid> = old.iter().collect();
        let new_set: HashSet<&Uuid> = new.iter().collect();

        Self {
            added: dedup_ids(new.iter().filter(|id| !old_set.contains(id)).copied()),
            removed: dedup_ids(old.iter().filter(|id| !new_set.contains(id)).copied()),
        }
    }
}

/// Drop duplicate ids, keeping first-seen order.
pub fn dedup_ids(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Sort keys accepted by article listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArticleSortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl SortKey for ArticleSortKey {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "created_at" => Some(Self::CreatedAt),
            "updated_at" => Some(Self::UpdatedAt),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    fn default_descending(self) -> bool {
        !matches!(self, Self::Title)
    }
}

impl Sort<ArticleSortKey> {
    pub fn compare(&self, a: &Article, b: &Article) -> std::cmp::Ordering {
        let primary = match self.key {
            ArticleSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            ArticleSortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            ArticleSortKey::Title => a.title.cmp(&b.title),
        };
        self.orient(primary).then_with(|| a.id.cmp(&b.id))
    }
}

/// Sort keys accepted by glossary listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TermSortKey {
    #[default]
    Name,
    CreatedAt,
}

impl SortKey for TermSortKey {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Self::Name),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    fn default_descending(self) -> bool {
        matches!(self, Self::CreatedAt)
    }
}

impl Sort<TermSortKey> {
    pub fn compare(&self, a: &GlossaryTerm, b: &GlossaryTerm) -> std::cmp::Ordering {
        let primary = match self.key {
            TermSortKey::Name => a.name.cmp(&b.name),
            TermSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        self.orient(primary).then_with(|| a.id.cmp(&b.id))
    }
}

/// Listing query shared by the blog endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub skip: Option<u64>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_desc: Option<bool>,
}

impl ListParams {
    pub fn sort<K: SortKey>(&self) -> Result<Sort<K>, ValidationError> {
        Sort::from_params(self.sort_by.as_deref(), self.sort_desc)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(
            self.skip.unwrap_or(0),
            self.limit.unwrap_or(super::pagination::DEFAULT_LIMIT),
        )
    }
}

/// `PUT /api/blog/articles/{id}/glossary-terms` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArticleTermsRequest {
    #[serde(default)]
    pub glossary_term_ids: Vec<String>,
}

impl UpdateArticleTermsRequest {
    /// Parse ids, dropping duplicates.
    pub fn term_ids(&self) -> Result<Vec<Uuid>, ValidationError> {
        let parsed = self
            .glossary_term_ids
            .iter()
            .map(|s| {
                Uuid::parse_str(s.trim()).map_err(|_| ValidationError::InvalidFormat {
                    field: "glossary_term_ids",
                    reason: "every id must be a UUID",
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dedup_ids(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_reports_added_and_removed() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        let diff = IdDiff::between(&[a, b], &[b, c]);
        assert_eq!(diff.added, vec![c]);
        assert_eq!(diff.removed, vec![a]);

        assert_eq!(IdDiff::between(&[a, b], &[b, a]), IdDiff::default());
    }

    #[test]
    fn dedup_keeps_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(dedup_ids([b, a, b, a]), vec![b, a]);
    }

    #[test]
    fn term_ids_reject_garbage() {
        let req = UpdateArticleTermsRequest {
            glossary_term_ids: vec!["not-a-uuid".into()],
        };
        assert!(matches!(
            req.term_ids(),
            Err(ValidationError::InvalidFormat { field: "glossary_term_ids", .. })
        ));
    }

    #[test]
    fn article_with_terms_flattens() {
        let mut article = Article::new("Intro to RAG", "intro-to-rag");
        article.extra.insert("author".into(), Value::from("editor"));
        let view = ArticleWithTerms {
            article,
            glossary_terms: vec![GlossaryTerm::new("Embedding", "embedding")],
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["title"], "Intro to RAG");
        assert_eq!(json["author"], "editor");
        assert_eq!(json["glossary_terms"][0]["slug"], "embedding");
    }
}

//! Blog articles and glossary terms
//!
//! Read paths resolve cross references with one batch lookup per request.
//! References to documents that no longer exist are skipped, not reported.

use std::sync::Arc;

use uuid::Uuid;

use crate::db::ContentStore;
use crate::error::{Error, Result};
use crate::models::{
    Article, ArticleSortKey, ArticleWithTerms, GlossaryTerm, Paginated, Pagination, Sort,
    TermSortKey, TermWithArticles,
};

#[derive(Clone)]
pub struct BlogService {
    content: Arc<dyn ContentStore>,
}

impl BlogService {
    pub fn new(content: Arc<dyn ContentStore>) -> Self {
        Self { content }
    }

    pub async fn list_articles(
        &self,
        sort: Sort<ArticleSortKey>,
        page: Pagination,
    ) -> Result<Paginated<Article>> {
        Ok(self.content.list_articles(sort, page).await?)
    }

    pub async fn get_article(&self, id: Uuid) -> Result<ArticleWithTerms> {
        let article = self.content.get_article(id).await?;
        self.with_terms(article).await
    }

    pub async fn get_article_by_slug(&self, slug: &str) -> Result<ArticleWithTerms> {
        let article = self.content.get_article_by_slug(slug).await?;
        self.with_terms(article).await
    }

    /// Articles referencing `term_id`. The term itself must exist.
    pub async fn articles_for_term(
        &self,
        term_id: Uuid,
        sort: Sort<ArticleSortKey>,
        page: Pagination,
    ) -> Result<Paginated<Article>> {
        self.content.get_term(term_id).await?;
        Ok(self.content.articles_for_term(term_id, sort, page).await?)
    }

    pub async fn list_terms(
        &self,
        sort: Sort<TermSortKey>,
        page: Pagination,
    ) -> Result<Paginated<GlossaryTerm>> {
        Ok(self.content.list_terms(sort, page).await?)
    }

    pub async fn get_term(&self, id: Uuid) -> Result<TermWithArticles> {
        let term = self.content.get_term(id).await?;
        let related_articles = self.content.articles_by_ids(&term.related_article_ids).await?;
        Ok(TermWithArticles {
            term,
            related_articles,
        })
    }

    /// Replace an article's glossary terms and patch the reverse links.
    ///
    /// `term_ids` must already be deduplicated. Every id has to name an
    /// existing term; the first missing one aborts with `NotFound`.
    pub async fn update_article_terms(
        &self,
        article_id: Uuid,
        term_ids: &[Uuid],
    ) -> Result<ArticleWithTerms> {
        self.content.get_article(article_id).await?;

        let found = self.content.terms_by_ids(term_ids).await?;
        if let Some(missing) = term_ids
            .iter()
            .find(|id| !found.iter().any(|t| t.id == **id))
        {
            return Err(Error::not_found("glossary term", missing));
        }

        let article = self.content.relink_article(article_id, term_ids).await?;
        tracing::info!(
            article = %article_id,
            terms = term_ids.len(),
            "article glossary terms updated"
        );

        Ok(ArticleWithTerms {
            article,
            glossary_terms: found,
        })
    }

    async fn with_terms(&self, article: Article) -> Result<ArticleWithTerms> {
        let glossary_terms = self.content.terms_by_ids(&article.glossary_term_ids).await?;
        Ok(ArticleWithTerms {
            article,
            glossary_terms,
        })
    }
}

//! Schema setup
//!
//! Idempotent `CREATE ... IF NOT EXISTS` statements, run at startup and by
//! `tooldir migrate`.

use sqlx::PgPool;

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS sites (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL CHECK (name <> ''),
        url TEXT NOT NULL CHECK (url <> ''),
        priority TEXT NOT NULL DEFAULT 'medium'
            CHECK (priority IN ('high', 'medium', 'low')),
        status TEXT NOT NULL DEFAULT 'pending'
            CHECK (status IN ('pending', 'active', 'paused', 'completed')),
        description TEXT,
        category TEXT,
        tags TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        last_updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tools (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        unique_id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        description TEXT,
        link TEXT,
        category TEXT,
        tags TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        extra JSONB NOT NULL DEFAULT '{}'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS favorites (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id TEXT NOT NULL,
        tool_unique_id TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (user_id, tool_unique_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS shares (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id TEXT NOT NULL,
        tool_unique_id TEXT NOT NULL,
        share_id TEXT NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS blog_articles (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        title TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        summary TEXT,
        content TEXT,
        glossary_term_ids UUID[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        extra JSONB NOT NULL DEFAULT '{}'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS glossary_terms (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        definitions TEXT[] NOT NULL DEFAULT '{}',
        related_article_ids UUID[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        extra JSONB NOT NULL DEFAULT '{}'
    )
    "#,
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_sites_status ON sites(status)",
    "CREATE INDEX IF NOT EXISTS idx_sites_priority ON sites(priority)",
    "CREATE INDEX IF NOT EXISTS idx_sites_category ON sites(category)",
    "CREATE INDEX IF NOT EXISTS idx_sites_created ON sites(created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_favorites_user ON favorites(user_id, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_shares_user ON shares(user_id, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_articles_terms ON blog_articles USING GIN (glossary_term_ids)",
];

/// Create every table and index.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running schema migrations...");

    for statement in TABLES.iter().chain(INDEXES) {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!(
        tables = TABLES.len(),
        indexes = INDEXES.len(),
        "Schema migrations complete"
    );
    Ok(())
}

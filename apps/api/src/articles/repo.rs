//! Article persistence. Every query is scoped to a tenant.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::article::{ArticleRow, ArticleStatus};
use crate::routes::params::Page;

/// Filters for the public listing. Category and tag are already resolved to IDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct PublishedFilter {
    pub category_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
}

pub async fn get(pool: &PgPool, tenant_id: Uuid, id: Uuid) -> sqlx::Result<Option<ArticleRow>> {
    sqlx::query_as::<_, ArticleRow>("SELECT * FROM articles WHERE id = $1 AND tenant_id = $2")
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
}

pub async fn list(
    pool: &PgPool,
    tenant_id: Uuid,
    status: Option<ArticleStatus>,
    page: Page,
) -> sqlx::Result<(Vec<ArticleRow>, i64)> {
    let status = status.map(ArticleStatus::as_str);

    let rows = sqlx::query_as::<_, ArticleRow>(
        r#"
        SELECT * FROM articles
        WHERE tenant_id = $1 AND ($2::text IS NULL OR status = $2)
        ORDER BY updated_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(tenant_id)
    .bind(status)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM articles WHERE tenant_id = $1 AND ($2::text IS NULL OR status = $2)",
    )
    .bind(tenant_id)
    .bind(status)
    .fetch_one(pool)
    .await?;

    Ok((rows, total))
}

pub async fn insert(pool: &PgPool, a: &ArticleRow) -> sqlx::Result<ArticleRow> {
    sqlx::query_as::<_, ArticleRow>(
        r#"
        INSERT INTO articles
            (id, tenant_id, slug, status, title, excerpt, content, meta_title,
             meta_description, toc, featured_image_url, category_ids, tag_ids, writer_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(a.id)
    .bind(a.tenant_id)
    .bind(&a.slug)
    .bind(&a.status)
    .bind(&a.title)
    .bind(&a.excerpt)
    .bind(&a.content)
    .bind(&a.meta_title)
    .bind(&a.meta_description)
    .bind(&a.toc)
    .bind(&a.featured_image_url)
    .bind(&a.category_ids)
    .bind(&a.tag_ids)
    .bind(a.writer_id)
    .fetch_one(pool)
    .await
}

/// Writes every editable column plus status and publish time.
pub async fn update(pool: &PgPool, a: &ArticleRow) -> sqlx::Result<ArticleRow> {
    sqlx::query_as::<_, ArticleRow>(
        r#"
        UPDATE articles SET
            slug = $3, status = $4, title = $5, excerpt = $6, content = $7,
            meta_title = $8, meta_description = $9, toc = $10,
            featured_image_url = $11, category_ids = $12, tag_ids = $13,
            writer_id = $14, published_at = $15, updated_at = now()
        WHERE id = $1 AND tenant_id = $2
        RETURNING *
        "#,
    )
    .bind(a.id)
    .bind(a.tenant_id)
    .bind(&a.slug)
    .bind(&a.status)
    .bind(&a.title)
    .bind(&a.excerpt)
    .bind(&a.content)
    .bind(&a.meta_title)
    .bind(&a.meta_description)
    .bind(&a.toc)
    .bind(&a.featured_image_url)
    .bind(&a.category_ids)
    .bind(&a.tag_ids)
    .bind(a.writer_id)
    .bind(a.published_at)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, tenant_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM articles WHERE id = $1 AND tenant_id = $2")
        .bind(id)
        .bind(tenant_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn get_published_by_slug(
    pool: &PgPool,
    tenant_id: Uuid,
    slug: &str,
) -> sqlx::Result<Option<ArticleRow>> {
    sqlx::query_as::<_, ArticleRow>(
        "SELECT * FROM articles WHERE tenant_id = $1 AND slug = $2 AND status = 'published'",
    )
    .bind(tenant_id)
    .bind(slug)
    .fetch_optional(pool)
    .await
}

pub async fn list_published(
    pool: &PgPool,
    tenant_id: Uuid,
    filter: PublishedFilter,
    page: Page,
) -> sqlx::Result<(Vec<ArticleRow>, i64)> {
    let rows = sqlx::query_as::<_, ArticleRow>(
        r#"
        SELECT * FROM articles
        WHERE tenant_id = $1 AND status = 'published'
          AND ($2::uuid IS NULL OR $2 = ANY(category_ids))
          AND ($3::uuid IS NULL OR $3 = ANY(tag_ids))
        ORDER BY published_at DESC NULLS LAST
        LIMIT $4 OFFSET $5
        "#,
    )
    .bind(tenant_id)
    .bind(filter.category_id)
    .bind(filter.tag_id)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM articles
        WHERE tenant_id = $1 AND status = 'published'
          AND ($2::uuid IS NULL OR $2 = ANY(category_ids))
          AND ($3::uuid IS NULL OR $3 = ANY(tag_ids))
        "#,
    )
    .bind(tenant_id)
    .bind(filter.category_id)
    .bind(filter.tag_id)
    .fetch_one(pool)
    .await?;

    Ok((rows, total))
}

/// Every published article of a tenant, for reindexing.
pub async fn all_published(pool: &PgPool, tenant_id: Uuid) -> sqlx::Result<Vec<ArticleRow>> {
    sqlx::query_as::<_, ArticleRow>(
        "SELECT * FROM articles WHERE tenant_id = $1 AND status = 'published' ORDER BY published_at",
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await
}

pub async fn popular(pool: &PgPool, tenant_id: Uuid, limit: i64) -> sqlx::Result<Vec<ArticleRow>> {
    sqlx::query_as::<_, ArticleRow>(
        r#"
        SELECT * FROM articles
        WHERE tenant_id = $1 AND status = 'published'
        ORDER BY view_count DESC, published_at DESC
        LIMIT $2
        "#,
    )
    .bind(tenant_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Published articles sharing at least one category, newest first.
pub async fn related(
    pool: &PgPool,
    article: &ArticleRow,
    limit: i64,
) -> sqlx::Result<Vec<ArticleRow>> {
    if article.category_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, ArticleRow>(
        r#"
        SELECT * FROM articles
        WHERE tenant_id = $1 AND status = 'published' AND id <> $2
          AND category_ids && $3
        ORDER BY published_at DESC
        LIMIT $4
        "#,
    )
    .bind(article.tenant_id)
    .bind(article.id)
    .bind(&article.category_ids)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn increment_views(pool: &PgPool, id: Uuid) -> sqlx::Result<()> {
    sqlx::query("UPDATE articles SET view_count = view_count + 1 WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Drops a deleted category from every article that referenced it.
/// Published articles referencing a category; their search records carry its name.
pub async fn published_with_category(
    pool: &PgPool,
    tenant_id: Uuid,
    category_id: Uuid,
) -> sqlx::Result<Vec<ArticleRow>> {
    sqlx::query_as::<_, ArticleRow>(
        r#"
        SELECT * FROM articles
        WHERE tenant_id = $1 AND status = 'published' AND $2 = ANY(category_ids)
        "#,
    )
    .bind(tenant_id)
    .bind(category_id)
    .fetch_all(pool)
    .await
}

pub async fn published_with_tag(
    pool: &PgPool,
    tenant_id: Uuid,
    tag_id: Uuid,
) -> sqlx::Result<Vec<ArticleRow>> {
    sqlx::query_as::<_, ArticleRow>(
        r#"
        SELECT * FROM articles
        WHERE tenant_id = $1 AND status = 'published' AND $2 = ANY(tag_ids)
        "#,
    )
    .bind(tenant_id)
    .bind(tag_id)
    .fetch_all(pool)
    .await
}

/// Drops a deleted category from every article. Returns the updated articles.
pub async fn remove_category_ref(
    pool: &PgPool,
    tenant_id: Uuid,
    category_id: Uuid,
) -> sqlx::Result<Vec<ArticleRow>> {
    sqlx::query_as::<_, ArticleRow>(
        r#"
        UPDATE articles SET category_ids = array_remove(category_ids, $2)
        WHERE tenant_id = $1 AND $2 = ANY(category_ids)
        RETURNING *
        "#,
    )
    .bind(tenant_id)
    .bind(category_id)
    .fetch_all(pool)
    .await
}

/// Drops a deleted tag from every article. Returns the updated articles.
pub async fn remove_tag_ref(
    pool: &PgPool,
    tenant_id: Uuid,
    tag_id: Uuid,
) -> sqlx::Result<Vec<ArticleRow>> {
    sqlx::query_as::<_, ArticleRow>(
        r#"
        UPDATE articles SET tag_ids = array_remove(tag_ids, $2)
        WHERE tenant_id = $1 AND $2 = ANY(tag_ids)
        RETURNING *
        "#,
    )
    .bind(tenant_id)
    .bind(tag_id)
    .fetch_all(pool)
    .await
}

pub async fn clear_writer_ref(pool: &PgPool, tenant_id: Uuid, writer_id: Uuid) -> sqlx::Result<u64> {
    let result = sqlx::query(
        "UPDATE articles SET writer_id = NULL WHERE tenant_id = $1 AND writer_id = $2",
    )
    .bind(tenant_id)
    .bind(writer_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

//! Persistence for categories, tags and writers.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::taxonomy::{CategoryRow, TagRow, WriterRow};

// ── Categories ──────────────────────────────────────────────────────────────

pub async fn list_categories(pool: &PgPool, tenant_id: Uuid) -> sqlx::Result<Vec<CategoryRow>> {
    sqlx::query_as::<_, CategoryRow>(
        "SELECT * FROM categories WHERE tenant_id = $1 ORDER BY sort_order, slug",
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await
}

pub async fn get_category(
    pool: &PgPool,
    tenant_id: Uuid,
    id: Uuid,
) -> sqlx::Result<Option<CategoryRow>> {
    sqlx::query_as::<_, CategoryRow>("SELECT * FROM categories WHERE id = $1 AND tenant_id = $2")
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
}

pub async fn category_by_slug(
    pool: &PgPool,
    tenant_id: Uuid,
    slug: &str,
) -> sqlx::Result<Option<CategoryRow>> {
    sqlx::query_as::<_, CategoryRow>(
        "SELECT * FROM categories WHERE tenant_id = $1 AND slug = $2",
    )
    .bind(tenant_id)
    .bind(slug)
    .fetch_optional(pool)
    .await
}

pub async fn insert_category(pool: &PgPool, c: &CategoryRow) -> sqlx::Result<CategoryRow> {
    sqlx::query_as::<_, CategoryRow>(
        r#"
        INSERT INTO categories (id, tenant_id, slug, name, description, sort_order)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(c.id)
    .bind(c.tenant_id)
    .bind(&c.slug)
    .bind(&c.name)
    .bind(&c.description)
    .bind(c.sort_order)
    .fetch_one(pool)
    .await
}

pub async fn update_category(pool: &PgPool, c: &CategoryRow) -> sqlx::Result<CategoryRow> {
    sqlx::query_as::<_, CategoryRow>(
        r#"
        UPDATE categories SET slug = $3, name = $4, description = $5, sort_order = $6,
            updated_at = now()
        WHERE id = $1 AND tenant_id = $2
        RETURNING *
        "#,
    )
    .bind(c.id)
    .bind(c.tenant_id)
    .bind(&c.slug)
    .bind(&c.name)
    .bind(&c.description)
    .bind(c.sort_order)
    .fetch_one(pool)
    .await
}

pub async fn delete_category(pool: &PgPool, tenant_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND tenant_id = $2")
        .bind(id)
        .bind(tenant_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ── Tags ────────────────────────────────────────────────────────────────────

pub async fn list_tags(pool: &PgPool, tenant_id: Uuid) -> sqlx::Result<Vec<TagRow>> {
    sqlx::query_as::<_, TagRow>("SELECT * FROM tags WHERE tenant_id = $1 ORDER BY slug")
        .bind(tenant_id)
        .fetch_all(pool)
        .await
}

pub async fn get_tag(pool: &PgPool, tenant_id: Uuid, id: Uuid) -> sqlx::Result<Option<TagRow>> {
    sqlx::query_as::<_, TagRow>("SELECT * FROM tags WHERE id = $1 AND tenant_id = $2")
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
}

pub async fn tag_by_slug(
    pool: &PgPool,
    tenant_id: Uuid,
    slug: &str,
) -> sqlx::Result<Option<TagRow>> {
    sqlx::query_as::<_, TagRow>("SELECT * FROM tags WHERE tenant_id = $1 AND slug = $2")
        .bind(tenant_id)
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn insert_tag(pool: &PgPool, t: &TagRow) -> sqlx::Result<TagRow> {
    sqlx::query_as::<_, TagRow>(
        "INSERT INTO tags (id, tenant_id, slug, name) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(t.id)
    .bind(t.tenant_id)
    .bind(&t.slug)
    .bind(&t.name)
    .fetch_one(pool)
    .await
}

pub async fn update_tag(pool: &PgPool, t: &TagRow) -> sqlx::Result<TagRow> {
    sqlx::query_as::<_, TagRow>(
        r#"
        UPDATE tags SET slug = $3, name = $4, updated_at = now()
        WHERE id = $1 AND tenant_id = $2
        RETURNING *
        "#,
    )
    .bind(t.id)
    .bind(t.tenant_id)
    .bind(&t.slug)
    .bind(&t.name)
    .fetch_one(pool)
    .await
}

pub async fn delete_tag(pool: &PgPool, tenant_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM tags WHERE id = $1 AND tenant_id = $2")
        .bind(id)
        .bind(tenant_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ── Writers ─────────────────────────────────────────────────────────────────

pub async fn list_writers(pool: &PgPool, tenant_id: Uuid) -> sqlx::Result<Vec<WriterRow>> {
    sqlx::query_as::<_, WriterRow>("SELECT * FROM writers WHERE tenant_id = $1 ORDER BY name")
        .bind(tenant_id)
        .fetch_all(pool)
        .await
}

pub async fn get_writer(
    pool: &PgPool,
    tenant_id: Uuid,
    id: Uuid,
) -> sqlx::Result<Option<WriterRow>> {
    sqlx::query_as::<_, WriterRow>("SELECT * FROM writers WHERE id = $1 AND tenant_id = $2")
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_writer(pool: &PgPool, w: &WriterRow) -> sqlx::Result<WriterRow> {
    sqlx::query_as::<_, WriterRow>(
        r#"
        INSERT INTO writers (id, tenant_id, name, bio, icon_url)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(w.id)
    .bind(w.tenant_id)
    .bind(&w.name)
    .bind(&w.bio)
    .bind(&w.icon_url)
    .fetch_one(pool)
    .await
}

pub async fn update_writer(pool: &PgPool, w: &WriterRow) -> sqlx::Result<WriterRow> {
    sqlx::query_as::<_, WriterRow>(
        r#"
        UPDATE writers SET name = $3, bio = $4, icon_url = $5, updated_at = now()
        WHERE id = $1 AND tenant_id = $2
        RETURNING *
        "#,
    )
    .bind(w.id)
    .bind(w.tenant_id)
    .bind(&w.name)
    .bind(&w.bio)
    .bind(&w.icon_url)
    .fetch_one(pool)
    .await
}

pub async fn delete_writer(pool: &PgPool, tenant_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM writers WHERE id = $1 AND tenant_id = $2")
        .bind(id)
        .bind(tenant_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

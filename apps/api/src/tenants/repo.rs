//! Tenant persistence.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::tenant::TenantRow;

pub async fn list(pool: &PgPool) -> sqlx::Result<Vec<TenantRow>> {
    sqlx::query_as::<_, TenantRow>("SELECT * FROM tenants ORDER BY slug")
        .fetch_all(pool)
        .await
}

pub async fn get(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<TenantRow>> {
    sqlx::query_as::<_, TenantRow>("SELECT * FROM tenants WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Public lookup: inactive tenants are invisible.
pub async fn active_by_slug(pool: &PgPool, slug: &str) -> sqlx::Result<Option<TenantRow>> {
    sqlx::query_as::<_, TenantRow>("SELECT * FROM tenants WHERE slug = $1 AND is_active")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &PgPool, t: &TenantRow) -> sqlx::Result<TenantRow> {
    sqlx::query_as::<_, TenantRow>(
        r#"
        INSERT INTO tenants (id, slug, name, domain, theme, is_active)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(t.id)
    .bind(&t.slug)
    .bind(&t.name)
    .bind(&t.domain)
    .bind(&t.theme)
    .bind(t.is_active)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, t: &TenantRow) -> sqlx::Result<TenantRow> {
    sqlx::query_as::<_, TenantRow>(
        r#"
        UPDATE tenants SET slug = $2, name = $3, domain = $4, theme = $5, is_active = $6,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(t.id)
    .bind(&t.slug)
    .bind(&t.name)
    .bind(&t.domain)
    .bind(&t.theme)
    .bind(t.is_active)
    .fetch_one(pool)
    .await
}

/// Child rows go with the tenant (ON DELETE CASCADE).
pub async fn delete(pool: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

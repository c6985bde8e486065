use sqlx::PgPool;
use uuid::Uuid;

use crate::models::banner::BannerRow;

pub async fn list(pool: &PgPool, tenant_id: Uuid) -> sqlx::Result<Vec<BannerRow>> {
    sqlx::query_as::<_, BannerRow>(
        "SELECT * FROM banners WHERE tenant_id = $1 ORDER BY placement, sort_order, created_at",
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await
}

/// Active banners, optionally for one placement. The display window is
/// checked by the caller with [`BannerRow::is_live`].
pub async fn list_active(
    pool: &PgPool,
    tenant_id: Uuid,
    placement: Option<&str>,
) -> sqlx::Result<Vec<BannerRow>> {
    sqlx::query_as::<_, BannerRow>(
        r#"
        SELECT * FROM banners
        WHERE tenant_id = $1 AND is_active AND ($2::text IS NULL OR placement = $2)
        ORDER BY placement, sort_order, created_at
        "#,
    )
    .bind(tenant_id)
    .bind(placement)
    .fetch_all(pool)
    .await
}

pub async fn get(pool: &PgPool, tenant_id: Uuid, id: Uuid) -> sqlx::Result<Option<BannerRow>> {
    sqlx::query_as::<_, BannerRow>("SELECT * FROM banners WHERE id = $1 AND tenant_id = $2")
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &PgPool, b: &BannerRow) -> sqlx::Result<BannerRow> {
    sqlx::query_as::<_, BannerRow>(
        r#"
        INSERT INTO banners
            (id, tenant_id, title, image_url, link_url, placement, sort_order, is_active,
             starts_at, ends_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(b.id)
    .bind(b.tenant_id)
    .bind(&b.title)
    .bind(&b.image_url)
    .bind(&b.link_url)
    .bind(&b.placement)
    .bind(b.sort_order)
    .bind(b.is_active)
    .bind(b.starts_at)
    .bind(b.ends_at)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, b: &BannerRow) -> sqlx::Result<BannerRow> {
    sqlx::query_as::<_, BannerRow>(
        r#"
        UPDATE banners SET title = $3, image_url = $4, link_url = $5, placement = $6,
            sort_order = $7, is_active = $8, starts_at = $9, ends_at = $10, updated_at = now()
        WHERE id = $1 AND tenant_id = $2
        RETURNING *
        "#,
    )
    .bind(b.id)
    .bind(b.tenant_id)
    .bind(&b.title)
    .bind(&b.image_url)
    .bind(&b.link_url)
    .bind(&b.placement)
    .bind(b.sort_order)
    .bind(b.is_active)
    .bind(b.starts_at)
    .bind(b.ends_at)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, tenant_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM banners WHERE id = $1 AND tenant_id = $2")
        .bind(id)
        .bind(tenant_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

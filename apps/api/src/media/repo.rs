use sqlx::PgPool;
use uuid::Uuid;

use crate::models::media::MediaFileRow;
use crate::routes::params::Page;

pub async fn list(pool: &PgPool, tenant_id: Uuid, page: Page) -> sqlx::Result<(Vec<MediaFileRow>, i64)> {
    let rows = sqlx::query_as::<_, MediaFileRow>(
        r#"
        SELECT * FROM media_files WHERE tenant_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(tenant_id)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM media_files WHERE tenant_id = $1")
        .bind(tenant_id)
        .fetch_one(pool)
        .await?;

    Ok((rows, total))
}

pub async fn list_all(pool: &PgPool, tenant_id: Uuid) -> sqlx::Result<Vec<MediaFileRow>> {
    sqlx::query_as::<_, MediaFileRow>("SELECT * FROM media_files WHERE tenant_id = $1")
        .bind(tenant_id)
        .fetch_all(pool)
        .await
}

pub async fn get(pool: &PgPool, tenant_id: Uuid, id: Uuid) -> sqlx::Result<Option<MediaFileRow>> {
    sqlx::query_as::<_, MediaFileRow>("SELECT * FROM media_files WHERE id = $1 AND tenant_id = $2")
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &PgPool, m: &MediaFileRow) -> sqlx::Result<MediaFileRow> {
    sqlx::query_as::<_, MediaFileRow>(
        r#"
        INSERT INTO media_files
            (id, tenant_id, file_name, storage_key, url, content_type, size_bytes, alt_text)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(m.id)
    .bind(m.tenant_id)
    .bind(&m.file_name)
    .bind(&m.storage_key)
    .bind(&m.url)
    .bind(&m.content_type)
    .bind(m.size_bytes)
    .bind(&m.alt_text)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, tenant_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM media_files WHERE id = $1 AND tenant_id = $2")
        .bind(id)
        .bind(tenant_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

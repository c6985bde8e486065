use sqlx::PgPool;
use uuid::Uuid;

use crate::models::content_block::ContentBlockRow;

pub async fn list(pool: &PgPool, tenant_id: Uuid) -> sqlx::Result<Vec<ContentBlockRow>> {
    sqlx::query_as::<_, ContentBlockRow>(
        "SELECT * FROM content_blocks WHERE tenant_id = $1 ORDER BY key",
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await
}

pub async fn get(
    pool: &PgPool,
    tenant_id: Uuid,
    id: Uuid,
) -> sqlx::Result<Option<ContentBlockRow>> {
    sqlx::query_as::<_, ContentBlockRow>(
        "SELECT * FROM content_blocks WHERE id = $1 AND tenant_id = $2",
    )
    .bind(id)
    .bind(tenant_id)
    .fetch_optional(pool)
    .await
}

pub async fn active_by_key(
    pool: &PgPool,
    tenant_id: Uuid,
    key: &str,
) -> sqlx::Result<Option<ContentBlockRow>> {
    sqlx::query_as::<_, ContentBlockRow>(
        "SELECT * FROM content_blocks WHERE tenant_id = $1 AND key = $2 AND is_active",
    )
    .bind(tenant_id)
    .bind(key)
    .fetch_optional(pool)
    .await
}

pub async fn insert(pool: &PgPool, b: &ContentBlockRow) -> sqlx::Result<ContentBlockRow> {
    sqlx::query_as::<_, ContentBlockRow>(
        r#"
        INSERT INTO content_blocks (id, tenant_id, key, title, content, is_active)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(b.id)
    .bind(b.tenant_id)
    .bind(&b.key)
    .bind(&b.title)
    .bind(&b.content)
    .bind(b.is_active)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, b: &ContentBlockRow) -> sqlx::Result<ContentBlockRow> {
    sqlx::query_as::<_, ContentBlockRow>(
        r#"
        UPDATE content_blocks SET key = $3, title = $4, content = $5, is_active = $6,
            updated_at = now()
        WHERE id = $1 AND tenant_id = $2
        RETURNING *
        "#,
    )
    .bind(b.id)
    .bind(b.tenant_id)
    .bind(&b.key)
    .bind(&b.title)
    .bind(&b.content)
    .bind(b.is_active)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, tenant_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM content_blocks WHERE id = $1 AND tenant_id = $2")
        .bind(id)
        .bind(tenant_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

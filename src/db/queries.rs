use sqlx::PgPool;

use crate::models::wine::{NewWine, Wine};

/// Insert a wine for a device
pub async fn insert_wine(pool: &PgPool, wine: &NewWine) -> Result<Wine, sqlx::Error> {
    sqlx::query_as::<_, Wine>(
        r#"
        INSERT INTO wines (device_id, name, producer, varietal, vintage, date_purchased,
                           best_drink_date, notes, label_image_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, device_id, name, producer, varietal, vintage, date_purchased,
                  best_drink_date, notes, label_image_url, created_at
        "#,
    )
    .bind(&wine.device_id)
    .bind(&wine.name)
    .bind(&wine.producer)
    .bind(&wine.varietal)
    .bind(wine.vintage)
    .bind(wine.date_purchased)
    .bind(wine.best_drink_date)
    .bind(&wine.notes)
    .bind(&wine.label_image_url)
    .fetch_one(pool)
    .await
}

/// All wines for a device, newest first
pub async fn list_wines(pool: &PgPool, device_id: &str) -> Result<Vec<Wine>, sqlx::Error> {
    sqlx::query_as::<_, Wine>(
        r#"
        SELECT id, device_id, name, producer, varietal, vintage, date_purchased,
               best_drink_date, notes, label_image_url, created_at
        FROM wines
        WHERE device_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(device_id)
    .fetch_all(pool)
    .await
}

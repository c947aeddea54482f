use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hangar_core::repository::{OrderRepository, RepositoryError, RepositoryResult};
use hangar_core::{Order, OrderStatus, PaymentMethod};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_status(&self, id: Uuid) -> RepositoryResult<Option<OrderStatus>> {
        let status: Option<String> = sqlx::query_scalar("SELECT status FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;

        status.map(|s| parse_status(&s)).transpose()
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: String,
    total_price: f64,
    status: String,
    transaction_id: Option<String>,
    payment_method: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, part_ids: Vec<String>) -> RepositoryResult<Order> {
        let payment_method = self
            .payment_method
            .as_deref()
            .map(str::parse::<PaymentMethod>)
            .transpose()
            .map_err(storage)?;

        Ok(Order {
            order_id: self.id,
            user_id: self.user_id,
            part_ids,
            total_price: self.total_price,
            status: parse_status(&self.status)?,
            transaction_id: self.transaction_id,
            payment_method,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct InsertedRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn storage<E>(err: E) -> RepositoryError
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    RepositoryError::Storage(err.into())
}

fn parse_status(raw: &str) -> RepositoryResult<OrderStatus> {
    raw.parse::<OrderStatus>().map_err(storage)
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create_order(&self, order: &Order) -> RepositoryResult<Order> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let inserted: InsertedRow = sqlx::query_as(
            r#"
            INSERT INTO orders (user_id, total_price, status, transaction_id, payment_method)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(&order.user_id)
        .bind(order.total_price)
        .bind(order.status.as_str())
        .bind(order.transaction_id.as_deref())
        .bind(order.payment_method.map(|m| m.as_str()))
        .fetch_one(&mut *tx)
        .await
        .map_err(storage)?;

        for (position, part_id) in order.part_ids.iter().enumerate() {
            sqlx::query("INSERT INTO order_parts (order_id, position, part_id) VALUES ($1, $2, $3)")
                .bind(inserted.id)
                .bind(position as i32)
                .bind(part_id)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
        }

        tx.commit().await.map_err(storage)?;

        Ok(Order {
            order_id: inserted.id,
            created_at: inserted.created_at,
            updated_at: inserted.updated_at,
            ..order.clone()
        })
    }

    async fn get_order(&self, id: Uuid) -> RepositoryResult<Order> {
        let row: OrderRow = sqlx::query_as(
            r#"
            SELECT id, user_id, total_price, status, transaction_id, payment_method, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?
        .ok_or(RepositoryError::NotFound(id))?;

        let part_ids: Vec<String> = sqlx::query_scalar(
            "SELECT part_id FROM order_parts WHERE order_id = $1 ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        row.into_order(part_ids)
    }

    async fn update_order(&self, order: &Order, expected: OrderStatus) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = $1, transaction_id = $2, payment_method = $3, updated_at = NOW()
            WHERE id = $4 AND status = $5
            "#,
        )
        .bind(order.status.as_str())
        .bind(order.transaction_id.as_deref())
        .bind(order.payment_method.map(|m| m.as_str()))
        .bind(order.order_id)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        match self.current_status(order.order_id).await? {
            None => Err(RepositoryError::NotFound(order.order_id)),
            Some(actual) => Err(RepositoryError::Conflict {
                order_id: order.order_id,
                expected,
                actual,
            }),
        }
    }
}

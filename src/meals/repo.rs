use sqlx::{AnyPool, FromRow};
use uuid::Uuid;

use crate::db::now_rfc3339;

/// Meal record in the database. `on_diet` stays a nullable 0/1 column so it
/// reads back identically from SQLite and Postgres.
#[derive(Debug, Clone, FromRow)]
pub struct Meal {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub date: String,
    pub on_diet: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl Meal {
    pub fn is_on_diet(&self) -> bool {
        matches!(self.on_diet, Some(flag) if flag != 0)
    }

    /// Insert a meal owned by `user_id`, stamping `date` with the current
    /// time.
    pub async fn create(
        db: &AnyPool,
        user_id: &str,
        name: &str,
        description: &str,
        on_diet: bool,
    ) -> Result<Meal, sqlx::Error> {
        let now = now_rfc3339();
        let meal = Meal {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            date: now.clone(),
            on_diet: Some(i64::from(on_diet)),
            created_at: now.clone(),
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO meals (id, user_id, name, description, date, on_diet, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&meal.id)
        .bind(&meal.user_id)
        .bind(&meal.name)
        .bind(&meal.description)
        .bind(&meal.date)
        .bind(meal.on_diet)
        .bind(&meal.created_at)
        .bind(&meal.updated_at)
        .execute(db)
        .await?;

        Ok(meal)
    }

    /// All meals for one user, in whatever order the store hands them back.
    pub async fn list_by_user(db: &AnyPool, user_id: &str) -> Result<Vec<Meal>, sqlx::Error> {
        sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, date, on_diet, created_at, updated_at
            FROM meals
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &AnyPool, id: &str) -> Result<Option<Meal>, sqlx::Error> {
        sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, date, on_diet, created_at, updated_at
            FROM meals
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Persist the current field values of this row.
    pub async fn update(&self, db: &AnyPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE meals
            SET name = $1, description = $2, date = $3, on_diet = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(&self.name)
        .bind(&self.description)
        .bind(&self.date)
        .bind(self.on_diet)
        .bind(&self.updated_at)
        .bind(&self.id)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn delete(db: &AnyPool, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM meals WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

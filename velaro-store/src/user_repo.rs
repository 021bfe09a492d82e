use async_trait::async_trait;
use sqlx::PgPool;
use velaro_core::identity::User;
use velaro_core::repository::UserRepository;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(
        &self,
        user: &User,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("INSERT INTO users (id, display_name, created_at) VALUES ($1, $2, $3)")
            .bind(user.id)
            .bind(&user.display_name)
            .bind(user.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

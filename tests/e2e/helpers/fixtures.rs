use anyhow::Result;
use sqlx::PgPool;
use translation_relay::domain::auth::JwtManager;
use translation_relay::infrastructure::config::Config;

/// Direct database setup and token minting for tests
pub struct TestFixtures {
    pool: PgPool,
    jwt: JwtManager,
}

impl TestFixtures {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            jwt: JwtManager::new(config.jwt_secret.clone(), config.jwt_expiration_hours),
        }
    }

    /// Bearer token acting as chat user `user_id`
    pub fn token_for(&self, user_id: i64) -> String {
        self.jwt
            .generate_token(user_id)
            .expect("Failed to generate token")
    }

    pub async fn create_user(&self, user_id: i64, targets: &[&str]) -> Result<()> {
        let targets: Vec<String> = targets.iter().map(|t| t.to_string()).collect();
        sqlx::query("INSERT INTO users (id, preferred_targets) VALUES ($1, $2)")
            .bind(user_id)
            .bind(&targets)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn enable_voice_replies(&self, user_id: i64) -> Result<()> {
        sqlx::query("UPDATE users SET voice_replies_enabled = TRUE WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn counters(&self, user_id: i64) -> Result<(i64, i64)> {
        let counters = sqlx::query_as::<_, (i64, i64)>(
            "SELECT message_count, voice_response_count FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(counters)
    }
}

//! Repository for the `players` table.

use gacha_core::account::{PlayerAccount, TicketType};
use gacha_core::progression::Experience;
use gacha_core::types::{PlayerId, Timestamp};
use sqlx::PgPool;

use crate::models::player::PlayerRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, image, currency, food_count, \
                       normal_tickets, golden_tickets, ticket_cooldown, last_free_ticket_at, \
                       curr_exp, exp_capacity, level, obtained_count, last_passive_income_at, \
                       created_at, updated_at";

/// Provides account CRUD plus atomic counter updates.
pub struct PlayerRepo;

impl PlayerRepo {
    /// Insert a new account (history is stored separately), returning the row.
    pub async fn create(pool: &PgPool, account: &PlayerAccount) -> Result<PlayerRow, sqlx::Error> {
        let meta = &account.metadata;
        let query = format!(
            "INSERT INTO players (id, username, email, password_hash, image, currency, food_count,
                                  normal_tickets, golden_tickets, ticket_cooldown,
                                  last_free_ticket_at, curr_exp, exp_capacity, level,
                                  obtained_count, last_passive_income_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlayerRow>(&query)
            .bind(account.id)
            .bind(&account.username)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(&account.image)
            .bind(meta.currency)
            .bind(meta.food_count)
            .bind(meta.ticket_count.normal)
            .bind(meta.ticket_count.golden)
            .bind(meta.ticket_count.cooldown)
            .bind(meta.ticket_count.last_free_ticket_at)
            .bind(meta.experience.curr_exp)
            .bind(meta.experience.exp_capacity)
            .bind(meta.experience.level)
            .bind(meta.obtained_count)
            .bind(meta.last_passive_income_at)
            .bind(account.created_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: PlayerId) -> Result<Option<PlayerRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM players WHERE id = $1");
        sqlx::query_as::<_, PlayerRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an account by username (case-insensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<PlayerRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM players WHERE LOWER(username) = LOWER($1)");
        sqlx::query_as::<_, PlayerRow>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find an account by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<PlayerRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM players WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, PlayerRow>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: PlayerId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM players WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Add `delta` to a ticket balance, floored at zero.
    ///
    /// Returns the new balance, or `None` if the player does not exist.
    pub async fn adjust_tickets(
        pool: &PgPool,
        id: PlayerId,
        ticket_type: TicketType,
        delta: i64,
    ) -> Result<Option<i64>, sqlx::Error> {
        let column = match ticket_type {
            TicketType::Normal => "normal_tickets",
            TicketType::Golden => "golden_tickets",
        };
        Self::adjust_counter(pool, id, column, delta).await
    }

    /// Add `delta` to the currency balance, floored at zero.
    pub async fn adjust_currency(
        pool: &PgPool,
        id: PlayerId,
        delta: i64,
    ) -> Result<Option<i64>, sqlx::Error> {
        Self::adjust_counter(pool, id, "currency", delta).await
    }

    /// Add `delta` to the food count, floored at zero.
    pub async fn adjust_food(
        pool: &PgPool,
        id: PlayerId,
        delta: i64,
    ) -> Result<Option<i64>, sqlx::Error> {
        Self::adjust_counter(pool, id, "food_count", delta).await
    }

    /// `column` is always one of the fixed names above, never user input.
    async fn adjust_counter(
        pool: &PgPool,
        id: PlayerId,
        column: &'static str,
        delta: i64,
    ) -> Result<Option<i64>, sqlx::Error> {
        let query = format!(
            "UPDATE players SET {column} = GREATEST(0, {column} + $2), updated_at = NOW()
             WHERE id = $1
             RETURNING {column}"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(id)
            .bind(delta)
            .fetch_optional(pool)
            .await
    }

    /// Deduct `amount` currency only if the balance covers it.
    ///
    /// Returns the new balance, or `None` if the player is missing or short.
    pub async fn try_spend_currency(
        pool: &PgPool,
        id: PlayerId,
        amount: i64,
    ) -> Result<Option<i64>, sqlx::Error> {
        Self::try_deduct(pool, id, "currency", amount).await
    }

    /// Deduct `amount` food only if available. Same contract as
    /// [`PlayerRepo::try_spend_currency`].
    pub async fn try_consume_food(
        pool: &PgPool,
        id: PlayerId,
        amount: i64,
    ) -> Result<Option<i64>, sqlx::Error> {
        Self::try_deduct(pool, id, "food_count", amount).await
    }

    async fn try_deduct(
        pool: &PgPool,
        id: PlayerId,
        column: &'static str,
        amount: i64,
    ) -> Result<Option<i64>, sqlx::Error> {
        let query = format!(
            "UPDATE players SET {column} = {column} - $2, updated_at = NOW()
             WHERE id = $1 AND {column} >= $2
             RETURNING {column}"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(id)
            .bind(amount)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the experience block. Returns `true` if the row exists.
    pub async fn set_experience(
        pool: &PgPool,
        id: PlayerId,
        experience: Experience,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE players SET curr_exp = $2, exp_capacity = $3, level = $4, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(experience.curr_exp)
        .bind(experience.exp_capacity)
        .bind(experience.level)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_obtained_count(
        pool: &PgPool,
        id: PlayerId,
        count: i64,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE players SET obtained_count = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(count)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_ticket_cooldown(
        pool: &PgPool,
        id: PlayerId,
        cooldown: Option<Timestamp>,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE players SET ticket_cooldown = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(cooldown)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Grant one normal ticket and move the cooldown in a single statement.
    pub async fn grant_free_ticket(
        pool: &PgPool,
        id: PlayerId,
        granted_at: Timestamp,
        next_cooldown: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE players SET normal_tickets = normal_tickets + 1,
                                ticket_cooldown = $3,
                                last_free_ticket_at = $2,
                                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(granted_at)
        .bind(next_cooldown)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_last_passive_income(
        pool: &PgPool,
        id: PlayerId,
        at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE players SET last_passive_income_at = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete an account (cascades to its pull history).
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: PlayerId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

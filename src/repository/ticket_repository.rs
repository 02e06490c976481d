//! Repair ticket repository.
//!
//! Owns short-ID allocation: a random 6-character uppercase alphanumeric
//! candidate is checked against existing rows and regenerated on collision.
//! The retry is bounded; after too many collisions a longer identifier is
//! taken instead of looping forever. Two concurrent creations could still
//! pick the same candidate, in which case the primary-key constraint rejects
//! the second insert.

use rand::Rng;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::errors::{RepoResult, RepositoryError};
use crate::models::{RepairTicket, TicketOwner, TicketStatus, TicketWithUser};

const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SHORT_ID_LEN: usize = 6;
const LONG_ID_LEN: usize = 10;
const MAX_ID_ATTEMPTS: usize = 8;

const TICKET_COLUMNS: &str = "id, device_model, issue_description, contact_phone, status, \
                              estimated_cost, user_id, created_at, updated_at";

pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a ticket with a freshly allocated short ID. Status always
    /// starts at PENDIENTE, whatever the caller sent.
    pub async fn create(
        &self,
        device_model: &str,
        issue_description: &str,
        contact_phone: &str,
        user_id: Option<i32>,
    ) -> RepoResult<RepairTicket> {
        let id = self.allocate_id().await?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO repair_tickets
                (id, device_model, issue_description, contact_phone, status, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(&id)
        .bind(device_model)
        .bind(issue_description)
        .bind(contact_phone)
        .bind(TicketStatus::Pendiente.as_str())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_ticket(&row))
    }

    /// Find a ticket by its short ID.
    pub async fn find_by_id(&self, id: &str) -> RepoResult<RepairTicket> {
        let row = sqlx::query(&format!(
            "SELECT {TICKET_COLUMNS} FROM repair_tickets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(map_ticket(&row))
    }

    /// List all tickets, newest first, each with its optional owning user.
    pub async fn list_with_users(&self) -> RepoResult<Vec<TicketWithUser>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.device_model, t.issue_description, t.contact_phone, t.status,
                   t.estimated_cost, t.user_id, t.created_at, t.updated_at,
                   u.name AS owner_name, u.email AS owner_email
            FROM repair_tickets t
            LEFT JOIN users u ON u.id = t.user_id
            ORDER BY t.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let owner_name: Option<String> = row.get("owner_name");
                let owner_email: Option<String> = row.get("owner_email");
                TicketWithUser {
                    ticket: map_ticket(&row),
                    user: owner_name.zip(owner_email).map(|(name, email)| TicketOwner {
                        name,
                        email,
                    }),
                }
            })
            .collect())
    }

    /// Update status and/or estimated cost. Any status may overwrite any
    /// other; there is no transition table.
    pub async fn update(
        &self,
        id: &str,
        status: Option<TicketStatus>,
        estimated_cost: Option<f64>,
    ) -> RepoResult<RepairTicket> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE repair_tickets
            SET status = COALESCE($2, status),
                estimated_cost = COALESCE($3, estimated_cost),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.map(|s| s.as_str()))
        .bind(estimated_cost)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(map_ticket(&row))
    }

    /// Delete a ticket.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM repair_tickets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn allocate_id(&self) -> RepoResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = generate_ticket_id(SHORT_ID_LEN);
            if !self.id_exists(&candidate).await? {
                return Ok(candidate);
            }
        }

        // Too many collisions means the short keyspace is under pressure;
        // take a longer identifier instead of retrying forever.
        Ok(generate_ticket_id(LONG_ID_LEN))
    }

    async fn id_exists(&self, id: &str) -> RepoResult<bool> {
        let row = sqlx::query("SELECT 1 FROM repair_tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }
}

/// Random uppercase alphanumeric identifier of the given length.
fn generate_ticket_id(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

fn map_ticket(row: &PgRow) -> RepairTicket {
    RepairTicket {
        id: row.get("id"),
        device_model: row.get("device_model"),
        issue_description: row.get("issue_description"),
        contact_phone: row.get("contact_phone"),
        status: TicketStatus::parse(row.get("status")),
        estimated_cost: row.get("estimated_cost"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_is_six_uppercase_alphanumeric_chars() {
        for _ in 0..200 {
            let id = generate_ticket_id(SHORT_ID_LEN);
            assert_eq!(id.len(), 6);
            assert!(id
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn fallback_id_is_ten_chars_same_alphabet() {
        let id = generate_ticket_id(LONG_ID_LEN);
        assert_eq!(id.len(), 10);
        assert!(id
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
    }

    #[test]
    fn generated_ids_vary() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| generate_ticket_id(SHORT_ID_LEN)).collect();
        // 100 draws from a 36^6 keyspace colliding would point at a broken RNG.
        assert!(ids.len() > 95);
    }
}

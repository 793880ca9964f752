// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lead record operations.
//!
//! Fields merge with `COALESCE` so a missing value never clears a stored one,
//! and no statement ever writes `open` over `completed`.

use rusqlite::{OptionalExtension, params};
use scout_core::types::{LeadRecord, LeadStatus, LeadUpdate};
use scout_core::{ScoutError, timestamp_now};

use crate::database::Database;

const LEAD_COLUMNS: &str = "session_id, name, city, phone, email, preferred_contact_time, \
     summary, notes, status, created_at, updated_at, completed_at";

fn row_to_lead(row: &rusqlite::Row<'_>) -> Result<LeadRecord, rusqlite::Error> {
    let status: String = row.get(8)?;
    let status = status.parse::<LeadStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(LeadRecord {
        session_id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        preferred_contact_time: row.get(5)?,
        summary: row.get(6)?,
        notes: row.get(7)?,
        status,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
        completed_at: row.get(11)?,
    })
}

fn select_lead(
    conn: &rusqlite::Connection,
    session_id: &str,
) -> Result<Option<LeadRecord>, rusqlite::Error> {
    conn.query_row(
        &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE session_id = ?1"),
        params![session_id],
        row_to_lead,
    )
    .optional()
}

fn select_existing(
    conn: &rusqlite::Connection,
    session_id: &str,
) -> Result<LeadRecord, rusqlite::Error> {
    select_lead(conn, session_id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

/// Insert an open lead. An existing lead is left untouched.
pub async fn create_lead(db: &Database, session_id: &str) -> Result<LeadRecord, ScoutError> {
    let session_id = session_id.to_string();
    let now = timestamp_now();
    db.connection()
        .call(move |conn| -> Result<LeadRecord, rusqlite::Error> {
            conn.execute(
                "INSERT INTO leads (session_id, status, created_at, updated_at)
                 VALUES (?1, 'open', ?2, ?2)
                 ON CONFLICT(session_id) DO NOTHING",
                params![session_id, now],
            )?;
            select_existing(conn, &session_id)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a lead by session ID.
pub async fn get_lead(db: &Database, session_id: &str) -> Result<Option<LeadRecord>, ScoutError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<LeadRecord>, rusqlite::Error> {
            select_lead(conn, &session_id)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Merge non-blank fields into the lead, creating it when absent.
///
/// `updated_at` is only refreshed when at least one field is carried.
pub async fn update_lead(
    db: &Database,
    session_id: &str,
    update: &LeadUpdate,
) -> Result<LeadRecord, ScoutError> {
    let session_id = session_id.to_string();
    let update = update.clone().normalized();
    let now = timestamp_now();
    db.connection()
        .call(move |conn| -> Result<LeadRecord, rusqlite::Error> {
            if update.is_empty() {
                conn.execute(
                    "INSERT INTO leads (session_id, status, created_at, updated_at)
                     VALUES (?1, 'open', ?2, ?2)
                     ON CONFLICT(session_id) DO NOTHING",
                    params![session_id, now],
                )?;
            } else {
                conn.execute(
                    "INSERT INTO leads (session_id, name, city, phone, email,
                                        preferred_contact_time, status, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'open', ?7, ?7)
                     ON CONFLICT(session_id) DO UPDATE SET
                        name = COALESCE(excluded.name, leads.name),
                        city = COALESCE(excluded.city, leads.city),
                        phone = COALESCE(excluded.phone, leads.phone),
                        email = COALESCE(excluded.email, leads.email),
                        preferred_contact_time =
                            COALESCE(excluded.preferred_contact_time, leads.preferred_contact_time),
                        updated_at = excluded.updated_at",
                    params![
                        session_id,
                        update.name,
                        update.city,
                        update.phone,
                        update.email,
                        update.preferred_time,
                        now,
                    ],
                )?;
            }
            select_existing(conn, &session_id)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Overwrite the summary, leaving status alone. Returns `None` for an unknown session.
pub async fn save_summary(
    db: &Database,
    session_id: &str,
    summary: &str,
) -> Result<Option<LeadRecord>, ScoutError> {
    let session_id = session_id.to_string();
    let summary = summary.to_string();
    let now = timestamp_now();
    db.connection()
        .call(move |conn| -> Result<Option<LeadRecord>, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE leads SET summary = ?2, updated_at = ?3 WHERE session_id = ?1",
                params![session_id, summary, now],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            select_lead(conn, &session_id)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Store the summary and optional notes and mark the lead completed.
///
/// Existing notes survive when `notes` is `None`. Returns `None` for an unknown session.
pub async fn finalize_lead(
    db: &Database,
    session_id: &str,
    summary: &str,
    notes: Option<&str>,
) -> Result<Option<LeadRecord>, ScoutError> {
    let session_id = session_id.to_string();
    let summary = summary.to_string();
    let notes = notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    let now = timestamp_now();
    db.connection()
        .call(move |conn| -> Result<Option<LeadRecord>, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE leads SET
                    summary = ?2,
                    notes = COALESCE(?3, notes),
                    status = 'completed',
                    completed_at = ?4,
                    updated_at = ?4
                 WHERE session_id = ?1",
                params![session_id, summary, notes, now],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            select_lead(conn, &session_id)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

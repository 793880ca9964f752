// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcript turn operations.

use rusqlite::params;
use scout_core::types::{TranscriptTurn, TurnContent, TurnRole};
use scout_core::{ScoutError, timestamp_now};

use crate::database::Database;

fn insert_turn(
    tx: &rusqlite::Transaction<'_>,
    session_id: &str,
    role: &str,
    content: &str,
    created_at: &str,
) -> Result<(), rusqlite::Error> {
    tx.execute(
        "INSERT INTO transcript_turns (session_id, role, content, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![session_id, role, content, created_at],
    )?;
    Ok(())
}

fn encode(turn: &TranscriptTurn) -> Result<(String, String), ScoutError> {
    let content = serde_json::to_string(&turn.content).map_err(ScoutError::storage)?;
    Ok((turn.role.to_string(), content))
}

/// Append turns in one transaction.
///
/// When the session has no turns yet, `opening` is inserted first.
pub async fn append_turns(
    db: &Database,
    session_id: &str,
    turns: &[TranscriptTurn],
    opening: Option<&TranscriptTurn>,
) -> Result<(), ScoutError> {
    let session_id = session_id.to_string();
    let encoded = turns.iter().map(encode).collect::<Result<Vec<_>, _>>()?;
    let opening = opening.map(encode).transpose()?;
    let now = timestamp_now();

    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            if let Some((role, content)) = &opening {
                let existing: i64 = tx.query_row(
                    "SELECT COUNT(*) FROM transcript_turns WHERE session_id = ?1",
                    params![session_id],
                    |row| row.get(0),
                )?;
                if existing == 0 {
                    insert_turn(&tx, &session_id, role, content, &now)?;
                }
            }
            for (role, content) in &encoded {
                insert_turn(&tx, &session_id, role, content, &now)?;
            }
            tx.commit()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Read the full transcript for a session in append order.
pub async fn transcript(db: &Database, session_id: &str) -> Result<Vec<TranscriptTurn>, ScoutError> {
    let session_id = session_id.to_string();
    let rows = db
        .connection()
        .call(move |conn| -> Result<Vec<(String, String, String)>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT role, content, created_at FROM transcript_turns
                 WHERE session_id = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![session_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    rows.into_iter()
        .map(|(role, content, created_at)| {
            let role = role.parse::<TurnRole>().map_err(ScoutError::storage)?;
            let content: TurnContent =
                serde_json::from_str(&content).map_err(ScoutError::storage)?;
            Ok(TranscriptTurn {
                role,
                content,
                timestamp: Some(created_at),
            })
        })
        .collect()
}

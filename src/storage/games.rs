use crate::chess::GameOutcome;
use crate::storage::database::Archive;
use crate::storage::errors::{Result, StorageError};
use crate::storage::models::{ArchivedGame, NewArchivedGame};
use rusqlite::{named_params, Row};
use uuid::Uuid;

impl Archive {
    /// Store a finished game and return the archived record
    pub fn record_game(&self, game: NewArchivedGame) -> Result<ArchivedGame> {
        let archived = ArchivedGame {
            id: Uuid::new_v4().to_string(),
            pgn: game.pgn,
            outcome: game.outcome,
            move_count: game.move_count,
            recorded_at: Self::current_timestamp(),
            metadata: game.metadata,
        };

        // Serialize metadata outside the named_params! macro
        let serialized_metadata = archived
            .metadata
            .as_ref()
            .map(|m| {
                serde_json::to_string(m)
                    .map_err(|e| StorageError::serialization_error("game metadata", e))
            })
            .transpose()?;

        self.with_connection(|conn| {
            conn.execute(
                r#"
                INSERT INTO games (id, pgn, outcome, move_count, recorded_at, metadata)
                VALUES (:id, :pgn, :outcome, :move_count, :recorded_at, :metadata)
                "#,
                named_params! {
                    ":id": archived.id,
                    ":pgn": archived.pgn,
                    ":outcome": archived.outcome.as_str(),
                    ":move_count": archived.move_count,
                    ":recorded_at": archived.recorded_at,
                    ":metadata": serialized_metadata,
                },
            )?;
            Ok(archived)
        })
    }

    /// Get a game by ID
    pub fn get_game(&self, game_id: &str) -> Result<ArchivedGame> {
        self.with_connection(|conn| {
            conn.query_row(
                r#"
                SELECT id, pgn, outcome, move_count, recorded_at, metadata
                FROM games
                WHERE id = ?1
                "#,
                [game_id],
                game_from_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StorageError::game_not_found(game_id),
                _ => StorageError::ConnectionFailed(e),
            })
        })
    }

    /// Most recent games first, at most `limit`
    pub fn recent_games(&self, limit: u32) -> Result<Vec<ArchivedGame>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, pgn, outcome, move_count, recorded_at, metadata
                FROM games
                ORDER BY recorded_at DESC, rowid DESC
                LIMIT ?1
                "#,
            )?;
            let games = stmt
                .query_map([limit], game_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(games)
        })
    }

    /// Win / loss / draw tally over the whole archive
    pub fn outcome_counts(&self) -> Result<(u32, u32, u32)> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT outcome, COUNT(*) FROM games GROUP BY outcome")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
            })?;

            let (mut white, mut black, mut draw) = (0, 0, 0);
            for row in rows {
                let (outcome, count) = row?;
                match outcome.parse::<GameOutcome>() {
                    Ok(GameOutcome::White) => white = count,
                    Ok(GameOutcome::Black) => black = count,
                    Ok(GameOutcome::Draw) => draw = count,
                    Err(_) => {
                        return Err(StorageError::invalid_data(format!(
                            "Unknown outcome '{outcome}' in archive"
                        )))
                    }
                }
            }
            Ok((white, black, draw))
        })
    }
}

fn game_from_row(row: &Row) -> rusqlite::Result<ArchivedGame> {
    let outcome_text: String = row.get(2)?;
    let outcome = outcome_text.parse::<GameOutcome>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let metadata_text: Option<String> = row.get(5)?;
    let metadata = metadata_text
        .map(|text| serde_json::from_str(&text))
        .transpose()
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(ArchivedGame {
        id: row.get(0)?,
        pgn: row.get(1)?,
        outcome,
        move_count: row.get(3)?,
        recorded_at: row.get(4)?,
        metadata,
    })
}

use crate::chess::GameOutcome;
use crate::storage::database::Archive;
use crate::storage::errors::Result;
use crate::storage::models::RecordedPosition;
use rusqlite::{params, Row};

impl Archive {
    pub fn record_position(
        &self,
        fen: &str,
        outcome: Option<GameOutcome>,
    ) -> Result<RecordedPosition> {
        let recorded_at = Self::current_timestamp();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO positions (fen, outcome, recorded_at) VALUES (?1, ?2, ?3)",
                params![fen, outcome.map(|o| o.as_str()), recorded_at],
            )?;
            Ok(RecordedPosition {
                id: conn.last_insert_rowid(),
                fen: fen.to_string(),
                outcome,
                recorded_at,
            })
        })
    }

    /// Every time `fen` was reported, oldest first
    pub fn positions_for_fen(&self, fen: &str) -> Result<Vec<RecordedPosition>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, fen, outcome, recorded_at FROM positions WHERE fen = ?1 ORDER BY id",
            )?;
            let positions = stmt
                .query_map([fen], position_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(positions)
        })
    }

    pub fn position_count(&self) -> Result<u64> {
        self.with_connection(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM positions", [], |row| row.get(0))?;
            Ok(count as u64)
        })
    }
}

fn position_from_row(row: &Row) -> rusqlite::Result<RecordedPosition> {
    let outcome_text: Option<String> = row.get(2)?;
    Ok(RecordedPosition {
        id: row.get(0)?,
        fen: row.get(1)?,
        // The CHECK constraint only admits known outcomes
        outcome: outcome_text.and_then(|text| text.parse().ok()),
        recorded_at: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOOLS_MATE_FEN: &str = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";

    #[test]
    fn test_record_positions() {
        let archive = Archive::open_in_memory().unwrap();
        archive.record_position(FOOLS_MATE_FEN, None).unwrap();
        let last = archive
            .record_position(FOOLS_MATE_FEN, Some(GameOutcome::Black))
            .unwrap();

        let rows = archive.positions_for_fen(FOOLS_MATE_FEN).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].outcome, None);
        assert_eq!(rows[1], last);
        assert_eq!(archive.position_count().unwrap(), 2);
    }
}

//! SQLite schema for matches, parlays and parlay legs.

use rusqlite::{Connection, Result};

/// Create all tables and indexes. Safe to run against an existing database.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS matches (
            id TEXT PRIMARY KEY,
            home_team TEXT,
            away_team TEXT,
            league TEXT,
            kickoff TEXT
        );

        CREATE TABLE IF NOT EXISTS parlays (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            match_id TEXT NOT NULL,
            fingerprint TEXT NOT NULL,
            parlay_type TEXT NOT NULL,
            leg_count INTEGER NOT NULL,
            combined_prob REAL NOT NULL,
            correlation_penalty REAL NOT NULL,
            adjusted_prob REAL NOT NULL,
            fair_odds REAL NOT NULL,
            implied_odds REAL NOT NULL,
            edge_pct REAL NOT NULL,
            confidence TEXT NOT NULL,
            league TEXT NOT NULL,
            window_start TEXT NOT NULL,
            window_end TEXT NOT NULL,
            status TEXT NOT NULL,
            synced_at TEXT NOT NULL,
            UNIQUE (match_id, fingerprint)
        );

        CREATE TABLE IF NOT EXISTS parlay_legs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            parlay_id INTEGER NOT NULL REFERENCES parlays(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            outcome TEXT NOT NULL,
            description TEXT NOT NULL,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,
            model_probability REAL NOT NULL,
            decimal_odds REAL NOT NULL,
            edge_share_pct REAL NOT NULL,
            UNIQUE (parlay_id, position)
        );

        CREATE INDEX IF NOT EXISTS idx_parlays_match_type ON parlays(match_id, parlay_type);
        CREATE INDEX IF NOT EXISTS idx_parlay_legs_parlay ON parlay_legs(parlay_id);",
    )
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::create_tables;

    #[test]
    fn creating_tables_twice_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();

        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('matches', 'parlays', 'parlay_legs')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }
}

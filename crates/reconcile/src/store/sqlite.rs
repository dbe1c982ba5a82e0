use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use parlay::{constants::SINGLE_GAME_PARLAY_TYPE, Confidence, Fingerprint, Outcome};
use rusqlite::{params, Connection, OptionalExtension};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::{
    schema::create_tables, MatchRecord, NewLeg, NewParlay, ParlayStatus, ParlayStore,
    PersistedLeg, PersistedParlay, StoreError,
};

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

/// SQLite-backed store. Calls run on the blocking pool; each create is one
/// transaction guarded by the `UNIQUE (match_id, fingerprint)` constraint.
#[derive(Debug, Clone)]
pub struct SqliteParlayStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteParlayStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        create_tables(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub async fn upsert_match(&self, record: MatchRecord) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            let kickoff = record.kickoff.map(format_timestamp).transpose()?;
            conn.execute(
                "INSERT INTO matches (id, home_team, away_team, league, kickoff)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                    home_team = excluded.home_team,
                    away_team = excluded.away_team,
                    league = excluded.league,
                    kickoff = excluded.kickoff",
                params![
                    record.id,
                    record.home_team,
                    record.away_team,
                    record.league,
                    kickoff
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|_| StoreError::Backend("sqlite connection lock poisoned".to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|err| StoreError::Join(err.to_string()))?
    }
}

#[async_trait]
impl ParlayStore for SqliteParlayStore {
    async fn find_match(&self, match_id: &str) -> Result<Option<MatchRecord>, StoreError> {
        let match_id = match_id.to_string();
        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    "SELECT id, home_team, away_team, league, kickoff FROM matches WHERE id = ?1",
                    params![match_id],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, Option<String>>(1)?,
                            row.get::<_, Option<String>>(2)?,
                            row.get::<_, Option<String>>(3)?,
                            row.get::<_, Option<String>>(4)?,
                        ))
                    },
                )
                .optional()?;

            row.map(|(id, home_team, away_team, league, kickoff)| -> Result<_, StoreError> {
                Ok(MatchRecord {
                    id,
                    home_team,
                    away_team,
                    league,
                    kickoff: kickoff.as_deref().map(parse_timestamp).transpose()?,
                })
            })
            .transpose()
        })
        .await
    }

    async fn find_single_game_parlays(
        &self,
        match_id: &str,
        outcomes: &[Outcome],
    ) -> Result<Vec<PersistedParlay>, StoreError> {
        let match_id = match_id.to_string();
        let outcomes = outcomes.to_vec();
        self.with_conn(move |conn| {
            let parlays = load_single_game_parlays(conn, &match_id)?;
            Ok(parlays
                .into_iter()
                .filter(|parlay| parlay.shares_outcome_with(&outcomes))
                .collect())
        })
        .await
    }

    async fn create_parlay(&self, parlay: NewParlay) -> Result<PersistedParlay, StoreError> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let inserted = tx.execute(
                "INSERT INTO parlays (
                    match_id, fingerprint, parlay_type, leg_count, combined_prob,
                    correlation_penalty, adjusted_prob, fair_odds, implied_odds, edge_pct,
                    confidence, league, window_start, window_end, status, synced_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                 ON CONFLICT(match_id, fingerprint) DO NOTHING",
                params![
                    parlay.match_id,
                    parlay.fingerprint.as_str(),
                    parlay.parlay_type,
                    parlay.leg_count as i64,
                    parlay.combined_prob,
                    parlay.correlation_penalty,
                    parlay.adjusted_prob,
                    parlay.fair_odds,
                    parlay.implied_odds,
                    parlay.edge_pct,
                    parlay.confidence.as_str(),
                    parlay.league,
                    format_timestamp(parlay.window_start)?,
                    format_timestamp(parlay.window_end)?,
                    parlay.status.as_str(),
                    format_timestamp(parlay.synced_at)?,
                ],
            )?;
            if inserted == 0 {
                return Err(StoreError::Conflict {
                    match_id: parlay.match_id,
                    fingerprint: parlay.fingerprint,
                });
            }

            let parlay_id = tx.last_insert_rowid();
            for leg in &parlay.legs {
                tx.execute(
                    "INSERT INTO parlay_legs (
                        parlay_id, position, outcome, description, home_team, away_team,
                        model_probability, decimal_odds, edge_share_pct
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        parlay_id,
                        leg.position,
                        leg.outcome.code(),
                        leg.description,
                        leg.home_team,
                        leg.away_team,
                        leg.model_probability,
                        leg.decimal_odds,
                        leg.edge_share_pct,
                    ],
                )?;
            }
            tx.commit()?;

            Ok(PersistedParlay::from_new(parlay_id, parlay))
        })
        .await
    }
}

struct ParlayRow {
    id: i64,
    match_id: String,
    fingerprint: String,
    parlay_type: String,
    leg_count: i64,
    combined_prob: f64,
    correlation_penalty: f64,
    adjusted_prob: f64,
    fair_odds: f64,
    implied_odds: f64,
    edge_pct: f64,
    confidence: String,
    league: String,
    window_start: String,
    window_end: String,
    status: String,
    synced_at: String,
}

fn load_single_game_parlays(
    conn: &Connection,
    match_id: &str,
) -> Result<Vec<PersistedParlay>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, match_id, fingerprint, parlay_type, leg_count, combined_prob,
                correlation_penalty, adjusted_prob, fair_odds, implied_odds, edge_pct,
                confidence, league, window_start, window_end, status, synced_at
         FROM parlays
         WHERE match_id = ?1 AND parlay_type = ?2
         ORDER BY id",
    )?;
    let rows = stmt
        .query_map(params![match_id, SINGLE_GAME_PARLAY_TYPE], |row| {
            Ok(ParlayRow {
                id: row.get(0)?,
                match_id: row.get(1)?,
                fingerprint: row.get(2)?,
                parlay_type: row.get(3)?,
                leg_count: row.get(4)?,
                combined_prob: row.get(5)?,
                correlation_penalty: row.get(6)?,
                adjusted_prob: row.get(7)?,
                fair_odds: row.get(8)?,
                implied_odds: row.get(9)?,
                edge_pct: row.get(10)?,
                confidence: row.get(11)?,
                league: row.get(12)?,
                window_start: row.get(13)?,
                window_end: row.get(14)?,
                status: row.get(15)?,
                synced_at: row.get(16)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|row| -> Result<PersistedParlay, StoreError> {
            let legs = load_legs(conn, row.id)?;
            parlay_from_row(row, legs)
        })
        .collect()
}

fn load_legs(conn: &Connection, parlay_id: i64) -> Result<Vec<PersistedLeg>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT position, outcome, description, home_team, away_team,
                model_probability, decimal_odds, edge_share_pct
         FROM parlay_legs
         WHERE parlay_id = ?1
         ORDER BY position",
    )?;
    let rows = stmt
        .query_map(params![parlay_id], |row| {
            Ok((
                row.get::<_, u32>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, f64>(6)?,
                row.get::<_, f64>(7)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(
            |(
                position,
                outcome,
                description,
                home_team,
                away_team,
                model_probability,
                decimal_odds,
                edge_share_pct,
            )|
             -> Result<PersistedLeg, StoreError> {
                let outcome = Outcome::from_code(&outcome)
                    .ok_or_else(|| StoreError::Corrupt(format!("unknown outcome {outcome}")))?;
                Ok(PersistedLeg {
                    parlay_id,
                    leg: NewLeg {
                        position,
                        outcome,
                        description,
                        home_team,
                        away_team,
                        model_probability,
                        decimal_odds,
                        edge_share_pct,
                    },
                })
            },
        )
        .collect()
}

fn parlay_from_row(row: ParlayRow, legs: Vec<PersistedLeg>) -> Result<PersistedParlay, StoreError> {
    let leg_count = usize::try_from(row.leg_count)
        .map_err(|_| StoreError::Corrupt(format!("negative leg count on parlay {}", row.id)))?;
    let confidence = Confidence::parse(&row.confidence)
        .ok_or_else(|| StoreError::Corrupt(format!("unknown confidence {}", row.confidence)))?;
    let status = ParlayStatus::parse(&row.status)
        .ok_or_else(|| StoreError::Corrupt(format!("unknown status {}", row.status)))?;

    Ok(PersistedParlay {
        id: row.id,
        match_id: row.match_id,
        fingerprint: Fingerprint::from(row.fingerprint),
        parlay_type: row.parlay_type,
        leg_count,
        combined_prob: row.combined_prob,
        correlation_penalty: row.correlation_penalty,
        adjusted_prob: row.adjusted_prob,
        fair_odds: row.fair_odds,
        implied_odds: row.implied_odds,
        edge_pct: row.edge_pct,
        confidence,
        league: row.league,
        window_start: parse_timestamp(&row.window_start)?,
        window_end: parse_timestamp(&row.window_end)?,
        status,
        synced_at: parse_timestamp(&row.synced_at)?,
        legs,
    })
}

fn format_timestamp(value: OffsetDateTime) -> Result<String, StoreError> {
    value
        .format(&Rfc3339)
        .map_err(|err| StoreError::Backend(err.to_string()))
}

fn parse_timestamp(value: &str) -> Result<OffsetDateTime, StoreError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|err| StoreError::Corrupt(format!("bad timestamp {value}: {err}")))
}

use crate::db::Database;
use crate::error::Result;
use crate::models::{SensorReading, StoredReading};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Row};
use tracing::warn;

// Reading Queries

impl Database {
    /// Stores the raw sensor values stamped with the current time.
    /// Timestamps use a fixed-width RFC 3339 form so they sort as text.
    pub fn insert_reading(&self, reading: &SensorReading) -> Result<StoredReading> {
        self.insert_reading_at(reading, Utc::now())
    }

    pub fn insert_reading_at(
        &self,
        reading: &SensorReading,
        recorded_at: DateTime<Utc>,
    ) -> Result<StoredReading> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO readings (temperature, soil_moisture, light, recorded_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    reading.temperature,
                    reading.soil_moisture,
                    reading.light,
                    recorded_at.to_rfc3339_opts(SecondsFormat::Micros, true),
                ],
            )?;
            Ok(StoredReading {
                id: conn.last_insert_rowid(),
                temperature: reading.temperature,
                soil_moisture: reading.soil_moisture,
                light: reading.light,
                recorded_at,
            })
        })
    }

    /// Newest readings first.
    pub fn recent_readings(&self, limit: usize) -> Result<Vec<StoredReading>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM readings ORDER BY recorded_at DESC, id DESC LIMIT ?1",
            )?;
            let readings = stmt
                .query_map([limit as i64], row_to_reading)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(readings)
        })
    }

    pub fn count_readings(&self) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))?)
        })
    }
}

fn row_to_reading(row: &Row) -> rusqlite::Result<StoredReading> {
    let recorded_at_str: String = row.get("recorded_at")?;
    let recorded_at = DateTime::parse_from_rfc3339(&recorded_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| {
            warn!(recorded_at = %recorded_at_str, "Unparseable timestamp in database");
            DateTime::<Utc>::UNIX_EPOCH
        });

    Ok(StoredReading {
        id: row.get("id")?,
        temperature: row.get("temperature")?,
        soil_moisture: row.get("soil_moisture")?,
        light: row.get("light")?,
        recorded_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn readings_come_back_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let t0 = Utc::now();
        db.insert_reading_at(&SensorReading::new(20.0, 40.0), t0 - Duration::minutes(10))
            .unwrap();
        db.insert_reading_at(&SensorReading::new(25.0, 35.0).with_light(60.0), t0)
            .unwrap();
        db.insert_reading_at(&SensorReading::new(22.0, 38.0), t0 - Duration::minutes(5))
            .unwrap();

        let readings = db.recent_readings(10).unwrap();
        let temps: Vec<f64> = readings.iter().map(|r| r.temperature).collect();
        assert_eq!(temps, vec![25.0, 22.0, 20.0]);
        assert_eq!(readings[0].light, Some(60.0));
        assert_eq!(readings[1].light, None);
        assert_eq!(db.count_readings().unwrap(), 3);
    }

    #[test]
    fn limit_is_respected() {
        let db = Database::open_in_memory().unwrap();
        for i in 0..5 {
            db.insert_reading(&SensorReading::new(20.0 + i as f64, 50.0)).unwrap();
        }
        assert_eq!(db.recent_readings(2).unwrap().len(), 2);
        assert!(Database::open_in_memory().unwrap().recent_readings(10).unwrap().is_empty());
    }

    #[test]
    fn insert_returns_stored_row() {
        let db = Database::open_in_memory().unwrap();
        let stored = db.insert_reading(&SensorReading::new(21.4, 27.0)).unwrap();
        assert_eq!(stored.id, 1);
        assert_eq!(stored.soil_moisture, 27.0);
        let back = &db.recent_readings(1).unwrap()[0];
        assert_eq!(back.id, stored.id);
        assert_eq!(back.recorded_at.timestamp(), stored.recorded_at.timestamp());
    }
}

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    helpers::parse_optional_datetime,
    models::Staff,
    Database,
};

fn row_to_staff(row: &Row) -> Result<Staff> {
    let clock_in_time: Option<String> = row.get("clock_in_time")?;
    let is_clocked_in: i64 = row.get("is_clocked_in")?;

    Ok(Staff {
        id: row.get("id")?,
        name: row.get("name")?,
        role: row.get("role")?,
        branch: row.get("branch")?,
        hourly_rate: row.get("hourly_rate")?,
        mtd_tracked_hours: row.get("mtd_tracked_hours")?,
        is_clocked_in: is_clocked_in != 0,
        clock_in_time: parse_optional_datetime(clock_in_time, "clock_in_time")?,
    })
}

impl Database {
    pub async fn insert_staff(&self, staff: &Staff) -> Result<()> {
        let record = staff.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO staff (id, name, role, branch, hourly_rate, mtd_tracked_hours,
                     is_clocked_in, clock_in_time)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id,
                    record.name,
                    record.role,
                    record.branch,
                    record.hourly_rate,
                    record.mtd_tracked_hours,
                    record.is_clocked_in as i64,
                    record.clock_in_time.map(|dt| dt.to_rfc3339()),
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn get_staff(&self, staff_id: &str) -> Result<Option<Staff>> {
        let staff_id = staff_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, role, branch, hourly_rate, mtd_tracked_hours,
                        is_clocked_in, clock_in_time
                 FROM staff WHERE id = ?1",
            )?;

            let mut rows = stmt.query(params![staff_id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_staff(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    pub async fn list_staff(&self) -> Result<Vec<Staff>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, role, branch, hourly_rate, mtd_tracked_hours,
                        is_clocked_in, clock_in_time
                 FROM staff ORDER BY name",
            )?;

            let mut rows = stmt.query([])?;
            let mut members = Vec::new();
            while let Some(row) = rows.next()? {
                members.push(row_to_staff(row)?);
            }
            Ok(members)
        })
        .await
    }

    pub async fn set_staff_clocked_in(
        &self,
        staff_id: &str,
        clock_in_time: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let staff_id = staff_id.to_string();
        self.execute(move |conn| {
            let updated = conn.execute(
                "UPDATE staff SET is_clocked_in = ?1, clock_in_time = ?2 WHERE id = ?3",
                params![
                    clock_in_time.is_some() as i64,
                    clock_in_time.map(|dt| dt.to_rfc3339()),
                    staff_id,
                ],
            )?;
            if updated == 0 {
                anyhow::bail!("staff {staff_id} not found");
            }
            Ok(())
        })
        .await
    }
}

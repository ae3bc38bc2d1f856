use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{
    helpers::{parse_date, parse_priority, parse_task_status, to_i64, to_sla, to_u64},
    models::{Task, TaskStatus},
    Database,
};

fn row_to_task(row: &Row) -> Result<Task> {
    let due_date: String = row.get("due_date")?;
    let status: String = row.get("status")?;
    let priority: String = row.get("priority")?;
    let sla_progress: i64 = row.get("sla_progress")?;
    let total_tracked_minutes: i64 = row.get("total_tracked_minutes")?;

    Ok(Task {
        id: row.get("id")?,
        client_id: row.get("client_id")?,
        client_name: row.get("client_name")?,
        project_id: row.get("project_id")?,
        service_type: row.get("service_type")?,
        period: row.get("period")?,
        due_date: parse_date(&due_date, "due_date")?,
        status: parse_task_status(&status)?,
        assignee_id: row.get("assignee_id")?,
        assigned_to: row.get("assigned_to")?,
        priority: parse_priority(&priority)?,
        branch: row.get("branch")?,
        sla_progress: to_sla(sla_progress),
        total_tracked_minutes: to_u64(total_tracked_minutes, "total_tracked_minutes")?,
    })
}

const TASK_COLUMNS: &str = "id, client_id, client_name, project_id, service_type, period, \
     due_date, status, assignee_id, assigned_to, priority, branch, sla_progress, \
     total_tracked_minutes";

impl Database {
    pub async fn insert_task(&self, task: &Task) -> Result<()> {
        let record = task.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO tasks (id, client_id, client_name, project_id, service_type, period,
                     due_date, status, assignee_id, assigned_to, priority, branch, sla_progress,
                     total_tracked_minutes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    record.id,
                    record.client_id,
                    record.client_name,
                    record.project_id,
                    record.service_type,
                    record.period,
                    record.due_date.format("%Y-%m-%d").to_string(),
                    record.status.as_str(),
                    record.assignee_id,
                    record.assigned_to,
                    record.priority.as_str(),
                    record.branch,
                    i64::from(record.sla_progress),
                    to_i64(record.total_tracked_minutes)?,
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        let task_id = task_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"
            ))?;

            let mut rows = stmt.query(params![task_id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_task(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks ORDER BY due_date, id"
            ))?;

            let mut rows = stmt.query([])?;
            let mut tasks = Vec::new();
            while let Some(row) = rows.next()? {
                tasks.push(row_to_task(row)?);
            }
            Ok(tasks)
        })
        .await
    }

    pub async fn list_tasks_for_project(&self, project_id: &str) -> Result<Vec<Task>> {
        let project_id = project_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = ?1 ORDER BY due_date, id"
            ))?;

            let mut rows = stmt.query(params![project_id])?;
            let mut tasks = Vec::new();
            while let Some(row) = rows.next()? {
                tasks.push(row_to_task(row)?);
            }
            Ok(tasks)
        })
        .await
    }

    /// Status and SLA progress always change together (the lifecycle module
    /// recomputes the SLA on every transition).
    pub async fn update_task_status(
        &self,
        task_id: &str,
        status: TaskStatus,
        sla_progress: u8,
    ) -> Result<()> {
        let task_id = task_id.to_string();
        self.execute(move |conn| {
            let updated = conn.execute(
                "UPDATE tasks SET status = ?1, sla_progress = ?2 WHERE id = ?3",
                params![status.as_str(), i64::from(sla_progress), task_id],
            )?;
            if updated == 0 {
                anyhow::bail!("task {task_id} not found");
            }
            Ok(())
        })
        .await
    }

    pub async fn update_task_assignee(
        &self,
        task_id: &str,
        assignee_id: Option<String>,
        assigned_to: &str,
    ) -> Result<()> {
        let task_id = task_id.to_string();
        let assigned_to = assigned_to.to_string();
        self.execute(move |conn| {
            let updated = conn.execute(
                "UPDATE tasks SET assignee_id = ?1, assigned_to = ?2 WHERE id = ?3",
                params![assignee_id, assigned_to, task_id],
            )?;
            if updated == 0 {
                anyhow::bail!("task {task_id} not found");
            }
            Ok(())
        })
        .await
    }

    pub async fn get_task_tracked_minutes(&self, task_id: &str) -> Result<u64> {
        let task_id = task_id.to_string();
        self.execute(move |conn| {
            let minutes: Option<i64> = conn
                .query_row(
                    "SELECT total_tracked_minutes FROM tasks WHERE id = ?1",
                    params![task_id],
                    |row| row.get(0),
                )
                .optional()?;

            match minutes {
                Some(value) => to_u64(value, "total_tracked_minutes"),
                None => anyhow::bail!("task {task_id} not found"),
            }
        })
        .await
    }
}

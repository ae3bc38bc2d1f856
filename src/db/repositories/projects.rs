use anyhow::Result;
use rusqlite::{params, Row};

use crate::db::{
    helpers::{parse_date, parse_priority, parse_project_status},
    models::{Project, ProjectStatus},
    Database,
};

fn row_to_project(row: &Row) -> Result<Project> {
    let status: String = row.get("status")?;
    let start_date: String = row.get("start_date")?;
    let due_date: String = row.get("due_date")?;
    let priority: String = row.get("priority")?;

    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        client_id: row.get("client_id")?,
        client_name: row.get("client_name")?,
        status: parse_project_status(&status)?,
        start_date: parse_date(&start_date, "start_date")?,
        due_date: parse_date(&due_date, "due_date")?,
        manager: row.get("manager")?,
        branch: row.get("branch")?,
        priority: parse_priority(&priority)?,
        budget: row.get("budget")?,
        total_hours_tracked: row.get("total_hours_tracked")?,
    })
}

impl Database {
    pub async fn insert_project(&self, project: &Project) -> Result<()> {
        let record = project.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO projects (id, name, description, client_id, client_name, status,
                     start_date, due_date, manager, branch, priority, budget, total_hours_tracked)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    record.id,
                    record.name,
                    record.description,
                    record.client_id,
                    record.client_name,
                    record.status.as_str(),
                    record.start_date.format("%Y-%m-%d").to_string(),
                    record.due_date.format("%Y-%m-%d").to_string(),
                    record.manager,
                    record.branch,
                    record.priority.as_str(),
                    record.budget,
                    record.total_hours_tracked,
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn get_project(&self, project_id: &str) -> Result<Option<Project>> {
        let project_id = project_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, description, client_id, client_name, status, start_date,
                        due_date, manager, branch, priority, budget, total_hours_tracked
                 FROM projects WHERE id = ?1",
            )?;

            let mut rows = stmt.query(params![project_id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_project(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, description, client_id, client_name, status, start_date,
                        due_date, manager, branch, priority, budget, total_hours_tracked
                 FROM projects ORDER BY due_date, id",
            )?;

            let mut rows = stmt.query([])?;
            let mut projects = Vec::new();
            while let Some(row) = rows.next()? {
                projects.push(row_to_project(row)?);
            }
            Ok(projects)
        })
        .await
    }

    pub async fn update_project_status(
        &self,
        project_id: &str,
        status: ProjectStatus,
    ) -> Result<()> {
        let project_id = project_id.to_string();
        self.execute(move |conn| {
            let updated = conn.execute(
                "UPDATE projects SET status = ?1 WHERE id = ?2",
                params![status.as_str(), project_id],
            )?;
            if updated == 0 {
                anyhow::bail!("project {project_id} not found");
            }
            Ok(())
        })
        .await
    }
}

use anyhow::Result;
use rusqlite::{params, Row};

use crate::db::{
    helpers::{items_from_json, items_to_json, parse_date, parse_invoice_status},
    models::{Invoice, InvoiceStatus},
    Database,
};

fn row_to_invoice(row: &Row) -> Result<Invoice> {
    let date: String = row.get("date")?;
    let status: String = row.get("status")?;
    let items: String = row.get("items")?;

    Ok(Invoice {
        id: row.get("id")?,
        client_id: row.get("client_id")?,
        client_name: row.get("client_name")?,
        date: parse_date(&date, "date")?,
        amount: row.get("amount")?,
        status: parse_invoice_status(&status)?,
        items: items_from_json(&items)?,
    })
}

impl Database {
    pub async fn insert_invoice(&self, invoice: &Invoice) -> Result<()> {
        let record = invoice.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO invoices (id, client_id, client_name, date, amount, status, items)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id,
                    record.client_id,
                    record.client_name,
                    record.date.format("%Y-%m-%d").to_string(),
                    record.amount,
                    record.status.as_str(),
                    items_to_json(&record.items)?,
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn list_invoices(&self) -> Result<Vec<Invoice>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, client_id, client_name, date, amount, status, items
                 FROM invoices ORDER BY date, id",
            )?;

            let mut rows = stmt.query([])?;
            let mut invoices = Vec::new();
            while let Some(row) = rows.next()? {
                invoices.push(row_to_invoice(row)?);
            }
            Ok(invoices)
        })
        .await
    }

    pub async fn mark_invoice_status(
        &self,
        invoice_id: &str,
        status: InvoiceStatus,
    ) -> Result<()> {
        let invoice_id = invoice_id.to_string();
        self.execute(move |conn| {
            let updated = conn.execute(
                "UPDATE invoices SET status = ?1 WHERE id = ?2",
                params![status.as_str(), invoice_id],
            )?;
            if updated == 0 {
                anyhow::bail!("invoice {invoice_id} not found");
            }
            Ok(())
        })
        .await
    }
}

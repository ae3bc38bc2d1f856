mod invoices;
mod projects;
mod staff;
mod tasks;
mod time_logs;

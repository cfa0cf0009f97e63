//! Startup schema migrations
//!
//! Migrations are plain DDL statements grouped by feature area. Every group
//! carries a [`Policy`]: a `Required` failure aborts the run, a `BestEffort`
//! failure is logged and the run continues. Statements are idempotent
//! (`IF NOT EXISTS`, `DROP ... IF EXISTS` before create), so the whole set is
//! executed on every start. Runs are not transactional.

mod groups;
mod runner;

pub use groups::{all_groups, MigrationGroup, Source};
pub use runner::{
    load_group, run_group, run_migrations, GroupReport, MigrationReport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Required,
    BestEffort,
}

#[derive(Debug, Clone)]
pub struct Migration {
    pub name: String,
    pub statement: String,
    pub policy: Policy,
}

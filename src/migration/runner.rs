use std::{future::Future, path::Path};

use tracing::{debug, error, info, warn};

use crate::{dao::PoolType, error::Error};

use super::{all_groups, Migration, MigrationGroup, Policy};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupReport {
    pub group: String,
    pub applied: usize,
    pub skipped: usize,
    /// Set when the group's migrations could not be loaded at all.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    pub groups: Vec<GroupReport>,
}

impl MigrationReport {
    pub fn applied(&self) -> usize {
        self.groups.iter().map(|g| g.applied).sum()
    }

    pub fn skipped(&self) -> usize {
        self.groups.iter().map(|g| g.skipped).sum()
    }

    /// Groups that were not run because loading them failed.
    pub fn failed(&self) -> Vec<&GroupReport> {
        self.groups.iter().filter(|g| g.error.is_some()).collect()
    }
}

/// Applies every migration group in order against `pool`. A group that
/// cannot be loaded is recorded as failed in the report and the remaining
/// groups still run.
pub async fn run_migrations(
    pool: &PoolType,
    migrations_dir: &Path,
) -> Result<MigrationReport, Error> {
    info!("Running database migrations...");

    let mut report = MigrationReport::default();

    for group in all_groups() {
        let (migrations, unreadable) = match load_group(&group, migrations_dir)
        {
            Ok(loaded) => loaded,
            Err(failed) => {
                report.groups.push(failed);
                continue;
            },
        };

        let mut group_report = run_group(group.name, &migrations, |statement| {
            let pool = pool.clone();
            async move {
                sqlx::raw_sql(&statement).execute(&pool).await.map(drop)
            }
        })
        .await?;
        group_report.skipped += unreadable;

        info!(
            "Migration group {}: {} applied, {} skipped",
            group_report.group, group_report.applied, group_report.skipped
        );

        report.groups.push(group_report);
    }

    info!(
        "Migrations complete: {} applied, {} skipped",
        report.applied(),
        report.skipped()
    );

    Ok(report)
}

/// Loads `group`, turning a load failure into that group's report with
/// every statement counted as skipped.
pub fn load_group(
    group: &MigrationGroup,
    migrations_dir: &Path,
) -> Result<(Vec<Migration>, usize), GroupReport> {
    group.load(migrations_dir).map_err(|e| {
        error!("Migration group {} not loaded: {}", group.name, e);
        GroupReport {
            group: group.name.to_owned(),
            applied: 0,
            skipped: group.source.len(),
            error: Some(e.to_string()),
        }
    })
}

/// Runs `migrations` in order through `execute`. Index numbers in logs and
/// errors are 1-based.
pub async fn run_group<F, Fut>(
    group: &str,
    migrations: &[Migration],
    mut execute: F,
) -> Result<GroupReport, Error>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<(), sqlx::Error>>,
{
    let mut report = GroupReport {
        group: group.to_owned(),
        ..Default::default()
    };

    for (position, migration) in migrations.iter().enumerate() {
        let index = position + 1;

        match execute(migration.statement.clone()).await {
            Ok(()) => {
                debug!("Migration {}#{} ({}) applied", group, index, migration.name);
                report.applied += 1;
            },
            Err(e) => match migration.policy {
                Policy::Required => {
                    return Err(Error::MigrationError {
                        group: group.to_owned(),
                        index,
                        source: e,
                    });
                },
                Policy::BestEffort => {
                    warn!(
                        "Migration {}#{} ({}) failed, continuing: {}",
                        group, index, migration.name, e
                    );
                    report.skipped += 1;
                },
            },
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::migration::Source;

    fn migrations(policy: Policy, statements: &[&str]) -> Vec<Migration> {
        statements
            .iter()
            .enumerate()
            .map(|(i, statement)| Migration {
                name: format!("test#{}", i + 1),
                statement: statement.to_string(),
                policy,
            })
            .collect()
    }

    fn failing_on(
        bad: &'static str,
        executed: Arc<Mutex<Vec<String>>>,
    ) -> impl FnMut(
        String,
    ) -> std::future::Ready<Result<(), sqlx::Error>> {
        move |statement| {
            executed.lock().unwrap().push(statement.clone());
            if statement == bad {
                std::future::ready(Err(sqlx::Error::Protocol(String::from(
                    "syntax error",
                ))))
            } else {
                std::future::ready(Ok(()))
            }
        }
    }

    #[tokio::test]
    async fn required_failure_stops_the_group() {
        let executed = Arc::new(Mutex::new(vec![]));
        let list = migrations(Policy::Required, &["a", "bad", "c"]);

        let result =
            run_group("core", &list, failing_on("bad", executed.clone())).await;

        match result {
            Err(Error::MigrationError { group, index, .. }) => {
                assert_eq!(group, "core");
                assert_eq!(index, 2);
            },
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(*executed.lock().unwrap(), vec!["a", "bad"]);
    }

    #[tokio::test]
    async fn best_effort_failure_is_skipped() {
        let executed = Arc::new(Mutex::new(vec![]));
        let list = migrations(Policy::BestEffort, &["a", "bad", "c"]);

        let report = run_group("futures", &list, failing_on("bad", executed.clone()))
            .await
            .unwrap();

        assert_eq!(report.applied, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(*executed.lock().unwrap(), vec!["a", "bad", "c"]);
    }

    #[tokio::test]
    async fn empty_group_reports_nothing() {
        let executed = Arc::new(Mutex::new(vec![]));
        let report = run_group("empty", &[], failing_on("bad", executed))
            .await
            .unwrap();

        assert_eq!(report, GroupReport {
            group: String::from("empty"),
            applied: 0,
            skipped: 0,
            error: None,
        });
    }

    #[test]
    fn report_sums_groups() {
        let report = MigrationReport {
            groups: vec![
                GroupReport {
                    group: String::from("core"),
                    applied: 3,
                    ..Default::default()
                },
                GroupReport {
                    group: String::from("futures"),
                    applied: 5,
                    skipped: 2,
                    ..Default::default()
                },
            ],
        };

        assert_eq!(report.applied(), 8);
        assert_eq!(report.skipped(), 2);
        assert!(report.failed().is_empty());
    }

    #[test]
    fn missing_directory_fails_only_its_group() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let files = MigrationGroup {
            name: "user_settings",
            policy: Policy::BestEffort,
            source: Source::Files(&["017_a.sql", "018_b.sql"]),
        };
        let inline = MigrationGroup {
            name: "core",
            policy: Policy::Required,
            source: Source::Inline(&["SELECT 1"]),
        };

        let failed = load_group(&files, &missing).unwrap_err();

        assert_eq!(failed.group, "user_settings");
        assert_eq!(failed.applied, 0);
        assert_eq!(failed.skipped, 2);
        assert!(failed
            .error
            .as_deref()
            .unwrap()
            .starts_with("Migrations directory not found"));

        let (migrations, _) = load_group(&inline, &missing).unwrap();
        assert_eq!(migrations.len(), 1);

        let report = MigrationReport {
            groups: vec![
                GroupReport {
                    group: String::from("core"),
                    applied: 1,
                    ..Default::default()
                },
                failed,
            ],
        };
        assert_eq!(report.failed().len(), 1);
        assert_eq!(report.failed()[0].group, "user_settings");
    }
}

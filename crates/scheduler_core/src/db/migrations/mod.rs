//! Versioned schema steps for the `scheduler` table.
//!
//! Pending steps run inside one transaction, so a failing step leaves the
//! file at its previous `user_version`.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, Transaction};

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "create_scheduler",
    sql: include_str!("0001_init.sql"),
}];

/// Schema version written by the last registered migration.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Migrates `conn` from its stored `user_version` to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this build.
/// - `Migration` carrying the version of the first failing step.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = schema_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        error!(
            "event=db_migrate module=db status=error from_version={} latest_supported={} error_code=schema_too_new",
            from_version, latest
        );
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from_version);
    let tx = conn.transaction()?;
    let mut applied = 0usize;
    for migration in pending {
        run_step(&tx, migration)?;
        applied += 1;
    }
    if applied == 0 {
        return Ok(());
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} applied={}",
        from_version, latest, applied
    );
    Ok(())
}

fn run_step(tx: &Transaction<'_>, migration: &Migration) -> DbResult<()> {
    info!(
        "event=db_migrate module=db status=start version={} name={}",
        migration.version, migration.name
    );
    tx.execute_batch(migration.sql)
        .and_then(|()| {
            tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
        })
        .map_err(|source| {
            error!(
                "event=db_migrate module=db status=error version={} name={} error={}",
                migration.version, migration.name, source
            );
            DbError::Migration {
                version: migration.version,
                source,
            }
        })
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

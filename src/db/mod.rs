use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection};
use std::time::Duration;

pub mod access;
pub mod alias;
pub mod channel;
pub mod keyword;
pub mod site;
pub mod watcher;
mod model;
mod schema;

use crate::error::*;

pub use self::model::*;
pub use self::schema::*;

pub type Pool = diesel::r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type Conn = diesel::r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

const SCHEMA: &str = include_str!("schema.sql");

#[derive(Debug, Clone, Copy)]
struct Pragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for Pragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000; PRAGMA foreign_keys = ON;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

#[derive(Clone)]
pub struct Db {
    pool: Pool
}

impl Db {
    pub fn open(url: &str) -> Outcome<Self> {
        Self::with_size(url, 8)
    }

    pub fn with_size(url: &str, size: u32) -> Outcome<Self> {
        let pool = Pool::builder()
            .max_size(size)
            .connection_timeout(Duration::from_secs(10))
            .connection_customizer(Box::new(Pragmas))
            .build(ConnectionManager::<SqliteConnection>::new(url))?;
        let db = Self { pool };
        db.migrate()?;
        Ok(db)
    }

    pub fn migrate(&self) -> Outcome<()> {
        let mut conn = self.conn()?;
        conn.batch_execute("PRAGMA journal_mode = WAL;")?;
        conn.batch_execute(SCHEMA)?;
        Ok(())
    }

    pub fn conn(&self) -> Outcome<Conn> {
        Ok(self.pool.get()?)
    }

    /// Runs `f` in one transaction; any error rolls the whole thing back.
    pub fn transaction<T, F>(&self, f: F) -> Outcome<T>
    where F: FnOnce(&mut SqliteConnection) -> Outcome<T> {
        let mut pooled = self.conn()?;
        let conn: &mut SqliteConnection = &mut pooled;
        conn.transaction::<T, Error, _>(f)
    }

    /// A read outside of any explicit transaction.
    pub fn read<T, F>(&self, f: F) -> Outcome<T>
    where F: FnOnce(&mut SqliteConnection) -> Outcome<T> {
        let mut pooled = self.conn()?;
        f(&mut pooled)
    }
}

//! Infrastructure layer - external concerns

pub mod database;
pub mod storage;

pub use database::{
    init_database, run_migrations, DatabaseConfig, SeaOrmDomainRepository,
    SeaOrmUnitOfWorkProvider,
};
pub use storage::{InMemoryStore, InMemoryUnitOfWorkProvider};

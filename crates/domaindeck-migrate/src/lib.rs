pub mod credentials;
pub mod remote;
pub mod report;
pub mod runner;
pub mod script;
pub mod splitter;

pub use credentials::CredentialProvider;
pub use remote::{HttpSqlExecutor, RemoteConfig, SqlExecutor};
pub use report::{MigrationReport, StatementOutcome};
pub use runner::{MigrationRunner, RunnerOptions};
pub use script::{collect_sql_files, read_script};
pub use splitter::split_statements;

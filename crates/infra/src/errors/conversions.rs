//! Conversions from external infrastructure errors into domain errors.

use burner_domain::BurnerError;
use r2d2::Error as PoolError;
use rusqlite::Error as SqlError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BurnerError);

impl From<InfraError> for BurnerError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BurnerError> for InfraError {
    fn from(value: BurnerError) -> Self {
        Self(value)
    }
}

trait IntoBurnerError {
    fn into_burner(self) -> BurnerError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → BurnerError */
/* -------------------------------------------------------------------------- */

impl IntoBurnerError for SqlError {
    fn into_burner(self) -> BurnerError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => BurnerError::Storage("store is busy".into()),
                    ErrorCode::DatabaseLocked => BurnerError::Storage("store is locked".into()),
                    ErrorCode::ReadOnly => BurnerError::Storage("store is read-only".into()),
                    ErrorCode::DiskFull => BurnerError::Storage("disk is full".into()),
                    ErrorCode::CannotOpen => {
                        BurnerError::Storage(format!("unable to open store: {message}"))
                    }
                    _ => BurnerError::Storage(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                BurnerError::Storage(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                BurnerError::Storage(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => BurnerError::Storage("invalid UTF-8 returned from sqlite".into()),
            RE::InvalidPath(path) => {
                BurnerError::Config(format!("invalid store path: {}", path.to_string_lossy()))
            }
            other => BurnerError::Storage(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        Self(value.into_burner())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → BurnerError */
/* -------------------------------------------------------------------------- */

impl IntoBurnerError for PoolError {
    fn into_burner(self) -> BurnerError {
        BurnerError::Storage(format!("connection pool error: {self}"))
    }
}

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        Self(value.into_burner())
    }
}

pub fn map_sql_error(err: SqlError) -> BurnerError {
    InfraError::from(err).into()
}

pub fn map_pool_error(err: PoolError) -> BurnerError {
    InfraError::from(err).into()
}

/// A panicked or cancelled blocking task.
pub fn map_join_error(err: JoinError) -> BurnerError {
    if err.is_cancelled() {
        BurnerError::Internal("blocking task cancelled".into())
    } else {
        BurnerError::Internal(format!("blocking task panicked: {err}"))
    }
}

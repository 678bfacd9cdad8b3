// sqlx::Error -> AppError mapping with PostgreSQL-specific detail

use jobpost_relay_core::error::AppError;

// Helper to convert sqlx::Error to AppError with structured information
pub fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            // Extract SQLSTATE and message
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLSTATE codes: https://www.postgresql.org/docs/current/errcodes-appendix.html
                match code_str {
                    "42P01" => AppError::Database(format!(
                        "Table missing (undefined_table): {}",
                        db_err.message()
                    )),
                    "42703" => AppError::Database(format!(
                        "Column missing (undefined_column): {}",
                        db_err.message()
                    )),
                    "28P01" | "28000" => AppError::Database(format!(
                        "Authentication failed: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "3D000" => AppError::Database(format!(
                        "Database does not exist: {}",
                        db_err.message()
                    )),
                    "57P01" | "57P02" | "57P03" => AppError::Database(format!(
                        "Server unavailable: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "57014" => AppError::Database(format!(
                        "Query cancelled: {}",
                        db_err.message()
                    )),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::Io(io_err) => AppError::Database(format!("Connection failed: {}", io_err)),
        sqlx::Error::Tls(tls_err) => AppError::Database(format!("TLS error: {}", tls_err)),
        sqlx::Error::Configuration(cfg_err) => {
            AppError::Config(format!("Invalid postgres_connection: {}", cfg_err))
        }
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        sqlx::Error::ColumnDecode { index, source } => AppError::Database(format!(
            "Cannot decode column {}: {}",
            index, source
        )),
        _ => {
            // Protocol and other driver errors
            AppError::Database(err.to_string())
        }
    }
}

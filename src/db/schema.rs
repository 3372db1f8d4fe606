//! SQL schema definitions

pub const SCHEMA: &str = r#"
-- Secrets table: one opaque value per key
CREATE TABLE IF NOT EXISTS secrets (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

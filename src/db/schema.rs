//! Database schema definitions for revdash.

/// Ordered list of migrations. Index `i` is schema version `i + 1`.
pub const MIGRATIONS: &[&str] = &[
    // v1: chat messages, one partition per (owner, repo, pr)
    r#"
    CREATE TABLE IF NOT EXISTS messages (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        owner       TEXT NOT NULL,
        repo        TEXT NOT NULL,
        pr          INTEGER NOT NULL,
        author      TEXT NOT NULL,
        role        TEXT NOT NULL,
        content     TEXT NOT NULL,
        created_at  TEXT NOT NULL
    );
    "#,
    // v2: room lookups
    r#"
    CREATE INDEX IF NOT EXISTS idx_messages_room ON messages(owner, repo, pr, id);
    "#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_not_empty() {
        assert!(!MIGRATIONS.is_empty());
    }

    #[test]
    fn test_messages_migration_columns() {
        let messages = MIGRATIONS[0];
        assert!(messages.contains("CREATE TABLE IF NOT EXISTS messages"));
        for column in ["owner", "repo", "pr", "author", "role", "content", "created_at"] {
            assert!(messages.contains(column), "missing column {column}");
        }
        assert!(messages.contains("AUTOINCREMENT"));
    }

    #[test]
    fn test_room_index_migration() {
        assert!(MIGRATIONS[1].contains("idx_messages_room"));
    }
}

//! Collection catalog and table bootstrap.
//!
//! Each collection is a table of `(id UUID, doc JSONB)`. The catalog records
//! which document field holds the owner (indexed for ListByOwner) and which
//! field tuples must be unique.

use sqlx::PgPool;
use tracing::info;

use super::store::StoreResult;
use crate::filter::Filter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub owner_field: &'static str,
    /// Field tuple that may not repeat across documents (empty = none)
    pub unique: &'static [&'static str],
}

pub const POSTS: CollectionSpec = CollectionSpec {
    name: "posts",
    owner_field: "userEmail",
    unique: &[],
};

pub const SAVED_POSTS: CollectionSpec = CollectionSpec {
    name: "saved_posts",
    owner_field: "userEmail",
    unique: &["postId", "userEmail"],
};

pub const SCHEDULES: CollectionSpec = CollectionSpec {
    name: "schedules",
    owner_field: "email",
    unique: &[],
};

pub const TRANSACTIONS: CollectionSpec = CollectionSpec {
    name: "transactions",
    owner_field: "email",
    unique: &[],
};

pub const TASKS: CollectionSpec = CollectionSpec {
    name: "tasks",
    owner_field: "email",
    unique: &[],
};

pub const SKILLS: CollectionSpec = CollectionSpec {
    name: "skills",
    owner_field: "email",
    unique: &[],
};

pub const EXAM_ROUTINES: CollectionSpec = CollectionSpec {
    name: "exam_routines",
    owner_field: "email",
    unique: &[],
};

pub const COLLECTIONS: &[CollectionSpec] = &[
    POSTS,
    SAVED_POSTS,
    SCHEDULES,
    TRANSACTIONS,
    TASKS,
    SKILLS,
    EXAM_ROUTINES,
];

pub fn lookup(name: &str) -> Option<&'static CollectionSpec> {
    COLLECTIONS.iter().find(|c| c.name == name)
}

impl CollectionSpec {
    /// Idempotent DDL for this collection's table and indexes.
    pub fn ddl(&self) -> StoreResult<Vec<String>> {
        Filter::validate_table_name(self.name)?;
        Filter::validate_field(self.owner_field)?;

        let mut statements = vec![
            format!(
                "CREATE TABLE IF NOT EXISTS \"{}\" (\
                 id UUID PRIMARY KEY, \
                 doc JSONB NOT NULL DEFAULT '{{}}'::jsonb, \
                 inserted_at TIMESTAMPTZ NOT NULL DEFAULT now())",
                self.name
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS \"{name}_owner_idx\" ON \"{name}\" ((doc ->> '{owner}'))",
                name = self.name,
                owner = self.owner_field
            ),
        ];

        if !self.unique.is_empty() {
            let mut columns = Vec::with_capacity(self.unique.len());
            for field in self.unique {
                Filter::validate_field(field)?;
                columns.push(format!("(doc ->> '{}')", field));
            }
            statements.push(format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS \"{name}_unique_idx\" ON \"{name}\" ({columns})",
                name = self.name,
                columns = columns.join(", ")
            ));
        }

        Ok(statements)
    }
}

/// Create every collection table and index that does not exist yet.
pub async fn bootstrap(pool: &PgPool) -> StoreResult<()> {
    for collection in COLLECTIONS {
        for statement in collection.ddl()? {
            sqlx::query(&statement).execute(pool).await?;
        }
        info!("Collection ready: {}", collection.name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_valid_tables() {
        for collection in COLLECTIONS {
            assert!(collection.ddl().is_ok(), "bad collection {}", collection.name);
        }
    }

    #[test]
    fn saved_posts_carry_unique_index() {
        let ddl = SAVED_POSTS.ddl().unwrap();
        assert_eq!(ddl.len(), 3);
        assert_eq!(
            ddl[2],
            "CREATE UNIQUE INDEX IF NOT EXISTS \"saved_posts_unique_idx\" ON \"saved_posts\" ((doc ->> 'postId'), (doc ->> 'userEmail'))"
        );
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(lookup("tasks"), Some(&TASKS));
        assert!(lookup("users").is_none());
    }
}

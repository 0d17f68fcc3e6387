use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    domain::{
        errors::{PostError, PostResult},
        models::{Category, NewPostRecord, Post, PostChanges, PostFilter, SortOrder},
        value_objects::{ImageKey, OwnerId, PostId},
    },
    ports::repositories::PostRepository,
};

const POST_COLUMNS: &str = "id, owner_id, title, description, image_key, category, used, created_at";

/// PostgreSQL-backed implementation of PostRepository using sqlx
#[derive(Clone)]
pub struct SqlPostRepository {
    pool: PgPool,
}

impl SqlPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initialize database tables
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id UUID PRIMARY KEY,
                owner_id VARCHAR NOT NULL,
                title VARCHAR NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                image_key VARCHAR,
                category VARCHAR,
                used BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );

            CREATE INDEX IF NOT EXISTS idx_posts_owner ON posts(owner_id);
            CREATE INDEX IF NOT EXISTS idx_posts_owner_created_at ON posts(owner_id, created_at);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn backend_error(context: &str, err: sqlx::Error) -> PostError {
        PostError::BackendUnavailable {
            message: format!("{}: {}", context, err),
            source: Some(err.to_string()),
        }
    }

    fn row_to_post(row: &PgRow) -> PostResult<Post> {
        let id: Uuid = row.try_get("id").map_err(decode_error)?;
        let owner_id: String = row.try_get("owner_id").map_err(decode_error)?;
        let title: String = row.try_get("title").map_err(decode_error)?;
        let description: String = row.try_get("description").map_err(decode_error)?;
        let image_key: Option<String> = row.try_get("image_key").map_err(decode_error)?;
        let category: Option<String> = row.try_get("category").map_err(decode_error)?;
        let used: bool = row.try_get("used").map_err(decode_error)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode_error)?;

        let owner = OwnerId::new(owner_id)
            .map_err(|e| PostError::backend(format!("Corrupt owner id in row: {}", e)))?;

        let image_key = image_key
            .map(ImageKey::new)
            .transpose()
            .map_err(|e| PostError::backend(format!("Corrupt image key in row: {}", e)))?;

        // Unknown stored category text is a corrupt row, not silently
        // uncategorized.
        let category = category
            .map(|c| c.parse::<Category>())
            .transpose()
            .map_err(|e| PostError::backend(format!("Corrupt category in row: {}", e)))?;

        Ok(Post {
            id: PostId::from_uuid(id),
            owner,
            title,
            description,
            image_key,
            category,
            used,
            created_at,
        })
    }
}

fn decode_error(err: sqlx::Error) -> PostError {
    PostError::BackendUnavailable {
        message: format!("Failed to decode post row: {}", err),
        source: Some(err.to_string()),
    }
}

#[async_trait]
impl PostRepository for SqlPostRepository {
    async fn list(&self, owner: &OwnerId, filter: &PostFilter) -> PostResult<Vec<Post>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM posts WHERE owner_id = ", POST_COLUMNS));
        query.push_bind(owner.as_str());

        if let Some(category) = filter.category {
            query.push(" AND category = ");
            query.push_bind(category.as_str());
        }

        if let Some(used) = filter.used.required_value() {
            query.push(" AND used = ");
            query.push_bind(used);
        }

        query.push(match filter.sort {
            SortOrder::Ascending => " ORDER BY created_at ASC",
            SortOrder::Descending => " ORDER BY created_at DESC",
        });

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::backend_error("Database error listing posts", e))?;

        rows.iter().map(Self::row_to_post).collect()
    }

    async fn get(&self, id: &PostId, owner: &OwnerId) -> PostResult<Post> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM posts WHERE id = $1 AND owner_id = $2",
            POST_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(owner.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::backend_error("Database error fetching post", e))?;

        match row {
            Some(row) => Self::row_to_post(&row),
            None => Err(PostError::NotFound { id: *id }),
        }
    }

    async fn create(&self, owner: &OwnerId, record: NewPostRecord) -> PostResult<Post> {
        if record.title.trim().is_empty() {
            return Err(PostError::validation("Title cannot be empty"));
        }

        let id = PostId::generate();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO posts (id, owner_id, title, description, image_key, category, used)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(owner.as_str())
        .bind(&record.title)
        .bind(&record.description)
        .bind(record.image_key.as_ref().map(|k| k.as_str()))
        .bind(record.category.map(|c| c.as_str()))
        .bind(record.used)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::backend_error("Database error inserting post", e))?;

        Self::row_to_post(&row)
    }

    async fn update(
        &self,
        id: &PostId,
        owner: &OwnerId,
        changes: PostChanges,
    ) -> PostResult<Post> {
        if let Some(title) = &changes.title {
            if title.trim().is_empty() {
                return Err(PostError::validation("Title cannot be empty"));
            }
        }

        if changes.is_empty() {
            return self.get(id, owner).await;
        }

        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE posts SET ");
        let mut assignments = query.separated(", ");

        if let Some(title) = &changes.title {
            assignments.push("title = ");
            assignments.push_bind_unseparated(title);
        }
        if let Some(description) = &changes.description {
            assignments.push("description = ");
            assignments.push_bind_unseparated(description);
        }
        if let Some(category) = &changes.category {
            assignments.push("category = ");
            assignments.push_bind_unseparated(category.map(|c| c.as_str()));
        }
        if let Some(used) = changes.used {
            assignments.push("used = ");
            assignments.push_bind_unseparated(used);
        }
        if let Some(image_key) = &changes.image_key {
            assignments.push("image_key = ");
            assignments.push_bind_unseparated(
                image_key.as_ref().map(|k| k.as_str().to_string()),
            );
        }

        query.push(" WHERE id = ");
        query.push_bind(id.as_uuid());
        query.push(" AND owner_id = ");
        query.push_bind(owner.as_str());
        query.push(format!(" RETURNING {}", POST_COLUMNS));

        let row = query
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::backend_error("Database error updating post", e))?;

        match row {
            Some(row) => Self::row_to_post(&row),
            None => Err(PostError::NotFound { id: *id }),
        }
    }

    async fn delete(&self, id: &PostId, owner: &OwnerId) -> PostResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND owner_id = $2")
            .bind(id.as_uuid())
            .bind(owner.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| Self::backend_error("Database error deleting post", e))?;

        if result.rows_affected() == 0 {
            return Err(PostError::NotFound { id: *id });
        }

        Ok(())
    }
}

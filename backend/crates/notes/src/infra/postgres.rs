//! PostgreSQL Repository Implementations

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::UserId;
use crate::domain::entities::{
    Folder, FolderChanges, FolderWithNotes, NewFolder, NewNote, Note, NoteChanges,
};
use crate::domain::repository::{FolderRepository, NoteRepository};
use crate::domain::value_objects::{FolderColor, FolderId, FolderName, NoteId};
use crate::error::NotesResult;

/// PostgreSQL-backed notes and folders
#[derive(Clone)]
pub struct PgNotesRepository {
    pool: PgPool,
}

impl PgNotesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn notes_in_folders(
        &self,
        user_id: UserId,
        folder_ids: &[i64],
    ) -> NotesResult<HashMap<i64, Vec<Note>>> {
        let rows = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT id, user_id, folder_id, title, content, file_url, created_at, updated_at
            FROM notes
            WHERE user_id = $1 AND folder_id = ANY($2)
            ORDER BY updated_at DESC, id DESC
            "#,
        )
        .bind(user_id.value())
        .bind(folder_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<Note>> = HashMap::new();
        for row in rows {
            if let Some(folder_id) = row.folder_id {
                grouped.entry(folder_id).or_default().push(row.into_note());
            }
        }
        Ok(grouped)
    }
}

// ============================================================================
// Notes
// ============================================================================

impl NoteRepository for PgNotesRepository {
    async fn list(&self, user_id: UserId) -> NotesResult<Vec<Note>> {
        let rows = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT id, user_id, folder_id, title, content, file_url, created_at, updated_at
            FROM notes
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(NoteRow::into_note).collect())
    }

    async fn search_by_title(&self, user_id: UserId, term: &str) -> NotesResult<Vec<Note>> {
        let rows = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT id, user_id, folder_id, title, content, file_url, created_at, updated_at
            FROM notes
            WHERE user_id = $1 AND strpos(lower(title), lower($2)) > 0
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id.value())
        .bind(term)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(NoteRow::into_note).collect())
    }

    async fn find(&self, user_id: UserId, id: NoteId) -> NotesResult<Option<Note>> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT id, user_id, folder_id, title, content, file_url, created_at, updated_at
            FROM notes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.value())
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(NoteRow::into_note))
    }

    async fn create(&self, note: NewNote) -> NotesResult<Note> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            INSERT INTO notes (user_id, folder_id, title, content, file_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, folder_id, title, content, file_url, created_at, updated_at
            "#,
        )
        .bind(note.user_id.value())
        .bind(note.folder_id.map(FolderId::value))
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.file_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_note())
    }

    async fn update(
        &self,
        user_id: UserId,
        id: NoteId,
        changes: NoteChanges,
    ) -> NotesResult<Option<Note>> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            UPDATE notes SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                file_url = COALESCE($5, file_url),
                folder_id = COALESCE($6, folder_id),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, folder_id, title, content, file_url, created_at, updated_at
            "#,
        )
        .bind(id.value())
        .bind(user_id.value())
        .bind(changes.title)
        .bind(changes.content)
        .bind(changes.file_url)
        .bind(changes.folder_id.map(FolderId::value))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(NoteRow::into_note))
    }

    async fn delete(&self, user_id: UserId, id: NoteId) -> NotesResult<Option<Note>> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            DELETE FROM notes
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, folder_id, title, content, file_url, created_at, updated_at
            "#,
        )
        .bind(id.value())
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(NoteRow::into_note))
    }

    async fn move_to_folder(
        &self,
        user_id: UserId,
        id: NoteId,
        folder_id: Option<FolderId>,
    ) -> NotesResult<Option<Note>> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            UPDATE notes SET folder_id = $3, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, folder_id, title, content, file_url, created_at, updated_at
            "#,
        )
        .bind(id.value())
        .bind(user_id.value())
        .bind(folder_id.map(FolderId::value))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(NoteRow::into_note))
    }
}

// ============================================================================
// Folders
// ============================================================================

impl FolderRepository for PgNotesRepository {
    async fn create(&self, folder: NewFolder) -> NotesResult<Folder> {
        let row = sqlx::query_as::<_, FolderRow>(
            r#"
            INSERT INTO folders (user_id, name, color)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, color, created_at, updated_at
            "#,
        )
        .bind(folder.user_id.value())
        .bind(folder.name.as_str())
        .bind(folder.color.as_ref().map(FolderColor::as_str))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_folder())
    }

    async fn list_with_notes(&self, user_id: UserId) -> NotesResult<Vec<FolderWithNotes>> {
        let folders = sqlx::query_as::<_, FolderRow>(
            r#"
            SELECT id, user_id, name, color, created_at, updated_at
            FROM folders
            WHERE user_id = $1
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i64> = folders.iter().map(|f| f.id).collect();
        let mut notes = self.notes_in_folders(user_id, &ids).await?;

        Ok(folders
            .into_iter()
            .map(|row| FolderWithNotes {
                notes: notes.remove(&row.id).unwrap_or_default(),
                folder: row.into_folder(),
            })
            .collect())
    }

    async fn find_with_notes(
        &self,
        user_id: UserId,
        id: FolderId,
    ) -> NotesResult<Option<FolderWithNotes>> {
        let row = sqlx::query_as::<_, FolderRow>(
            r#"
            SELECT id, user_id, name, color, created_at, updated_at
            FROM folders
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.value())
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut notes = self.notes_in_folders(user_id, &[row.id]).await?;
        Ok(Some(FolderWithNotes {
            notes: notes.remove(&row.id).unwrap_or_default(),
            folder: row.into_folder(),
        }))
    }

    async fn exists(&self, user_id: UserId, id: FolderId) -> NotesResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM folders WHERE id = $1 AND user_id = $2)",
        )
        .bind(id.value())
        .bind(user_id.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update(
        &self,
        user_id: UserId,
        id: FolderId,
        changes: FolderChanges,
    ) -> NotesResult<Option<Folder>> {
        let row = sqlx::query_as::<_, FolderRow>(
            r#"
            UPDATE folders SET
                name = COALESCE($3, name),
                color = COALESCE($4, color),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, color, created_at, updated_at
            "#,
        )
        .bind(id.value())
        .bind(user_id.value())
        .bind(changes.name.as_ref().map(FolderName::as_str))
        .bind(changes.color.as_ref().map(FolderColor::as_str))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FolderRow::into_folder))
    }

    async fn delete(&self, user_id: UserId, id: FolderId) -> NotesResult<Option<Folder>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, FolderRow>(
            r#"
            SELECT id, user_id, name, color, created_at, updated_at
            FROM folders
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(id.value())
        .bind(user_id.value())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let detached = sqlx::query("UPDATE notes SET folder_id = NULL WHERE folder_id = $1")
            .bind(id.value())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id.value())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(folder_id = %id, detached, "Folder notes moved to root");
        Ok(Some(row.into_folder()))
    }
}

// ============================================================================
// Database row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct NoteRow {
    id: i64,
    user_id: i64,
    folder_id: Option<i64>,
    title: String,
    content: String,
    file_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NoteRow {
    fn into_note(self) -> Note {
        Note {
            id: NoteId::new(self.id),
            user_id: UserId::new(self.user_id),
            folder_id: self.folder_id.map(FolderId::new),
            title: self.title,
            content: self.content,
            file_url: self.file_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FolderRow {
    id: i64,
    user_id: i64,
    name: String,
    color: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FolderRow {
    fn into_folder(self) -> Folder {
        Folder {
            id: FolderId::new(self.id),
            user_id: UserId::new(self.user_id),
            name: FolderName::from_db(self.name),
            color: self.color.map(FolderColor::from_db),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

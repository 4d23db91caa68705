// src/db/legal_repo.rs
//
// Armazenamento versionado (append-only) dos documentos legais.

use sqlx::{Executor, PgConnection, PgPool, Postgres};
use uuid::Uuid;

use crate::models::legal::LegalDocument;

#[derive(Clone)]
pub struct LegalDocumentRepository {
    pool: PgPool,
}

impl LegalDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // Insere uma versão nova e a torna a ativa do tipo. Desativa as versões
    // anteriores ANTES do insert por causa do índice único parcial.
    pub async fn insert_version(
        &self,
        conn: &mut PgConnection,
        document_type: &str,
        title: &str,
        content: &str,
        description: &str,
        created_by: Uuid,
    ) -> Result<LegalDocument, sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE legal_documents
            SET is_active = FALSE
            WHERE document_type = $1 AND is_active
            "#,
        )
        .bind(document_type)
        .execute(&mut *conn)
        .await?;

        let document = sqlx::query_as::<_, LegalDocument>(
            r#"
            INSERT INTO legal_documents (
                document_type, title, content, description, version, is_active, created_by
            )
            SELECT $1, $2, $3, $4,
                   COALESCE(MAX(version), 0) + 1, TRUE, $5
            FROM legal_documents
            WHERE document_type = $1
            RETURNING id, document_type, title, content, description,
                      version, is_active, created_at, created_by
            "#,
        )
        .bind(document_type)
        .bind(title)
        .bind(content)
        .bind(description)
        .bind(created_by)
        .fetch_one(&mut *conn)
        .await?;

        Ok(document)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<LegalDocument>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, LegalDocument>(
            r#"
            SELECT id, document_type, title, content, description,
                   version, is_active, created_at, created_by
            FROM legal_documents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    // Versão ativa de um tipo (a exibida nos fluxos de assinatura).
    pub async fn find_active<'e, E>(
        &self,
        executor: E,
        document_type: &str,
    ) -> Result<Option<LegalDocument>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, LegalDocument>(
            r#"
            SELECT id, document_type, title, content, description,
                   version, is_active, created_at, created_by
            FROM legal_documents
            WHERE document_type = $1 AND is_active
            "#,
        )
        .bind(document_type)
        .fetch_optional(executor)
        .await
    }

    // Histórico completo de um tipo, versão mais nova primeiro.
    pub async fn list_versions<'e, E>(
        &self,
        executor: E,
        document_type: &str,
    ) -> Result<Vec<LegalDocument>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, LegalDocument>(
            r#"
            SELECT id, document_type, title, content, description,
                   version, is_active, created_at, created_by
            FROM legal_documents
            WHERE document_type = $1
            ORDER BY version DESC
            "#,
        )
        .bind(document_type)
        .fetch_all(executor)
        .await
    }

    // A versão ativa de cada tipo que já recebeu alguma versão.
    pub async fn list_active<'e, E>(&self, executor: E) -> Result<Vec<LegalDocument>, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, LegalDocument>(
            r#"
            SELECT id, document_type, title, content, description,
                   version, is_active, created_at, created_by
            FROM legal_documents
            WHERE is_active
            ORDER BY document_type
            "#,
        )
        .fetch_all(executor)
        .await
    }

    // Reativa uma versão antiga (rollback de conteúdo sem apagar histórico).
    pub async fn activate_version(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<LegalDocument>, sqlx::Error> {
        let Some(target) = self.find_by_id(&mut *conn, id).await? else {
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE legal_documents
            SET is_active = FALSE
            WHERE document_type = $1 AND is_active
            "#,
        )
        .bind(&target.document_type)
        .execute(&mut *conn)
        .await?;

        let document = sqlx::query_as::<_, LegalDocument>(
            r#"
            UPDATE legal_documents
            SET is_active = TRUE
            WHERE id = $1
            RETURNING id, document_type, title, content, description,
                      version, is_active, created_at, created_by
            "#,
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(Some(document))
    }
}

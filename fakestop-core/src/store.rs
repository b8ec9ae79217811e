//! Analysis store - the `analises` table
//!
//! Every method borrows a pooled connection for the duration of that one
//! call; no connection or transaction outlives an operation. Records are
//! append-only: there is no update or delete.

use sqlx::SqlitePool;

use crate::models::{AnalysisDocuments, AnalysisRecord, NewAnalysis};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS analises (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    noticia TEXT NOT NULL CHECK (length(trim(noticia, ' ' || char(9) || char(10) || char(13))) > 0),
    fontes TEXT NOT NULL,
    analise_linguistica TEXT NOT NULL,
    verificacao_fatos TEXT NOT NULL,
    classificacao_final TEXT NOT NULL,
    data_analise TEXT NOT NULL
)
"#;

#[derive(Debug, Clone)]
pub struct AnalysisStore {
    pool: SqlitePool,
}

impl AnalysisStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the table if absent. Safe to call on every start.
    pub async fn initialize(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Append one record in a single INSERT; returns the assigned id.
    pub async fn insert(&self, analysis: &NewAnalysis) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO analises
                (noticia, fontes, analise_linguistica, verificacao_fatos, classificacao_final, data_analise)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&analysis.noticia)
        .bind(&analysis.fontes)
        .bind(&analysis.analise_linguistica)
        .bind(&analysis.verificacao_fatos)
        .bind(&analysis.classificacao_final)
        .bind(&analysis.data_analise)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!(id = id, "Stored analysis");
        Ok(id)
    }

    /// All records, newest (highest id) first.
    pub async fn list_all(&self) -> Result<Vec<AnalysisRecord>, sqlx::Error> {
        sqlx::query_as::<_, AnalysisRecord>(
            r#"
            SELECT id, noticia, fontes, analise_linguistica, verificacao_fatos,
                   classificacao_final, data_analise
            FROM analises
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// The four stage documents of one record.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<AnalysisDocuments>, sqlx::Error> {
        sqlx::query_as::<_, AnalysisDocuments>(
            r#"
            SELECT fontes, analise_linguistica, verificacao_fatos, classificacao_final
            FROM analises
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_record(&self, id: i64) -> Result<Option<AnalysisRecord>, sqlx::Error> {
        sqlx::query_as::<_, AnalysisRecord>(
            r#"
            SELECT id, noticia, fontes, analise_linguistica, verificacao_fatos,
                   classificacao_final, data_analise
            FROM analises
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM analises")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db;

    async fn memory_store() -> AnalysisStore {
        let pool = db::create_pool(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .expect("in-memory sqlite should open");
        let store = AnalysisStore::new(pool);
        store.initialize().await.expect("schema creation failed");
        store
    }

    fn analysis(noticia: &str) -> NewAnalysis {
        NewAnalysis {
            noticia: noticia.to_string(),
            fontes: format!("fontes de {}", noticia),
            analise_linguistica: format!("linguística de {}", noticia),
            verificacao_fatos: format!("verificação de {}", noticia),
            classificacao_final: "DUVIDOSO🫤".to_string(),
            data_analise: "2026-10-16 12:00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let store = memory_store().await;
        store.insert(&analysis("primeira")).await.unwrap();

        store.initialize().await.expect("second initialize must succeed");
        store.initialize().await.expect("third initialize must succeed");

        assert_eq!(store.count().await.unwrap(), 1, "initialize must not drop rows");
    }

    #[tokio::test]
    async fn test_round_trip_is_byte_identical() {
        let store = memory_store().await;
        let new = NewAnalysis {
            noticia: "  Vacina X causa Y, diz blog anônimo!!! 😱\n".to_string(),
            fontes: "- 2026-01-01 https://g1.globo.com/...\n- \"aspas\" e 'apóstrofos'".to_string(),
            analise_linguistica: "Tom alarmista; uso de CAIXA ALTA.\r\nFim.".to_string(),
            verificacao_fatos: "Nenhuma fonte confirma; NULL; ; DROP TABLE analises;".to_string(),
            classificacao_final: "FALSO🤥\n\nJustificativa: ...".to_string(),
            data_analise: "2026-10-16 09:30:15".to_string(),
        };

        let id = store.insert(&new).await.unwrap();

        let docs = store.get_by_id(id).await.unwrap().expect("record must exist");
        assert_eq!(docs.fontes, new.fontes);
        assert_eq!(docs.analise_linguistica, new.analise_linguistica);
        assert_eq!(docs.verificacao_fatos, new.verificacao_fatos);
        assert_eq!(docs.classificacao_final, new.classificacao_final);

        let record = store.get_record(id).await.unwrap().unwrap();
        assert_eq!(record, AnalysisRecord::from_new(id, new));
    }

    #[tokio::test]
    async fn test_blank_noticia_is_rejected_by_schema() {
        let store = memory_store().await;

        for blank in ["", "   ", " \n\t\r "] {
            let result = store.insert(&analysis(blank)).await;
            assert!(result.is_err(), "blank noticia {:?} must not be stored", blank);
        }
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_all_is_newest_first() {
        let store = memory_store().await;
        let mut ids = Vec::new();
        for n in ["um", "dois", "três", "quatro"] {
            ids.push(store.insert(&analysis(n)).await.unwrap());
        }

        let listed: Vec<i64> = store.list_all().await.unwrap().iter().map(|r| r.id).collect();
        ids.reverse();
        assert_eq!(listed, ids);
        assert!(listed.windows(2).all(|w| w[0] > w[1]), "ids must strictly decrease");
    }

    #[tokio::test]
    async fn test_ids_increase_monotonically() {
        let store = memory_store().await;
        let a = store.insert(&analysis("a")).await.unwrap();
        let b = store.insert(&analysis("b")).await.unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    async fn test_missing_id_returns_none() {
        let store = memory_store().await;
        assert!(store.get_by_id(42).await.unwrap().is_none());
        assert!(store.get_record(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let store = memory_store().await;
        assert!(store.list_all().await.unwrap().is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
    }
}

use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};

use crate::entities::{prelude::*, snapshots};

pub struct SnapshotRepository {
    db: DatabaseConnection,
}

impl SnapshotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find(&self, key: &str) -> Result<Option<String>> {
        let model = Snapshots::find_by_id(key.to_string()).one(&self.db).await?;
        Ok(model.map(|m| m.payload))
    }

    /// Insert or replace the document stored under `key`.
    pub async fn upsert(&self, key: &str, payload: String) -> Result<()> {
        let model = snapshots::ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            payload: ActiveValue::Set(payload),
            updated_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        Snapshots::insert(model)
            .on_conflict(
                OnConflict::column(snapshots::Column::Key)
                    .update_columns([snapshots::Column::Payload, snapshots::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<bool> {
        let result = Snapshots::delete_by_id(key.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn keys(&self) -> Result<Vec<String>> {
        let keys = Snapshots::find()
            .select_only()
            .column(snapshots::Column::Key)
            .order_by_asc(snapshots::Column::Key)
            .into_tuple::<String>()
            .all(&self.db)
            .await?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> SnapshotRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SnapshotRepository::new(db)
    }

    #[tokio::test]
    async fn test_missing_key_is_absent() {
        let repo = setup_test_db().await;
        assert_eq!(repo.find("hangman-words").await.unwrap(), None);
        assert!(!repo.delete("hangman-words").await.unwrap());
    }

    #[tokio::test]
    async fn test_upsert_replaces_payload() {
        let repo = setup_test_db().await;

        repo.upsert("hangman-stats", r#"{"wins":1}"#.to_string())
            .await
            .unwrap();
        repo.upsert("hangman-stats", r#"{"wins":2}"#.to_string())
            .await
            .unwrap();
        repo.upsert("hangman-words", "{}".to_string()).await.unwrap();

        assert_eq!(
            repo.find("hangman-stats").await.unwrap().as_deref(),
            Some(r#"{"wins":2}"#)
        );
        assert_eq!(
            repo.keys().await.unwrap(),
            vec!["hangman-stats".to_string(), "hangman-words".to_string()]
        );

        assert!(repo.delete("hangman-stats").await.unwrap());
        assert_eq!(repo.find("hangman-stats").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_keys_shrink_as_snapshots_are_saved() {
        use crate::store::SnapshotKey;

        let repo = setup_test_db().await;
        assert_eq!(repo.missing_keys().await.unwrap(), SnapshotKey::ALL.to_vec());

        repo.upsert(SnapshotKey::Words.as_str(), "{}".to_string())
            .await
            .unwrap();
        repo.upsert("unrelated", "{}".to_string()).await.unwrap();
        assert_eq!(
            repo.missing_keys().await.unwrap(),
            vec![
                SnapshotKey::Punishments,
                SnapshotKey::TimeConfig,
                SnapshotKey::Stats
            ]
        );
    }
}

use sqlx::FromRow;

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct StorageEntryModel {
    pub scope: String,
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

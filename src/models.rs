use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// One uploaded PDF: the metadata row backing a file in the upload directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: i64,
    pub filename: String,
    pub filepath: String,
    pub filesize: i64,
    pub created_at: String,
}

/// Values for a row about to be inserted; the id is assigned by the database.
#[derive(Debug)]
pub struct NewDocument {
    pub filename: String,
    pub filepath: String,
    pub filesize: i64,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

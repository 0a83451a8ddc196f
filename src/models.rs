use serde::{ Serialize, Deserialize };
use uuid::Uuid;
use chrono::{NaiveDate, DateTime, Utc};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CycleRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub cycle_length: i32,
    pub symptoms: Option<String>,
    pub flow_intensity: Option<String>,
    pub mood: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewCycleRecord {
    pub user_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub cycle_length: i32,
    pub symptoms: Option<String>,
    pub flow_intensity: Option<String>, // Light, Medium, Heavy
    pub mood: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PredictionAccuracy {
    High,
    Medium,
    Low,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub next_period_date: Option<NaiveDate>,
    pub ovulation_date: Option<NaiveDate>,
    pub fertile_window_start: Option<NaiveDate>,
    pub fertile_window_end: Option<NaiveDate>,
    pub average_cycle_length: Option<i32>,
    pub prediction_accuracy: PredictionAccuracy,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

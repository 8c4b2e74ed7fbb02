use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::models::submission::{NewSubmission, SubmissionRow};

/// Append-only store of submission records. There is no update or delete path.
#[derive(Clone)]
pub struct SubmissionStore {
    pool: SqlitePool,
}

impl SubmissionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts one record stamped with the current UTC time and returns its id.
    pub async fn insert(&self, submission: &NewSubmission) -> Result<i64, sqlx::Error> {
        let id = sqlx::query(
            r#"
            INSERT INTO resumes
                (name, email, filename, score, matches, years_experience,
                 education, job_description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&submission.filename)
        .bind(submission.score)
        .bind(submission.matched_skills.join(","))
        .bind(i64::from(submission.years_experience))
        .bind(submission.education.label())
        .bind(&submission.job_description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!(
            "Stored submission {id} ({}, score {})",
            submission.filename, submission.score
        );
        Ok(id)
    }

    /// All records, most recent first.
    pub async fn list_all(&self) -> Result<Vec<SubmissionRow>, sqlx::Error> {
        sqlx::query_as::<_, SubmissionRow>(
            "SELECT * FROM resumes ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use crate::models::submission::EducationLevel;

    fn sample(name: &str) -> NewSubmission {
        NewSubmission {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            filename: format!("20240101000000_{name}.pdf"),
            score: 71.7,
            matched_skills: vec!["python".to_string(), "sql".to_string()],
            years_experience: 5,
            education: EducationLevel::Phd,
            job_description: "Backend role".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_list_round_trips() {
        let store = SubmissionStore::new(memory_pool().await);
        let before = Utc::now();
        let id = store.insert(&sample("Ada")).await.unwrap();

        let rows = store.list_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.id, id);
        assert_eq!(row.name, "Ada");
        assert_eq!(row.email, "ada@example.com");
        assert_eq!(row.filename, "20240101000000_Ada.pdf");
        assert_eq!(row.score, 71.7);
        assert_eq!(row.matched_skills(), vec!["python", "sql"]);
        assert_eq!(row.years_experience, 5);
        assert_eq!(row.education_level(), EducationLevel::Phd);
        assert_eq!(row.job_description, "Backend role");
        assert!(row.created_at >= before - chrono::Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_list_is_most_recent_first() {
        let store = SubmissionStore::new(memory_pool().await);
        let first = store.insert(&sample("First")).await.unwrap();
        let second = store.insert(&sample("Second")).await.unwrap();
        assert!(second > first);

        let names: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_empty_matches_round_trip() {
        let store = SubmissionStore::new(memory_pool().await);
        let mut s = sample("Nobody");
        s.matched_skills.clear();
        s.education = EducationLevel::NotSpecified;
        store.insert(&s).await.unwrap();

        let row = &store.list_all().await.unwrap()[0];
        assert!(row.matched_skills().is_empty());
        assert_eq!(row.education, "Not specified");
    }
}

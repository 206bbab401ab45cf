//! HTTP client for the remote document store

use async_trait::async_trait;
use chrono::Utc;
use dpo_common::{Course, Enrollment, EnrollmentStatus, Error, Result, User};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::docs::{CourseDoc, Document, EnrollmentDoc, UserDoc};
use crate::remote::{
    RemoteStore, COLLECTION_COURSES, COLLECTION_ENROLLMENTS, COLLECTION_USERS,
};

/// Client for a document API exposing `courses`, `enrollments` and `users`
/// collections over plain JSON.
pub struct HttpRemote {
    base_url: String,
    client: reqwest::Client,
}

/// Response from inserting a document.
#[derive(Debug, Deserialize)]
struct InsertResponse {
    id: String,
}

impl HttpRemote {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/collections/{}", self.base_url, collection)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/collections/{}/{}", self.base_url, collection, id)
    }

    async fn insert<T: serde::Serialize>(&self, collection: &str, doc: &T) -> Result<String> {
        let url = self.collection_url(collection);

        debug!("Inserting document into {}", url);

        let response = self
            .client
            .post(&url)
            .json(doc)
            .send()
            .await
            .map_err(|e| Error::Remote(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Remote(format!(
                "failed to insert into {}: {}",
                collection,
                response.status()
            )));
        }

        let inserted: InsertResponse = response
            .json()
            .await
            .map_err(|e| Error::Remote(format!("failed to parse insert response: {e}")))?;

        Ok(inserted.id)
    }

    /// PATCH a partial document. Returns false on 404.
    async fn patch(&self, collection: &str, id: &str, body: serde_json::Value) -> Result<bool> {
        let url = self.document_url(collection, id);

        debug!("Patching document {}", url);

        let response = self
            .client
            .patch(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Remote(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }

        if !response.status().is_success() {
            return Err(Error::Remote(format!(
                "failed to update {}/{}: {}",
                collection,
                id,
                response.status()
            )));
        }

        Ok(true)
    }
}

#[async_trait]
impl RemoteStore for HttpRemote {
    async fn list_courses(&self) -> Result<Vec<Course>> {
        let url = self.collection_url(COLLECTION_COURSES);

        debug!("Fetching courses from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Remote(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Remote(format!(
                "failed to fetch courses: {}",
                response.status()
            )));
        }

        let documents: Vec<Document<CourseDoc>> = response
            .json()
            .await
            .map_err(|e| Error::Remote(format!("failed to parse courses: {e}")))?;

        Ok(documents
            .into_iter()
            .map(|d| d.fields.into_course(d.id))
            .collect())
    }

    async fn insert_course(&self, doc: &CourseDoc) -> Result<String> {
        self.insert(COLLECTION_COURSES, doc).await
    }

    async fn insert_enrollment(&self, doc: &EnrollmentDoc) -> Result<String> {
        self.insert(COLLECTION_ENROLLMENTS, doc).await
    }

    async fn list_enrollments(&self) -> Result<Vec<Enrollment>> {
        let url = format!(
            "{}?order=-timestamp",
            self.collection_url(COLLECTION_ENROLLMENTS)
        );

        debug!("Fetching enrollments from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Remote(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Remote(format!(
                "failed to fetch enrollments: {}",
                response.status()
            )));
        }

        let documents: Vec<Document<EnrollmentDoc>> = response
            .json()
            .await
            .map_err(|e| Error::Remote(format!("failed to parse enrollments: {e}")))?;

        let mut enrollments: Vec<Enrollment> = documents
            .into_iter()
            .map(|d| d.fields.into_enrollment(d.id))
            .collect();

        // Newest first regardless of what ordering the server applied.
        enrollments.sort_by_key(|e| std::cmp::Reverse(e.timestamp));

        Ok(enrollments)
    }

    async fn set_enrollment_status(&self, id: &str, status: EnrollmentStatus) -> Result<bool> {
        self.patch(
            COLLECTION_ENROLLMENTS,
            id,
            json!({ "status": status, "processedAt": Utc::now() }),
        )
        .await
    }

    async fn upsert_user(&self, user: &User) -> Result<()> {
        let url = self.document_url(COLLECTION_USERS, &user.id);

        debug!("Upserting user document {}", url);

        let response = self
            .client
            .put(&url)
            .json(&UserDoc::from_user(user))
            .send()
            .await
            .map_err(|e| Error::Remote(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Remote(format!(
                "failed to upsert user {}: {}",
                user.id,
                response.status()
            )));
        }

        Ok(())
    }

    async fn update_user_courses(&self, user_id: &str, course_ids: &[String]) -> Result<bool> {
        self.patch(
            COLLECTION_USERS,
            user_id,
            json!({ "enrolledCourses": course_ids, "lastUpdated": Utc::now() }),
        )
        .await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let url = format!("{}?email={}", self.collection_url(COLLECTION_USERS), email);

        debug!("Looking up user by email at {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Remote(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Remote(format!(
                "failed to look up user by email: {}",
                response.status()
            )));
        }

        let documents: Vec<Document<UserDoc>> = response
            .json()
            .await
            .map_err(|e| Error::Remote(format!("failed to parse user lookup: {e}")))?;

        Ok(documents.into_iter().next().map(|d| d.fields.into_user()))
    }
}

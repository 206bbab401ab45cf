//! Course catalog store with seed-then-retry fallback

use std::sync::Arc;

use dpo_common::Course;
use tracing::{info, warn};

use crate::docs::CourseDoc;
use crate::remote::RemoteStore;

/// Loads the course catalog from the remote collection, seeding it with the
/// sample set when empty and falling back to the embedded samples when the
/// remote stays empty or unreachable.
pub struct CatalogStore {
    remote: Arc<dyn RemoteStore>,
}

impl CatalogStore {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self { remote }
    }

    /// Load the catalog. Never fails: the embedded sample list is the final
    /// fallback.
    ///
    /// The sequence is fixed: try remote → if empty or failing, seed the
    /// samples → retry remote once → if still empty or failing, use the
    /// embedded list. This is the system's only retry; there is no general
    /// backoff policy.
    pub async fn load(&self) -> Vec<Course> {
        match self.remote.list_courses().await {
            Ok(courses) if !courses.is_empty() => {
                info!("Loaded {} courses from remote", courses.len());
                return courses;
            }
            Ok(_) => info!("Remote course collection is empty, seeding samples"),
            Err(e) => warn!("Failed to load courses from remote: {}", e),
        }

        self.seed_samples().await;

        match self.remote.list_courses().await {
            Ok(courses) if !courses.is_empty() => {
                info!("Loaded {} courses from remote after seeding", courses.len());
                return courses;
            }
            Ok(_) => warn!("Remote still empty after seeding, using embedded fallback"),
            Err(e) => warn!("Retry after seeding failed ({}), using embedded fallback", e),
        }

        sample_courses()
    }

    async fn seed_samples(&self) {
        for course in sample_courses() {
            if let Err(e) = self
                .remote
                .insert_course(&CourseDoc::from_course(&course))
                .await
            {
                warn!("Failed to seed sample course '{}': {}", course.title, e);
            }
        }
    }
}

/// The embedded sample catalog, also used to seed an empty remote store.
pub fn sample_courses() -> Vec<Course> {
    vec![
        Course {
            id: "1".to_string(),
            title: "Цифровой маркетинг".to_string(),
            description: "Освойте инструменты интернет-продвижения: SEO, контекстная реклама, \
                          SMM, email-маркетинг. Научитесь создавать эффективные рекламные \
                          кампании и анализировать их результаты."
                .to_string(),
            category: "Маркетинг".to_string(),
            duration: "3 месяца".to_string(),
            price: 15000.0,
            instructor: "Анна Петрова".to_string(),
            hours: 72,
            syllabus: vec![
                "Введение в цифровой маркетинг".to_string(),
                "SEO-оптимизация".to_string(),
                "Контекстная реклама".to_string(),
                "Социальные сети".to_string(),
                "Email-маркетинг".to_string(),
                "Аналитика".to_string(),
            ],
            requirements: vec![
                "Базовые знания интернета".to_string(),
                "Умение работать с ПК".to_string(),
            ],
            contact_email: "marketing@dpo.ru".to_string(),
        },
        Course {
            id: "2".to_string(),
            title: "Анализ данных на Python".to_string(),
            description: "Научитесь работать с большими данными, строить предсказательные \
                          модели и визуализировать результаты. Практика на реальных кейсах."
                .to_string(),
            category: "IT".to_string(),
            duration: "4 месяца".to_string(),
            price: 20000.0,
            instructor: "Иван Сидоров".to_string(),
            hours: 96,
            syllabus: vec![
                "Основы Python".to_string(),
                "Библиотеки Pandas и NumPy".to_string(),
                "Визуализация данных".to_string(),
                "Машинное обучение".to_string(),
                "Работа с базами данных".to_string(),
                "Реальные проекты".to_string(),
            ],
            requirements: vec![
                "Базовые знания математики".to_string(),
                "Логическое мышление".to_string(),
            ],
            contact_email: "data@dpo.ru".to_string(),
        },
        Course {
            id: "3".to_string(),
            title: "Управление проектами".to_string(),
            description: "Освойте методики Agile и Scrum, научитесь планировать проекты, \
                          управлять командой и контролировать бюджет."
                .to_string(),
            category: "Менеджмент".to_string(),
            duration: "2 месяца".to_string(),
            price: 12000.0,
            instructor: "Мария Иванова".to_string(),
            hours: 48,
            syllabus: vec![
                "Основы управления проектами".to_string(),
                "Методологии Agile и Scrum".to_string(),
                "Планирование и оценка".to_string(),
                "Управление рисками".to_string(),
                "Работа в команде".to_string(),
                "Инструменты управления".to_string(),
            ],
            requirements: vec![
                "Опыт работы в команде".to_string(),
                "Базовые знания менеджмента".to_string(),
            ],
            contact_email: "pm@dpo.ru".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_remote::MemoryRemote;

    #[tokio::test]
    async fn test_empty_remote_is_seeded_and_read_back() {
        let remote = Arc::new(MemoryRemote::new());
        let catalog = CatalogStore::new(remote.clone());

        let courses = catalog.load().await;

        // The seed-retry sequence read the 3 seeded samples back from the
        // remote, so ids are remote-assigned rather than the embedded ones.
        assert_eq!(courses.len(), 3);
        let titles: Vec<&str> = courses.iter().map(|c| c.title.as_str()).collect();
        let expected: Vec<String> = sample_courses().into_iter().map(|c| c.title).collect();
        assert_eq!(titles, expected);
        assert!(courses.iter().all(|c| c.id != "1" && c.id != "2" && c.id != "3"));

        // A second load sees the now-seeded remote and returns the same set.
        let again = catalog.load().await;
        assert_eq!(again, courses);
    }

    #[tokio::test]
    async fn test_unreachable_remote_falls_back_to_embedded_samples() {
        let remote = Arc::new(MemoryRemote::new());
        remote.set_unavailable(true);
        let catalog = CatalogStore::new(remote.clone());

        let courses = catalog.load().await;

        assert_eq!(courses, sample_courses());
    }

    #[tokio::test]
    async fn test_populated_remote_is_not_reseeded() {
        let remote = Arc::new(MemoryRemote::new());
        let catalog = CatalogStore::new(remote.clone());

        // First load seeds 3 sample courses.
        catalog.load().await;
        // Subsequent loads must not grow the collection.
        catalog.load().await;
        catalog.load().await;

        assert_eq!(remote.list_courses().await.unwrap().len(), 3);
    }

    #[test]
    fn test_sample_catalog_shape() {
        let samples = sample_courses();

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1].category, "IT");
        assert_eq!(samples[1].hours, 96);
        assert_eq!(samples[2].price, 12000.0);
    }
}

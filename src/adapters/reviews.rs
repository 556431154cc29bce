use crate::domain::model::{Category, Review};
use crate::domain::ports::ReviewSource;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// (作者, 評分, 評論範本, 幾天前, 照片)
type CannedReview = (&'static str, u8, &'static str, i64, Option<&'static str>);

/// 固定的三組示範評論；`{}` 會替換成類別名稱
pub const REVIEW_SETS: [&[CannedReview]; 3] = [
    &[
        ("María González", 5, "Excelente atención en este {}, muy rápidos.", 2, Some("review_photo_1")),
        ("Carlos Ramírez", 4, "Buen servicio, aunque hubo que esperar un poco.", 9, None),
        ("Lucía Hernández", 5, "El personal fue muy amable y profesional.", 21, None),
    ],
    &[
        ("José Martínez", 3, "Servicio regular, el {} estaba lleno.", 4, None),
        ("Ana López", 4, "Instalaciones limpias y bien ubicadas.", 13, Some("review_photo_2")),
    ],
    &[
        ("Fernando Torres", 2, "Tardaron demasiado en atenderme.", 1, None),
        ("Sofía Castillo", 4, "Me ayudaron a tiempo, recomendado este {}.", 6, None),
        ("Diego Morales", 3, "Cumple, pero el estacionamiento es complicado.", 30, None),
        ("Valeria Ruiz", 5, "Los mejores de la zona.", 45, Some("review_photo_3")),
    ],
];

fn noun(category: Category) -> &'static str {
    match category {
        Category::Hospital => "hospital",
        Category::Pharmacy => "farmacia",
        Category::Police => "módulo de policía",
        Category::Fire => "cuartel de bomberos",
    }
}

/// 產生示範用評論；之後可替換成真正的評論後端
pub struct SyntheticReviewSource {
    rng: Mutex<StdRng>,
}

impl SyntheticReviewSource {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn pick_set(&self) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        rng.gen_range(0..REVIEW_SETS.len())
    }
}

impl Default for SyntheticReviewSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewSource for SyntheticReviewSource {
    fn reviews_for(&self, place_name: &str, category: Category) -> Vec<Review> {
        let index = self.pick_set();
        tracing::trace!("Review set {} for '{}'", index, place_name);
        let now = Utc::now();

        REVIEW_SETS[index]
            .iter()
            .filter_map(|(author, rating, comment, days_ago, photo)| {
                Review::new(
                    *author,
                    *rating,
                    comment.replace("{}", noun(category)),
                    now - Duration::days(*days_ago),
                    photo.map(str::to_string),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_authors(index: usize) -> Vec<&'static str> {
        REVIEW_SETS[index].iter().map(|r| r.0).collect()
    }

    #[test]
    fn test_reviews_come_from_fixed_pool() {
        let source = SyntheticReviewSource::with_seed(7);
        let known: Vec<Vec<&str>> = (0..REVIEW_SETS.len()).map(set_authors).collect();

        for _ in 0..50 {
            let reviews = source.reviews_for("Hospital Civil", Category::Hospital);
            let authors: Vec<&str> = reviews.iter().map(|r| r.author.as_str()).collect();
            assert!(known.iter().any(|set| *set == authors));
            assert!(reviews.iter().all(|r| (1..=5).contains(&r.rating)));
        }
    }

    #[test]
    fn test_all_sets_are_used() {
        let source = SyntheticReviewSource::with_seed(42);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let reviews = source.reviews_for("x", Category::Pharmacy);
            let first = reviews[0].author.as_str();
            let index = (0..3).find(|i| REVIEW_SETS[*i][0].0 == first).unwrap();
            seen[index] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_comment_mentions_category() {
        let source = SyntheticReviewSource::with_seed(1);
        for _ in 0..20 {
            let reviews = source.reviews_for("x", Category::Fire);
            assert!(reviews.iter().all(|r| !r.comment.contains("{}")));
        }
    }
}

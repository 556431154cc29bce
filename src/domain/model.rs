use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 預設搜尋半徑（公尺）
pub const DEFAULT_SEARCH_RADIUS_METERS: f64 = 3500.0;

/// 提供者未回傳名稱時使用的預設名稱
pub const UNKNOWN_PLACE_NAME: &str = "Lugar desconocido";

const METERS_PER_DEGREE_LATITUDE: f64 = 111_320.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// 搜尋區域：中心點加上邊長
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub center: Coordinate,
    pub span_meters: f64,
}

impl Region {
    pub fn around(center: Coordinate, radius_meters: f64) -> Self {
        Self {
            center,
            span_meters: radius_meters * 2.0,
        }
    }

    /// 回傳 `(min_lon, min_lat, max_lon, max_lat)`
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let half = self.span_meters / 2.0;
        let lat_delta = half / METERS_PER_DEGREE_LATITUDE;
        let lon_scale = METERS_PER_DEGREE_LATITUDE * self.center.latitude.to_radians().cos();
        // 極點附近經度沒有意義，直接涵蓋全部
        let lon_delta = if lon_scale.abs() < f64::EPSILON {
            180.0
        } else {
            half / lon_scale
        };

        (
            (self.center.longitude - lon_delta).max(-180.0),
            (self.center.latitude - lat_delta).max(-90.0),
            (self.center.longitude + lon_delta).min(180.0),
            (self.center.latitude + lat_delta).min(90.0),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hospital,
    Pharmacy,
    Police,
    Fire,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Hospital,
        Category::Pharmacy,
        Category::Police,
        Category::Fire,
    ];

    /// 送給搜尋服務的關鍵字
    pub fn query_term(&self) -> &'static str {
        match self {
            Category::Hospital => "hospital",
            Category::Pharmacy => "pharmacy",
            Category::Police => "police",
            Category::Fire => "fire station",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Hospital => "Hospitales",
            Category::Pharmacy => "Farmacias",
            Category::Police => "Policía",
            Category::Fire => "Bomberos",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Hospital => "cross.case.fill",
            Category::Pharmacy => "pills.fill",
            Category::Police => "shield.fill",
            Category::Fire => "flame.fill",
        }
    }

    pub fn color(&self) -> MarkerColor {
        match self {
            Category::Hospital => MarkerColor::Red,
            Category::Pharmacy => MarkerColor::Green,
            Category::Police => MarkerColor::Blue,
            Category::Fire => MarkerColor::Orange,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hospital" | "hospitales" => Ok(Category::Hospital),
            "pharmacy" | "farmacia" | "farmacias" => Ok(Category::Pharmacy),
            "police" | "policia" | "policía" => Ok(Category::Police),
            "fire" | "bomberos" => Ok(Category::Fire),
            other => Err(format!(
                "unknown category '{}', expected one of: hospital, pharmacy, police, fire",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Green,
    Blue,
    Orange,
}

/// 地圖標記與卡片共用的圖示樣式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub icon: &'static str,
    pub color: MarkerColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub photo: Option<String>,
}

impl Review {
    /// 評分必須介於 1 到 5
    pub fn new(
        author: impl Into<String>,
        rating: u8,
        comment: impl Into<String>,
        created_at: DateTime<Utc>,
        photo: Option<String>,
    ) -> Option<Self> {
        if !(1..=5).contains(&rating) {
            return None;
        }
        Some(Self {
            author: author.into(),
            rating,
            comment: comment.into(),
            created_at,
            photo,
        })
    }
}

/// 搜尋服務回傳的原始地點資料
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderPlace {
    pub name: Option<String>,
    pub coordinate: Coordinate,
    pub phone: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub id: Uuid,
    pub name: String,
    pub coordinate: Coordinate,
    pub phone: Option<String>,
    pub url: Option<String>,
    pub reviews: Vec<Review>,
}

impl Place {
    pub fn from_provider(raw: ProviderPlace, reviews: Vec<Review>) -> Self {
        let name = raw
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_PLACE_NAME.to_string());

        Self {
            id: Uuid::new_v4(),
            name,
            coordinate: raw.coordinate,
            phone: raw.phone,
            url: raw.url,
            reviews,
        }
    }

    /// 沒有評論時為 0.0
    pub fn average_rating(&self) -> f64 {
        if self.reviews.is_empty() {
            return 0.0;
        }
        let total: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        f64::from(total) / self.reviews.len() as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFailure {
    Connectivity,
    Provider,
}

/// 一次搜尋的最終結果
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Results(Vec<Place>),
    NoResults { message: String },
    Failed { kind: SearchFailure, message: String },
}

/// 畫面上的搜尋狀態；結果與錯誤互斥
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Searching {
        category: Category,
        sequence: u64,
    },
    Results {
        category: Category,
        places: Vec<Place>,
    },
    NoResults {
        category: Category,
        message: String,
    },
    Error {
        category: Category,
        failure: SearchFailure,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    NotDetermined,
    Denied,
    Restricted,
    AuthorizedWhenInUse,
    AuthorizedAlways,
}

impl PermissionStatus {
    pub fn is_authorized(&self) -> bool {
        matches!(
            self,
            PermissionStatus::AuthorizedWhenInUse | PermissionStatus::AuthorizedAlways
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub email_verified: bool,
    pub id_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub emergency_contact: String,
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub notifications: bool,
    pub location_sharing: bool,
    pub dark_mode: bool,
    pub onboarding_completed: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications: true,
            location_sharing: true,
            dark_mode: false,
            onboarding_completed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: u8) -> Review {
        Review::new("Ana", rating, "Bien", Utc::now(), None).unwrap()
    }

    fn place_with(reviews: Vec<Review>) -> Place {
        Place::from_provider(
            ProviderPlace {
                name: Some("Hospital Civil".to_string()),
                coordinate: Coordinate::new(20.68, -103.34),
                phone: None,
                url: None,
            },
            reviews,
        )
    }

    #[test]
    fn test_average_rating() {
        let place = place_with(vec![review(5), review(4), review(3)]);
        assert!((place.average_rating() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_rating_without_reviews_is_zero() {
        let place = place_with(vec![]);
        assert_eq!(place.average_rating(), 0.0);
        assert!(!place.average_rating().is_nan());
    }

    #[test]
    fn test_review_rating_range() {
        assert!(Review::new("x", 0, "", Utc::now(), None).is_none());
        assert!(Review::new("x", 6, "", Utc::now(), None).is_none());
        assert!(Review::new("x", 1, "", Utc::now(), None).is_some());
    }

    #[test]
    fn test_missing_name_uses_placeholder() {
        let place = Place::from_provider(
            ProviderPlace {
                name: None,
                coordinate: Coordinate::new(0.0, 0.0),
                phone: None,
                url: None,
            },
            vec![],
        );
        assert_eq!(place.name, UNKNOWN_PLACE_NAME);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Hospital".parse::<Category>().unwrap(), Category::Hospital);
        assert_eq!("farmacias".parse::<Category>().unwrap(), Category::Pharmacy);
        assert!("bakery".parse::<Category>().is_err());
    }

    #[test]
    fn test_bounding_box_contains_center() {
        let center = Coordinate::new(20.6597, -103.3496);
        let (min_lon, min_lat, max_lon, max_lat) = Region::around(center, 3500.0).bounding_box();
        assert!(min_lon < center.longitude && center.longitude < max_lon);
        assert!(min_lat < center.latitude && center.latitude < max_lat);
        // 3.5 km 約 0.031 度緯度
        assert!((max_lat - center.latitude - 0.0314).abs() < 0.001);
    }
}

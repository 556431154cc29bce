use crate::domain::model::{Preferences, UserProfile};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

const PREFERENCES_FILE: &str = "preferences.json";
const PROFILE_FILE: &str = "profile.json";

/// 使用者偏好與個人資料，以 JSON 檔案保存
pub struct PreferenceStore<S: Storage> {
    storage: S,
}

impl<S: Storage> PreferenceStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    async fn load<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T> {
        if !self.storage.exists(path).await {
            tracing::debug!("{} not found, using defaults", path);
            return Ok(T::default());
        }
        let data = self.storage.read_file(path).await?;
        Ok(serde_json::from_slice(&data)?)
    }

    async fn save<T: Serialize + Sync>(&self, path: &str, value: &T) -> Result<()> {
        let data = serde_json::to_vec_pretty(value)?;
        self.storage.write_file(path, &data).await?;
        tracing::debug!("Saved {} ({} bytes)", path, data.len());
        Ok(())
    }

    pub async fn preferences(&self) -> Result<Preferences> {
        self.load(PREFERENCES_FILE).await
    }

    pub async fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        self.save(PREFERENCES_FILE, preferences).await
    }

    pub async fn profile(&self) -> Result<UserProfile> {
        self.load(PROFILE_FILE).await
    }

    pub async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.save(PROFILE_FILE, profile).await
    }

    /// 修改單一欄位後存檔；未知欄位回傳驗證錯誤
    pub async fn update_profile_field(&self, field: &str, value: &str) -> Result<UserProfile> {
        let mut profile = self.profile().await?;
        let slot = match field {
            "display_name" | "name" => &mut profile.display_name,
            "email" => &mut profile.email,
            "phone" => &mut profile.phone,
            "emergency_contact" => &mut profile.emergency_contact,
            "bio" => &mut profile.bio,
            other => {
                return Err(crate::AppError::validation(format!(
                    "unknown profile field '{}'",
                    other
                )))
            }
        };
        *slot = value.trim().to_string();
        self.save_profile(&profile).await?;
        Ok(profile)
    }

    /// 切換布林偏好，回傳新的值
    pub async fn toggle(&self, key: &str) -> Result<bool> {
        let mut preferences = self.preferences().await?;
        let flag = match key {
            "notifications" => &mut preferences.notifications,
            "location_sharing" => &mut preferences.location_sharing,
            "dark_mode" => &mut preferences.dark_mode,
            "onboarding_completed" => &mut preferences.onboarding_completed,
            other => {
                return Err(crate::AppError::validation(format!(
                    "unknown preference '{}'",
                    other
                )))
            }
        };
        *flag = !*flag;
        let value = *flag;
        self.save_preferences(&preferences).await?;
        Ok(value)
    }
}

use crate::domain::model::{
    AuthUser, Category, Coordinate, PermissionStatus, ProviderPlace, Region, Review,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// 一次地點搜尋的請求內容
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceQuery {
    pub query: String,
    pub region: Region,
    pub limit: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("network unavailable: {0}")]
    NoNetwork(String),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode provider response: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait PlaceSearchProvider: Send + Sync {
    async fn search(
        &self,
        query: &PlaceQuery,
    ) -> std::result::Result<Vec<ProviderPlace>, ProviderError>;
}

/// 評論來源；目前只有假資料實作
pub trait ReviewSource: Send + Sync {
    fn reviews_for(&self, place_name: &str, category: Category) -> Vec<Review>;
}

#[async_trait]
pub trait LocationSource: Send + Sync {
    fn authorization_status(&self) -> PermissionStatus;
    async fn request_authorization(&self) -> PermissionStatus;
    /// 開始持續定位，回傳位置串流
    fn position_updates(&self) -> mpsc::Receiver<Coordinate>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("{code}: {message}")]
    Backend { code: String, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("could not decode auth response: {0}")]
    Decode(String),

    #[error("no user is signed in")]
    NotSignedIn,
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn create_account(&self, email: &str, password: &str) -> AuthResult<AuthUser>;
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthUser>;
    async fn send_verification_email(&self, user: &AuthUser) -> AuthResult<()>;
    /// 重新讀取使用者（例如確認信箱是否已驗證）
    async fn reload_user(&self, user: &AuthUser) -> AuthResult<AuthUser>;
    async fn sign_out(&self) -> AuthResult<()>;
}

pub trait Dialer: Send + Sync {
    /// 開啟撥號程式，回傳使用的 `tel:` URL
    fn dial(&self, number: &str) -> Result<String>;
}

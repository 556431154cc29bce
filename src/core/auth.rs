use crate::domain::model::AuthUser;
use crate::domain::ports::{AuthBackend, AuthError};
use std::sync::Arc;

const MIN_PASSWORD_LENGTH: usize = 6;

/// 後端錯誤碼對應的使用者訊息，找不到時回傳後端原始訊息
pub fn auth_error_message(error: &AuthError) -> String {
    match error {
        AuthError::Backend { code, message } => {
            // 後端有時會附加說明，例如 "WEAK_PASSWORD : Password should be ..."
            let code = code.split(':').next().unwrap_or(code).trim();
            match code {
                "EMAIL_EXISTS" => "Este correo ya está registrado".to_string(),
                "INVALID_EMAIL" => "El correo electrónico no es válido".to_string(),
                "WEAK_PASSWORD" => {
                    "La contraseña debe tener al menos 6 caracteres".to_string()
                }
                "EMAIL_NOT_FOUND" => "No existe una cuenta con este correo".to_string(),
                "INVALID_PASSWORD" => "Contraseña incorrecta".to_string(),
                "INVALID_LOGIN_CREDENTIALS" => "Correo o contraseña incorrectos".to_string(),
                "USER_DISABLED" => "Esta cuenta ha sido deshabilitada".to_string(),
                "TOO_MANY_ATTEMPTS_TRY_LATER" => {
                    "Demasiados intentos. Intenta más tarde".to_string()
                }
                "OPERATION_NOT_ALLOWED" => "Este método de acceso no está habilitado".to_string(),
                _ => message.clone(),
            }
        }
        AuthError::Network(_) => "Error de red. Verifica tu conexión".to_string(),
        AuthError::NotSignedIn => "No hay una sesión activa".to_string(),
        AuthError::Decode(message) => message.clone(),
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// 登入／註冊畫面的狀態，直接轉呼叫驗證後端
pub struct AuthService {
    backend: Arc<dyn AuthBackend>,
    current_user: Option<AuthUser>,
    is_loading: bool,
    error_message: Option<String>,
}

impl AuthService {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            backend,
            current_user: None,
            is_loading: false,
            error_message: None,
        }
    }

    pub fn current_user(&self) -> Option<&AuthUser> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn needs_verification(&self) -> bool {
        self.current_user
            .as_ref()
            .is_some_and(|u| !u.email_verified)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn fail(&mut self, message: String) -> bool {
        tracing::warn!("Auth error: {}", message);
        self.error_message = Some(message);
        false
    }

    pub async fn sign_up(&mut self, email: &str, password: &str, confirm: &str) -> bool {
        self.error_message = None;
        let email = email.trim();

        if !is_plausible_email(email) {
            return self.fail("El correo electrónico no es válido".to_string());
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return self.fail("La contraseña debe tener al menos 6 caracteres".to_string());
        }
        if password != confirm {
            return self.fail("Las contraseñas no coinciden".to_string());
        }

        self.is_loading = true;
        let result = self.backend.create_account(email, password).await;
        let ok = match result {
            Ok(user) => {
                if let Err(e) = self.backend.send_verification_email(&user).await {
                    // 帳號已建立，使用者之後可以重新寄送
                    tracing::warn!("Verification email not sent: {}", e);
                }
                tracing::info!("Account created for {}", user.email);
                self.current_user = Some(user);
                true
            }
            Err(e) => self.fail(auth_error_message(&e)),
        };
        self.is_loading = false;
        ok
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> bool {
        self.error_message = None;
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return self.fail("Ingresa tu correo y contraseña".to_string());
        }

        self.is_loading = true;
        let ok = match self.backend.sign_in(email, password).await {
            Ok(user) => {
                tracing::info!(
                    "Signed in {} (verified: {})",
                    user.email,
                    user.email_verified
                );
                self.current_user = Some(user);
                true
            }
            Err(e) => self.fail(auth_error_message(&e)),
        };
        self.is_loading = false;
        ok
    }

    pub async fn resend_verification(&mut self) -> bool {
        self.error_message = None;
        let Some(user) = self.current_user.clone() else {
            return self.fail(auth_error_message(&AuthError::NotSignedIn));
        };
        match self.backend.send_verification_email(&user).await {
            Ok(()) => true,
            Err(e) => self.fail(auth_error_message(&e)),
        }
    }

    /// 重新取得使用者資料（更新信箱驗證狀態）
    pub async fn reload(&mut self) -> bool {
        self.error_message = None;
        let Some(user) = self.current_user.clone() else {
            return self.fail(auth_error_message(&AuthError::NotSignedIn));
        };
        match self.backend.reload_user(&user).await {
            Ok(fresh) => {
                self.current_user = Some(fresh);
                true
            }
            Err(e) => self.fail(auth_error_message(&e)),
        }
    }

    pub async fn sign_out(&mut self) -> bool {
        match self.backend.sign_out().await {
            Ok(()) => {
                self.current_user = None;
                self.error_message = None;
                true
            }
            Err(e) => self.fail(auth_error_message(&e)),
        }
    }
}

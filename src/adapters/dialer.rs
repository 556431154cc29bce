use crate::domain::ports::Dialer;
use crate::utils::error::{AppError, Result};

/// 只保留數字與開頭的 `+`
pub fn tel_url(number: &str) -> Result<String> {
    let trimmed = number.trim();
    let mut digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(AppError::validation(format!(
            "'{}' is not a dialable phone number",
            number
        )));
    }
    if trimmed.starts_with('+') {
        digits.insert(0, '+');
    }
    Ok(format!("tel:{}", digits))
}

/// 將 `tel:` URL 交給平台的啟動器
pub struct UrlDialer<F>
where
    F: Fn(&str) + Send + Sync,
{
    launcher: F,
}

impl<F> UrlDialer<F>
where
    F: Fn(&str) + Send + Sync,
{
    pub fn new(launcher: F) -> Self {
        Self { launcher }
    }
}

impl<F> Dialer for UrlDialer<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn dial(&self, number: &str) -> Result<String> {
        let url = tel_url(number)?;
        tracing::info!("Dialing {}", url);
        (self.launcher)(&url);
        Ok(url)
    }
}

use anyhow::Context;
use clap::Parser;
use safepath::adapters::dialer::UrlDialer;
use safepath::adapters::location::FixedLocationSource;
use safepath::adapters::preferences::PreferenceStore;
use safepath::config::{Command, ProfileAction};
use safepath::core::classify::marker_style;
use safepath::domain::model::{Category, Coordinate, PermissionStatus, SearchState};
use safepath::domain::ports::Dialer;
use safepath::utils::error::ErrorSeverity;
use safepath::utils::{logger, validation::Validate};
use safepath::{
    AppConfig, AppError, AuthService, CliConfig, FirebaseAuthBackend, LocalStorage,
    LocationProvider, NominatimProvider, PlaceSearchService, SearchSession, SyntheticReviewSource,
};
use std::sync::Arc;
use std::time::Duration;

const FIRST_FIX_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        None => AppConfig::default(),
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(command: Command, config: &AppConfig) -> safepath::Result<()> {
    match command {
        Command::Search {
            category,
            lat,
            lon,
            radius,
            call,
        } => {
            let mut location = config.location.clone();
            if let Some(lat) = lat {
                location.latitude = lat;
            }
            if let Some(lon) = lon {
                location.longitude = lon;
            }
            let radius = radius.unwrap_or(config.search.radius_meters);
            search(config, location.coordinate(), location.permission, radius, category, call)
                .await
        }
        Command::Categories => {
            for category in Category::ALL {
                println!(
                    "{:<10} {:<12} {}",
                    category.query_term(),
                    category.display_name(),
                    category.icon()
                );
            }
            Ok(())
        }
        Command::Classify { name } => {
            let style = marker_style(&name);
            println!("{} -> {} ({:?})", name, style.icon, style.color);
            Ok(())
        }
        Command::SignUp { email, password } => {
            let mut auth = auth_service(config)?;
            if auth.sign_up(&email, &password, &password).await {
                println!("✅ Cuenta creada. Revisa tu correo para verificarla.");
                Ok(())
            } else {
                Err(auth_failure(&auth))
            }
        }
        Command::SignIn { email, password } => {
            let mut auth = auth_service(config)?;
            if !auth.sign_in(&email, &password).await {
                return Err(auth_failure(&auth));
            }
            if auth.needs_verification() {
                println!("⚠️  Tu correo aún no está verificado.");
            } else {
                println!("✅ Sesión iniciada.");
            }
            Ok(())
        }
        Command::Profile { action } => {
            let store = PreferenceStore::new(LocalStorage::new(&config.storage.data_path));
            match action {
                ProfileAction::Show => {
                    let profile = store.profile().await?;
                    let preferences = store.preferences().await?;
                    println!("{}", serde_json::to_string_pretty(&profile)?);
                    println!("{}", serde_json::to_string_pretty(&preferences)?);
                }
                ProfileAction::Set { field, value } => {
                    store.update_profile_field(&field, &value).await?;
                    println!("✅ {} actualizado", field);
                }
                ProfileAction::Toggle { key } => {
                    let value = store.toggle(&key).await?;
                    println!("{} = {}", key, value);
                }
            }
            Ok(())
        }
    }
}

fn auth_service(config: &AppConfig) -> safepath::Result<AuthService> {
    let backend = FirebaseAuthBackend::new(
        config.auth.endpoint.clone(),
        config.require_api_key()?,
        config.auth_timeout(),
    )?;
    Ok(AuthService::new(Arc::new(backend)))
}

fn auth_failure(auth: &AuthService) -> AppError {
    AppError::validation(auth.error_message().unwrap_or("authentication failed"))
}

async fn search(
    config: &AppConfig,
    configured: Coordinate,
    permission: PermissionStatus,
    radius: f64,
    category: Category,
    call: Option<usize>,
) -> safepath::Result<()> {
    let mut location =
        LocationProvider::new(Arc::new(FixedLocationSource::new(configured, permission)));
    if !location.request_authorization().await.is_authorized() {
        return Err(AppError::LocationUnauthorized);
    }

    let mut fixes = location.subscribe();
    let center = match tokio::time::timeout(FIRST_FIX_TIMEOUT, fixes.wait_for(|f| f.is_some()))
        .await
    {
        Ok(Ok(fix)) => (*fix).ok_or(AppError::LocationUnauthorized)?,
        _ => return Err(AppError::validation("no location fix available")),
    };

    let provider = NominatimProvider::new(
        config.search.endpoint.clone(),
        &config.search.user_agent,
        config.search_timeout(),
    )?;
    let service = PlaceSearchService::new(Arc::new(provider), Arc::new(SyntheticReviewSource::new()))
        .with_limit(config.search.limit);

    println!("🔎 Buscando {} cerca de {}...", category.display_name().to_lowercase(), center);
    let mut session = SearchSession::new();
    session.run(&service, center, radius, category).await?;
    location.stop();

    match session.state() {
        SearchState::Results { places, .. } => {
            for (index, place) in places.iter().enumerate() {
                let style = marker_style(&place.name);
                println!(
                    "{:>2}. [{} {:?}] {}  ★ {:.1} ({} reseñas)",
                    index + 1,
                    style.icon,
                    style.color,
                    place.name,
                    place.average_rating(),
                    place.reviews.len()
                );
                println!("    📍 {}", place.coordinate);
                if let Some(phone) = &place.phone {
                    println!("    📞 {}", phone);
                }
                if let Some(url) = &place.url {
                    println!("    🌐 {}", url);
                }
            }

            if let Some(n) = call {
                let place = n
                    .checked_sub(1)
                    .and_then(|i| places.get(i))
                    .ok_or_else(|| AppError::validation(format!("no result number {}", n)))?;
                let phone = place.phone.as_deref().ok_or_else(|| {
                    AppError::validation(format!("{} has no phone number", place.name))
                })?;
                let dialer = UrlDialer::new(|url: &str| println!("📲 {}", url));
                dialer.dial(phone)?;
            }
        }
        SearchState::NoResults { message, .. } | SearchState::Error { message, .. } => {
            println!("{}", message);
        }
        SearchState::Idle | SearchState::Searching { .. } => {}
    }

    Ok(())
}

// src/handlers/portal.rs

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, locale::Locale},
    config::AppState,
    db::ContentRecord,
    middleware::{
        i18n::RequestLocale,
        session::{apply_to_response, login_path, CurrentUser, PORTAL_SEGMENT},
    },
    models::{
        auth::{LoginPageQuery, LoginPayload},
        content::{ActiveFilter, QuickAction, Service, TravelPackage, Trip},
        message::ContactMessage,
        page::{DashboardBody, ListBody, LoginBody, PageView},
    },
    services::{auth::AuthError, session::CookieMutation},
};

/// Seção do portal ligada a uma tabela de conteúdo.
pub trait PortalSection: ContentRecord {
    fn slug() -> &'static str;
    fn title() -> (&'static str, &'static str);
}

impl PortalSection for Service {
    fn slug() -> &'static str { "services" }
    fn title() -> (&'static str, &'static str) { ("portal.services.title", "Services") }
}

impl PortalSection for Trip {
    fn slug() -> &'static str { "trips" }
    fn title() -> (&'static str, &'static str) { ("portal.trips.title", "Trips") }
}

impl PortalSection for TravelPackage {
    fn slug() -> &'static str { "packages" }
    fn title() -> (&'static str, &'static str) { ("portal.packages.title", "Packages") }
}

impl PortalSection for QuickAction {
    fn slug() -> &'static str { "quick-actions" }
    fn title() -> (&'static str, &'static str) { ("portal.quickActions.title", "Quick Actions") }
}

pub fn portal_path(locale: Locale, rest: &str) -> String {
    if rest.is_empty() {
        format!("/{locale}/{PORTAL_SEGMENT}")
    } else {
        format!("/{locale}/{PORTAL_SEGMENT}/{rest}")
    }
}

fn redirect_with_cookies(to: &str, mutations: &[CookieMutation], app_state: &AppState) -> Response {
    let cookies: Vec<_> = mutations
        .iter()
        .map(|m| m.to_cookie(app_state.session.settings()))
        .collect();
    let mut response = Redirect::to(to).into_response();
    apply_to_response(response.headers_mut(), &cookies);
    response
}

// =============================================================================
//  ÁREA 1: SESSÃO (LOGIN / LOGOUT)
// =============================================================================

// GET /{locale}/portal-manage/login
pub async fn login_page(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Query(query): Query<LoginPageQuery>,
) -> Json<PageView<LoginBody>> {
    let catalog = app_state.messages.catalog(locale);
    let error = query
        .error
        .map(|_| catalog.t("portal.login.error", "Invalid email or password."));

    Json(PageView::new(locale, catalog, catalog.t("portal.login.title", "Sign in"), LoginBody { error }))
}

// POST /{locale}/portal-manage/login
#[utoipa::path(
    post,
    path = "/{locale}/portal-manage/login",
    tag = "Portal",
    request_body(content = LoginPayload, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Sessão criada (cookies) ou credenciais inválidas (volta ao login)"),
        (status = 400, description = "Dados inválidos")
    ),
    params(("locale" = String, Path, description = "Idioma do portal"))
)]
pub async fn login(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Form(payload): Form<LoginPayload>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let mutations = app_state
        .session
        .sign_in(&payload.email, &payload.password, Utc::now().timestamp())
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials | AuthError::Unauthorized => AppError::InvalidCredentials(locale),
            other => AppError::Auth(other),
        })?;

    tracing::info!(email = %payload.email, "Login no portal");
    Ok(redirect_with_cookies(&portal_path(locale, ""), &mutations, &app_state))
}

// POST /{locale}/portal-manage/logout
#[utoipa::path(
    post,
    path = "/{locale}/portal-manage/logout",
    tag = "Portal",
    responses((status = 303, description = "Cookies da sessão removidos, volta ao login")),
    params(("locale" = String, Path, description = "Idioma do portal"))
)]
pub async fn logout(State(app_state): State<AppState>, RequestLocale(locale): RequestLocale, jar: CookieJar) -> Response {
    let mutations = app_state.session.sign_out(&jar).await;
    redirect_with_cookies(&login_path(locale.as_str()), &mutations, &app_state)
}

// GET /{locale}/portal-manage
pub async fn dashboard(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    CurrentUser(user): CurrentUser,
) -> Json<PageView<DashboardBody>> {
    let catalog = app_state.messages.catalog(locale);
    let content = &app_state.content_service;

    let (services, trips, packages, quick_actions, unread) = tokio::join!(
        content.list_or_empty::<Service>(None),
        content.list_or_empty::<Trip>(None),
        content.list_or_empty::<TravelPackage>(None),
        content.list_or_empty::<QuickAction>(None),
        app_state.message_service.list_or_empty(true),
    );

    let body = DashboardBody {
        editor: user.email,
        services: services.len(),
        trips: trips.len(),
        packages: packages.len(),
        quick_actions: quick_actions.len(),
        unread_messages: unread.len(),
    };
    Json(PageView::new(locale, catalog, catalog.t("portal.dashboard.title", "Dashboard"), body))
}

// =============================================================================
//  ÁREA 2: CONTEÚDO (serviços, viagens, pacotes, ações rápidas)
// =============================================================================

// GET /{locale}/portal-manage/{secao}
pub async fn list_items<T: PortalSection>(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    CurrentUser(_editor): CurrentUser,
    Query(filter): Query<ActiveFilter>,
) -> Json<PageView<ListBody<T>>> {
    let catalog = app_state.messages.catalog(locale);
    let items = app_state.content_service.list_or_empty::<T>(filter.active).await;

    let (key, fallback) = T::title();
    Json(PageView::new(locale, catalog, catalog.t(key, fallback), ListBody { subtitle: None, items }))
}

// GET /{locale}/portal-manage/{secao}/{id}
pub async fn show_item<T: PortalSection>(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    CurrentUser(_editor): CurrentUser,
    Path((_locale, id)): Path<(String, Uuid)>,
) -> Result<Json<PageView<T>>, AppError> {
    let catalog = app_state.messages.catalog(locale);
    let item = app_state
        .content_service
        .find_or_none::<T>(id)
        .await
        .ok_or(AppError::NotFound(locale))?;

    let (key, fallback) = T::title();
    Ok(Json(PageView::new(locale, catalog, catalog.t(key, fallback), item)))
}

// POST /{locale}/portal-manage/{secao}
pub async fn create_item<T: PortalSection>(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    CurrentUser(_editor): CurrentUser,
    Form(payload): Form<T::Payload>,
) -> Result<Redirect, AppError> {
    payload.validate()?;
    app_state.content_service.create::<T>(&payload).await?;
    Ok(Redirect::to(&portal_path(locale, T::slug())))
}

// POST /{locale}/portal-manage/{secao}/{id}
pub async fn update_item<T: PortalSection>(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    CurrentUser(_editor): CurrentUser,
    Path((_locale, id)): Path<(String, Uuid)>,
    Form(payload): Form<T::Payload>,
) -> Result<Redirect, AppError> {
    payload.validate()?;
    app_state
        .content_service
        .update::<T>(id, &payload)
        .await?
        .ok_or(AppError::NotFound(locale))?;
    Ok(Redirect::to(&portal_path(locale, T::slug())))
}

// POST /{locale}/portal-manage/{secao}/{id}/toggle
pub async fn toggle_item<T: PortalSection>(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    CurrentUser(_editor): CurrentUser,
    Path((_locale, id)): Path<(String, Uuid)>,
) -> Result<Redirect, AppError> {
    app_state
        .content_service
        .toggle_active::<T>(id)
        .await?
        .ok_or(AppError::NotFound(locale))?;
    Ok(Redirect::to(&portal_path(locale, T::slug())))
}

// POST /{locale}/portal-manage/{secao}/{id}/delete
pub async fn delete_item<T: PortalSection>(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    CurrentUser(_editor): CurrentUser,
    Path((_locale, id)): Path<(String, Uuid)>,
) -> Result<Redirect, AppError> {
    if !app_state.content_service.delete::<T>(id).await? {
        return Err(AppError::NotFound(locale));
    }
    Ok(Redirect::to(&portal_path(locale, T::slug())))
}

// =============================================================================
//  ÁREA 3: MENSAGENS DE CONTATO
// =============================================================================

#[derive(Debug, Default, serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MessageFilter {
    /// Só as não lidas
    pub unread: Option<bool>,
}

// GET /{locale}/portal-manage/messages
#[utoipa::path(
    get,
    path = "/{locale}/portal-manage/messages",
    tag = "Portal",
    responses((status = 200, description = "Mensagens (não lidas primeiro)", body = Vec<ContactMessage>)),
    params(
        ("locale" = String, Path, description = "Idioma do portal"),
        MessageFilter
    )
)]
pub async fn list_messages(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    CurrentUser(_editor): CurrentUser,
    Query(filter): Query<MessageFilter>,
) -> Json<PageView<ListBody<ContactMessage>>> {
    let catalog = app_state.messages.catalog(locale);
    let items = app_state
        .message_service
        .list_or_empty(filter.unread.unwrap_or(false))
        .await;

    Json(PageView::new(locale, catalog, catalog.t("portal.messages.title", "Messages"), ListBody { subtitle: None, items }))
}

// GET /{locale}/portal-manage/messages/{id}
#[utoipa::path(
    get,
    path = "/{locale}/portal-manage/messages/{id}",
    tag = "Portal",
    responses(
        (status = 200, description = "Mensagem", body = ContactMessage),
        (status = 303, description = "Mensagem não existe, vai para /not-found")
    ),
    params(
        ("locale" = String, Path, description = "Idioma do portal"),
        ("id" = Uuid, Path, description = "ID da mensagem")
    )
)]
pub async fn show_message(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    CurrentUser(_editor): CurrentUser,
    Path((_locale, id)): Path<(String, Uuid)>,
) -> Result<Json<PageView<ContactMessage>>, AppError> {
    let catalog = app_state.messages.catalog(locale);
    let message = app_state
        .message_service
        .find_or_none(id)
        .await
        .ok_or(AppError::NotFound(locale))?;

    Ok(Json(PageView::new(locale, catalog, catalog.t("portal.messages.title", "Messages"), message)))
}

// POST /{locale}/portal-manage/messages/{id}/read
pub async fn mark_message_read(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    CurrentUser(_editor): CurrentUser,
    Path((_locale, id)): Path<(String, Uuid)>,
) -> Result<Redirect, AppError> {
    app_state
        .message_service
        .mark_read(id)
        .await?
        .ok_or(AppError::NotFound(locale))?;
    Ok(Redirect::to(&portal_path(locale, "messages")))
}

// POST /{locale}/portal-manage/messages/{id}/delete
pub async fn delete_message(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    CurrentUser(_editor): CurrentUser,
    Path((_locale, id)): Path<(String, Uuid)>,
) -> Result<Redirect, AppError> {
    if !app_state.message_service.delete(id).await? {
        return Err(AppError::NotFound(locale));
    }
    Ok(Redirect::to(&portal_path(locale, "messages")))
}

#[cfg(test)]
mod tests {
    use std::sync::{atomic::Ordering, Arc};

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{config::testing::state, routes::router, services::session::testing::*};

    fn app(fake: Arc<FakeAuth>) -> Router {
        router(state(fake))
    }

    fn form(path: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::post(path).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn set_cookie_names(response: &Response) -> Vec<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split('=').next().map(str::to_string))
            .collect()
    }

    #[test]
    fn portal_paths_keep_the_locale() {
        assert_eq!(portal_path(Locale::Ar, ""), "/ar/portal-manage");
        assert_eq!(portal_path(Locale::Tr, Trip::slug()), "/tr/portal-manage/trips");
    }

    #[tokio::test]
    async fn successful_login_sets_session_cookies_and_enters_the_portal() {
        let response = app(Arc::new(FakeAuth::default()))
            .oneshot(form(
                "/fr/portal-manage/login",
                "email=editor%40example.com&password=correct-horse",
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/fr/portal-manage");
        let mut names = set_cookie_names(&response);
        names.sort();
        assert_eq!(names, ["sb-test-access-token", "sb-test-expires-at", "sb-test-refresh-token"]);
    }

    #[tokio::test]
    async fn wrong_password_returns_to_login_with_error_flag() {
        let response = app(Arc::new(FakeAuth::default()))
            .oneshot(form(
                "/ar/portal-manage/login",
                "email=editor%40example.com&password=wrong-horse",
                None,
            ))
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::LOCATION],
            "/ar/portal-manage/login?error=invalid_credentials"
        );
        assert!(set_cookie_names(&response).is_empty());
    }

    #[tokio::test]
    async fn logout_clears_cookies_and_notifies_provider() {
        let fake = Arc::new(FakeAuth::default());
        let cookie = format!("sb-test-access-token={VALID_ACCESS}; sb-test-expires-at=4000000000");

        let response = app(fake.clone())
            .oneshot(form("/en/portal-manage/logout", "", Some(&cookie)))
            .await
            .unwrap();

        assert_eq!(response.headers()[header::LOCATION], "/en/portal-manage/login");
        assert_eq!(set_cookie_names(&response).len(), 3);
        assert_eq!(fake.sign_out_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dashboard_shows_editor_and_degrades_without_database() {
        let cookie = format!("sb-test-access-token={VALID_ACCESS}; sb-test-expires-at=4000000000");
        let request = Request::get("/en/portal-manage")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();

        let response = app(Arc::new(FakeAuth::default())).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(page["body"]["editor"], "editor@example.com");
        assert_eq!(page["body"]["services"], 0);
    }

    #[tokio::test]
    async fn missing_entity_redirects_to_not_found() {
        let cookie = format!("sb-test-access-token={VALID_ACCESS}; sb-test-expires-at=4000000000");
        let request = Request::get(format!("/tr/portal-manage/services/{}", Uuid::nil()))
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();

        let response = app(Arc::new(FakeAuth::default())).oneshot(request).await.unwrap();

        assert_eq!(response.headers()[header::LOCATION], "/tr/not-found");
    }

    #[tokio::test]
    async fn anonymous_crud_write_never_reaches_the_handler() {
        let response = app(Arc::new(FakeAuth::default()))
            .oneshot(form("/en/portal-manage/trips", "title=Sneaky", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/en/portal-manage/login");
    }

    #[tokio::test]
    async fn odd_locale_segments_cannot_bypass_the_gate() {
        let requests = [
            Request::get("/EN/portal-manage/messages").body(Body::empty()).unwrap(),
            Request::get("/english/portal-manage/services").body(Body::empty()).unwrap(),
            Request::get("/e/portal-manage/quick-actions").body(Body::empty()).unwrap(),
            form("/EN/portal-manage/trips", "title=Sneaky", None),
            form(&format!("/EN/portal-manage/trips/{}/delete", Uuid::nil()), "", None),
        ];

        for request in requests {
            let path = request.uri().path().to_string();
            let response = app(Arc::new(FakeAuth::default())).oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
            assert_eq!(response.headers()[header::LOCATION], "/en/portal-manage/login", "{path}");
        }
    }

    #[tokio::test]
    async fn handlers_require_an_editor_even_without_the_gate() {
        let app = Router::new()
            .route("/{locale}/portal-manage/messages", axum::routing::get(list_messages))
            .route(
                "/{locale}/portal-manage/services/{id}/delete",
                axum::routing::post(delete_item::<Service>),
            )
            .with_state(state(Arc::new(FakeAuth::default())));

        let response = app
            .clone()
            .oneshot(Request::get("/fr/portal-manage/messages").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/fr/portal-manage/login");

        let response = app
            .oneshot(form(&format!("/ar/portal-manage/services/{}/delete", Uuid::nil()), "", None))
            .await
            .unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/ar/portal-manage/login");
    }

    #[tokio::test]
    async fn blank_optional_form_fields_pass_validation() {
        let cookie = format!("sb-test-access-token={VALID_ACCESS}; sb-test-expires-at=4000000000");
        let response = app(Arc::new(FakeAuth::default()))
            .oneshot(form(
                "/en/portal-manage/services",
                "title=Dental+care&description=&icon=&imageUrl=",
                Some(&cookie),
            ))
            .await
            .unwrap();

        // Passou da validação; o banco de teste está fora do ar
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

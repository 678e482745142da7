// src/middleware/session.rs

use axum::{
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::Utc;

use crate::{
    common::{error::AppError, locale::Locale},
    models::auth::AuthUser,
    services::session::{CookieMutation, SessionClient},
};

pub const PORTAL_SEGMENT: &str = "portal-manage";
pub const LOGIN_SEGMENT: &str = "login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    PassThrough,
    Redirect(String),
}

/// Primeiro segmento do caminho se ele tiver o formato de duas letras
/// minúsculas. Não confere com os idiomas suportados.
pub fn locale_prefix(path: &str) -> Option<&str> {
    let first = path.trim_start_matches('/').split('/').next()?;
    (first.len() == 2 && first.bytes().all(|b| b.is_ascii_lowercase())).then_some(first)
}

// Segmentos depois de `portal-manage`, ou None se a rota não é do portal.
// O router aceita qualquer primeiro segmento em `/{locale}/portal-manage`,
// então o gate também: o formato do prefixo só decide o idioma do redirect.
fn portal_rest(path: &str) -> Option<Vec<&str>> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let start = segments.iter().take(2).position(|s| *s == PORTAL_SEGMENT)?;
    Some(segments[start + 1..].to_vec())
}

pub fn is_protected(path: &str) -> bool {
    portal_rest(path).is_some()
}

pub fn is_login_path(path: &str) -> bool {
    portal_rest(path).is_some_and(|rest| rest == [LOGIN_SEGMENT])
}

pub fn login_path(locale: &str) -> String {
    format!("/{locale}/{PORTAL_SEGMENT}/{LOGIN_SEGMENT}")
}

pub fn decide(path: &str, authenticated: bool) -> GateDecision {
    if authenticated || !is_protected(path) || is_login_path(path) {
        return GateDecision::PassThrough;
    }
    let locale = locale_prefix(path).unwrap_or(Locale::DEFAULT.as_str());
    GateDecision::Redirect(login_path(locale))
}

// O middleware em si: roda antes do roteamento em todas as requisições.
pub async fn session_gate(
    State(session): State<SessionClient>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let lookup = session.current_user(&jar, Utc::now().timestamp()).await;

    let cookies: Vec<Cookie<'static>> = lookup
        .mutations
        .iter()
        .map(|m| m.to_cookie(session.settings()))
        .collect();

    // Tokens renovados precisam valer já para os handlers desta requisição
    forward_to_request(request.headers_mut(), &lookup.mutations);

    if let GateDecision::Redirect(to) = decide(&path, lookup.user.is_some()) {
        tracing::debug!(%path, %to, "Sessão ausente, redirecionando para o login");
        let mut response = Redirect::temporary(&to).into_response();
        apply_to_response(response.headers_mut(), &cookies);
        return response;
    }

    if let Some(user) = lookup.user {
        request.extensions_mut().insert(CurrentUser(user));
    }

    let mut response = next.run(request).await;
    apply_to_response(response.headers_mut(), &cookies);
    response
}

/// Reescreve o cabeçalho `Cookie` da requisição com as mutações aplicadas.
pub fn forward_to_request(headers: &mut HeaderMap, mutations: &[CookieMutation]) {
    if mutations.is_empty() {
        return;
    }

    let mut pairs: Vec<(String, String)> = CookieJar::from_headers(headers)
        .iter()
        .map(|c| (c.name().to_string(), c.value().to_string()))
        .collect();

    for mutation in mutations {
        pairs.retain(|(name, _)| name != mutation.name());
        if let CookieMutation::Set { name, value } = mutation {
            pairs.push((name.clone(), value.clone()));
        }
    }

    headers.remove(header::COOKIE);
    let joined = pairs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ");

    if !joined.is_empty() {
        match HeaderValue::from_str(&joined) {
            Ok(value) => {
                headers.insert(header::COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Cookie renovado inválido para cabeçalho"),
        }
    }
}

/// Acrescenta `Set-Cookie` para cada cookie cujo nome ainda não foi escrito
/// na resposta. Aplicar duas vezes não duplica nada, e escritas feitas pelo
/// handler (login, logout) prevalecem.
pub fn apply_to_response(headers: &mut HeaderMap, cookies: &[Cookie<'static>]) {
    for cookie in cookies {
        let already_written = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| Cookie::parse(v).ok())
            .any(|existing| existing.name() == cookie.name());

        if already_written {
            continue;
        }

        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, cookie = cookie.name(), "Set-Cookie inválido"),
        }
    }
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(|| {
            let path = parts
                .extensions
                .get::<OriginalUri>()
                .map(|uri| uri.0.path())
                .unwrap_or_else(|| parts.uri.path());
            AppError::AuthFailure(Locale::resolve(locale_prefix(path).unwrap_or_default()))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{atomic::Ordering, Arc};

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware::from_fn_with_state,
        Router,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::services::session::testing::*;

    fn app(fake: Arc<FakeAuth>) -> Router {
        Router::new()
            .fallback(|request: axum::extract::Request| async move {
                let user = request.extensions().get::<CurrentUser>().is_some();
                let cookie = request
                    .headers()
                    .get(header::COOKIE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                format!("user={user} cookie={cookie}")
            })
            .layer(from_fn_with_state(client(fake), session_gate))
    }

    fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn prefix_detection_only_checks_the_shape() {
        assert_eq!(locale_prefix("/ar/portal-manage"), Some("ar"));
        assert_eq!(locale_prefix("/zz/portal-manage"), Some("zz"));
        assert_eq!(locale_prefix("/portal-manage/services"), None);
        assert_eq!(locale_prefix("/EN/portal-manage"), None);
        assert_eq!(locale_prefix("/"), None);
    }

    #[test]
    fn decisions_for_anonymous_requests() {
        assert_eq!(
            decide("/ar/portal-manage/services", false),
            GateDecision::Redirect("/ar/portal-manage/login".into())
        );
        assert_eq!(
            decide("/portal-manage/services", false),
            GateDecision::Redirect("/en/portal-manage/login".into())
        );
        assert_eq!(decide("/en/portal-manage/login", false), GateDecision::PassThrough);
        assert_eq!(decide("/en/portal-manage/login/", false), GateDecision::PassThrough);
        assert_eq!(decide("/fr/destinations", false), GateDecision::PassThrough);
        assert_eq!(decide("/", false), GateDecision::PassThrough);
        assert_eq!(decide("/en/portal-manage", true), GateDecision::PassThrough);
    }

    #[test]
    fn any_first_segment_before_portal_is_protected() {
        for path in ["/EN/portal-manage/messages", "/english/portal-manage/services", "/e/portal-manage"] {
            assert!(is_protected(path), "{path}");
            assert_eq!(decide(path, false), GateDecision::Redirect("/en/portal-manage/login".into()));
        }
        assert!(is_login_path("/EN/portal-manage/login"));
        assert!(!is_protected("/en/blog/portal-manage"));
        assert!(!is_protected("/en/portal-manager"));
    }

    #[tokio::test]
    async fn rejected_current_user_uses_the_original_uri_locale() {
        let (mut parts, _) = Request::get("/portal-manage")
            .extension(OriginalUri("/ar/portal-manage".parse().unwrap()))
            .body(Body::empty())
            .unwrap()
            .into_parts();

        let rejection = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(rejection, AppError::AuthFailure(Locale::Ar)));
    }

    #[test]
    fn two_letter_segment_outside_the_supported_set_is_kept() {
        assert_eq!(
            decide("/zz/portal-manage", false),
            GateDecision::Redirect("/zz/portal-manage/login".into())
        );
    }

    #[tokio::test]
    async fn anonymous_admin_request_redirects_to_localized_login() {
        let response = app(Arc::new(FakeAuth::default()))
            .oneshot(get("/ar/portal-manage/services", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/ar/portal-manage/login");
    }

    #[tokio::test]
    async fn admin_request_without_locale_redirects_to_default_login() {
        let response = app(Arc::new(FakeAuth::default()))
            .oneshot(get("/portal-manage/services", None))
            .await
            .unwrap();

        assert_eq!(location(&response), "/en/portal-manage/login");
    }

    #[tokio::test]
    async fn login_page_and_public_pages_pass_through() {
        for path in ["/en/portal-manage/login", "/tr/destinations", "/"] {
            let response = app(Arc::new(FakeAuth::default())).oneshot(get(path, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{path}");
            assert!(response.headers().get(header::SET_COOKIE).is_none());
        }
    }

    #[tokio::test]
    async fn valid_session_reaches_admin_handler() {
        let cookie = format!("sb-test-access-token={VALID_ACCESS}; sb-test-expires-at=4000000000");
        let response = app(Arc::new(FakeAuth::default()))
            .oneshot(get("/en/portal-manage/services", Some(&cookie)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.starts_with("user=true"));
    }

    #[tokio::test]
    async fn provider_outage_denies_admin_access() {
        let cookie = format!("sb-test-access-token={VALID_ACCESS}; sb-test-expires-at=4000000000");
        let response = app(Arc::new(FakeAuth::offline()))
            .oneshot(get("/en/portal-manage", Some(&cookie)))
            .await
            .unwrap();

        assert_eq!(location(&response), "/en/portal-manage/login");
    }

    #[tokio::test]
    async fn refreshed_cookies_reach_handler_and_response() {
        let cookie = format!("theme=dark; sb-test-access-token=stale; sb-test-refresh-token={VALID_REFRESH}");
        let response = app(Arc::new(FakeAuth::default()))
            .oneshot(get("/en/portal-manage/trips", Some(&cookie)))
            .await
            .unwrap();

        let set_cookies: Vec<_> = response.headers().get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(set_cookies.len(), 3);

        let body = body_text(response).await;
        assert!(body.starts_with("user=true"));
        assert!(body.contains("theme=dark"));
        assert!(body.contains(&format!("sb-test-access-token={FRESH_ACCESS}")));
    }

    #[tokio::test]
    async fn refresh_side_effect_survives_the_redirect() {
        // Refresh rejeitado: a limpeza dos cookies tem que ir junto com o redirect
        let response = app(Arc::new(FakeAuth::default()))
            .oneshot(get("/en/portal-manage", Some("sb-test-refresh-token=revoked")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get_all(header::SET_COOKIE).iter().count(), 3);
    }

    #[tokio::test]
    async fn stacked_gates_do_not_refresh_twice_or_duplicate_cookies() {
        let fake = Arc::new(FakeAuth::default());
        let app = app(fake.clone()).layer(from_fn_with_state(client(fake.clone()), session_gate));
        let cookie = format!("sb-test-refresh-token={VALID_REFRESH}");

        let response = app.oneshot(get("/en/portal-manage/packages", Some(&cookie))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(fake.refresh_calls.load(Ordering::SeqCst), 1);
        assert_eq!(response.headers().get_all(header::SET_COOKIE).iter().count(), 3);
    }

    #[test]
    fn applying_cookies_twice_is_idempotent() {
        let settings = crate::services::session::CookieSettings::new("sb-test", false);
        let cookies: Vec<_> = [
            CookieMutation::Set { name: settings.access_token.clone(), value: "a".into() },
            CookieMutation::Remove { name: settings.refresh_token.clone() },
        ]
        .iter()
        .map(|m| m.to_cookie(&settings))
        .collect();

        let mut headers = HeaderMap::new();
        apply_to_response(&mut headers, &cookies);
        apply_to_response(&mut headers, &cookies);

        assert_eq!(headers.get_all(header::SET_COOKIE).iter().count(), 2);
    }
}

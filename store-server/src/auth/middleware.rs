//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;

use crate::AppError;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// 店面公开路由
///
/// Browsing, checkout, order tracking and the payment confirmation callback
/// are anonymous; everything else under `/api/` authenticates. Paths are
/// matched method-sensitively because `/api/orders` is public for POST
/// (checkout) but admin-only for GET (the back-office list).
fn is_public_route(method: &Method, path: &str) -> bool {
    match *method {
        Method::GET => {
            matches!(
                path,
                "/api/health"
                    | "/api/categories"
                    | "/api/products"
                    | "/api/stores"
                    | "/api/time_slots/available"
                    | "/api/delivery_settings"
            ) || path.starts_with("/api/image/")
                || public_order_route(method, path)
        }
        Method::POST => {
            matches!(
                path,
                "/api/auth/login" | "/api/orders" | "/api/pickup_orders" | "/api/promo_codes/validate"
            ) || public_order_route(method, path)
        }
        _ => false,
    }
}

/// Order-scoped public paths: the tracking view, the message thread and the
/// gateway's payment confirmation. Status changes and deletes stay behind
/// auth.
fn public_order_route(method: &Method, path: &str) -> bool {
    let rest = match path
        .strip_prefix("/api/orders/")
        .or_else(|| path.strip_prefix("/api/pickup_orders/"))
    {
        Some(rest) => rest,
        None => return false,
    };
    let (id, tail) = match rest.split_once('/') {
        Some((id, tail)) => (id, Some(tail)),
        None => (rest, None),
    };
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    matches!(
        (method, tail),
        (&Method::GET, None)
            | (&Method::GET, Some("messages"))
            | (&Method::POST, Some("messages"))
            | (&Method::POST, Some("payment"))
    )
}

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展 (`req.extensions_mut().insert(user)`)。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - [`is_public_route`] 列出的店面路由。公开路由上如果带了有效令牌，
///   仍会注入 [`CurrentUser`]（订单留言用它区分 admin 和 customer）。
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 Unauthorized |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 InvalidToken |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_string();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let public = is_public_route(req.method(), &path);

    let jwt_service = state.jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => match JwtService::extract_from_header(header) {
            Some(token) => token,
            None if public => return Ok(next.run(req).await),
            None => return Err(AppError::invalid_token("Invalid authorization header")),
        },
        None if public => return Ok(next.run(req).await),
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    // 验证令牌
    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::try_from(claims)
                .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) if public => {
            // 公开路由不因坏令牌而失败，只是不注入用户
            security_log!(
                "WARN",
                "auth_ignored_on_public_route",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// 权限检查中间件 - 要求特定权限
///
/// # 参数
///
/// - `permission`: 所需权限，如 `"catalog:write"`, `"orders:read"`
///
/// # 支持的通配符
///
/// - `"orders:*"` 匹配所有 orders 相关操作
/// - `"all"` 匹配所有权限
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/products/all", get(handler::list_all))
///     .layer(middleware::from_fn(require_permission("catalog:read")));
/// ```
///
/// # 错误
///
/// 无权限返回 403 Forbidden
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            if !user.has_permission(permission) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    user_id = user.id,
                    username = user.username.clone(),
                    required_permission = permission
                );
                return Err(AppError::forbidden(format!(
                    "Permission denied: {}",
                    permission
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

/// 管理员中间件 - 要求管理员角色
///
/// 检查 `CurrentUser.role == "admin"`
///
/// # 错误
///
/// 非管理员返回 403 Forbidden
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id,
            username = user.username.clone(),
            user_role = user.role.clone()
        );
        return Err(AppError::new(shared::ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storefront_reads_are_public() {
        assert!(is_public_route(&Method::GET, "/api/products"));
        assert!(is_public_route(&Method::GET, "/api/categories"));
        assert!(is_public_route(&Method::GET, "/api/time_slots/available"));
        assert!(is_public_route(&Method::GET, "/api/image/abc123.jpg"));
    }

    #[test]
    fn test_checkout_and_tracking_are_public() {
        assert!(is_public_route(&Method::POST, "/api/orders"));
        assert!(is_public_route(&Method::POST, "/api/pickup_orders"));
        assert!(is_public_route(&Method::GET, "/api/orders/12345"));
        assert!(is_public_route(&Method::GET, "/api/pickup_orders/12345/messages"));
        assert!(is_public_route(&Method::POST, "/api/orders/12345/messages"));
        assert!(is_public_route(&Method::POST, "/api/orders/12345/payment"));
        assert!(is_public_route(&Method::POST, "/api/promo_codes/validate"));
    }

    #[test]
    fn test_admin_surface_is_not_public() {
        assert!(!is_public_route(&Method::GET, "/api/orders"));
        assert!(!is_public_route(&Method::GET, "/api/products/all"));
        assert!(!is_public_route(&Method::POST, "/api/products"));
        assert!(!is_public_route(&Method::PUT, "/api/orders/12345/status"));
        assert!(!is_public_route(&Method::DELETE, "/api/orders/12345"));
        assert!(!is_public_route(&Method::GET, "/api/orders/12345x"));
        assert!(!is_public_route(&Method::GET, "/api/sync/versions"));
        assert!(!is_public_route(&Method::POST, "/api/upload"));
    }
}

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::Method;
use actix_web::middleware::Next;

const OVERRIDE_PARAM: &str = "_method";

/// Lets html forms, which can only POST, reach PUT and DELETE routes by
/// adding `?_method=PUT` or `?_method=DELETE` to the form action. Must wrap
/// the app so it runs before routing.
pub async fn method_override(
    mut req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    if req.method() == Method::POST {
        if let Some(method) = requested_method(req.query_string()) {
            tracing::debug!(%method, path = req.path(), "overriding request method");
            req.head_mut().method = method;
        }
    }

    next.call(req).await
}

fn requested_method(query: &str) -> Option<Method> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).ok()?;
    let (_, value) = pairs.into_iter().find(|(key, _)| key == OVERRIDE_PARAM)?;

    match value.to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

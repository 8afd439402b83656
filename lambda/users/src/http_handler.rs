use lambda_http::http::StatusCode;
use lambda_http::tracing::{error, info, warn};
use lambda_http::{Body, Error, Request, RequestExt, Response};
use serde::Serialize;

use crate::error::UserError;
use crate::repository::UserRepository;
use crate::store::UserStore;

#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<Body>, Error> {
    let body = serde_json::to_string(body)?;
    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::Text(body))?)
}

fn error_response(status: StatusCode, message: &str) -> Result<Response<Body>, Error> {
    json_response(status, &ErrorResponse { error: message })
}

fn user_error_response(err: &UserError) -> Result<Response<Body>, Error> {
    let status = err.status_code();
    if status.is_server_error() {
        let cause = std::error::Error::source(err).map(ToString::to_string);
        error!(error = %err, cause = ?cause, "request failed");
    } else {
        warn!(error = %err, "request rejected");
    }
    error_response(status, &err.to_string())
}

fn email_param(event: &Request) -> Option<String> {
    event
        .query_string_parameters_ref()
        .and_then(|params| params.first("email"))
        .map(str::to_string)
}

pub(crate) async fn function_handler<S: UserStore>(
    users: &UserRepository<S>,
    event: Request,
) -> Result<Response<Body>, Error> {
    let method = event.method().as_str();
    info!(method, path = event.uri().path(), "handling request");

    match method {
        "GET" => match email_param(&event).filter(|e| !e.is_empty()) {
            Some(email) => match users.fetch_user(&email).await {
                Ok(Some(user)) => json_response(StatusCode::OK, &user),
                Ok(None) => user_error_response(&UserError::UserDoesNotExist),
                Err(e) => user_error_response(&e),
            },
            None => match users.fetch_all_users().await {
                Ok(all) => json_response(StatusCode::OK, &all),
                Err(e) => user_error_response(&e),
            },
        },
        "POST" => match users.create_user(event.body().as_ref()).await {
            Ok(user) => {
                info!(email = %user.email, "user created");
                json_response(StatusCode::CREATED, &user)
            }
            Err(e) => user_error_response(&e),
        },
        "PUT" => match users.update_user(event.body().as_ref()).await {
            Ok(user) => {
                info!(email = %user.email, "user updated");
                json_response(StatusCode::OK, &user)
            }
            Err(e) => user_error_response(&e),
        },
        "DELETE" => {
            let email = email_param(&event).unwrap_or_default();
            match users.delete_user(&email).await {
                Ok(()) => {
                    info!(email = %email, "user deleted");
                    Ok(Response::builder().status(StatusCode::OK).body(Body::Empty)?)
                }
                Err(e) => user_error_response(&e),
            }
        }
        _ => error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed"),
    }
}

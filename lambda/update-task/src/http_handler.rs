use lambda_http::{Body, Error, Request, RequestExt, Response};
use serde_json::Value;
use tasks_core::response::{error_response, message_response};
use tasks_core::{apply_partial_update, Error as TaskError, Patch, TaskStore};

pub(crate) async fn function_handler(
    store: &dyn TaskStore,
    event: Request,
) -> Result<Response<Body>, Error> {
    if event.method().as_str() != "PUT" {
        return error_response(&TaskError::MethodNotAllowed);
    }

    let params = event.path_parameters();
    let pk = match params.first("id") {
        Some(id) if !id.is_empty() => id,
        _ => {
            return error_response(&TaskError::validation(
                "Missing path parameter: id is required",
            ))
        }
    };
    // Path ids arrive percent-encoded; decode before using them as a key.
    let pk = match urlencoding::decode(pk) {
        Ok(pk) => pk.into_owned(),
        Err(_) => {
            return error_response(&TaskError::validation(
                "id is not valid percent-encoded UTF-8",
            ))
        }
    };

    let body = event.body();
    if matches!(body, Body::Empty) {
        return error_response(&TaskError::validation("Missing request body"));
    }
    let parsed: Value = match serde_json::from_slice(body.as_ref()) {
        Ok(value) => value,
        Err(e) => {
            return error_response(&TaskError::validation(format!("Invalid JSON body: {e}")))
        }
    };
    let patch = match Patch::from_value(parsed) {
        Ok(patch) => patch,
        Err(e) => return error_response(&e),
    };

    tracing::info!(%pk, "updating task");
    match apply_partial_update(store, &pk, &patch).await {
        Ok(()) => message_response(200, "Task updated successfully"),
        Err(e) => error_response(&e),
    }
}

use lambda_http::{Body, Error, Request, RequestExt, Response};
use tasks_core::response::{error_response, message_response};
use tasks_core::{Error as TaskError, TaskStore};

pub(crate) async fn function_handler(
    store: &dyn TaskStore,
    event: Request,
) -> Result<Response<Body>, Error> {
    if event.method().as_str() != "DELETE" {
        return error_response(&TaskError::MethodNotAllowed);
    }

    let params = event.path_parameters();
    let pk = match params.first("id") {
        Some(id) if !id.is_empty() => id,
        _ => return error_response(&TaskError::validation("Missing path parameter: id")),
    };
    let pk = match urlencoding::decode(pk) {
        Ok(pk) => pk.into_owned(),
        Err(_) => {
            return error_response(&TaskError::validation(
                "id is not valid percent-encoded UTF-8",
            ))
        }
    };

    match store.delete_task(&pk).await {
        Ok(()) => message_response(200, "Task deleted"),
        Err(e) => error_response(&e),
    }
}

use lambda_http::{Body, Error, Request, Response};
use tasks_core::response::{error_response, json_response};
use tasks_core::{Error as TaskError, TaskStore};

pub(crate) async fn function_handler(
    store: &dyn TaskStore,
    event: Request,
) -> Result<Response<Body>, Error> {
    if event.method().as_str() != "GET" {
        return error_response(&TaskError::MethodNotAllowed);
    }

    match store.list_tasks().await {
        Ok(records) => json_response(200, &records),
        Err(e) => error_response(&e),
    }
}

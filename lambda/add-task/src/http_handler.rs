use lambda_http::{Body, Error, Request, Response};
use serde_json::Value;
use tasks_core::response::{error_response, message_response};
use tasks_core::{Error as TaskError, Record, TaskStore};

pub(crate) async fn function_handler(
    store: &dyn TaskStore,
    event: Request,
) -> Result<Response<Body>, Error> {
    if event.method().as_str() != "POST" {
        return error_response(&TaskError::MethodNotAllowed);
    }

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
    let record = match Record::from_value(parsed) {
        Ok(record) => record,
        Err(e) => return error_response(&e),
    };

    match store.put_task(&record).await {
        Ok(()) => message_response(201, "Task created"),
        Err(e) => error_response(&e),
    }
}

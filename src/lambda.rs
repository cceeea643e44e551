//! AWS Lambda runtime binding.
//!
//! Each runtime event is handed to [`GatewayAdapter::handle_value`], which
//! always produces a response envelope, so the handler future never fails.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

use crate::adapter::GatewayAdapter;
use crate::envelope::ResponseEnvelope;

/// Poll the Lambda runtime API and answer events until the process exits.
pub async fn run(adapter: GatewayAdapter) -> Result<(), Error> {
    tracing::info!(routes = adapter.routes().len(), "Starting Lambda runtime loop");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let adapter = adapter.clone();
        async move { Ok::<ResponseEnvelope, Error>(respond(&adapter, event)) }
    }))
    .await
}

fn respond(adapter: &GatewayAdapter, event: LambdaEvent<Value>) -> ResponseEnvelope {
    let LambdaEvent { payload, context } = event;
    tracing::debug!(aws_request_id = %context.request_id, "Invocation received");
    adapter.handle_value(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdapterConfig;
    use crate::lifecycle::startup::build_adapter;
    use lambda_runtime::Context;
    use serde_json::json;

    #[test]
    fn test_respond_to_runtime_event() {
        let adapter = build_adapter(&AdapterConfig::default()).unwrap();
        let event = LambdaEvent::new(
            json!({ "httpMethod": "GET", "path": "/users/9", "headers": null }),
            Context::default(),
        );

        let response = respond(&adapter, event);
        assert_eq!(response.status_code, 200);
        assert_eq!(
            response.json_body().unwrap(),
            json!({ "user_id": "9", "name": "User 9" })
        );
    }
}

//! AWS Lambda handler for running newsletter projections
//!
//! Accepts the input parameters as a JSON body (snake_case or camelCase
//! field names, missing fields defaulted) and returns the month records with
//! a current-vs-projected summary.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use newsletter_projection::{
    InputParameters, MonthRecord, ProjectionError, ProjectionSummary, ScenarioRunner,
};
use serde::Serialize;

/// Output from the projection
#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    pub inputs: InputParameters,
    pub summary: ProjectionSummary,
    pub months: Vec<MonthRecord>,
    pub execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
}

fn error_response(
    status: u16,
    message: &str,
    field: Option<&str>,
) -> Result<Response<Body>, Error> {
    let body = serde_json::to_string(&ErrorBody {
        error: message,
        field,
    })?;
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(body))?)
}

fn json_response(body: &ProjectionResponse) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body)?))?)
}

/// Parse the request body; an empty body means "all defaults"
fn parse_inputs(body: &Body) -> Result<InputParameters, serde_json::Error> {
    let text = match body {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => String::new(),
    };

    if text.trim().is_empty() {
        Ok(InputParameters::default())
    } else {
        serde_json::from_str(&text)
    }
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)?);
    }

    let inputs = match parse_inputs(event.body()) {
        Ok(p) => p,
        Err(e) => return error_response(400, &format!("Invalid JSON: {}", e), None),
    };

    let result = match ScenarioRunner::new(inputs).run() {
        Ok(r) => r,
        Err(e @ ProjectionError::InvalidInput { .. }) => {
            log::warn!("Rejected projection request: {}", e);
            return error_response(422, &e.to_string(), e.field());
        }
        Err(e) => return error_response(500, &e.to_string(), None),
    };

    let response = ProjectionResponse {
        inputs,
        summary: result.summary(),
        months: result.months,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    json_response(&response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

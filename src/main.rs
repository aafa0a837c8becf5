use clap::{Parser, Subcommand};
use deuce_api_client::{
    normalize_error, normalize_success, ApiClient, ApiRequest, ClientError, Config, ListQuery,
    Resource,
};
use reqwest::Method;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "deuce-api")]
#[command(about = "Query the DeuceLeague admin API and normalize its responses")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize a captured response body (FILE or stdin).
    Normalize {
        /// Treat the body as the body of a failed response.
        #[arg(long)]
        error: bool,
        file: Option<PathBuf>,
    },
    /// List a collection.
    List {
        resource: Resource,
        #[arg(long)]
        page: Option<u64>,
        #[arg(long)]
        limit: Option<u64>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Fetch one record.
    Get { resource: Resource, id: String },
    /// Send an arbitrary request relative to the API URL.
    Request {
        method: String,
        path: String,
        /// JSON request body.
        #[arg(long)]
        body: Option<String>,
        /// Query parameter as KEY=VALUE, repeatable.
        #[arg(long = "query", value_name = "KEY=VALUE", value_parser = parse_query_pair)]
        query: Vec<(String, String)>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deuce_api_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Normalize { error, file } => normalize_input(error, file.as_ref()),
        Command::List {
            resource,
            page,
            limit,
            search,
        } => {
            let query = ListQuery {
                page,
                limit,
                search,
                filters: Vec::new(),
            };
            let outcome = connect()?
                .list(resource, &query)
                .await
                .and_then(|envelope| to_json(&envelope));
            report(outcome)
        }
        Command::Get { resource, id } => {
            let outcome = connect()?
                .fetch(resource, &id)
                .await
                .and_then(|envelope| to_json(&envelope));
            report(outcome)
        }
        Command::Request {
            method,
            path,
            body,
            query,
        } => {
            let method = Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())?;
            let mut request = ApiRequest::new(method, path);
            for (key, value) in query {
                request = request.query(key, value);
            }
            if let Some(raw) = body {
                let body: Value = serde_json::from_str(&raw)
                    .map_err(|e| ClientError::Decode(format!("--body is not JSON: {}", e)))?;
                request = request.with_body(body);
            }
            let outcome = connect()?
                .send(request)
                .await
                .map(|response| response.into_data());
            report(outcome)
        }
    }
}

fn connect() -> anyhow::Result<ApiClient> {
    let config = Config::from_env()?;
    config.validate()?;
    tracing::debug!("API URL: {}", config.api_url);
    Ok(ApiClient::new(&config)?)
}

fn normalize_input(error: bool, file: Option<&PathBuf>) -> anyhow::Result<()> {
    let raw = read_input(file)?;
    print_json(&normalize_body(error, &raw)?)
}

fn normalize_body(error: bool, raw: &str) -> anyhow::Result<Value> {
    let mut body: Value = serde_json::from_str(raw)
        .map_err(|e| ClientError::Decode(format!("Input is not JSON: {}", e)))?;
    if error {
        normalize_error(&mut body);
    } else {
        body = normalize_success(body);
    }
    Ok(body)
}

fn parse_query_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("query key must not be empty: `{}`", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

// HTTP errors print the normalized error body before failing.
fn report(outcome: deuce_api_client::Result<Value>) -> anyhow::Result<()> {
    match outcome {
        Ok(value) => print_json(&value),
        Err(err) => {
            if let Some(body) = err.body() {
                eprintln!("{}", serde_json::to_string_pretty(body)?);
            }
            Err(err.into())
        }
    }
}

fn read_input(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> deuce_api_client::Result<Value> {
    serde_json::to_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn temp_body(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(body.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn normalize_reads_success_body_from_file() {
        let file = temp_body(r#"{ "players": [{ "id": "p1" }], "total": 1 }"#);
        let path = file.path().to_path_buf();

        assert!(normalize_input(false, Some(&path)).is_ok());
        let raw = read_input(Some(&path)).unwrap();
        assert_eq!(
            normalize_body(false, &raw).unwrap(),
            json!({
                "success": true,
                "data": [{ "id": "p1" }],
                "pagination": { "page": 1, "limit": 1, "total": 1, "totalPages": 1 }
            })
        );
    }

    #[test]
    fn normalize_error_flag_fills_error_gaps() {
        let file = temp_body(r#"{ "error": "Forbidden" }"#);
        let path = file.path().to_path_buf();

        assert!(normalize_input(true, Some(&path)).is_ok());
        assert_eq!(
            normalize_body(true, &read_input(Some(&path)).unwrap()).unwrap(),
            json!({ "error": "Forbidden", "message": "Forbidden", "data": null, "success": false })
        );
    }

    #[test]
    fn normalize_rejects_non_json_input() {
        let file = temp_body("<html>oops</html>");
        assert!(normalize_input(false, Some(&file.path().to_path_buf())).is_err());
        assert!(normalize_input(false, Some(&PathBuf::from("/nonexistent/body.json"))).is_err());
    }

    #[test]
    fn report_fails_on_http_errors() {
        let outcome = report(Err(ClientError::Http {
            method: "GET".to_string(),
            url: "http://localhost:3001/api/disputes/d1".to_string(),
            status: 404,
            body: json!({ "success": false, "data": null, "message": "Not found" }),
        }));
        let err = outcome.unwrap_err();
        assert!(err.to_string().contains("Not found"), "{}", err);

        assert!(report(Ok(json!({ "success": true, "data": [] }))).is_ok());
    }

    #[test]
    fn list_arguments_parse() {
        let cli = Cli::try_parse_from(["deuce-api", "list", "players", "--page", "2"]).unwrap();
        match cli.command {
            Command::List {
                resource,
                page,
                limit,
                search,
            } => {
                assert_eq!(resource, Resource::Players);
                assert_eq!(page, Some(2));
                assert_eq!(limit, None);
                assert_eq!(search, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["deuce-api", "list", "teams"]).is_err());
        assert!(Cli::try_parse_from(["deuce-api", "list", "players", "--page", "two"]).is_err());
    }

    #[test]
    fn request_takes_repeated_query_pairs() {
        let cli = Cli::try_parse_from([
            "deuce-api",
            "request",
            "get",
            "/api/matches",
            "--query",
            "status=pending",
            "--query",
            "search=a=b",
        ])
        .unwrap();
        match cli.command {
            Command::Request {
                method,
                path,
                body,
                query,
            } => {
                assert_eq!(method, "get");
                assert_eq!(path, "/api/matches");
                assert!(body.is_none());
                assert_eq!(
                    query,
                    vec![
                        ("status".to_string(), "pending".to_string()),
                        ("search".to_string(), "a=b".to_string()),
                    ]
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["deuce-api", "request", "get", "/x", "--query", "nokey"]).is_err());
        assert!(Cli::try_parse_from(["deuce-api", "request", "get", "/x", "--query", "=v"]).is_err());
    }
}

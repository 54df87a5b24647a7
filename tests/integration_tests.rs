use anyhow::Result;
use httpmock::prelude::*;
use router_translate::domain::ports::DatasetType;
use router_translate::{
    CliConfig, LocalStorage, RouterClient, TranslateEngine, TranslateError, TranslatePipeline,
};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn cli_config(router_host: String, base: &Path, datasets: &[&str], accept: &[&str]) -> CliConfig {
    CliConfig {
        router_host,
        model: "test-model".to_string(),
        dataset_paths: datasets
            .iter()
            .map(|d| base.join(d).to_str().unwrap().to_string())
            .collect(),
        dataset_type: None,
        accept_fields: accept.iter().map(|f| f.to_string()).collect(),
        num_workers: 1,
        batch_size: 8,
        timeout_secs: 5,
        output_path: Some(base.join("out/translated.jsonl").to_str().unwrap().to_string()),
        progress: false,
        verbose: false,
        monitor: false,
    }
}

async fn run_engine(config: CliConfig) -> Result<String, TranslateError> {
    let translator = RouterClient::new(
        &config.router_host,
        config.model.clone(),
        Duration::from_secs(config.timeout_secs),
    )?;
    let pipeline = TranslatePipeline::new(LocalStorage::current_dir(), translator, config)?;
    TranslateEngine::new(pipeline).run().await
}

#[tokio::test]
async fn test_end_to_end_hi_bye_sequential_and_concurrent() {
    for workers in [1, 4] {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("data.json"),
            r#"[{"text": "hi"}, {"text": "bye"}]"#,
        )
        .unwrap();

        let server = MockServer::start();
        let hi_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/translate")
                .json_body(serde_json::json!({"model": "test-model", "texts": ["hi"]}));
            then.status(200)
                .header("Content-Type", "application/json")
                .delay(Duration::from_millis(150))
                .json_body(serde_json::json!(["HI"]));
        });
        let bye_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/translate")
                .json_body(serde_json::json!({"model": "test-model", "texts": ["bye"]}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!(["BYE"]));
        });

        let mut config = cli_config(server.base_url(), temp_dir.path(), &["data.json"], &["text"]);
        config.num_workers = workers;
        config.batch_size = 1;
        let output = config.output_path.clone().unwrap();

        let destination = run_engine(config).await.unwrap();

        hi_mock.assert();
        bye_mock.assert();
        assert_eq!(destination, output);
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "{\"text\": \"HI\"}\n{\"text\": \"BYE\"}\n");
    }
}

#[tokio::test]
async fn test_many_batches_keep_input_order_under_concurrency() {
    let temp_dir = TempDir::new().unwrap();
    let lines: Vec<String> = (0..12)
        .map(|i| format!("{{\"id\": {}, \"text\": \"line {}\"}}", i, i))
        .collect();
    std::fs::write(temp_dir.path().join("data.jsonl"), lines.join("\n")).unwrap();

    let server = MockServer::start();
    for i in 0..6u64 {
        let texts = vec![format!("line {}", i * 2), format!("line {}", i * 2 + 1)];
        let translated: Vec<String> = texts.iter().map(|t| t.to_uppercase()).collect();
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/translate")
                .json_body(serde_json::json!({"model": "test-model", "texts": texts}));
            then.status(200)
                .delay(Duration::from_millis(20 * (6 - i)))
                .json_body(serde_json::json!(translated));
        });
    }

    let mut outputs = Vec::new();
    for workers in [1, 2, 8] {
        let mut config = cli_config(server.base_url(), temp_dir.path(), &["data.jsonl"], &["text"]);
        config.num_workers = workers;
        config.batch_size = 2;
        config.output_path = Some(
            temp_dir
                .path()
                .join(format!("out-{}.jsonl", workers))
                .to_str()
                .unwrap()
                .to_string(),
        );
        let output = config.output_path.clone().unwrap();

        run_engine(config).await.unwrap();
        outputs.push(std::fs::read_to_string(output).unwrap());
    }

    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(outputs[0], outputs[2]);
    let first_lines: Vec<&str> = outputs[0].lines().take(2).collect();
    assert_eq!(first_lines, vec![r#"{"text": "LINE 0"}"#, r#"{"text": "LINE 1"}"#]);
    assert_eq!(outputs[0].lines().count(), 12);
}

#[tokio::test]
async fn test_upstream_failure_writes_no_output() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("data.jsonl"),
        "{\"text\": \"a\"}\n{\"text\": \"b\"}\n{\"text\": \"c\"}\n",
    )
    .unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/translate")
            .json_body(serde_json::json!({"model": "test-model", "texts": ["b"]}));
        then.status(500).body("internal error");
    });
    for text in ["a", "c"] {
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/translate")
                .json_body(serde_json::json!({"model": "test-model", "texts": [text]}));
            then.status(200).json_body(serde_json::json!([text.to_uppercase()]));
        });
    }

    let mut config = cli_config(server.base_url(), temp_dir.path(), &["data.jsonl"], &["text"]);
    config.batch_size = 1;
    config.num_workers = 3;
    let output = config.output_path.clone().unwrap();

    let result = run_engine(config).await;

    assert!(matches!(result, Err(TranslateError::Upstream { .. })));
    assert!(!Path::new(&output).exists());
}

#[tokio::test]
async fn test_unrecognized_extension_fails_before_router_call() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("data.csv"), "text\nhello\n").unwrap();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/api/translate");
        then.status(200).json_body(serde_json::json!([]));
    });

    let config = cli_config(server.base_url(), temp_dir.path(), &["data.csv"], &["text"]);
    let result = run_engine(config).await;

    assert!(matches!(result, Err(TranslateError::UnrecognizedFormat { .. })));
    api_mock.assert_hits(0);
}

#[tokio::test]
async fn test_explicit_dataset_type_and_multiple_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("a.data"),
        "{\"title\": \"T1\", \"text\": \"x\", \"id\": 1}\n",
    )?;
    std::fs::write(temp_dir.path().join("b.data"), "{\"id\": 2, \"text\": \"y\"}\n")?;

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/translate")
            .json_body(serde_json::json!({"model": "test-model", "texts": ["x", "T1", "y"]}));
        then.status(200).json_body(serde_json::json!(["X", "t1", "Y"]));
    });

    let mut config = cli_config(
        server.base_url(),
        temp_dir.path(),
        &["a.data", "b.data"],
        &["text", "title"],
    );
    config.dataset_type = Some(DatasetType::Jsonl);
    let output = config.output_path.clone().unwrap();

    run_engine(config).await?;

    api_mock.assert();
    let written = std::fs::read_to_string(output)?;
    assert_eq!(
        written,
        "{\"title\": \"t1\", \"text\": \"X\"}\n{\"text\": \"Y\"}\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_scalar_response_for_single_text_batch() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("data.json"), r#"[{"text": "hello", "id": 9}]"#)?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/translate");
        then.status(200).json_body(serde_json::json!("cześć"));
    });

    let config = cli_config(server.base_url(), temp_dir.path(), &["data.json"], &[]);
    let output = config.output_path.clone().unwrap();

    run_engine(config).await?;

    let written = std::fs::read_to_string(output)?;
    assert_eq!(written, "{\"text\": \"cześć\", \"id\": 9}\n");
    Ok(())
}

#[tokio::test]
async fn test_empty_dataset_makes_no_router_calls() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("data.json"), "[]").unwrap();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/api/translate");
        then.status(200).json_body(serde_json::json!([]));
    });

    let config = cli_config(server.base_url(), temp_dir.path(), &["data.json"], &["text"]);
    let output = config.output_path.clone().unwrap();

    run_engine(config).await.unwrap();

    api_mock.assert_hits(0);
    assert_eq!(std::fs::read_to_string(output).unwrap(), "");
}

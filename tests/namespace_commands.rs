use httpmock::prelude::*;
use serde_json::json;

use pulsarctl::commands::{self, CommandContext, errors::format_cli_error};
use pulsarctl::{AdminClient, CtlConfig, CtlError, cli_utils::OutputFormat};

const RATE_BODY: &str = r#"{"dispatchThrottlingRateInMsg":100,"dispatchThrottlingRateInByte":1024,"ratePeriodInSecond":1,"relativeToPublishRate":false}"#;

fn config(admin_url: &str) -> CtlConfig {
    CtlConfig {
        admin_service_url: admin_url.to_string(),
        auth_token: Some("test-token".to_string()),
        ..CtlConfig::default()
    }
}

/// Runs one command line against `config` and returns the outcome with everything written to stdout.
async fn run(config: &CtlConfig, args: &[&str]) -> (Result<(), CtlError>, String) {
    let client = AdminClient::new(config).unwrap();
    let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
    let mut out = Vec::new();
    let result = {
        let mut ctx = CommandContext::new(&client, config.output, &mut out);
        commands::run_command(&args, &mut ctx).await
    };
    (result, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn get_replicator_dispatch_rate_prints_policy() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/admin/v2/namespaces/public/default/replicatorDispatchRate")
                .header("Authorization", "Bearer test-token");
            then.status(200)
                .header("content-type", "application/json")
                .body(RATE_BODY);
        })
        .await;

    let (result, out) = run(
        &config(&server.base_url()),
        &["namespaces", "get-replicator-dispatch-rate", "public/default"],
    )
    .await;

    result.unwrap();
    mock.assert_async().await;
    let printed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        printed,
        json!({
            "dispatchThrottlingRateInMsg": 100,
            "dispatchThrottlingRateInByte": 1024,
            "ratePeriodInSecond": 1,
            "relativeToPublishRate": false
        })
    );
}

#[tokio::test]
async fn get_replicator_dispatch_rate_renders_yaml() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/admin/v2/namespaces/public/default/replicatorDispatchRate");
            then.status(200).body(RATE_BODY);
        })
        .await;

    let config = CtlConfig {
        output: OutputFormat::Yaml,
        ..config(&server.base_url())
    };
    let (result, out) = run(
        &config,
        &["namespaces", "get-replicator-dispatch-rate", "public/default"],
    )
    .await;

    result.unwrap();
    assert!(out.contains("dispatchThrottlingRateInMsg: 100\n"), "{}", out);
    assert!(out.contains("relativeToPublishRate: false\n"), "{}", out);
}

#[tokio::test]
async fn unset_policy_prints_null() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/admin/v2/namespaces/public/default/replicatorDispatchRate");
            then.status(200);
        })
        .await;

    let (result, out) = run(
        &config(&server.base_url()),
        &["namespaces", "get-replicator-dispatch-rate", "public/default"],
    )
    .await;

    result.unwrap();
    assert_eq!(out, "null\n");
}

#[tokio::test]
async fn each_getter_reads_its_own_policy() {
    let server = MockServer::start_async().await;
    let topic = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/admin/v2/namespaces/public/default/dispatchRate");
            then.status(200).body(RATE_BODY);
        })
        .await;
    let subscription = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/admin/v2/namespaces/public/default/subscriptionDispatchRate");
            then.status(200)
                .body(r#"{"dispatchThrottlingRateInMsg":7}"#);
        })
        .await;
    let config = config(&server.base_url());

    let (result, _) = run(&config, &["namespaces", "get-dispatch-rate", "public/default"]).await;
    result.unwrap();

    let (result, out) = run(
        &config,
        &["namespaces", "get-subscription-dispatch-rate", "public/default"],
    )
    .await;
    result.unwrap();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&out).unwrap(),
        json!({
            "dispatchThrottlingRateInMsg": 7,
            "dispatchThrottlingRateInByte": -1,
            "ratePeriodInSecond": 1,
            "relativeToPublishRate": false
        })
    );

    topic.assert_async().await;
    subscription.assert_async().await;
}

#[tokio::test]
async fn legacy_names_use_v1_paths() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/admin/namespaces/sample/standalone/ns1/dispatchRate");
            then.status(200).body(RATE_BODY);
        })
        .await;

    let (result, _) = run(
        &config(&server.base_url()),
        &["namespaces", "get-dispatch-rate", "sample/standalone/ns1"],
    )
    .await;

    result.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn set_replicator_dispatch_rate_posts_flags() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/admin/v2/namespaces/public/default/replicatorDispatchRate")
                .header("Authorization", "Bearer test-token")
                .json_body(json!({
                    "dispatchThrottlingRateInMsg": 10,
                    "dispatchThrottlingRateInByte": 2048,
                    "ratePeriodInSecond": 30,
                    "relativeToPublishRate": true
                }));
            then.status(204);
        })
        .await;

    let (result, out) = run(
        &config(&server.base_url()),
        &[
            "namespaces",
            "set-replicator-dispatch-rate",
            "public/default",
            "--msg-rate",
            "10",
            "-b",
            "2048",
            "--period",
            "30",
            "--relative-to-publish-rate",
        ],
    )
    .await;

    result.unwrap();
    mock.assert_async().await;
    assert_eq!(
        out,
        "Set the default replicator message dispatch rate of the namespace public/default successfully\n"
    );
}

#[tokio::test]
async fn set_dispatch_rate_posts_to_the_topic_policy() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/admin/v2/namespaces/public/default/dispatchRate")
                .header("Authorization", "Bearer test-token")
                .json_body(json!({
                    "dispatchThrottlingRateInMsg": -1,
                    "dispatchThrottlingRateInByte": 1024,
                    "ratePeriodInSecond": 10,
                    "relativeToPublishRate": false
                }));
            then.status(204);
        })
        .await;
    let other_policies = server
        .mock_async(|when, then| {
            when.method(POST).path_contains("DispatchRate");
            then.status(204);
        })
        .await;

    let (result, out) = run(
        &config(&server.base_url()),
        &[
            "namespaces",
            "set-dispatch-rate",
            "public/default",
            "--byte-rate",
            "1024",
            "-p",
            "10",
        ],
    )
    .await;

    result.unwrap();
    mock.assert_async().await;
    other_policies.assert_hits_async(0).await;
    assert_eq!(
        out,
        "Set the default message dispatch rate of the namespace public/default successfully\n"
    );
}

#[tokio::test]
async fn set_subscription_dispatch_rate_uses_defaults_for_missing_flags() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/admin/v2/namespaces/public/default/subscriptionDispatchRate")
                .json_body(json!({
                    "dispatchThrottlingRateInMsg": 50,
                    "dispatchThrottlingRateInByte": -1,
                    "ratePeriodInSecond": 1,
                    "relativeToPublishRate": false
                }));
            then.status(204);
        })
        .await;

    let (result, out) = run(
        &config(&server.base_url()),
        &[
            "namespaces",
            "set-subscription-dispatch-rate",
            "public/default",
            "-m",
            "50",
        ],
    )
    .await;

    result.unwrap();
    mock.assert_async().await;
    assert!(out.contains("subscription message dispatch rate"));
}

#[tokio::test]
async fn remove_replicator_dispatch_rate_sends_delete() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/admin/v2/namespaces/public/default/replicatorDispatchRate");
            then.status(204);
        })
        .await;

    let (result, out) = run(
        &config(&server.base_url()),
        &["namespaces", "remove-replicator-dispatch-rate", "public/default"],
    )
    .await;

    result.unwrap();
    mock.assert_async().await;
    assert_eq!(
        out,
        "Removed the replicator message dispatch rate of the namespace public/default successfully\n"
    );
}

#[tokio::test]
async fn invalid_names_never_reach_the_server() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|_when, then| {
            then.status(200).body(RATE_BODY);
        })
        .await;
    let config = config(&server.base_url());

    for args in [
        vec!["namespaces", "get-replicator-dispatch-rate"],
        vec!["namespaces", "get-replicator-dispatch-rate", "public"],
        vec!["namespaces", "get-replicator-dispatch-rate", "a/b", "c/d"],
        vec!["namespaces", "get-replicator-dispatch-rate", "pub lic/default"],
        vec!["namespaces", "set-dispatch-rate", "public/default", "-m", "many"],
    ] {
        let (result, out) = run(&config, &args).await;
        assert!(result.is_err(), "{:?} should fail", args);
        assert!(out.is_empty(), "{:?} printed {}", args, out);
    }

    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn missing_name_reports_the_expected_message() {
    let (result, _) = run(
        &config("http://localhost:8080"),
        &["namespaces", "get-replicator-dispatch-rate"],
    )
    .await;
    assert_eq!(
        result.unwrap_err().to_string(),
        "the namespace name is not specified or the namespace name is specified more than one"
    );
}

#[tokio::test]
async fn server_errors_are_reported_with_reason() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/admin/v2/namespaces/public/missing/replicatorDispatchRate");
            then.status(404)
                .header("content-type", "application/json")
                .body(r#"{"reason":"Namespace does not exist"}"#);
        })
        .await;

    let (result, out) = run(
        &config(&server.base_url()),
        &["namespaces", "get-replicator-dispatch-rate", "public/missing"],
    )
    .await;

    mock.assert_hits_async(1).await;
    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "code: 404 reason: Namespace does not exist");
    assert!(out.is_empty());
}

#[tokio::test]
async fn connection_failures_are_transport_errors() {
    let (result, out) = run(
        &config("http://127.0.0.1:1"),
        &["namespaces", "get-replicator-dispatch-rate", "public/default"],
    )
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err, CtlError::Transport(_)));
    assert!(out.is_empty());
    let report = format_cli_error(&err);
    assert!(report.contains("Connection refused"), "{}", report);
    assert!(report.contains("Hint: Could not connect"), "{}", report);
}

#[tokio::test]
async fn help_is_printed_without_requests() {
    let (result, out) = run(
        &config("http://127.0.0.1:1"),
        &["namespaces", "set-replicator-dispatch-rate", "--help"],
    )
    .await;

    result.unwrap();
    assert!(out.contains("pulsarctl namespaces set-replicator-dispatch-rate <namespace> [flags]"));
    assert!(out.contains("--msg-rate"));
}

/// Integration tests with a mocked AI completion service
/// Tests the analysis orchestration without hitting a real external service
use finhealth_api::analysis::{simulated_analysis, AiClient, AnalysisRequest, RiskAnalyzer};
use finhealth_api::models::AnalysisSource;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to create an analyzer pointed at a mock server
fn analyzer_for(base_url: String) -> RiskAnalyzer {
    RiskAnalyzer::new(Some(AiClient::new(
        base_url,
        "test_key".to_string(),
        "gpt-3.5-turbo".to_string(),
    )))
}

fn sample_request() -> AnalysisRequest<'static> {
    AnalysisRequest {
        industry: "Services",
        lang: "ta",
        revenue: 100_000.0,
        expense: 90_000.0,
        profit: 10_000.0,
    }
}

/// Wrap an assistant message content string into a chat-completions reply.
fn completion_with_content(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [
            {"message": {"role": "assistant", "content": content}}
        ]
    })
}

#[tokio::test]
async fn test_successful_analysis_maps_fields() {
    let mock_server = MockServer::start().await;

    let content = serde_json::json!({
        "risk_level": "Low",
        "recommendations": ["Expand exports", "Negotiate rents", "Automate billing"],
        "investor_summary_english": "Healthy margins and strong credit standing.",
        "investor_summary_target": "நல்ல லாப அளவு."
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(
            serde_json::json!({"model": "gpt-3.5-turbo"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_with_content(&content)))
        .mount(&mock_server)
        .await;

    let assessment = analyzer_for(mock_server.uri())
        .assess(&sample_request())
        .await;

    assert_eq!(assessment.source, AnalysisSource::Ai);
    assert_eq!(assessment.analysis.risk_level, "Low");
    assert_eq!(assessment.analysis.recommendations.len(), 3);
    assert_eq!(
        assessment.analysis.summary_en,
        "Healthy margins and strong credit standing."
    );
    assert_eq!(assessment.analysis.summary_localized, "நல்ல லாப அளவு.");
}

#[tokio::test]
async fn test_missing_keys_tolerated_with_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_with_content("{}")))
        .mount(&mock_server)
        .await;

    let assessment = analyzer_for(mock_server.uri())
        .assess(&sample_request())
        .await;

    // A well-formed but sparse object still counts as a real analysis.
    assert_eq!(assessment.source, AnalysisSource::Ai);
    assert_eq!(assessment.analysis.risk_level, "Medium Risk");
    assert!(assessment.analysis.recommendations.is_empty());
    assert_eq!(assessment.analysis.summary_en, "");
    assert_eq!(assessment.analysis.summary_localized, "");
}

#[tokio::test]
async fn test_non_json_content_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_with_content("I am sorry, I cannot do that.")),
        )
        .mount(&mock_server)
        .await;

    let assessment = analyzer_for(mock_server.uri())
        .assess(&sample_request())
        .await;

    assert_eq!(assessment.source, AnalysisSource::Simulated);
    assert_eq!(assessment.analysis.risk_level, "Medium Risk (Simulated)");
}

#[tokio::test]
async fn test_non_object_content_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_with_content("[1, 2, 3]")),
        )
        .mount(&mock_server)
        .await;

    let assessment = analyzer_for(mock_server.uri())
        .assess(&sample_request())
        .await;

    assert_eq!(assessment.source, AnalysisSource::Simulated);
}

#[tokio::test]
async fn test_error_status_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("insufficient quota"))
        .mount(&mock_server)
        .await;

    let assessment = analyzer_for(mock_server.uri())
        .assess(&sample_request())
        .await;

    assert_eq!(assessment.source, AnalysisSource::Simulated);
}

#[tokio::test]
async fn test_missing_credential_falls_back() {
    let assessment = RiskAnalyzer::new(None).assess(&sample_request()).await;

    assert_eq!(assessment.source, AnalysisSource::Simulated);
    assert_eq!(assessment.analysis.recommendations.len(), 3);
}

#[tokio::test]
async fn test_fallback_is_deterministic_across_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let analyzer = analyzer_for(mock_server.uri());
    let first = analyzer.assess(&sample_request()).await;
    let second = analyzer.assess(&sample_request()).await;

    // Byte-identical fallback text for identical inputs.
    assert_eq!(first, second);
    assert_eq!(first.analysis, simulated_analysis(100_000.0));
    assert!(first.analysis.summary_en.contains("(100000)"));
}

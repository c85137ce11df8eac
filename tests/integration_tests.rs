// Integration tests for Candidate Scorer

use actix_web::{test, web, App};
use candidate_scorer::core::{
    evaluate_batch, summarize, BatchOptions, CandidateScorer, ResilientSimilarity, SkillSimilarity,
};
use candidate_scorer::models::{CandidateEntry, CandidateProfile, Evaluation, Recommendation};
use candidate_scorer::routes::{configure_routes, evaluations::AppState, handle_json_payload_error};
use candidate_scorer::services::{
    parse_reference_profiles, parse_requirements, CachedSimilarity, SemanticSimilarityClient,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const REQUIREMENTS: &str = r#"{
    "required_qualifications": ["MBA", "Engineering degree"],
    "required_experience": { "years": 8, "domains": ["Fintech"] },
    "key_responsibilities": ["Own the payments roadmap"],
    "must_have_skills": ["Product strategy", "SQL", "Stakeholder management"],
    "nice_to_have_skills": ["Python", "A/B testing"],
    "key_competencies": ["Leadership"]
}"#;

const REFERENCE: &str = r#"{
    "hire_01": {
        "name": "Ana", "current_role": "Senior Product Manager", "years_of_experience": 9,
        "has_mba": true, "has_engineering_degree": true, "has_tech_background": true,
        "skills": ["Product strategy", "SQL", "Roadmapping"], "domain_expertise": ["Fintech"]
    },
    "hire_02": {
        "name": "Ben", "current_role": "Product Lead", "years_of_experience": 7,
        "has_mba": true, "has_engineering_degree": false, "has_tech_background": true,
        "skills": ["SQL", "Stakeholder management", "Roadmapping"]
    },
    "hire_03": { "error": "Failed to parse profile" },
    "hire_04": {
        "name": "Cleo", "current_role": "Product Manager", "years_of_experience": "8",
        "has_mba": false, "has_engineering_degree": true, "has_tech_background": false,
        "skills": "Roadmapping"
    }
}"#;

fn create_scorer(similarity: ResilientSimilarity) -> CandidateScorer {
    let requirements = parse_requirements(REQUIREMENTS).unwrap();
    let reference = parse_reference_profiles(REFERENCE).unwrap();
    CandidateScorer::from_reference(
        requirements,
        reference.iter().map(|e| &e.profile),
        similarity,
    )
    .unwrap()
}

fn strong_candidate() -> CandidateProfile {
    serde_json::from_value(json!({
        "name": "Dana",
        "current_role": "Senior Product Manager",
        "years_of_experience": 9,
        "has_mba": true,
        "has_engineering_degree": true,
        "has_tech_background": true,
        "skills": ["Product strategy", "SQL", "Stakeholder management", "Python", "Roadmapping"],
        "domain_expertise": ["Fintech"]
    }))
    .unwrap()
}

fn assert_evaluation_invariants(evaluation: &Evaluation) {
    let expected =
        ((evaluation.jd_match_score * 0.4 + evaluation.pattern_match_score * 0.6) * 10.0).round()
            / 10.0;
    assert_eq!(evaluation.overall_score, expected);
    assert!(evaluation.overall_score >= 0.0 && evaluation.overall_score <= 100.0);
    assert!(evaluation
        .strengths
        .iter()
        .all(|s| !evaluation.weaknesses.contains(s)));
}

#[tokio::test]
async fn test_integration_session_from_json() {
    let scorer = create_scorer(ResilientSimilarity::lexical_only());
    let baseline = scorer.baseline();

    assert_eq!(baseline.total_profiles, 3);
    assert_eq!(baseline.excluded_profiles, 1);
    assert_eq!(baseline.avg_experience, 8.0);
    assert_eq!(baseline.experience_range.min, 7.0);
    assert_eq!(baseline.common_skills[0].skill, "SQL");
    assert_eq!(scorer.requirements().required_experience.years, 8.0);
}

#[tokio::test]
async fn test_integration_strong_candidate() {
    let scorer = create_scorer(ResilientSimilarity::lexical_only());
    let evaluation = scorer.evaluate(&strong_candidate()).await;

    assert_evaluation_invariants(&evaluation);
    assert_eq!(evaluation.candidate_name, "Dana");
    assert_eq!(evaluation.recommendation, Recommendation::Strong);
    assert!(evaluation.weaknesses.is_empty(), "{:?}", evaluation.weaknesses);
    assert_eq!(evaluation.detailed_breakdown.jd_components.len(), 5);
    assert_eq!(evaluation.detailed_breakdown.pattern_components.len(), 5);
}

#[tokio::test]
async fn test_integration_evaluation_json_shape() {
    let scorer = create_scorer(ResilientSimilarity::lexical_only());
    let evaluation = scorer.evaluate(&strong_candidate()).await;
    let value = serde_json::to_value(&evaluation).unwrap();

    assert_eq!(value["recommendation"], "Strong Candidate");
    let components: Vec<&String> = value["detailed_breakdown"]["jd_components"]
        .as_object()
        .unwrap()
        .keys()
        .collect();
    assert_eq!(
        components,
        vec![
            "qualifications",
            "experience",
            "must_have_skills",
            "nice_to_have_skills",
            "domain_expertise"
        ]
    );
    assert!(value["baseline_stats"]["avg_experience"].is_number());
}

#[tokio::test]
async fn test_integration_batch_report() {
    let scorer = Arc::new(create_scorer(ResilientSimilarity::lexical_only()));

    let mut candidates: Vec<CandidateEntry> = (0..6)
        .map(|i| CandidateEntry {
            id: format!("cand_{i}"),
            profile: CandidateProfile {
                name: format!("Candidate {i}"),
                years_of_experience: i as f64 * 2.0,
                has_mba: i % 2 == 0,
                skills: vec!["SQL".to_string()],
                ..CandidateProfile::default()
            },
        })
        .collect();
    candidates.push(CandidateEntry {
        id: "strong".to_string(),
        profile: strong_candidate(),
    });
    candidates.push(CandidateEntry {
        id: "broken".to_string(),
        profile: CandidateProfile::malformed("timeout"),
    });

    let outcome = evaluate_batch(
        scorer,
        candidates,
        BatchOptions {
            workers: 2,
            pacing: Duration::ZERO,
        },
    )
    .await;
    let report = summarize(outcome, 75.0);

    assert_eq!(report.total_candidates_processed, 7);
    assert_eq!(report.total_errors, 1);
    assert_eq!(report.errors[0].id, "broken");
    assert_eq!(report.distribution.total(), 7);
    assert_eq!(report.ranking[0].id, "strong");
    assert_eq!(report.top_candidates.len(), 5);
    assert_eq!(report.bottom_candidates.len(), 5);
    assert!(report.qualified.iter().all(|c| c.overall_score >= 75.0));
    assert!(report
        .ranking
        .windows(2)
        .all(|w| w[0].overall_score >= w[1].overall_score));
    for evaluation in &report.evaluations {
        assert_evaluation_invariants(evaluation);
    }
}

#[tokio::test]
async fn test_integration_remote_similarity() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":" 0.9 "}}]}"#)
        .expect(1)
        .create_async()
        .await;

    let client = SemanticSimilarityClient::new(
        format!("{}/v1/chat/completions", server.url()),
        "test-key".to_string(),
        "test-model".to_string(),
        Duration::from_secs(5),
        15,
    )
    .unwrap();
    let cached: Arc<dyn SkillSimilarity> = Arc::new(CachedSimilarity::new(Arc::new(client), 100, 60));
    let port = ResilientSimilarity::new(cached, Duration::from_secs(5));

    let candidate = vec!["Python programming".to_string()];
    let target = vec!["Python".to_string(), "Go".to_string()];

    assert_eq!(port.score(&candidate, &target).await, 0.9);
    // second call is served from the cache
    assert_eq!(port.score(&candidate, &target).await, 0.9);
    assert_eq!(port.backend(), "semantic");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_integration_remote_failure_falls_back() {
    let mut server = mockito::Server::new_async().await;
    let _error = server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .create_async()
        .await;

    let client = SemanticSimilarityClient::new(
        format!("{}/v1/chat/completions", server.url()),
        "test-key".to_string(),
        "test-model".to_string(),
        Duration::from_secs(5),
        15,
    )
    .unwrap();
    let port = ResilientSimilarity::new(Arc::new(client), Duration::from_secs(5));

    let candidate = vec!["Python programming".to_string()];
    let target = vec!["Python".to_string(), "Go".to_string()];

    assert_eq!(port.score(&candidate, &target).await, 0.5);
}

#[tokio::test]
async fn test_integration_non_numeric_reply_falls_back() {
    let mut server = mockito::Server::new_async().await;
    let _reply = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"content":"quite similar"}}]}"#)
        .create_async()
        .await;

    let client = SemanticSimilarityClient::new(
        format!("{}/v1/chat/completions", server.url()),
        "test-key".to_string(),
        "test-model".to_string(),
        Duration::from_secs(5),
        15,
    )
    .unwrap();
    let port = ResilientSimilarity::new(Arc::new(client), Duration::from_secs(5));

    let score = port
        .score(&["SQL".to_string()], &["Advanced SQL".to_string()])
        .await;
    assert_eq!(score, 1.0);
}

fn app_state() -> AppState {
    AppState {
        scorer: Arc::new(create_scorer(ResilientSimilarity::lexical_only())),
        batch: BatchOptions::default(),
    }
}

#[actix_web::test]
async fn test_http_health_and_baseline() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["similarity_backend"], "lexical");
    assert_eq!(body["reference_profiles"], 3);

    let req = test::TestRequest::get().uri("/api/v1/baseline").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_profiles"], 3);
}

#[actix_web::test]
async fn test_http_evaluate() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/evaluations")
        .set_json(json!({ "candidate": strong_candidate() }))
        .to_request();
    let evaluation: Evaluation = test::call_and_read_body_json(&app, req).await;

    assert_eq!(evaluation.candidate_name, "Dana");
    assert_evaluation_invariants(&evaluation);
}

#[actix_web::test]
async fn test_http_batch_validation() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/evaluations/batch")
        .set_json(json!({ "candidates": [], "minScore": 50 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::post()
        .uri("/api/v1/evaluations/batch")
        .set_json(json!({
            "candidates": [{ "id": "dana", "profile": strong_candidate() }],
            "minScore": 50
        }))
        .to_request();
    let report: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(report["total_candidates_processed"], 1);
    assert_eq!(report["qualified"][0]["id"], "dana");
}

#[actix_web::test]
async fn test_http_malformed_json_body() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/evaluations")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
    assert_eq!(body["status_code"], 400);
}

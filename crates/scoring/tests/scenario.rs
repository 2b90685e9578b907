use decoder_scoring::{
    partial_ratio, PageDraft, PageField, PageSubmission, ScoreComposer, ScoringError,
    ScoringWeights,
};
use proptest::prelude::*;

fn seo_tips() -> PageSubmission {
    PageSubmission {
        title: "SEO Tips".to_string(),
        headings: String::new(),
        first_paragraph: String::new(),
        body_text: "seo seo tips".to_string(),
        views: 100,
        shares: 10,
        likes: 5,
        comments: 2,
        position: 4,
        age_days: 10,
        keyword: "seo".to_string(),
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn seo_tips_scenario() {
    let score = ScoreComposer::new().score(&seo_tips()).unwrap();

    assert_eq!(score.breakdown.title, 100);
    assert_eq!(score.breakdown.headings, 0);
    assert_eq!(score.breakdown.first_paragraph, 0);
    assert_eq!(score.breakdown.body_occurrences, 2);
    assert_eq!(score.breakdown.meta, 1);

    assert_close(score.relevance, 504.0);
    assert_close(score.freshness, 10.0);
    assert_close(score.interaction, 14.3);
    // 0.4·504 + 0.3 + 0.2·10 + 0.1·14.3 + 5
    assert_close(score.final_score, 210.33);

    assert_eq!(score.position, 4);
    assert_eq!(score.keyword, "seo");
    assert_eq!(score.text_features.presence_total, 4);
}

#[test]
fn scenario_through_the_form_boundary() {
    let mut draft = PageDraft::new();
    draft.set(PageField::Title, "SEO Tips");
    draft.set(PageField::BodyText, "seo seo tips");
    draft.set(PageField::Views, "100");
    draft.set(PageField::Shares, "10");
    draft.set(PageField::Likes, "5");
    draft.set(PageField::Comments, "2");
    draft.set(PageField::Position, "4");
    draft.set(PageField::Age, "10");
    draft.set(PageField::Keyword, "seo");

    let page = draft.validate(1).unwrap();
    assert_eq!(page, seo_tips());
}

#[test]
fn zero_age_reports_undefined_freshness() {
    let page = PageSubmission {
        age_days: 0,
        ..seo_tips()
    };
    let err = ScoreComposer::new().score(&page).unwrap_err();
    assert_eq!(err, ScoringError::ZeroAge);
    assert_eq!(err.code(), "zero_age");
    assert!(err.to_string().contains("freshness is undefined"));
}

#[test]
fn keyword_equal_to_field_ignores_case() {
    let page = PageSubmission {
        title: "Rust Web Frameworks".to_string(),
        headings: "RUST WEB FRAMEWORKS".to_string(),
        first_paragraph: "rust web frameworks".to_string(),
        age_days: 1,
        keyword: "Rust web Frameworks".to_string(),
        ..PageSubmission::default()
    };
    let score = ScoreComposer::new().score(&page).unwrap();
    assert_eq!(score.breakdown.title, 100);
    assert_eq!(score.breakdown.headings, 100);
    assert_eq!(score.breakdown.first_paragraph, 100);
}

proptest! {
    #[test]
    fn freshness_is_exact_for_positive_age(age in 1u64..1_000_000) {
        let weights = ScoringWeights::default();
        prop_assert_eq!(weights.freshness(age).unwrap(), 100.0 / age as f64);
    }

    #[test]
    fn interaction_is_linear(
        views in 0u64..100_000,
        shares in 0u64..100_000,
        likes in 0u64..100_000,
        comments in 0u64..100_000,
    ) {
        let weights = ScoringWeights::default();
        let total = weights.interaction(views, shares, likes, comments);
        let parts = weights.interaction(views, 0, 0, 0)
            + weights.interaction(0, shares, 0, 0)
            + weights.interaction(0, 0, likes, 0)
            + weights.interaction(0, 0, 0, comments);
        prop_assert!((total - parts).abs() < 1e-6);
        prop_assert!((weights.interaction(views, 0, 0, 0) - 0.1 * views as f64).abs() < 1e-9);
        prop_assert!((weights.interaction(0, 0, 0, comments) - 0.4 * comments as f64).abs() < 1e-9);
    }

    #[test]
    fn partial_ratio_stays_in_range(left in ".{0,40}", right in ".{0,40}") {
        let score = partial_ratio(&left, &right);
        prop_assert!(score <= 100);
    }

    #[test]
    fn contained_keyword_always_scores_100(
        prefix in "[a-z ]{0,20}",
        keyword in "[a-z]{1,10}",
        suffix in "[a-z ]{0,20}",
    ) {
        let field = format!("{prefix}{keyword}{suffix}");
        prop_assert_eq!(partial_ratio(&field, &keyword.to_uppercase()), 100);
    }
}
